use sketch_types::{EdgeMap, Point, PointMap};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, CircleGlyph, GraphicsObject};
use crate::internal::FixedSegmentLength;
use crate::svg::SvgTransform;

use super::{require_finite, require_name, require_positive, Bounds, Shape};

#[derive(Debug, Clone, Default)]
pub struct CircleOptions {
    pub name: String,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
    pub radius: Option<f64>,
}

/// A circle represented by its `center` and a `radius` point placed on the
/// perimeter at `center.x + radius`. The radius-point distance is pinned by
/// an internal constraint only when `radius` was given explicitly.
#[derive(Debug)]
pub struct Circle {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

impl Circle {
    pub fn new(opts: CircleOptions) -> Result<Self, SketchError> {
        require_name("Circle", &opts.name)?;

        let cx = opts.cx.unwrap_or(0.0);
        let cy = opts.cy.unwrap_or(0.0);
        let radius = opts.radius.unwrap_or(1.0);

        require_finite("Circle", "cx", cx)?;
        require_finite("Circle", "cy", cy)?;
        require_positive("Circle", "radius", radius)?;

        let center = Point::shared(cx, cy);
        let radius_point = Point::shared(cx + radius, cy);

        let mut points = PointMap::new();
        points.insert("center", center.clone());
        points.insert("radius", radius_point.clone());

        let mut internal: Vec<Box<dyn Constraint>> = Vec::new();
        if opts.radius.is_some() {
            internal.push(Box::new(FixedSegmentLength::new(
                center,
                radius_point,
                radius,
            )));
        }

        Ok(Self {
            name: opts.name,
            points,
            edges: EdgeMap::new(),
            internal,
        })
    }

    fn current_radius(&self) -> f64 {
        let center = self.points.get("center").unwrap().borrow();
        let rp = self.points.get("radius").unwrap().borrow();
        (rp.x - center.x).hypot(rp.y - center.y)
    }
}

impl Shape for Circle {
    fn name(&self) -> &str {
        &self.name
    }

    fn points(&self) -> &PointMap {
        &self.points
    }

    fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    fn internal_constraints(&self) -> &[Box<dyn Constraint>] {
        &self.internal
    }

    fn to_svg(&self, t: &SvgTransform) -> String {
        let center = self.points.get("center").unwrap().borrow();
        format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" />",
            t.x(center.x),
            t.y(center.y),
            self.current_radius()
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let center = self.points.get("center").unwrap().borrow();

        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go.circles.push(CircleGlyph {
            center: (center.x, center.y).into(),
            radius: self.current_radius(),
            label: Some(self.name.clone()),
        });
        go
    }

    fn bounds(&self) -> Option<Bounds> {
        let center = self.points.get("center").unwrap().borrow();
        let r = self.current_radius();
        Some(Bounds {
            min_x: center.x - r,
            min_y: center.y - r,
            max_x: center.x + r,
            max_y: center.y + r,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_radius_is_a_construction_error() {
        let err = Circle::new(CircleOptions {
            name: "C1".to_string(),
            radius: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn radius_point_sits_on_the_perimeter() {
        let circle = Circle::new(CircleOptions {
            name: "C1".to_string(),
            cx: Some(2.0),
            cy: Some(3.0),
            radius: Some(5.0),
        })
        .unwrap();

        let rp = circle.points.get("radius").unwrap().borrow();
        assert_eq!((rp.x, rp.y), (7.0, 3.0));
        assert_eq!(circle.current_radius(), 5.0);
    }

    #[test]
    fn default_radius_is_not_pinned() {
        let circle = Circle::new(CircleOptions {
            name: "C1".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(circle.internal_constraints().is_empty());
    }
}
