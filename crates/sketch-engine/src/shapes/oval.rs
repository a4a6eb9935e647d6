use sketch_types::{EdgeMap, Point, PointMap};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject};
use crate::internal::{FixedSegmentLength, HorizontalLine, VerticalLine};
use crate::svg::SvgTransform;

use super::{require_finite, require_name, require_positive, Bounds, Shape};

#[derive(Debug, Clone, Default)]
pub struct OvalOptions {
    pub name: String,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
    pub rx: Option<f64>,
    pub ry: Option<f64>,
}

/// An axis-aligned ellipse: `center` plus a `radiusX` point horizontally and
/// a `radiusY` point vertically from it. The axis points are always tied to
/// the center by horizontal/vertical internal constraints; their distances
/// are pinned only when `rx`/`ry` were given explicitly.
pub struct Oval {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

impl Oval {
    pub fn new(opts: OvalOptions) -> Result<Self, SketchError> {
        require_name("Oval", &opts.name)?;

        let cx = opts.cx.unwrap_or(0.0);
        let cy = opts.cy.unwrap_or(0.0);
        let rx = opts.rx.unwrap_or(1.0);
        let ry = opts.ry.unwrap_or(1.0);

        require_finite("Oval", "cx", cx)?;
        require_finite("Oval", "cy", cy)?;
        require_positive("Oval", "rx", rx)?;
        require_positive("Oval", "ry", ry)?;

        let center = Point::shared(cx, cy);
        let radius_x = Point::shared(cx + rx, cy);
        let radius_y = Point::shared(cx, cy + ry);

        let mut points = PointMap::new();
        points.insert("center", center.clone());
        points.insert("radiusX", radius_x.clone());
        points.insert("radiusY", radius_y.clone());

        let mut internal: Vec<Box<dyn Constraint>> = vec![
            Box::new(HorizontalLine::new(center.clone(), radius_x.clone())),
            Box::new(VerticalLine::new(center.clone(), radius_y.clone())),
        ];

        if opts.rx.is_some() {
            internal.push(Box::new(FixedSegmentLength::new(
                center.clone(),
                radius_x,
                rx,
            )));
        }
        if opts.ry.is_some() {
            internal.push(Box::new(FixedSegmentLength::new(center, radius_y, ry)));
        }

        Ok(Self {
            name: opts.name,
            points,
            edges: EdgeMap::new(),
            internal,
        })
    }

    fn radii(&self) -> (f64, f64) {
        let center = self.points.get("center").unwrap().borrow();
        let rx = self.points.get("radiusX").unwrap().borrow();
        let ry = self.points.get("radiusY").unwrap().borrow();
        (
            (rx.x - center.x).hypot(rx.y - center.y),
            (ry.x - center.x).hypot(ry.y - center.y),
        )
    }
}

impl Shape for Oval {
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
        let (rx, ry) = self.radii();
        format!(
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{rx}\" ry=\"{ry}\" />",
            t.x(center.x),
            t.y(center.y)
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go
    }

    fn bounds(&self) -> Option<Bounds> {
        let center = self.points.get("center").unwrap().borrow();
        let (rx, ry) = self.radii();
        Some(Bounds {
            min_x: center.x - rx,
            min_y: center.y - ry,
            max_x: center.x + rx,
            max_y: center.y + ry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_points_straddle_the_center() {
        let oval = Oval::new(OvalOptions {
            name: "O1".to_string(),
            cx: Some(10.0),
            cy: Some(20.0),
            rx: Some(4.0),
            ry: Some(2.0),
        })
        .unwrap();

        let rx = oval.points.get("radiusX").unwrap().borrow();
        let ry = oval.points.get("radiusY").unwrap().borrow();
        assert_eq!((rx.x, rx.y), (14.0, 20.0));
        assert_eq!((ry.x, ry.y), (10.0, 22.0));
    }

    #[test]
    fn axis_alignment_constraints_are_always_present() {
        let oval = Oval::new(OvalOptions {
            name: "O1".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(oval.internal_constraints().len(), 2);

        let sized = Oval::new(OvalOptions {
            name: "O2".to_string(),
            rx: Some(3.0),
            ry: Some(4.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sized.internal_constraints().len(), 4);
    }

    #[test]
    fn rejects_non_positive_radii() {
        assert!(Oval::new(OvalOptions {
            name: "O1".to_string(),
            rx: Some(0.0),
            ..Default::default()
        })
        .is_err());
    }
}
