use sketch_types::{EdgeDef, EdgeMap, Point, PointMap, SharedPoint};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject, Polyline};
use crate::internal::{FixedSegmentLength, ParallelogramClosure, PerpendicularAt};
use crate::svg::SvgTransform;

use super::{require_finite, require_name, require_positive, Shape};

#[derive(Debug, Clone, Default)]
pub struct RectangleOptions {
    pub name: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// An axis-aligned-at-construction rectangle with corners `topLeft`,
/// `topRight`, `bottomLeft`, `bottomRight` (y grows downward).
///
/// Internal constraints keep the corners a parallelogram with a right angle
/// at `topLeft`; the top and left edge lengths are pinned only when `width`
/// or `height` were given explicitly, so an unsized rectangle can still be
/// stretched by user constraints.
pub struct Rectangle {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

impl Rectangle {
    pub fn new(opts: RectangleOptions) -> Result<Self, SketchError> {
        require_name("Rectangle", &opts.name)?;

        let x = opts.x.unwrap_or(0.0);
        let y = opts.y.unwrap_or(0.0);
        let w = opts.width.unwrap_or(1.0);
        let h = opts.height.unwrap_or(1.0);

        require_finite("Rectangle", "x", x)?;
        require_finite("Rectangle", "y", y)?;
        require_positive("Rectangle", "width", w)?;
        require_positive("Rectangle", "height", h)?;

        let top_left = Point::shared(x, y);
        let top_right = Point::shared(x + w, y);
        let bottom_left = Point::shared(x, y + h);
        let bottom_right = Point::shared(x + w, y + h);

        let mut points = PointMap::new();
        points.insert("topLeft", top_left.clone());
        points.insert("topRight", top_right.clone());
        points.insert("bottomLeft", bottom_left.clone());
        points.insert("bottomRight", bottom_right.clone());

        let mut edges = EdgeMap::new();
        for name in ["left", "leftEdge"] {
            edges.insert(name, EdgeDef::with_interior("topLeft", "bottomLeft", "topRight"));
        }
        for name in ["top", "topEdge"] {
            edges.insert(name, EdgeDef::with_interior("topLeft", "topRight", "bottomLeft"));
        }
        for name in ["right", "rightEdge"] {
            edges.insert(name, EdgeDef::with_interior("topRight", "bottomRight", "topLeft"));
        }
        for name in ["bottom", "bottomEdge"] {
            edges.insert(name, EdgeDef::with_interior("bottomLeft", "bottomRight", "topLeft"));
        }

        let mut internal: Vec<Box<dyn Constraint>> = vec![
            Box::new(ParallelogramClosure::new(
                top_left.clone(),
                top_right.clone(),
                bottom_left.clone(),
                bottom_right,
            )),
            Box::new(PerpendicularAt::new(
                top_left.clone(),
                top_right.clone(),
                bottom_left.clone(),
            )),
        ];

        if opts.width.is_some() {
            internal.push(Box::new(FixedSegmentLength::new(
                top_left.clone(),
                top_right,
                w,
            )));
        }
        if opts.height.is_some() {
            internal.push(Box::new(FixedSegmentLength::new(top_left, bottom_left, h)));
        }

        Ok(Self {
            name: opts.name,
            points,
            edges,
            internal,
        })
    }

    fn corner(&self, name: &str) -> &SharedPoint {
        self.points.get(name).unwrap()
    }
}

impl Shape for Rectangle {
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
        let tl = self.corner("topLeft").borrow();
        let tr = self.corner("topRight").borrow();
        let br = self.corner("bottomRight").borrow();
        let bl = self.corner("bottomLeft").borrow();

        format!(
            "<polygon points=\"{},{} {},{} {},{} {},{}\" />",
            t.x(tl.x),
            t.y(tl.y),
            t.x(tr.x),
            t.y(tr.y),
            t.x(br.x),
            t.y(br.y),
            t.x(bl.x),
            t.y(bl.y)
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let tl = self.corner("topLeft").borrow();
        let tr = self.corner("topRight").borrow();
        let br = self.corner("bottomRight").borrow();
        let bl = self.corner("bottomLeft").borrow();

        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go.lines.push(Polyline {
            points: vec![
                (tl.x, tl.y).into(),
                (tr.x, tr.y).into(),
                (br.x, br.y).into(),
                (bl.x, bl.y).into(),
                (tl.x, tl.y).into(),
            ],
            label: Some(self.name.clone()),
        });
        go
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_follow_the_given_origin_and_size() {
        let rect = Rectangle::new(RectangleOptions {
            name: "R1".to_string(),
            x: Some(40.0),
            y: Some(20.0),
            width: Some(150.0),
            height: Some(120.0),
        })
        .unwrap();

        let br = rect.corner("bottomRight").borrow();
        assert_eq!((br.x, br.y), (190.0, 140.0));
    }

    #[test]
    fn rejects_non_positive_sizes() {
        assert!(Rectangle::new(RectangleOptions {
            name: "R1".to_string(),
            width: Some(0.0),
            ..Default::default()
        })
        .is_err());
        assert!(Rectangle::new(RectangleOptions {
            name: "R1".to_string(),
            height: Some(-2.0),
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn unsized_rectangle_has_no_length_constraints() {
        let rect = Rectangle::new(RectangleOptions {
            name: "R1".to_string(),
            ..Default::default()
        })
        .unwrap();
        // Parallelogram closure + right angle only.
        assert_eq!(rect.internal_constraints().len(), 2);

        let sized = Rectangle::new(RectangleOptions {
            name: "R2".to_string(),
            width: Some(3.0),
            height: Some(4.0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(sized.internal_constraints().len(), 4);
    }
}
