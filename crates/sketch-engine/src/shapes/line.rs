use sketch_types::{EdgeDef, EdgeMap, Point, PointMap};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject, Polyline};
use crate::internal::{FixedSegmentLength, HorizontalLine, VerticalLine};
use crate::svg::SvgTransform;

use super::{require_finite, require_name, require_positive, Shape};

#[derive(Debug, Clone, Default)]
pub struct LineOptions {
    pub name: String,
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    /// Fixed length, preserved by an internal constraint.
    pub length: Option<f64>,
    /// Keep the line horizontal; also derives the initial `x2` from `length`
    /// when `x2` is not given.
    pub horizontal: bool,
    /// Keep the line vertical; also derives the initial `y2` from `length`
    /// when `y2` is not given.
    pub vertical: bool,
}

/// A line segment with `start` and `end` points.
#[derive(Debug)]
pub struct Line {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

impl Line {
    pub fn new(opts: LineOptions) -> Result<Self, SketchError> {
        require_name("Line", &opts.name)?;

        if opts.horizontal && opts.vertical {
            return Err(SketchError::InvalidOption(
                "Line cannot be both horizontal and vertical".to_string(),
            ));
        }

        if let Some(length) = opts.length {
            require_positive("Line", "length", length)?;
        }

        let x1 = opts.x1.unwrap_or(0.0);
        let y1 = opts.y1.unwrap_or(0.0);

        let (x2, y2) = if opts.horizontal {
            let x2 = opts
                .x2
                .unwrap_or_else(|| x1 + opts.length.unwrap_or(1.0));
            (x2, opts.y2.unwrap_or(y1))
        } else if opts.vertical {
            let y2 = opts
                .y2
                .unwrap_or_else(|| y1 + opts.length.unwrap_or(1.0));
            (opts.x2.unwrap_or(x1), y2)
        } else {
            (opts.x2.unwrap_or(1.0), opts.y2.unwrap_or(0.0))
        };

        for (field, value) in [("x1", x1), ("y1", y1), ("x2", x2), ("y2", y2)] {
            require_finite("Line", field, value)?;
        }

        let start = Point::shared(x1, y1);
        let end = Point::shared(x2, y2);

        let mut points = PointMap::new();
        points.insert("start", start.clone());
        points.insert("end", end.clone());

        let mut edges = EdgeMap::new();
        edges.insert("segment", EdgeDef::new("start", "end"));

        let mut internal: Vec<Box<dyn Constraint>> = Vec::new();
        if let Some(length) = opts.length {
            internal.push(Box::new(FixedSegmentLength::new(
                start.clone(),
                end.clone(),
                length,
            )));
        }
        if opts.horizontal {
            internal.push(Box::new(HorizontalLine::new(start.clone(), end.clone())));
        }
        if opts.vertical {
            internal.push(Box::new(VerticalLine::new(start, end)));
        }

        Ok(Self {
            name: opts.name,
            points,
            edges,
            internal,
        })
    }
}

impl Shape for Line {
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
        let start = self.points.get("start").unwrap().borrow();
        let end = self.points.get("end").unwrap().borrow();
        format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" />",
            t.x(start.x),
            t.y(start.y),
            t.x(end.x),
            t.y(end.y)
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let start = self.points.get("start").unwrap().borrow();
        let end = self.points.get("end").unwrap().borrow();

        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go.lines.push(Polyline {
            points: vec![(start.x, start.y).into(), (end.x, end.y).into()],
            label: Some(self.name.clone()),
        });
        go
    }
}
