//! SVG projection of the current sketch state.
//!
//! A read-side consumer of solved point coordinates: shape outlines in a
//! single stroked group, followed by whatever annotations the constraints
//! choose to draw.

use sketch_types::SharedPoint;

use crate::constraint::{AnnotateContext, Constraint};
use crate::resolve::BuildContext;
use crate::shapes::Shape;

/// Sketch-space to viewport-space mapping (translation only).
#[derive(Debug, Clone, Copy)]
pub struct SvgTransform {
    dx: f64,
    dy: f64,
}

impl SvgTransform {
    fn new(min_x: f64, min_y: f64, margin: f64) -> Self {
        Self {
            dx: margin - min_x,
            dy: margin - min_y,
        }
    }

    pub fn x(&self, x: f64) -> f64 {
        x + self.dx
    }

    pub fn y(&self, y: f64) -> f64 {
        y + self.dy
    }
}

#[derive(Debug, Clone)]
pub struct SvgOptions {
    pub margin: f64,
    pub stroke_width: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            margin: 10.0,
            stroke_width: 2.0,
        }
    }
}

pub(crate) fn create_svg(
    points: &[SharedPoint],
    shapes: &[Box<dyn Shape>],
    constraints: &[&dyn Constraint],
    resolver: &BuildContext,
    opts: &SvgOptions,
) -> String {
    if points.is_empty() {
        return "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100\" height=\"100\" viewBox=\"0 0 100 100\"><rect x=\"0\" y=\"0\" width=\"100\" height=\"100\" fill=\"white\" /></svg>"
            .to_string();
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for p in points {
        let p = p.borrow();
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    // Curved shapes extend past their control points.
    for shape in shapes {
        if let Some(b) = shape.bounds() {
            min_x = min_x.min(b.min_x);
            min_y = min_y.min(b.min_y);
            max_x = max_x.max(b.max_x);
            max_y = max_y.max(b.max_y);
        }
    }

    let w = max_x - min_x + 2.0 * opts.margin;
    let h = max_y - min_y + 2.0 * opts.margin;
    let t = SvgTransform::new(min_x, min_y, opts.margin);

    let mut body = String::new();
    for shape in shapes {
        body.push_str(&shape.to_svg(&t));
    }

    let annotate_ctx = AnnotateContext {
        resolver,
        transform: &t,
    };
    let mut annotations = String::new();
    for constraint in constraints {
        if let Some(svg) = constraint.annotate_svg(&annotate_ctx) {
            annotations.push_str(&svg);
        }
    }

    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\
<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"white\" />\
<g fill=\"none\" stroke=\"black\" stroke-width=\"{}\">{body}</g>{annotations}</svg>",
        opts.stroke_width
    )
}
