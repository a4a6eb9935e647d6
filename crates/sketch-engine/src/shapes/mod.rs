//! Parametric shape constructors.
//!
//! Each shape validates its options, lays out initial points from the given
//! or defaulted parameters (1 for lengths, 0 for positions), builds its
//! point map (including alias entries) and edge-definition map, and emits
//! the internal constraints that keep its geometry self-consistent while
//! the solver moves it.

pub mod arc;
pub mod circle;
pub mod infinite_line;
pub mod line;
pub mod oval;
pub mod rectangle;
pub mod right_triangle;
pub mod trapezoid;

pub use arc::{Arc, ArcOptions};
pub use circle::{Circle, CircleOptions};
pub use infinite_line::{axis, AxisOptions, Direction, InfiniteLine, InfiniteLineOptions};
pub use line::{Line, LineOptions};
pub use oval::{Oval, OvalOptions};
pub use rectangle::{Rectangle, RectangleOptions};
pub use right_triangle::{RightTriangle, RightTriangleOptions};
pub use trapezoid::{LongBaseOrientation, Trapezoid, TrapezoidOptions};

use sketch_types::{EdgeMap, PointMap};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::GraphicsObject;
use crate::svg::SvgTransform;

/// Axis-aligned extent of a shape beyond its control points.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// A named, solvable shape.
pub trait Shape {
    /// Unique name within a sketch.
    fn name(&self) -> &str;

    /// Point map including alias entries; aliases share point identity.
    fn points(&self) -> &PointMap;

    /// Named edges for side-aware constraints. May be empty.
    fn edges(&self) -> &EdgeMap;

    /// Constraints that preserve the shape's defining geometry during a
    /// solve, independent of any user constraint.
    fn internal_constraints(&self) -> &[Box<dyn Constraint>];

    fn to_svg(&self, t: &SvgTransform) -> String;

    fn to_graphics(&self) -> GraphicsObject;

    /// Extent past the control points (curved shapes); `None` when the
    /// control points already bound the shape.
    fn bounds(&self) -> Option<Bounds> {
        None
    }
}

pub(crate) fn require_name(kind: &'static str, name: &str) -> Result<(), SketchError> {
    if name.is_empty() {
        return Err(SketchError::EmptyName { kind });
    }
    Ok(())
}

pub(crate) fn require_finite(kind: &str, field: &str, value: f64) -> Result<(), SketchError> {
    if !value.is_finite() {
        return Err(SketchError::InvalidOption(format!(
            "{kind} {field} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn require_positive(kind: &str, field: &str, value: f64) -> Result<(), SketchError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SketchError::InvalidOption(format!(
            "{kind} {field} must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}
