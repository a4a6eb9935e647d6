//! A 2D parametric geometric-constraint solver.
//!
//! Declare named shapes, relate their points through constraints addressed
//! as `"ShapeName.pointName"` strings, and solve: a damped Gauss-Newton
//! engine drives every residual to zero and writes the result back into the
//! shapes' points.
//!
//! ```no_run
//! use lm_solver::SolveOptions;
//! use sketch_engine::constraint::SpaceBetweenEdges;
//! use sketch_engine::shapes::{Rectangle, RectangleOptions};
//! use sketch_engine::Sketch;
//!
//! # fn main() -> Result<(), sketch_engine::SketchError> {
//! let mut sketch = Sketch::new();
//! sketch
//!     .add(Rectangle::new(RectangleOptions {
//!         name: "R1".to_string(),
//!         width: Some(150.0),
//!         height: Some(120.0),
//!         ..Default::default()
//!     })?)?
//!     .add(Rectangle::new(RectangleOptions {
//!         name: "R2".to_string(),
//!         width: Some(90.0),
//!         height: Some(120.0),
//!         ..Default::default()
//!     })?)?
//!     .add(SpaceBetweenEdges::new("R1.rightEdge", "R2.leftEdge", 40.0)?)?;
//!
//! let result = sketch.solve(&SolveOptions::default())?;
//! assert!(result.converged);
//! # Ok(())
//! # }
//! ```

pub mod constraint;
pub mod error;
pub mod graphics;
pub mod internal;
pub mod resolve;
pub mod shapes;
pub mod sketch;
pub mod svg;

pub use error::SketchError;
pub use graphics::GraphicsObject;
pub use lm_solver::{SolveOptions, SolveResult};
pub use resolve::{BuildContext, ResolvedEdge};
pub use sketch::{Sketch, SketchItem};
pub use svg::SvgOptions;
