//! The sketch orchestrator: owns shapes and user constraints, assigns
//! solver variables, gathers residuals, and runs the solver.

use std::collections::HashSet;

use lm_solver::{Residual, SolveOptions, SolveResult};
use sketch_types::{point_id, var_slot, SharedPoint};
use tracing::{debug, warn};

use crate::constraint::{
    Coincident, Constraint, FixedPoint, FixedX, FixedY, Horizontal, LineToLineDistance,
    PerpendicularDistance, PointToPointDistance, SpaceBetweenEdges, Tangent, Vertical,
};
use crate::error::SketchError;
use crate::graphics::GraphicsObject;
use crate::internal::{
    EqualSegmentLengths, FixedPointCoordinates, FixedSegmentLength, HorizontalLine, ParallelLines,
    ParallelogramClosure, PerpendicularAt, VerticalLine,
};
use crate::resolve::BuildContext;
use crate::shapes::{
    Arc, Circle, InfiniteLine, Line, Oval, Rectangle, RightTriangle, Shape, Trapezoid,
};
use crate::svg::{create_svg, SvgOptions};

/// Anything a sketch accepts: a shape or a constraint. The `From` impls on
/// every concrete type make `Sketch::add` classification static and total.
pub enum SketchItem {
    Shape(Box<dyn Shape>),
    Constraint(Box<dyn Constraint>),
}

macro_rules! shape_items {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for SketchItem {
            fn from(value: $ty) -> Self {
                SketchItem::Shape(Box::new(value))
            }
        }
    )*};
}

macro_rules! constraint_items {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for SketchItem {
            fn from(value: $ty) -> Self {
                SketchItem::Constraint(Box::new(value))
            }
        }
    )*};
}

shape_items!(Arc, Circle, InfiniteLine, Line, Oval, Rectangle, RightTriangle, Trapezoid);

constraint_items!(
    Coincident,
    PointToPointDistance,
    FixedPoint,
    FixedX,
    FixedY,
    Horizontal,
    Vertical,
    Tangent,
    LineToLineDistance,
    PerpendicularDistance,
    SpaceBetweenEdges,
    FixedPointCoordinates,
    FixedSegmentLength,
    HorizontalLine,
    VerticalLine,
    ParallelLines,
    ParallelogramClosure,
    PerpendicularAt,
    EqualSegmentLengths,
);

/// A 2D parametric sketch: named shapes plus the user constraints between
/// their points. Solving mutates the shapes' points in place and can be
/// repeated after further `add` calls.
#[derive(Default)]
pub struct Sketch {
    shapes: Vec<Box<dyn Shape>>,
    constraints: Vec<Box<dyn Constraint>>,
}

impl std::fmt::Debug for Sketch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sketch")
            .field("shapes", &self.shapes.len())
            .field("constraints", &self.constraints.len())
            .finish()
    }
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shape (name must be unique) or append a user constraint.
    /// Chainable: `sketch.add(a)?.add(b)?`.
    pub fn add(&mut self, item: impl Into<SketchItem>) -> Result<&mut Self, SketchError> {
        match item.into() {
            SketchItem::Shape(shape) => {
                if self.shapes.iter().any(|s| s.name() == shape.name()) {
                    return Err(SketchError::DuplicateShape {
                        name: shape.name().to_string(),
                    });
                }
                self.shapes.push(shape);
            }
            SketchItem::Constraint(constraint) => {
                self.constraints.push(constraint);
            }
        }
        Ok(self)
    }

    /// All distinct points across all shapes, in insertion order,
    /// deduplicated by identity so aliases do not double-count variables.
    fn collect_points(&self) -> Vec<SharedPoint> {
        let mut seen = HashSet::new();
        let mut points = Vec::new();

        for shape in &self.shapes {
            for (_, p) in shape.points().iter() {
                if seen.insert(point_id(p)) {
                    points.push(p.clone());
                }
            }
        }
        points
    }

    /// Solve all internal and user constraints, writing the result back into
    /// the shapes' points.
    ///
    /// Resolution errors (unknown shape/point/edge) abort before any solving
    /// starts. Non-convergence is reported in the returned [`SolveResult`],
    /// not as an error.
    pub fn solve(&mut self, options: &SolveOptions) -> Result<SolveResult, SketchError> {
        let points = self.collect_points();

        let mut vars = vec![0.0; points.len() * 2];
        for (i, p) in points.iter().enumerate() {
            let mut pt = p.borrow_mut();
            pt.var_index = Some(i * 2);
            vars[i * 2] = pt.x;
            vars[i * 2 + 1] = pt.y;
        }

        let built = self.build_residuals();
        let mut residuals = match built {
            Ok(r) => r,
            Err(e) => {
                for p in &points {
                    p.borrow_mut().var_index = None;
                }
                return Err(e);
            }
        };

        // Gauge fixing: pin the first point and the second point's y to
        // their initial values, removing the rigid-body degrees of freedom
        // (two translations, one rotation) an unanchored sketch would keep.
        if let Some(p0) = points.first() {
            let i0 = var_slot(p0);
            let x0 = vars[i0];
            let y0 = vars[i0 + 1];
            residuals.push(Box::new(move |v| v[i0] - x0));
            residuals.push(Box::new(move |v| v[i0 + 1] - y0));
        }
        if points.len() >= 2 {
            let i1 = var_slot(&points[1]);
            let y1 = vars[i1 + 1];
            residuals.push(Box::new(move |v| v[i1 + 1] - y1));
        }

        debug!(
            points = points.len(),
            residuals = residuals.len(),
            "solving sketch"
        );

        let result = lm_solver::solve(&mut vars, &residuals, options);
        if !result.converged {
            warn!(
                final_error = result.final_error,
                iterations = result.iterations,
                "sketch did not converge"
            );
        }

        for p in &points {
            let mut pt = p.borrow_mut();
            if let Some(i) = pt.var_index.take() {
                pt.x = vars[i];
                pt.y = vars[i + 1];
            }
        }

        Ok(result)
    }

    fn build_residuals(&self) -> Result<Vec<Residual>, SketchError> {
        let ctx = BuildContext::new(&self.shapes);
        let mut residuals = Vec::new();

        for shape in &self.shapes {
            for constraint in shape.internal_constraints() {
                residuals.extend(constraint.build_residuals(&ctx)?);
            }
        }
        for constraint in &self.constraints {
            residuals.extend(constraint.build_residuals(&ctx)?);
        }

        Ok(residuals)
    }

    /// Current coordinates of `"ShapeName.pointName"`.
    pub fn point(&self, reference: &str) -> Result<(f64, f64), SketchError> {
        let ctx = BuildContext::new(&self.shapes);
        let p = ctx.resolve_point(reference)?;
        let p = p.borrow();
        Ok((p.x, p.y))
    }

    /// Render the current point state as a standalone SVG document.
    pub fn svg(&self, opts: &SvgOptions) -> String {
        let points = self.collect_points();
        let ctx = BuildContext::new(&self.shapes);

        let all_constraints: Vec<&dyn Constraint> = self
            .shapes
            .iter()
            .flat_map(|s| s.internal_constraints().iter().map(|c| c.as_ref()))
            .chain(self.constraints.iter().map(|c| c.as_ref()))
            .collect();

        create_svg(&points, &self.shapes, &all_constraints, &ctx, opts)
    }

    /// Project the current point state into serializable drawing primitives.
    pub fn graphics_object(&self) -> GraphicsObject {
        let ctx = BuildContext::new(&self.shapes);
        let mut combined = GraphicsObject::default();

        for shape in &self.shapes {
            combined.merge(shape.to_graphics());
        }
        for constraint in &self.constraints {
            if let Some(go) = constraint.annotate_graphics(&ctx) {
                combined.merge(go);
            }
        }

        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{LineOptions, RectangleOptions};

    #[test]
    fn duplicate_shape_names_are_rejected() {
        let mut sketch = Sketch::new();
        sketch
            .add(Line::new(LineOptions {
                name: "L1".to_string(),
                ..Default::default()
            })
            .unwrap())
            .unwrap();

        let err = sketch
            .add(Line::new(LineOptions {
                name: "L1".to_string(),
                ..Default::default()
            })
            .unwrap())
            .unwrap_err();
        assert!(matches!(err, SketchError::DuplicateShape { .. }));
    }

    #[test]
    fn aliases_do_not_double_count_variables() {
        let mut sketch = Sketch::new();
        sketch
            .add(
                crate::shapes::Trapezoid::new(crate::shapes::TrapezoidOptions {
                    name: "T1".to_string(),
                    ..Default::default()
                })
                .unwrap(),
            )
            .unwrap();

        // 4 distinct corners despite the 8 leg/base alias entries.
        assert_eq!(sketch.collect_points().len(), 4);
    }

    #[test]
    fn unresolvable_constraint_fails_before_solving() {
        let mut sketch = Sketch::new();
        sketch
            .add(Rectangle::new(RectangleOptions {
                name: "R1".to_string(),
                ..Default::default()
            })
            .unwrap())
            .unwrap();
        sketch
            .add(FixedPoint::new("R2.topLeft", 0.0, 0.0).unwrap())
            .unwrap();

        let err = sketch.solve(&SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SketchError::UnknownShape { .. }));

        // Indices must be cleared again after the failed attempt.
        for p in sketch.collect_points() {
            assert!(p.borrow().var_index.is_none());
        }
    }

    #[test]
    fn point_lookup_reads_current_coordinates() {
        let mut sketch = Sketch::new();
        sketch
            .add(Rectangle::new(RectangleOptions {
                name: "R1".to_string(),
                x: Some(5.0),
                y: Some(6.0),
                ..Default::default()
            })
            .unwrap())
            .unwrap();

        assert_eq!(sketch.point("R1.topLeft").unwrap(), (5.0, 6.0));
        assert!(sketch.point("R1.nowhere").is_err());
    }
}
