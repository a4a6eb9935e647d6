//! Name-based reference resolution.
//!
//! Constraints address geometry as `"ShapeName.pointName"` and
//! `"ShapeName.edgeName"` strings. Resolution is lazy: a constraint may
//! reference a shape added to the sketch after the constraint itself, so
//! lookups happen at residual-build time against a non-owning view of the
//! sketch's shape registry.

use sketch_types::SharedPoint;

use crate::error::SketchError;
use crate::shapes::Shape;

/// A resolved edge: the two endpoint refs plus the optional interior-point
/// ref used by side-aware constraints.
#[derive(Debug, Clone)]
pub struct ResolvedEdge {
    pub shape: String,
    pub edge: String,
    pub point1_ref: String,
    pub point2_ref: String,
    pub interior_point_ref: Option<String>,
}

/// Non-owning view of the sketch's shapes, handed to constraints while
/// residuals are built and to the render projections.
pub struct BuildContext<'a> {
    shapes: &'a [Box<dyn Shape>],
}

fn split_ref(reference: &str) -> Result<(&str, &str), SketchError> {
    reference
        .split_once('.')
        .ok_or_else(|| SketchError::MalformedRef {
            reference: reference.to_string(),
        })
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(shapes: &'a [Box<dyn Shape>]) -> Self {
        Self { shapes }
    }

    pub fn resolve_shape(&self, name: &str) -> Result<&dyn Shape, SketchError> {
        self.shapes
            .iter()
            .map(|s| s.as_ref())
            .find(|s| s.name() == name)
            .ok_or_else(|| SketchError::UnknownShape {
                name: name.to_string(),
            })
    }

    /// Resolve `"ShapeName.pointName"` to a shared point handle.
    pub fn resolve_point(&self, reference: &str) -> Result<SharedPoint, SketchError> {
        let (shape_name, point_name) = split_ref(reference)?;
        let shape = self.resolve_shape(shape_name)?;

        shape
            .points()
            .get(point_name)
            .cloned()
            .ok_or_else(|| SketchError::UnknownPoint {
                shape: shape_name.to_string(),
                point: point_name.to_string(),
                known: shape.points().names().collect::<Vec<_>>().join(", "),
            })
    }

    /// Resolve `"ShapeName.edgeName"` against the shape's edge-definition map.
    pub fn resolve_edge(&self, reference: &str) -> Result<ResolvedEdge, SketchError> {
        let (shape_name, edge_name) = split_ref(reference)?;
        let shape = self.resolve_shape(shape_name)?;

        let def = shape
            .edges()
            .get(edge_name)
            .ok_or_else(|| SketchError::UnknownEdge {
                shape: shape_name.to_string(),
                edge: edge_name.to_string(),
                known: {
                    let mut names: Vec<&str> = shape.edges().names().collect();
                    names.sort_unstable();
                    names.join(", ")
                },
            })?;

        Ok(ResolvedEdge {
            shape: shape_name.to_string(),
            edge: edge_name.to_string(),
            point1_ref: format!("{shape_name}.{}", def.point1),
            point2_ref: format!("{shape_name}.{}", def.point2),
            interior_point_ref: def
                .interior_point
                .as_ref()
                .map(|p| format!("{shape_name}.{p}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Rectangle, RectangleOptions};

    fn boxed_rect(name: &str) -> Box<dyn Shape> {
        Box::new(
            Rectangle::new(RectangleOptions {
                name: name.to_string(),
                ..Default::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn resolves_points_and_edges() {
        let shapes = vec![boxed_rect("R1")];
        let ctx = BuildContext::new(&shapes);

        assert!(ctx.resolve_point("R1.topLeft").is_ok());

        let edge = ctx.resolve_edge("R1.right").unwrap();
        assert_eq!(edge.point1_ref, "R1.topRight");
        assert_eq!(edge.point2_ref, "R1.bottomRight");
        assert_eq!(edge.interior_point_ref.as_deref(), Some("R1.topLeft"));
    }

    #[test]
    fn missing_dot_is_malformed() {
        let shapes = vec![boxed_rect("R1")];
        let ctx = BuildContext::new(&shapes);
        assert!(matches!(
            ctx.resolve_point("R1"),
            Err(SketchError::MalformedRef { .. })
        ));
    }

    #[test]
    fn unknown_point_error_lists_known_names() {
        let shapes = vec![boxed_rect("R1")];
        let ctx = BuildContext::new(&shapes);

        let err = ctx.resolve_point("R1.middle").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("topLeft"), "message was: {msg}");
        assert!(msg.contains("bottomRight"), "message was: {msg}");
    }

    #[test]
    fn unknown_shape_fails() {
        let shapes = vec![boxed_rect("R1")];
        let ctx = BuildContext::new(&shapes);
        assert!(matches!(
            ctx.resolve_point("R9.topLeft"),
            Err(SketchError::UnknownShape { .. })
        ));
    }
}
