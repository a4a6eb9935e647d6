//! User-facing geometric constraints.
//!
//! Each constraint holds string references (`"ShapeName.pointName"`,
//! `"ShapeName.edgeName"`) at construction and resolves them only when
//! residuals are built, so declaration order is independent of resolution
//! order. Construction parameters are validated eagerly.

use lm_solver::Residual;
use sketch_types::{interior_unit_normal, var_slot};

use crate::error::SketchError;
use crate::graphics::{Arrow, GraphicsObject};
use crate::resolve::BuildContext;
use crate::svg::SvgTransform;

/// Context handed to the optional presentation hooks.
pub struct AnnotateContext<'a> {
    pub resolver: &'a BuildContext<'a>,
    pub transform: &'a SvgTransform,
}

/// A geometric relationship that produces one or more scalar residuals.
pub trait Constraint: std::fmt::Debug {
    /// Resolve references and produce residual equations. Resolution errors
    /// propagate before any solving starts.
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError>;

    /// Optional SVG annotation, queried by the render projection. `None`
    /// when the constraint draws nothing or a reference fails to resolve.
    fn annotate_svg(&self, _ctx: &AnnotateContext) -> Option<String> {
        None
    }

    /// Optional graphics-object annotation.
    fn annotate_graphics(&self, _ctx: &BuildContext) -> Option<GraphicsObject> {
        None
    }
}

fn require_positive_distance(what: &str, value: f64) -> Result<(), SketchError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SketchError::InvalidOption(format!(
            "{what} distance must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}

fn require_nonempty(what: &str, value: &str) -> Result<(), SketchError> {
    if value.is_empty() {
        return Err(SketchError::InvalidOption(format!(
            "{what} requires a non-empty reference"
        )));
    }
    Ok(())
}

/// Two points occupy the same location. Two residuals (Δx, Δy).
#[derive(Debug, Clone)]
pub struct Coincident {
    pub point1: String,
    pub point2: String,
}

impl Coincident {
    pub fn new(point1: impl Into<String>, point2: impl Into<String>) -> Self {
        Self {
            point1: point1.into(),
            point2: point2.into(),
        }
    }
}

impl Constraint for Coincident {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i1 = var_slot(&ctx.resolve_point(&self.point1)?);
        let i2 = var_slot(&ctx.resolve_point(&self.point2)?);

        Ok(vec![
            Box::new(move |v| v[i1] - v[i2]),
            Box::new(move |v| v[i1 + 1] - v[i2 + 1]),
        ])
    }
}

/// Two points are a fixed distance apart.
///
/// Uses the squared form `dx² + dy² - d²` so the residual stays
/// differentiable at the solution.
#[derive(Debug, Clone)]
pub struct PointToPointDistance {
    pub point1: String,
    pub point2: String,
    pub distance: f64,
}

/// Shorthand alias used throughout the API surface.
pub type Distance = PointToPointDistance;

impl PointToPointDistance {
    pub fn new(
        point1: impl Into<String>,
        point2: impl Into<String>,
        distance: f64,
    ) -> Result<Self, SketchError> {
        require_positive_distance("PointToPointDistance", distance)?;
        Ok(Self {
            point1: point1.into(),
            point2: point2.into(),
            distance,
        })
    }
}

impl Constraint for PointToPointDistance {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i1 = var_slot(&ctx.resolve_point(&self.point1)?);
        let i2 = var_slot(&ctx.resolve_point(&self.point2)?);
        let d2 = self.distance * self.distance;

        Ok(vec![Box::new(move |v| {
            let dx = v[i1] - v[i2];
            let dy = v[i1 + 1] - v[i2 + 1];
            dx * dx + dy * dy - d2
        })])
    }

    fn annotate_svg(&self, ctx: &AnnotateContext) -> Option<String> {
        let p1 = ctx.resolver.resolve_point(&self.point1).ok()?;
        let p2 = ctx.resolver.resolve_point(&self.point2).ok()?;
        let (p1, p2) = (p1.borrow(), p2.borrow());
        let x1 = ctx.transform.x(p1.x);
        let y1 = ctx.transform.y(p1.y);
        let x2 = ctx.transform.x(p2.x);
        let y2 = ctx.transform.y(p2.y);
        let tx = (x1 + x2) / 2.0;
        let ty = (y1 + y2) / 2.0 - 10.0;

        Some(format!(
            "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#e76f51\" stroke-width=\"2\" stroke-dasharray=\"5 4\" /><text x=\"{tx}\" y=\"{ty}\" fill=\"#e76f51\" font-size=\"11\" text-anchor=\"middle\">{}</text>",
            self.distance
        ))
    }

    fn annotate_graphics(&self, ctx: &BuildContext) -> Option<GraphicsObject> {
        let p1 = ctx.resolve_point(&self.point1).ok()?;
        let p2 = ctx.resolve_point(&self.point2).ok()?;
        let (p1, p2) = (p1.borrow(), p2.borrow());

        let mut go = GraphicsObject::default();
        go.arrows.push(Arrow {
            start: (p1.x, p1.y).into(),
            end: (p2.x, p2.y).into(),
            double_sided: true,
            label: Some(self.distance.to_string()),
            color: Some("#e76f51".to_string()),
        });
        Some(go)
    }
}

/// Pin a point to absolute coordinates. Two residuals.
#[derive(Debug, Clone)]
pub struct FixedPoint {
    pub point: String,
    pub x: f64,
    pub y: f64,
}

impl FixedPoint {
    pub fn new(point: impl Into<String>, x: f64, y: f64) -> Result<Self, SketchError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(SketchError::InvalidOption(format!(
                "FixedPoint coordinates must be finite numbers, got ({x}, {y})"
            )));
        }
        Ok(Self {
            point: point.into(),
            x,
            y,
        })
    }
}

impl Constraint for FixedPoint {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i = var_slot(&ctx.resolve_point(&self.point)?);
        let (x, y) = (self.x, self.y);

        Ok(vec![
            Box::new(move |v| v[i] - x),
            Box::new(move |v| v[i + 1] - y),
        ])
    }

    fn annotate_svg(&self, ctx: &AnnotateContext) -> Option<String> {
        let p = ctx.resolver.resolve_point(&self.point).ok()?;
        let p = p.borrow();
        let x = ctx.transform.x(p.x);
        let y = ctx.transform.y(p.y);
        let s = 6.0;

        Some(format!(
            "<g stroke=\"#c1121f\" fill=\"none\" stroke-width=\"2\"><line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" /><line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" /></g><text x=\"{x}\" y=\"{}\" fill=\"#c1121f\" font-size=\"11\" text-anchor=\"middle\">fixed</text>",
            x - s, y - s, x + s, y + s,
            x + s, y - s, x - s, y + s,
            y - 14.0,
        ))
    }
}

/// Pin a point's x coordinate.
#[derive(Debug, Clone)]
pub struct FixedX {
    pub point: String,
    pub x: f64,
}

impl FixedX {
    pub fn new(point: impl Into<String>, x: f64) -> Result<Self, SketchError> {
        if !x.is_finite() {
            return Err(SketchError::InvalidOption(format!(
                "FixedX x must be a finite number, got {x}"
            )));
        }
        Ok(Self {
            point: point.into(),
            x,
        })
    }
}

impl Constraint for FixedX {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i = var_slot(&ctx.resolve_point(&self.point)?);
        let x = self.x;
        Ok(vec![Box::new(move |v| v[i] - x)])
    }
}

/// Pin a point's y coordinate.
#[derive(Debug, Clone)]
pub struct FixedY {
    pub point: String,
    pub y: f64,
}

impl FixedY {
    pub fn new(point: impl Into<String>, y: f64) -> Result<Self, SketchError> {
        if !y.is_finite() {
            return Err(SketchError::InvalidOption(format!(
                "FixedY y must be a finite number, got {y}"
            )));
        }
        Ok(Self {
            point: point.into(),
            y,
        })
    }
}

impl Constraint for FixedY {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i = var_slot(&ctx.resolve_point(&self.point)?);
        let y = self.y;
        Ok(vec![Box::new(move |v| v[i + 1] - y)])
    }
}

/// A line's endpoints share the same y coordinate.
#[derive(Debug, Clone)]
pub struct Horizontal {
    pub line: String,
}

impl Horizontal {
    pub fn new(line: impl Into<String>) -> Result<Self, SketchError> {
        let line = line.into();
        require_nonempty("Horizontal", &line)?;
        Ok(Self { line })
    }
}

impl Constraint for Horizontal {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let start = var_slot(&ctx.resolve_point(&format!("{}.start", self.line))?);
        let end = var_slot(&ctx.resolve_point(&format!("{}.end", self.line))?);
        Ok(vec![Box::new(move |v| v[start + 1] - v[end + 1])])
    }
}

/// A line's endpoints share the same x coordinate.
#[derive(Debug, Clone)]
pub struct Vertical {
    pub line: String,
}

impl Vertical {
    pub fn new(line: impl Into<String>) -> Result<Self, SketchError> {
        let line = line.into();
        require_nonempty("Vertical", &line)?;
        Ok(Self { line })
    }
}

impl Constraint for Vertical {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let start = var_slot(&ctx.resolve_point(&format!("{}.start", self.line))?);
        let end = var_slot(&ctx.resolve_point(&format!("{}.end", self.line))?);
        Ok(vec![Box::new(move |v| v[start] - v[end])])
    }
}

/// A line is tangent to a circle.
///
/// Residual `cross(lineVec, center - start)² - r² · |lineVec|²`: zero iff
/// the perpendicular distance from the center to the infinite line equals
/// the radius, without dividing by the line length.
#[derive(Debug, Clone)]
pub struct Tangent {
    pub line: String,
    pub circle: String,
}

impl Tangent {
    pub fn new(line: impl Into<String>, circle: impl Into<String>) -> Result<Self, SketchError> {
        let line = line.into();
        let circle = circle.into();
        require_nonempty("Tangent", &line)?;
        require_nonempty("Tangent", &circle)?;
        Ok(Self { line, circle })
    }
}

impl Constraint for Tangent {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let si = var_slot(&ctx.resolve_point(&format!("{}.start", self.line))?);
        let ei = var_slot(&ctx.resolve_point(&format!("{}.end", self.line))?);
        let ci = var_slot(&ctx.resolve_point(&format!("{}.center", self.circle))?);
        let ri = var_slot(&ctx.resolve_point(&format!("{}.radius", self.circle))?);

        Ok(vec![Box::new(move |v| {
            let dx = v[ei] - v[si];
            let dy = v[ei + 1] - v[si + 1];
            let ux = v[ci] - v[si];
            let uy = v[ci + 1] - v[si + 1];
            let cross = ux * dy - uy * dx;
            let line_len2 = dx * dx + dy * dy;
            let rdx = v[ri] - v[ci];
            let rdy = v[ri + 1] - v[ci + 1];
            let radius2 = rdx * rdx + rdy * rdy;
            cross * cross - radius2 * line_len2
        })])
    }
}

/// Named-edge selectors understood by [`LineToLineDistance`], mapped to the
/// point pairs the shape library exposes for them.
fn edge_selector_points(selector: &str) -> Option<(&'static str, &'static str)> {
    Some(match selector {
        "left" => ("topLeft", "bottomLeft"),
        "top" => ("topLeft", "topRight"),
        "right" => ("topRight", "bottomRight"),
        "bottom" => ("bottomLeft", "bottomRight"),
        "base" | "a" | "ab" => ("pointAB", "pointAC"),
        "altitude" | "b" | "ac" => ("pointAB", "pointBC"),
        "hypotenuse" | "c" | "bc" => ("pointAC", "pointBC"),
        "shortBase" => ("shortBase.start", "shortBase.end"),
        "longBase" => ("longBase.start", "longBase.end"),
        "leg1" => ("leg1.start", "leg1.end"),
        "leg2" => ("leg2.start", "leg2.end"),
        "bottommostLeg" => ("bottommostLeg.start", "bottommostLeg.end"),
        "leftmostLeg" => ("leftmostLeg.start", "leftmostLeg.end"),
        "rightmostLeg" => ("rightmostLeg.start", "rightmostLeg.end"),
        "topmostLeg" => ("topmostLeg.start", "topmostLeg.end"),
        "bottommostBase" => ("bottommostBase.start", "bottommostBase.end"),
        "leftmostBase" => ("leftmostBase.start", "leftmostBase.end"),
        "rightmostBase" => ("rightmostBase.start", "rightmostBase.end"),
        "topmostBase" => ("topmostBase.start", "topmostBase.end"),
        _ => return None,
    })
}

/// A bare shape name means its `start`/`end` points; a dotted selector goes
/// through the named-edge table, falling back to `<selector>.start`/`.end`
/// alias entries.
fn resolve_line_ref(reference: &str) -> (String, String) {
    match reference.split_once('.') {
        None => (
            format!("{reference}.start"),
            format!("{reference}.end"),
        ),
        Some((shape, selector)) => match edge_selector_points(selector) {
            Some((p1, p2)) => (format!("{shape}.{p1}"), format!("{shape}.{p2}")),
            None => (
                format!("{shape}.{selector}.start"),
                format!("{shape}.{selector}.end"),
            ),
        },
    }
}

/// Unsigned perpendicular distance between the infinite lines through two
/// segments. Two residuals: parallelism, then `cross(u, w)² / |u|² - d²`.
#[derive(Debug, Clone)]
pub struct LineToLineDistance {
    pub line1: String,
    pub line2: String,
    pub distance: f64,
}

impl LineToLineDistance {
    pub fn new(
        line1: impl Into<String>,
        line2: impl Into<String>,
        distance: f64,
    ) -> Result<Self, SketchError> {
        let line1 = line1.into();
        let line2 = line2.into();
        require_nonempty("LineToLineDistance", &line1)?;
        require_nonempty("LineToLineDistance", &line2)?;
        require_positive_distance("LineToLineDistance", distance)?;
        Ok(Self {
            line1,
            line2,
            distance,
        })
    }
}

impl Constraint for LineToLineDistance {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let (a1_ref, a2_ref) = resolve_line_ref(&self.line1);
        let (b1_ref, b2_ref) = resolve_line_ref(&self.line2);
        let a1 = var_slot(&ctx.resolve_point(&a1_ref)?);
        let a2 = var_slot(&ctx.resolve_point(&a2_ref)?);
        let b1 = var_slot(&ctx.resolve_point(&b1_ref)?);
        let b2 = var_slot(&ctx.resolve_point(&b2_ref)?);
        let d2 = self.distance * self.distance;

        Ok(vec![
            Box::new(move |v| {
                let ux = v[a2] - v[a1];
                let uy = v[a2 + 1] - v[a1 + 1];
                let vx = v[b2] - v[b1];
                let vy = v[b2 + 1] - v[b1 + 1];
                ux * vy - uy * vx
            }),
            Box::new(move |v| {
                let ux = v[a2] - v[a1];
                let uy = v[a2 + 1] - v[a1 + 1];
                let wx = v[b1] - v[a1];
                let wy = v[b1 + 1] - v[a1 + 1];
                let cross = ux * wy - uy * wx;
                let u_len2 = ux * ux + uy * uy;
                if u_len2 == 0.0 {
                    return -d2;
                }
                (cross * cross) / u_len2 - d2
            }),
        ])
    }
}

/// Rectangle-style edge selector (`left`, `top`, `right`, `bottom`, or the
/// `leftEdge`.. spellings) to its corner point refs.
fn parse_rect_edge_ref(reference: &str) -> Result<(String, String), SketchError> {
    let (shape, edge) = reference
        .split_once('.')
        .ok_or_else(|| SketchError::MalformedRef {
            reference: reference.to_string(),
        })?;

    let selector = edge.strip_suffix("Edge").unwrap_or(edge);
    let (p1, p2) = match selector {
        "left" => ("topLeft", "bottomLeft"),
        "top" => ("topLeft", "topRight"),
        "right" => ("topRight", "bottomRight"),
        "bottom" => ("bottomLeft", "bottomRight"),
        _ => {
            return Err(SketchError::UnknownEdge {
                shape: shape.to_string(),
                edge: edge.to_string(),
                known: "bottom, left, right, top".to_string(),
            });
        }
    };

    Ok((format!("{shape}.{p1}"), format!("{shape}.{p2}")))
}

/// Builds the parallel and midpoint-perpendicularity residuals shared by the
/// edge-distance constraints.
fn parallel_and_midpoint_residuals(
    a1: usize,
    a2: usize,
    b1: usize,
    b2: usize,
) -> (Residual, Residual) {
    let parallel: Residual = Box::new(move |v| {
        let ux = v[a2] - v[a1];
        let uy = v[a2 + 1] - v[a1 + 1];
        let vx = v[b2] - v[b1];
        let vy = v[b2 + 1] - v[b1 + 1];
        ux * vy - uy * vx
    });

    let midpoint_perpendicular: Residual = Box::new(move |v| {
        let ux = v[a2] - v[a1];
        let uy = v[a2 + 1] - v[a1 + 1];
        let m1x = (v[a1] + v[a2]) / 2.0;
        let m1y = (v[a1 + 1] + v[a2 + 1]) / 2.0;
        let m2x = (v[b1] + v[b2]) / 2.0;
        let m2y = (v[b1 + 1] + v[b2 + 1]) / 2.0;
        (m2x - m1x) * ux + (m2y - m1y) * uy
    });

    (parallel, midpoint_perpendicular)
}

/// Keep two rectangle-style edges parallel at a fixed midpoint-to-midpoint
/// distance. Sign-agnostic: the squared distance form admits the overlapping
/// root. Use [`SpaceBetweenEdges`] for a guaranteed non-overlapping gap.
#[derive(Debug, Clone)]
pub struct PerpendicularDistance {
    pub edge1: String,
    pub edge2: String,
    pub distance: f64,
}

impl PerpendicularDistance {
    pub fn new(
        edge1: impl Into<String>,
        edge2: impl Into<String>,
        distance: f64,
    ) -> Result<Self, SketchError> {
        require_positive_distance("PerpendicularDistance", distance)?;
        Ok(Self {
            edge1: edge1.into(),
            edge2: edge2.into(),
            distance,
        })
    }
}

impl Constraint for PerpendicularDistance {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let (a1_ref, a2_ref) = parse_rect_edge_ref(&self.edge1)?;
        let (b1_ref, b2_ref) = parse_rect_edge_ref(&self.edge2)?;
        let a1 = var_slot(&ctx.resolve_point(&a1_ref)?);
        let a2 = var_slot(&ctx.resolve_point(&a2_ref)?);
        let b1 = var_slot(&ctx.resolve_point(&b1_ref)?);
        let b2 = var_slot(&ctx.resolve_point(&b2_ref)?);
        let d2 = self.distance * self.distance;

        let (parallel, midpoint_perpendicular) =
            parallel_and_midpoint_residuals(a1, a2, b1, b2);

        let squared_distance: Residual = Box::new(move |v| {
            let m1x = (v[a1] + v[a2]) / 2.0;
            let m1y = (v[a1 + 1] + v[a2 + 1]) / 2.0;
            let m2x = (v[b1] + v[b2]) / 2.0;
            let m2y = (v[b1 + 1] + v[b2 + 1]) / 2.0;
            let wx = m2x - m1x;
            let wy = m2y - m1y;
            wx * wx + wy * wy - d2
        });

        Ok(vec![parallel, midpoint_perpendicular, squared_distance])
    }
}

/// Keep two shape edges parallel with a signed gap of `distance` on the
/// exterior side of `edge1`.
///
/// The sign comes from the edge's interior point: the offset between edge
/// midpoints is measured along the outward normal, so the solved gap cannot
/// fall on the overlapping side. When either edge has no resolvable interior
/// point the constraint falls back to the unsigned squared-distance form.
#[derive(Debug, Clone)]
pub struct SpaceBetweenEdges {
    pub edge1: String,
    pub edge2: String,
    pub distance: f64,
}

impl SpaceBetweenEdges {
    pub fn new(
        edge1: impl Into<String>,
        edge2: impl Into<String>,
        distance: f64,
    ) -> Result<Self, SketchError> {
        let edge1 = edge1.into();
        let edge2 = edge2.into();
        require_nonempty("SpaceBetweenEdges", &edge1)?;
        require_nonempty("SpaceBetweenEdges", &edge2)?;
        if !distance.is_finite() || distance < 0.0 {
            return Err(SketchError::InvalidOption(format!(
                "SpaceBetweenEdges distance must be a non-negative finite number, got {distance}"
            )));
        }
        Ok(Self {
            edge1,
            edge2,
            distance,
        })
    }
}

impl Constraint for SpaceBetweenEdges {
    fn build_residuals(&self, ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let e1 = ctx.resolve_edge(&self.edge1)?;
        let e2 = ctx.resolve_edge(&self.edge2)?;

        let a1 = var_slot(&ctx.resolve_point(&e1.point1_ref)?);
        let a2 = var_slot(&ctx.resolve_point(&e1.point2_ref)?);
        let b1 = var_slot(&ctx.resolve_point(&e2.point1_ref)?);
        let b2 = var_slot(&ctx.resolve_point(&e2.point2_ref)?);

        let (parallel, midpoint_perpendicular) =
            parallel_and_midpoint_residuals(a1, a2, b1, b2);

        let (Some(interior_ref), Some(_)) = (&e1.interior_point_ref, &e2.interior_point_ref)
        else {
            let d2 = self.distance * self.distance;
            let unsigned: Residual = Box::new(move |v| {
                let m1x = (v[a1] + v[a2]) / 2.0;
                let m1y = (v[a1 + 1] + v[a2 + 1]) / 2.0;
                let m2x = (v[b1] + v[b2]) / 2.0;
                let m2y = (v[b1 + 1] + v[b2 + 1]) / 2.0;
                let wx = m2x - m1x;
                let wy = m2y - m1y;
                wx * wx + wy * wy - d2
            });
            return Ok(vec![parallel, midpoint_perpendicular, unsigned]);
        };

        let interior = var_slot(&ctx.resolve_point(interior_ref)?);
        let distance = self.distance;

        let signed_offset: Residual = Box::new(move |v| {
            let a1x = v[a1];
            let a1y = v[a1 + 1];
            let a2x = v[a2];
            let a2y = v[a2 + 1];
            let ux = a2x - a1x;
            let uy = a2y - a1y;

            let m1x = (a1x + a2x) / 2.0;
            let m1y = (a1y + a2y) / 2.0;
            let inward = interior_unit_normal(ux, uy, v[interior] - m1x, v[interior + 1] - m1y);

            let m2x = (v[b1] + v[b2]) / 2.0;
            let m2y = (v[b1 + 1] + v[b2 + 1]) / 2.0;
            let wx = m2x - m1x;
            let wy = m2y - m1y;

            wx * -inward.x + wy * -inward.y - distance
        });

        Ok(vec![parallel, midpoint_perpendicular, signed_offset])
    }

    fn annotate_svg(&self, ctx: &AnnotateContext) -> Option<String> {
        let e1 = ctx.resolver.resolve_edge(&self.edge1).ok()?;
        let e2 = ctx.resolver.resolve_edge(&self.edge2).ok()?;
        let a1 = ctx.resolver.resolve_point(&e1.point1_ref).ok()?;
        let a2 = ctx.resolver.resolve_point(&e1.point2_ref).ok()?;
        let b1 = ctx.resolver.resolve_point(&e2.point1_ref).ok()?;
        let b2 = ctx.resolver.resolve_point(&e2.point2_ref).ok()?;

        let m1x = (a1.borrow().x + a2.borrow().x) / 2.0;
        let m1y = (a1.borrow().y + a2.borrow().y) / 2.0;
        let m2x = (b1.borrow().x + b2.borrow().x) / 2.0;
        let m2y = (b1.borrow().y + b2.borrow().y) / 2.0;

        let x1 = ctx.transform.x(m1x);
        let y1 = ctx.transform.y(m1y);
        let x2 = ctx.transform.x(m2x);
        let y2 = ctx.transform.y(m2y);
        let tx = (x1 + x2) / 2.0;
        let ty = (y1 + y2) / 2.0 - 10.0;

        Some(format!(
            "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#2a9d8f\" stroke-width=\"2\" stroke-dasharray=\"7 4\" /><text x=\"{tx}\" y=\"{ty}\" fill=\"#2a9d8f\" font-size=\"11\" text-anchor=\"middle\">{}</text>",
            self.distance
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_must_be_positive_and_finite() {
        assert!(PointToPointDistance::new("A.p", "B.p", 0.0).is_err());
        assert!(PointToPointDistance::new("A.p", "B.p", -3.0).is_err());
        assert!(PointToPointDistance::new("A.p", "B.p", f64::NAN).is_err());
        assert!(PointToPointDistance::new("A.p", "B.p", f64::INFINITY).is_err());
        assert!(PointToPointDistance::new("A.p", "B.p", 10.0).is_ok());

        assert!(LineToLineDistance::new("L1", "L2", 0.0).is_err());
        assert!(PerpendicularDistance::new("R1.right", "R2.left", -1.0).is_err());
    }

    #[test]
    fn space_between_edges_accepts_zero() {
        assert!(SpaceBetweenEdges::new("R1.right", "R2.left", 0.0).is_ok());
        assert!(SpaceBetweenEdges::new("R1.right", "R2.left", -1.0).is_err());
        assert!(SpaceBetweenEdges::new("", "R2.left", 1.0).is_err());
    }

    #[test]
    fn fixed_constraints_reject_non_finite_targets() {
        assert!(FixedPoint::new("A.p", f64::NAN, 0.0).is_err());
        assert!(FixedX::new("A.p", f64::INFINITY).is_err());
        assert!(FixedY::new("A.p", f64::NAN).is_err());
        assert!(FixedPoint::new("A.p", 1.0, 2.0).is_ok());
    }

    #[test]
    fn line_refs_expand_through_the_selector_table() {
        assert_eq!(
            resolve_line_ref("L1"),
            ("L1.start".to_string(), "L1.end".to_string())
        );
        assert_eq!(
            resolve_line_ref("R1.right"),
            ("R1.topRight".to_string(), "R1.bottomRight".to_string())
        );
        assert_eq!(
            resolve_line_ref("T1.hypotenuse"),
            ("T1.pointAC".to_string(), "T1.pointBC".to_string())
        );
        assert_eq!(
            resolve_line_ref("T1.leg1"),
            ("T1.leg1.start".to_string(), "T1.leg1.end".to_string())
        );
        // Unknown selectors fall through to segment-alias form.
        assert_eq!(
            resolve_line_ref("S1.spine"),
            ("S1.spine.start".to_string(), "S1.spine.end".to_string())
        );
    }

    #[test]
    fn rect_edge_refs_accept_both_spellings() {
        let (p1, p2) = parse_rect_edge_ref("R1.right").unwrap();
        assert_eq!(p1, "R1.topRight");
        assert_eq!(p2, "R1.bottomRight");

        let (p1, _) = parse_rect_edge_ref("R1.rightEdge").unwrap();
        assert_eq!(p1, "R1.topRight");

        assert!(matches!(
            parse_rect_edge_ref("R1.diagonal"),
            Err(SketchError::UnknownEdge { .. })
        ));
        assert!(matches!(
            parse_rect_edge_ref("R1"),
            Err(SketchError::MalformedRef { .. })
        ));
    }
}
