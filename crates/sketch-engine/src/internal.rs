//! Segment-level constraints bound directly to shared points.
//!
//! Shapes emit these as internal constraints to keep their defining geometry
//! self-consistent during a solve; they are also usable directly by callers
//! holding [`SharedPoint`] handles. Unlike the string-addressed constraints
//! in [`crate::constraint`], nothing here needs the resolver.

use lm_solver::Residual;
use sketch_types::{var_slot, SharedPoint};

use crate::constraint::{AnnotateContext, Constraint};
use crate::error::SketchError;
use crate::resolve::BuildContext;

/// Pin a point to fixed coordinates (used by rigid shapes such as arcs and
/// axes to pin themselves to their constructed pose).
#[derive(Debug)]
pub struct FixedPointCoordinates {
    point: SharedPoint,
    x: f64,
    y: f64,
}

impl FixedPointCoordinates {
    pub fn new(point: SharedPoint, x: f64, y: f64) -> Self {
        Self { point, x, y }
    }
}

impl Constraint for FixedPointCoordinates {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i = var_slot(&self.point);
        let (x, y) = (self.x, self.y);
        Ok(vec![
            Box::new(move |v| v[i] - x),
            Box::new(move |v| v[i + 1] - y),
        ])
    }
}

/// Keep two points a fixed distance apart (squared form).
#[derive(Debug)]
pub struct FixedSegmentLength {
    p1: SharedPoint,
    p2: SharedPoint,
    distance: f64,
}

impl FixedSegmentLength {
    pub fn new(p1: SharedPoint, p2: SharedPoint, distance: f64) -> Self {
        Self { p1, p2, distance }
    }
}

impl Constraint for FixedSegmentLength {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i1 = var_slot(&self.p1);
        let i2 = var_slot(&self.p2);
        let d2 = self.distance * self.distance;

        Ok(vec![Box::new(move |v| {
            let dx = v[i1] - v[i2];
            let dy = v[i1 + 1] - v[i2 + 1];
            dx * dx + dy * dy - d2
        })])
    }

    fn annotate_svg(&self, ctx: &AnnotateContext) -> Option<String> {
        let (p1, p2) = (self.p1.borrow(), self.p2.borrow());
        let x1 = ctx.transform.x(p1.x);
        let y1 = ctx.transform.y(p1.y);
        let x2 = ctx.transform.x(p2.x);
        let y2 = ctx.transform.y(p2.y);
        let tx = (x1 + x2) / 2.0;
        let ty = (y1 + y2) / 2.0 - 10.0;

        Some(format!(
            "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"#2a9d8f\" stroke-width=\"1.5\" stroke-dasharray=\"4 3\" /><text x=\"{tx}\" y=\"{ty}\" fill=\"#2a9d8f\" font-size=\"10\" text-anchor=\"middle\">{}</text>",
            self.distance
        ))
    }
}

/// Two points share the same y coordinate.
#[derive(Debug)]
pub struct HorizontalLine {
    p1: SharedPoint,
    p2: SharedPoint,
}

impl HorizontalLine {
    pub fn new(p1: SharedPoint, p2: SharedPoint) -> Self {
        Self { p1, p2 }
    }
}

impl Constraint for HorizontalLine {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i1 = var_slot(&self.p1);
        let i2 = var_slot(&self.p2);
        Ok(vec![Box::new(move |v| v[i1 + 1] - v[i2 + 1])])
    }
}

/// Two points share the same x coordinate.
#[derive(Debug)]
pub struct VerticalLine {
    p1: SharedPoint,
    p2: SharedPoint,
}

impl VerticalLine {
    pub fn new(p1: SharedPoint, p2: SharedPoint) -> Self {
        Self { p1, p2 }
    }
}

impl Constraint for VerticalLine {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let i1 = var_slot(&self.p1);
        let i2 = var_slot(&self.p2);
        Ok(vec![Box::new(move |v| v[i1] - v[i2])])
    }
}

/// Two segments are parallel (or anti-parallel): 2D cross product of their
/// direction vectors is zero.
#[derive(Debug)]
pub struct ParallelLines {
    a1: SharedPoint,
    a2: SharedPoint,
    b1: SharedPoint,
    b2: SharedPoint,
}

impl ParallelLines {
    pub fn new(a1: SharedPoint, a2: SharedPoint, b1: SharedPoint, b2: SharedPoint) -> Self {
        Self { a1, a2, b1, b2 }
    }
}

impl Constraint for ParallelLines {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let a1 = var_slot(&self.a1);
        let a2 = var_slot(&self.a2);
        let b1 = var_slot(&self.b1);
        let b2 = var_slot(&self.b2);

        Ok(vec![Box::new(move |v| {
            let ux = v[a2] - v[a1];
            let uy = v[a2 + 1] - v[a1 + 1];
            let vx = v[b2] - v[b1];
            let vy = v[b2 + 1] - v[b1 + 1];
            ux * vy - uy * vx
        })])
    }
}

/// Four corners stay a parallelogram: `br = tr + bl - tl`, componentwise.
#[derive(Debug)]
pub struct ParallelogramClosure {
    tl: SharedPoint,
    tr: SharedPoint,
    bl: SharedPoint,
    br: SharedPoint,
}

impl ParallelogramClosure {
    pub fn new(tl: SharedPoint, tr: SharedPoint, bl: SharedPoint, br: SharedPoint) -> Self {
        Self { tl, tr, bl, br }
    }
}

impl Constraint for ParallelogramClosure {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let itl = var_slot(&self.tl);
        let itr = var_slot(&self.tr);
        let ibl = var_slot(&self.bl);
        let ibr = var_slot(&self.br);

        Ok(vec![
            Box::new(move |v| v[ibr] - (v[itr] + v[ibl] - v[itl])),
            Box::new(move |v| v[ibr + 1] - (v[itr + 1] + v[ibl + 1] - v[itl + 1])),
        ])
    }
}

/// The angle at `a` between `b - a` and `c - a` is 90 degrees: their dot
/// product is zero.
#[derive(Debug)]
pub struct PerpendicularAt {
    a: SharedPoint,
    b: SharedPoint,
    c: SharedPoint,
}

impl PerpendicularAt {
    pub fn new(a: SharedPoint, b: SharedPoint, c: SharedPoint) -> Self {
        Self { a, b, c }
    }
}

impl Constraint for PerpendicularAt {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let ia = var_slot(&self.a);
        let ib = var_slot(&self.b);
        let ic = var_slot(&self.c);

        Ok(vec![Box::new(move |v| {
            let abx = v[ib] - v[ia];
            let aby = v[ib + 1] - v[ia + 1];
            let acx = v[ic] - v[ia];
            let acy = v[ic + 1] - v[ia + 1];
            abx * acx + aby * acy
        })])
    }
}

/// Two segments have equal length: `|a2 - a1|² - |b2 - b1|²`.
#[derive(Debug)]
pub struct EqualSegmentLengths {
    a1: SharedPoint,
    a2: SharedPoint,
    b1: SharedPoint,
    b2: SharedPoint,
}

impl EqualSegmentLengths {
    pub fn new(a1: SharedPoint, a2: SharedPoint, b1: SharedPoint, b2: SharedPoint) -> Self {
        Self { a1, a2, b1, b2 }
    }
}

impl Constraint for EqualSegmentLengths {
    fn build_residuals(&self, _ctx: &BuildContext) -> Result<Vec<Residual>, SketchError> {
        let a1 = var_slot(&self.a1);
        let a2 = var_slot(&self.a2);
        let b1 = var_slot(&self.b1);
        let b2 = var_slot(&self.b2);

        Ok(vec![Box::new(move |v| {
            let adx = v[a2] - v[a1];
            let ady = v[a2 + 1] - v[a1 + 1];
            let bdx = v[b2] - v[b1];
            let bdy = v[b2 + 1] - v[b1 + 1];
            (adx * adx + ady * ady) - (bdx * bdx + bdy * bdy)
        })])
    }
}
