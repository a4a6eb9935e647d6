use sketch_types::{EdgeDef, EdgeMap, Point, PointMap};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject, Polyline};
use crate::internal::{FixedSegmentLength, PerpendicularAt};
use crate::svg::SvgTransform;

use super::{require_name, Shape};

/// Every edge accepts several aliases (`baseLength`/`aLength`/`abLength`
/// all mean the AB-AC edge). Multiple aliases for the same edge must agree
/// within floating tolerance.
#[derive(Debug, Clone, Default)]
pub struct RightTriangleOptions {
    pub name: String,
    pub base_length: Option<f64>,
    pub altitude_length: Option<f64>,
    pub hypotenuse_length: Option<f64>,
    pub a_length: Option<f64>,
    pub b_length: Option<f64>,
    pub c_length: Option<f64>,
    pub ab_length: Option<f64>,
    pub ac_length: Option<f64>,
    pub bc_length: Option<f64>,
}

/// A right triangle with the right angle at `pointAB`, the base running to
/// `pointAC` and the altitude to `pointBC`. Positioned via constraints
/// (e.g. `FixedPoint` on `pointAB`), not via x/y options.
#[derive(Debug)]
pub struct RightTriangle {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

fn approx_equal(a: f64, b: f64) -> bool {
    let scale = 1f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= f64::EPSILON * 16.0 * scale
}

fn resolve_edge_length(
    edge_label: &str,
    aliases: &[Option<f64>],
) -> Result<Option<f64>, SketchError> {
    let mut chosen: Option<f64> = None;

    for &alias in aliases {
        let Some(raw) = alias else { continue };

        if !raw.is_finite() || raw <= 0.0 {
            return Err(SketchError::InvalidOption(format!(
                "RightTriangle {edge_label} length must be a positive finite number, got {raw}"
            )));
        }

        if let Some(existing) = chosen {
            if !approx_equal(existing, raw) {
                return Err(SketchError::InvalidOption(format!(
                    "conflicting length options for edge \"{edge_label}\""
                )));
            }
        }

        chosen = Some(raw);
    }

    Ok(chosen)
}

fn ensure_hypotenuse_compatibility(
    leg_a: f64,
    leg_b: f64,
    hypotenuse: f64,
) -> Result<(), SketchError> {
    let lhs = leg_a * leg_a + leg_b * leg_b;
    let rhs = hypotenuse * hypotenuse;
    let tol = 1e-8 * 1f64.max(lhs).max(rhs);

    if (lhs - rhs).abs() > tol {
        return Err(SketchError::InvalidOption(format!(
            "RightTriangle side lengths are inconsistent: base={leg_a}, altitude={leg_b}, hypotenuse={hypotenuse}"
        )));
    }
    Ok(())
}

impl RightTriangle {
    pub fn new(opts: RightTriangleOptions) -> Result<Self, SketchError> {
        require_name("RightTriangle", &opts.name)?;

        let base_length =
            resolve_edge_length("base", &[opts.base_length, opts.a_length, opts.ab_length])?;
        let altitude_length = resolve_edge_length(
            "altitude",
            &[opts.altitude_length, opts.b_length, opts.ac_length],
        )?;
        let hypotenuse_length = resolve_edge_length(
            "hypotenuse",
            &[opts.hypotenuse_length, opts.c_length, opts.bc_length],
        )?;

        if let (Some(base), Some(altitude), Some(hypotenuse)) =
            (base_length, altitude_length, hypotenuse_length)
        {
            ensure_hypotenuse_compatibility(base, altitude, hypotenuse)?;
        }

        let mut base_init = base_length.unwrap_or(1.0);
        let mut altitude_init = altitude_length.unwrap_or(1.0);

        // With two of {base, altitude, hypotenuse}, derive the third's
        // initial length via the Pythagorean relation.
        match (base_length, altitude_length, hypotenuse_length) {
            (None, Some(altitude), Some(hypotenuse)) => {
                let remaining = hypotenuse * hypotenuse - altitude * altitude;
                if remaining <= 0.0 {
                    return Err(SketchError::InvalidOption(format!(
                        "RightTriangle hypotenuse ({hypotenuse}) must be longer than altitude ({altitude})"
                    )));
                }
                base_init = remaining.sqrt();
            }
            (Some(base), None, Some(hypotenuse)) => {
                let remaining = hypotenuse * hypotenuse - base * base;
                if remaining <= 0.0 {
                    return Err(SketchError::InvalidOption(format!(
                        "RightTriangle hypotenuse ({hypotenuse}) must be longer than base ({base})"
                    )));
                }
                altitude_init = remaining.sqrt();
            }
            (None, None, Some(hypotenuse)) => {
                base_init = hypotenuse / std::f64::consts::SQRT_2;
                altitude_init = base_init;
            }
            _ => {}
        }

        let point_ab = Point::shared(0.0, 0.0);
        let point_ac = Point::shared(base_init, 0.0);
        let point_bc = Point::shared(0.0, altitude_init);

        let mut points = PointMap::new();
        points.insert("pointAB", point_ab.clone());
        points.insert("pointAC", point_ac.clone());
        points.insert("pointBC", point_bc.clone());

        let mut edges = EdgeMap::new();
        for name in ["base", "a", "ab"] {
            edges.insert(name, EdgeDef::with_interior("pointAB", "pointAC", "pointBC"));
        }
        for name in ["altitude", "b", "ac"] {
            edges.insert(name, EdgeDef::with_interior("pointAB", "pointBC", "pointAC"));
        }
        for name in ["hypotenuse", "c", "bc"] {
            edges.insert(name, EdgeDef::with_interior("pointAC", "pointBC", "pointAB"));
        }

        let mut internal: Vec<Box<dyn Constraint>> = vec![Box::new(PerpendicularAt::new(
            point_ab.clone(),
            point_ac.clone(),
            point_bc.clone(),
        ))];

        if let Some(base) = base_length {
            internal.push(Box::new(FixedSegmentLength::new(
                point_ab.clone(),
                point_ac.clone(),
                base,
            )));
        }
        if let Some(altitude) = altitude_length {
            internal.push(Box::new(FixedSegmentLength::new(
                point_ab,
                point_bc.clone(),
                altitude,
            )));
        }
        if let Some(hypotenuse) = hypotenuse_length {
            internal.push(Box::new(FixedSegmentLength::new(
                point_ac,
                point_bc,
                hypotenuse,
            )));
        }

        Ok(Self {
            name: opts.name,
            points,
            edges,
            internal,
        })
    }
}

impl Shape for RightTriangle {
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
        let ab = self.points.get("pointAB").unwrap().borrow();
        let ac = self.points.get("pointAC").unwrap().borrow();
        let bc = self.points.get("pointBC").unwrap().borrow();

        format!(
            "<polygon points=\"{},{} {},{} {},{}\" />",
            t.x(ab.x),
            t.y(ab.y),
            t.x(ac.x),
            t.y(ac.y),
            t.x(bc.x),
            t.y(bc.y)
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let ab = self.points.get("pointAB").unwrap().borrow();
        let ac = self.points.get("pointAC").unwrap().borrow();
        let bc = self.points.get("pointBC").unwrap().borrow();

        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go.lines.push(Polyline {
            points: vec![
                (ab.x, ab.y).into(),
                (ac.x, ac.y).into(),
                (bc.x, bc.y).into(),
                (ab.x, ab.y).into(),
            ],
            label: Some(self.name.clone()),
        });
        go
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_invalid_lengths() {
        let err = RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            base_length: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("base length"));
    }

    #[test]
    fn conflicting_aliases_are_rejected() {
        let err = RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            base_length: Some(30.0),
            a_length: Some(20.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("conflicting length options for edge \"base\""));
    }

    #[test]
    fn agreeing_aliases_are_accepted() {
        assert!(RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            base_length: Some(30.0),
            ab_length: Some(30.0),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn third_side_is_derived_from_the_other_two() {
        let tri = RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            base_length: Some(30.0),
            hypotenuse_length: Some(50.0),
            ..Default::default()
        })
        .unwrap();

        let bc = tri.points.get("pointBC").unwrap().borrow();
        assert_relative_eq!(bc.y, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn inconsistent_three_sides_are_rejected() {
        let err = RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            base_length: Some(3.0),
            altitude_length: Some(4.0),
            hypotenuse_length: Some(6.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn pythagorean_triple_is_accepted() {
        assert!(RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            base_length: Some(3.0),
            altitude_length: Some(4.0),
            hypotenuse_length: Some(5.0),
            ..Default::default()
        })
        .is_ok());
    }

    #[test]
    fn hypotenuse_shorter_than_a_leg_is_rejected() {
        let err = RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            altitude_length: Some(10.0),
            hypotenuse_length: Some(5.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("must be longer than"));
    }

    #[test]
    fn hypotenuse_alone_seeds_an_isosceles_layout() {
        let tri = RightTriangle::new(RightTriangleOptions {
            name: "T1".to_string(),
            hypotenuse_length: Some(10.0),
            ..Default::default()
        })
        .unwrap();

        let ac = tri.points.get("pointAC").unwrap().borrow();
        let bc = tri.points.get("pointBC").unwrap().borrow();
        assert_relative_eq!(ac.x, bc.y, epsilon = 1e-12);
        assert_relative_eq!(ac.x.hypot(bc.y), 10.0, epsilon = 1e-9);
    }
}
