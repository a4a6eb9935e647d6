use std::f64::consts::{PI, TAU};
use std::sync::atomic::{AtomicUsize, Ordering};

use sketch_types::{EdgeDef, EdgeMap, Point, PointMap};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject, Polyline};
use crate::internal::FixedPointCoordinates;
use crate::svg::SvgTransform;

use super::{require_finite, require_name, require_positive, Bounds, Shape};

static NEXT_AUTO_NAME_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Debug, Clone, Default)]
pub struct ArcOptions {
    /// Auto-named `Arc1`, `Arc2`, ... when absent.
    pub name: Option<String>,
    pub cx: Option<f64>,
    pub cy: Option<f64>,
    pub radius: Option<f64>,
    pub start_angle_deg: Option<f64>,
    pub end_angle_deg: Option<f64>,
    pub clockwise: bool,
}

/// A circular arc with `center`, `start`, and `end` points computed from
/// center/radius/angles.
///
/// Arcs are rigid: every point is internally pinned to its constructed
/// coordinate, so an arc is positioned by connecting it to other geometry
/// with `Coincident`/`Fixed*` constraints rather than by being deformed.
#[derive(Debug)]
pub struct Arc {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
    clockwise: bool,
}

/// Angular sweep from `start_angle` to `end_angle`, normalized mod 2π.
/// `clockwise` selects the negative-going branch; a zero delta means a full
/// circle, not a degenerate zero-length arc.
fn normalize_sweep(start_angle: f64, end_angle: f64, clockwise: bool) -> f64 {
    let delta = (end_angle - start_angle).rem_euclid(TAU);

    if clockwise {
        if delta == 0.0 { -TAU } else { delta - TAU }
    } else if delta == 0.0 {
        TAU
    } else {
        delta
    }
}

struct ArcGeometry {
    cx: f64,
    cy: f64,
    radius: f64,
    start_angle: f64,
    sweep: f64,
}

impl Arc {
    pub fn new(opts: ArcOptions) -> Result<Self, SketchError> {
        let name = match opts.name {
            Some(name) => {
                require_name("Arc", &name)?;
                name
            }
            None => format!("Arc{}", NEXT_AUTO_NAME_ID.fetch_add(1, Ordering::Relaxed)),
        };

        let cx = opts.cx.unwrap_or(0.0);
        let cy = opts.cy.unwrap_or(0.0);
        let radius = opts.radius.unwrap_or(1.0);
        let start_angle_deg = opts.start_angle_deg.unwrap_or(0.0);
        let end_angle_deg = opts.end_angle_deg.unwrap_or(90.0);

        require_finite("Arc", "cx", cx)?;
        require_finite("Arc", "cy", cy)?;
        require_positive("Arc", "radius", radius)?;
        require_finite("Arc", "startAngleDeg", start_angle_deg)?;
        require_finite("Arc", "endAngleDeg", end_angle_deg)?;

        if start_angle_deg == end_angle_deg {
            return Err(SketchError::InvalidOption(
                "Arc start and end angles must differ".to_string(),
            ));
        }

        let start_angle = start_angle_deg.to_radians();
        let end_angle = end_angle_deg.to_radians();

        let center = Point::shared(cx, cy);
        let start = Point::shared(
            cx + radius * start_angle.cos(),
            cy + radius * start_angle.sin(),
        );
        let end = Point::shared(cx + radius * end_angle.cos(), cy + radius * end_angle.sin());

        let mut points = PointMap::new();
        points.insert("center", center.clone());
        points.insert("start", start.clone());
        points.insert("end", end.clone());

        let mut edges = EdgeMap::new();
        edges.insert("segment", EdgeDef::new("start", "end"));

        let internal: Vec<Box<dyn Constraint>> = vec![
            Box::new(FixedPointCoordinates::new(center.clone(), cx, cy)),
            Box::new(FixedPointCoordinates::new(
                start.clone(),
                start.borrow().x,
                start.borrow().y,
            )),
            Box::new(FixedPointCoordinates::new(
                end.clone(),
                end.borrow().x,
                end.borrow().y,
            )),
        ];

        Ok(Self {
            name,
            points,
            edges,
            internal,
            clockwise: opts.clockwise,
        })
    }

    fn geometry(&self) -> ArcGeometry {
        let center = self.points.get("center").unwrap().borrow();
        let start = self.points.get("start").unwrap().borrow();
        let end = self.points.get("end").unwrap().borrow();

        let start_dx = start.x - center.x;
        let start_dy = start.y - center.y;
        let end_dx = end.x - center.x;
        let end_dy = end.y - center.y;

        let radius = (start_dx.hypot(start_dy) + end_dx.hypot(end_dy)) / 2.0;
        let start_angle = start_dy.atan2(start_dx);
        let end_angle = end_dy.atan2(end_dx);

        ArcGeometry {
            cx: center.x,
            cy: center.y,
            radius,
            start_angle,
            sweep: normalize_sweep(start_angle, end_angle, self.clockwise),
        }
    }
}

impl Shape for Arc {
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
        let g = self.geometry();
        let start = self.points.get("start").unwrap().borrow();
        let end = self.points.get("end").unwrap().borrow();
        let large_arc = if g.sweep.abs() > PI { 1 } else { 0 };
        let sweep_flag = if self.clockwise { 1 } else { 0 };

        format!(
            "<path d=\"M {} {} A {} {} 0 {large_arc} {sweep_flag} {} {}\" />",
            t.x(start.x),
            t.y(start.y),
            g.radius,
            g.radius,
            t.x(end.x),
            t.y(end.y)
        )
    }

    fn to_graphics(&self) -> GraphicsObject {
        let g = self.geometry();
        let segments = 24;
        let sampled = (0..=segments)
            .map(|i| {
                let angle = g.start_angle + g.sweep * (i as f64) / (segments as f64);
                (g.cx + angle.cos() * g.radius, g.cy + angle.sin() * g.radius).into()
            })
            .collect();

        let mut go = GraphicsObject::default();
        go.points = labeled_points(&self.name, &self.points);
        go.lines.push(Polyline {
            points: sampled,
            label: Some(self.name.clone()),
        });
        go
    }

    fn bounds(&self) -> Option<Bounds> {
        let g = self.geometry();
        let steps = 64;

        let mut b = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };

        for i in 0..=steps {
            let angle = g.start_angle + g.sweep * (i as f64) / (steps as f64);
            let x = g.cx + angle.cos() * g.radius;
            let y = g.cy + angle.sin() * g.radius;
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }

        Some(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn endpoints_follow_the_given_angles() {
        let arc = Arc::new(ArcOptions {
            name: Some("A1".to_string()),
            cx: Some(0.0),
            cy: Some(0.0),
            radius: Some(20.0),
            start_angle_deg: Some(60.0),
            end_angle_deg: Some(-60.0),
            clockwise: true,
        })
        .unwrap();

        let start = arc.points.get("start").unwrap().borrow();
        let end = arc.points.get("end").unwrap().borrow();
        assert_relative_eq!(start.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(end.x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(start.y, -end.y, epsilon = 1e-9);
    }

    #[test]
    fn sweep_normalization_handles_wrap_and_direction() {
        // 60° -> -60° counterclockwise goes the long way around.
        let ccw = normalize_sweep(60f64.to_radians(), (-60f64).to_radians(), false);
        assert_relative_eq!(ccw, 240f64.to_radians(), epsilon = 1e-12);

        // Clockwise takes the negative branch.
        let cw = normalize_sweep(60f64.to_radians(), (-60f64).to_radians(), true);
        assert_relative_eq!(cw, -120f64.to_radians(), epsilon = 1e-12);

        // A zero delta means a full circle, not a zero-length arc.
        assert_relative_eq!(normalize_sweep(0.0, TAU, false), TAU);
        assert_relative_eq!(normalize_sweep(0.0, TAU, true), -TAU);
    }

    #[test]
    fn equal_angles_are_rejected() {
        let err = Arc::new(ArcOptions {
            name: Some("A1".to_string()),
            start_angle_deg: Some(45.0),
            end_angle_deg: Some(45.0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn unnamed_arcs_get_distinct_names() {
        let a = Arc::new(ArcOptions::default()).unwrap();
        let b = Arc::new(ArcOptions::default()).unwrap();
        assert!(a.name().starts_with("Arc"));
        assert_ne!(a.name(), b.name());
    }

    #[test]
    fn explicit_empty_name_is_rejected() {
        assert!(matches!(
            Arc::new(ArcOptions {
                name: Some(String::new()),
                ..Default::default()
            }),
            Err(SketchError::EmptyName { kind: "Arc" })
        ));
    }
}
