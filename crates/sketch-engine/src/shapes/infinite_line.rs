use std::sync::atomic::{AtomicUsize, Ordering};

use sketch_types::{EdgeDef, EdgeMap, Point, PointMap, Vec2};

use crate::constraint::Constraint;
use crate::error::SketchError;
use crate::graphics::{labeled_points, GraphicsObject, Polyline};
use crate::internal::FixedPointCoordinates;
use crate::svg::SvgTransform;

use super::{require_finite, require_name, Shape};

static NEXT_LINE_ID: AtomicUsize = AtomicUsize::new(1);
static NEXT_AXIS_ID: AtomicUsize = AtomicUsize::new(1);

/// Direction of an infinite line: a cardinal shorthand or an explicit
/// non-zero vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    XPlus,
    XMinus,
    YPlus,
    YMinus,
    Vector { x: f64, y: f64 },
}

impl Direction {
    fn to_unit_vector(self) -> Result<Vec2, SketchError> {
        match self {
            Direction::XPlus => Ok(Vec2::new(1.0, 0.0)),
            Direction::XMinus => Ok(Vec2::new(-1.0, 0.0)),
            Direction::YPlus => Ok(Vec2::new(0.0, 1.0)),
            Direction::YMinus => Ok(Vec2::new(0.0, -1.0)),
            Direction::Vector { x, y } => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(SketchError::InvalidOption(format!(
                        "InfiniteLine direction vector values must be finite numbers, got ({x}, {y})"
                    )));
                }
                if x == 0.0 && y == 0.0 {
                    return Err(SketchError::InvalidOption(
                        "InfiniteLine direction vector must not be zero".to_string(),
                    ));
                }
                let len = x.hypot(y);
                Ok(Vec2::new(x / len, y / len))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct InfiniteLineOptions {
    /// Auto-named `InfiniteLine1`, ... when absent.
    pub name: Option<String>,
    pub origin: Option<Vec2>,
    pub direction: Direction,
}

#[derive(Debug, Clone)]
pub struct AxisOptions {
    /// Auto-named `Axis1`, ... when absent.
    pub name: Option<String>,
    pub origin: Option<Vec2>,
    pub direction: Direction,
}

/// An infinite construction line through `origin` along `direction`.
///
/// `start` sits at the origin and `end` at unit distance along the
/// direction; both are internally pinned, so an axis participates in other
/// constraints (`Coincident`, `Tangent`, ...) without being moved itself.
pub struct InfiniteLine {
    name: String,
    points: PointMap,
    edges: EdgeMap,
    internal: Vec<Box<dyn Constraint>>,
}

impl InfiniteLine {
    pub fn new(opts: InfiniteLineOptions) -> Result<Self, SketchError> {
        let name = match opts.name {
            Some(name) => {
                require_name("InfiniteLine", &name)?;
                name
            }
            None => format!(
                "InfiniteLine{}",
                NEXT_LINE_ID.fetch_add(1, Ordering::Relaxed)
            ),
        };
        Self::with_name(name, opts.origin, opts.direction)
    }

    fn with_name(
        name: String,
        origin: Option<Vec2>,
        direction: Direction,
    ) -> Result<Self, SketchError> {
        let origin = origin.unwrap_or(Vec2::ZERO);
        require_finite("InfiniteLine", "origin.x", origin.x)?;
        require_finite("InfiniteLine", "origin.y", origin.y)?;

        let unit = direction.to_unit_vector()?;
        let start = Point::shared(origin.x, origin.y);
        let end = Point::shared(origin.x + unit.x, origin.y + unit.y);

        let mut points = PointMap::new();
        points.insert("start", start.clone());
        points.insert("end", end.clone());

        let mut edges = EdgeMap::new();
        edges.insert("segment", EdgeDef::new("start", "end"));

        let end_x = end.borrow().x;
        let end_y = end.borrow().y;
        let internal: Vec<Box<dyn Constraint>> = vec![
            Box::new(FixedPointCoordinates::new(start, origin.x, origin.y)),
            Box::new(FixedPointCoordinates::new(end, end_x, end_y)),
        ];

        Ok(Self {
            name,
            points,
            edges,
            internal,
        })
    }
}

/// Construct an axis: an infinite line named `Axis1`, `Axis2`, ... by
/// default.
pub fn axis(opts: AxisOptions) -> Result<InfiniteLine, SketchError> {
    let name = match opts.name {
        Some(name) => {
            require_name("Axis", &name)?;
            name
        }
        None => format!("Axis{}", NEXT_AXIS_ID.fetch_add(1, Ordering::Relaxed)),
    };
    InfiniteLine::with_name(name, opts.origin, opts.direction)
}

impl Shape for InfiniteLine {
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

        // Extend far past the viewport in both directions.
        let reach = 1000.0;
        let dx = end.x - start.x;
        let dy = end.y - start.y;

        format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke-dasharray=\"6 4\" />",
            t.x(start.x - dx * reach),
            t.y(start.y - dy * reach),
            t.x(start.x + dx * reach),
            t.y(start.y + dy * reach)
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cardinal_directions_map_to_unit_vectors() {
        let line = InfiniteLine::new(InfiniteLineOptions {
            name: Some("X".to_string()),
            origin: None,
            direction: Direction::YMinus,
        })
        .unwrap();

        let end = line.points().get("end").unwrap().borrow();
        assert_eq!((end.x, end.y), (0.0, -1.0));
    }

    #[test]
    fn explicit_vectors_are_normalized() {
        let line = InfiniteLine::new(InfiniteLineOptions {
            name: Some("D".to_string()),
            origin: Some(Vec2::new(3.0, 1.0)),
            direction: Direction::Vector { x: 3.0, y: 4.0 },
        })
        .unwrap();

        let end = line.points().get("end").unwrap().borrow();
        assert_relative_eq!(end.x, 3.6, epsilon = 1e-12);
        assert_relative_eq!(end.y, 1.8, epsilon = 1e-12);
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(InfiniteLine::new(InfiniteLineOptions {
            name: Some("D".to_string()),
            origin: None,
            direction: Direction::Vector { x: 0.0, y: 0.0 },
        })
        .is_err());
    }

    #[test]
    fn axes_auto_name_with_their_own_prefix() {
        let a = axis(AxisOptions {
            name: None,
            origin: None,
            direction: Direction::XPlus,
        })
        .unwrap();
        assert!(a.name().starts_with("Axis"));
    }
}
