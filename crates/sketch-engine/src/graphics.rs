//! Serializable drawing primitives projected from solved point state.
//!
//! Pure presentation output for debug viewers and host UIs; nothing here
//! feeds back into the solve.

use serde::Serialize;
use sketch_types::{point_id, PointMap, Vec2};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize)]
pub struct LabeledPoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Polyline {
    pub points: Vec<Vec2>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleGlyph {
    pub center: Vec2,
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Arrow {
    pub start: Vec2,
    pub end: Vec2,
    pub double_sided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A bundle of drawing primitives. Shapes and annotating constraints each
/// produce one; the sketch merges them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphicsObject {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<LabeledPoint>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Polyline>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub circles: Vec<CircleGlyph>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arrows: Vec<Arrow>,
}

impl GraphicsObject {
    pub fn merge(&mut self, other: GraphicsObject) {
        self.points.extend(other.points);
        self.lines.extend(other.lines);
        self.circles.extend(other.circles);
        self.arrows.extend(other.arrows);
    }
}

/// Labeled points for a shape's point map, skipping alias entries so each
/// physical point appears once under its first name.
pub(crate) fn labeled_points(shape_name: &str, points: &PointMap) -> Vec<LabeledPoint> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (point_name, point) in points.iter() {
        if !seen.insert(point_id(point)) {
            continue;
        }
        let p = point.borrow();
        out.push(LabeledPoint {
            x: p.x,
            y: p.y,
            label: Some(format!("{shape_name}.{point_name}")),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_types::Point;

    #[test]
    fn aliases_emit_a_single_labeled_point() {
        let start = Point::shared(0.0, 0.0);
        let end = Point::shared(4.0, 0.0);

        let mut map = PointMap::new();
        map.insert("longBaseStart", start.clone());
        map.insert("longBaseEnd", end);
        map.insert("leg1.start", start);

        let labeled = labeled_points("T1", &map);
        assert_eq!(labeled.len(), 2);
        assert_eq!(labeled[0].label.as_deref(), Some("T1.longBaseStart"));
    }
}
