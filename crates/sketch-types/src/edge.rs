use serde::{Deserialize, Serialize};

/// A named edge on a shape: two point names plus an optional interior point
/// used to disambiguate which side of the edge is "inside" the shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDef {
    pub point1: String,
    pub point2: String,
    pub interior_point: Option<String>,
}

impl EdgeDef {
    pub fn new(point1: impl Into<String>, point2: impl Into<String>) -> Self {
        Self {
            point1: point1.into(),
            point2: point2.into(),
            interior_point: None,
        }
    }

    pub fn with_interior(
        point1: impl Into<String>,
        point2: impl Into<String>,
        interior_point: impl Into<String>,
    ) -> Self {
        Self {
            point1: point1.into(),
            point2: point2.into(),
            interior_point: Some(interior_point.into()),
        }
    }
}

/// An insertion-ordered name → edge-definition map.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    entries: Vec<(String, EdgeDef)>,
}

impl EdgeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, edge: EdgeDef) {
        self.entries.push((name.into(), edge));
    }

    pub fn get(&self, name: &str) -> Option<&EdgeDef> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
