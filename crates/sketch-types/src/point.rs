use std::cell::RefCell;
use std::rc::Rc;

/// A mutable 2D sketch point.
///
/// Points are shared by reference: a shape's point map and any alias entries
/// (e.g. `"leg1.start"`) hold the *same* instance, and the solver
/// deduplicates variables by identity, not by value.
#[derive(Debug, Clone, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    /// Offset into the solver variable buffer (x at `i`, y at `i + 1`).
    /// Assigned only while a solve is active, `None` otherwise.
    pub var_index: Option<usize>,
}

/// Shared handle to a point. The sketch is the ultimate owner; shapes and
/// alias entries hold additional handles to the same cell.
pub type SharedPoint = Rc<RefCell<Point>>;

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            var_index: None,
        }
    }

    /// Create a point behind a shared handle.
    pub fn shared(x: f64, y: f64) -> SharedPoint {
        Rc::new(RefCell::new(Self::new(x, y)))
    }
}

/// Base slot of a point in the variable buffer.
///
/// Panics if the point has not been registered with an active solve; the
/// sketch assigns indices before any residual is built.
pub fn var_slot(p: &SharedPoint) -> usize {
    p.borrow()
        .var_index
        .expect("point has no variable index outside an active solve")
}

/// Pointer identity of a shared point, used to deduplicate alias entries.
pub fn point_id(p: &SharedPoint) -> usize {
    Rc::as_ptr(p) as usize
}

/// An insertion-ordered name → point map.
///
/// Iteration order determines variable-index assignment and gauge fixing, so
/// a hash map would make solves nondeterministic. Maps hold at most a few
/// dozen entries; linear lookup is fine.
#[derive(Debug, Clone, Default)]
pub struct PointMap {
    entries: Vec<(String, SharedPoint)>,
}

impl PointMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, point: SharedPoint) {
        self.entries.push((name.into(), point));
    }

    pub fn get(&self, name: &str) -> Option<&SharedPoint> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SharedPoint)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
