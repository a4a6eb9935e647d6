pub mod edge;
pub mod point;
pub mod vec2;

pub use edge::{EdgeDef, EdgeMap};
pub use point::{point_id, var_slot, Point, PointMap, SharedPoint};
pub use vec2::{interior_unit_normal, Vec2};
