// src/math/geometry/polygon/mod.rs

pub mod core; // Loop-Eigenschaften (Fläche, Orientierung, Punkt-in-Polygon)
pub mod operations; // Boolean-Operationen über geo
pub mod simplify;
pub mod tree; // Polygonbaum mit Außenrändern und Löchern

pub use self::core::{Orientation, PolygonProperties, ensure_orientation, open_ring};
pub use self::operations::boolean::{BooleanOperation, FillRule, PolygonBoolean};
pub use self::simplify::{simplify_loop, simplify_paths};
pub use self::tree::{PolygonNode, PolygonTree};
