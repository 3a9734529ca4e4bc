// src/math/mod.rs
pub mod error;
pub mod geometry;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{GeometryError, GeometryResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{GeometryError, GeometryResult},
        geometry::{
            bvh::SegmentBvh,
            occluder::{BruteForceOccluder, Occluder, SegmentHit},
            polygon::{operations::*, PolygonProperties, PolygonTree},
            visibility::{FaceMode, NoObstaclePolicy, VisibilityOptions},
        },
        types::*,
    };
}
