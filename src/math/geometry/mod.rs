// src/math/geometry/mod.rs

// Deklaration der Geometriemodule
pub mod bvh;
pub mod intersection;
pub mod occluder;
pub mod polygon;
pub mod visibility;

// Re-Exporte für einen schnellen Zugriff,
// falls man nicht das gesamte `math::prelude` importieren möchte.
pub use self::bvh::{BvhNode, BvhNodeKind, SegmentBvh};
pub use self::intersection::{
    IntersectionParams, distance_squared, ray_aabb_intersect, ray_segment_intersect,
    segment_aabb_intersect, segment_segment_intersect, side_of_line,
};
pub use self::occluder::{BruteForceOccluder, Occluder, SegmentHit};
pub use self::polygon::{
    BooleanOperation, FillRule, Orientation, PolygonBoolean, PolygonNode, PolygonProperties,
    PolygonTree, simplify_loop, simplify_paths,
};
pub use self::visibility::{
    FaceMode, NoObstaclePolicy, TaggedPoint, VertexKind, VisibilityOptions, compute_visibility,
    compute_visibility_with,
};
