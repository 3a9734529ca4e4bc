// src/scene/mod.rs
pub mod geometry;
pub mod plugin;
pub mod resources;
pub mod systems;
pub mod tile;

pub use geometry::{
    SceneGeometry, VisibilityResult, WallResult, compute_visibility, compute_wall_paths,
};
pub use plugin::SightPlugin;
pub use resources::SightParameters;
pub use systems::{Viewer, map_to_world, world_to_map};
pub use tile::{Tile, TileMap};
