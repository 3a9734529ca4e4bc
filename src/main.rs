// ./src/main.rs
use bevy::prelude::*;
use bombfog::scene::{SightParameters, SightPlugin, TileMap};

mod setup;

use setup::{
    MAP_HEIGHT, MAP_SEED, MAP_WIDTH, TILE_SIZE, WALL_DENSITY, orbit_viewer_system, setup_scene,
};

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins)
        .insert_resource(SightParameters {
            tile_size: TILE_SIZE,
            ..default()
        })
        .insert_resource(TileMap::generate(
            MAP_WIDTH,
            MAP_HEIGHT,
            MAP_SEED,
            WALL_DENSITY,
        ))
        .add_plugins(SightPlugin::default())
        .add_systems(Startup, setup_scene)
        .add_systems(Update, orbit_viewer_system);

    // SVG-Dump der ersten vollständigen Szene
    #[cfg(debug_assertions)]
    app.add_systems(Update, setup::dump_scene_svg_system);

    app.run();
}
