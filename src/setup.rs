// ./src/setup.rs
use bevy::prelude::*;
use bombfog::scene::{SightParameters, TileMap, Viewer, map_to_world};

pub const TILE_SIZE: f32 = 32.0;
pub const MAP_WIDTH: usize = 24;
pub const MAP_HEIGHT: usize = 16;
pub const MAP_SEED: u64 = 7;
pub const WALL_DENSITY: f64 = 0.12;

/// Anteil der kürzeren Kartenseite, den der Betrachter umkreist
const ORBIT_RADIUS_FACTOR: f32 = 0.3;
const ORBIT_SPEED: f32 = 0.4;

fn map_center(map: &TileMap, tile_size: f32) -> Vec2 {
    Vec2::new(map.width() as f32, map.height() as f32) * tile_size * 0.5
}

pub fn setup_scene(mut commands: Commands, map: Res<TileMap>, params: Res<SightParameters>) {
    let center = map_to_world(map_center(&map, params.tile_size));

    // Kamera
    let mut camera = Camera2dBundle::default();
    camera.transform.translation = center.extend(camera.transform.translation.z);
    commands.spawn(camera);

    // Betrachter startet in der (freien) Kartenmitte
    commands.spawn((
        Viewer,
        TransformBundle::from_transform(Transform::from_translation(center.extend(0.0))),
    ));

    info!(
        "Szene aufgebaut: {}x{} Kacheln à {} Einheiten",
        map.width(),
        map.height(),
        params.tile_size
    );
}

/// Lässt den Betrachter auf einem Kreis um die Kartenmitte laufen
pub fn orbit_viewer_system(
    time: Res<Time>,
    map: Res<TileMap>,
    params: Res<SightParameters>,
    mut viewers: Query<&mut Transform, With<Viewer>>,
) {
    let center = map_center(&map, params.tile_size);
    let radius = map.width().min(map.height()) as f32 * params.tile_size * ORBIT_RADIUS_FACTOR;
    let angle = time.elapsed_seconds() * ORBIT_SPEED;
    let position = center + Vec2::new(angle.cos(), angle.sin()) * radius;

    for mut transform in viewers.iter_mut() {
        transform.translation = map_to_world(position).extend(transform.translation.z);
    }
}

/// Schreibt die erste vollständige Szene einmalig als SVG
#[cfg(debug_assertions)]
pub fn dump_scene_svg_system(
    scene: Res<bombfog::scene::SceneGeometry>,
    mut written: Local<bool>,
) {
    if *written {
        return;
    }
    let (Some(walls), Some(visibility)) = (scene.walls(), scene.visibility()) else {
        return;
    };

    *written = true;
    if let Err(err) = bombfog::debug::visualization::svg::save_scene_svg(
        "scene_debug.svg",
        walls,
        Some(visibility),
        1024.0,
    ) {
        warn!("Debug SVG konnte nicht geschrieben werden: {}", err);
    }
}
