// src/scene/systems.rs
use super::geometry::SceneGeometry;
use super::resources::SightParameters;
use super::tile::TileMap;
use crate::math::types::Point2D;
use bevy::prelude::*;

/// Markiert die Entität, aus deren Sicht der Nebel berechnet wird
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Viewer;

/// Kartenkoordinaten haben y nach unten, die Bevy-Welt y nach oben.
pub fn map_to_world(point: Point2D) -> Vec2 {
    Vec2::new(point.x, -point.y)
}

pub fn world_to_map(translation: Vec3) -> Point2D {
    Point2D::new(translation.x, -translation.y)
}

pub fn rebuild_walls_system(
    map: Res<TileMap>,
    params: Res<SightParameters>,
    mut scene: ResMut<SceneGeometry>,
) {
    if !map.is_changed() && !params.is_changed() {
        return;
    }

    match scene.refresh_walls(&map, &params) {
        Ok(true) => info!("Wandgeometrie für Kartengeneration {} aufgebaut", map.generation()),
        Ok(false) => {}
        Err(err) => warn!("Wandgeometrie nicht neu aufgebaut, nutze letzten Stand: {}", err),
    }
}

pub fn update_visibility_system(
    viewers: Query<&Transform, With<Viewer>>,
    params: Res<SightParameters>,
    mut scene: ResMut<SceneGeometry>,
) {
    // Genau ein Betrachter; alles andere ist ein Setup-Fehler der Szene
    let Ok(transform) = viewers.get_single() else {
        return;
    };
    if scene.walls().is_none() {
        return;
    }

    let viewer = world_to_map(transform.translation);
    if let Err(err) = scene.refresh_visibility(viewer, &params) {
        warn!("Sichtpolygon nicht aktualisiert, nutze letzten Stand: {}", err);
    }
}
