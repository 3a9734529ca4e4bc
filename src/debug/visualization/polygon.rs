// src/debug/visualization/polygon.rs
use crate::math::types::*;
use crate::scene::geometry::SceneGeometry;
use crate::scene::systems::map_to_world;
use bevy::prelude::*;

const WALL_COLOR: Color = Color::GRAY;
const SIGHT_COLOR: Color = Color::YELLOW;
const FOG_COLOR: Color = Color::rgb(0.25, 0.25, 0.45);
const VIEWER_COLOR: Color = Color::RED;

/// Zeichnet einen geschlossenen Loop in Weltkoordinaten
fn draw_loop(gizmos: &mut Gizmos, points: &[Point2D], color: Color) {
    if points.len() < 2 {
        return;
    }
    // Schließe den Loop, indem der erste Punkt am Ende wiederholt wird
    let closed = points
        .iter()
        .chain(points.first())
        .map(|&p| map_to_world(p));
    gizmos.linestrip_2d(closed, color);
}

/// System, das Wände, Nebel und Sichtpolygon der aktuellen Szene als Gizmos zeichnet.
pub fn draw_visibility_system(scene: Res<SceneGeometry>, mut gizmos: Gizmos) {
    if let Some(walls) = scene.walls() {
        for wall in &walls.loops {
            draw_loop(&mut gizmos, wall, WALL_COLOR);
        }
    }

    let Some(visibility) = scene.visibility() else {
        return;
    };
    for fog in visibility.fog_loops() {
        draw_loop(&mut gizmos, &fog, FOG_COLOR);
    }
    draw_loop(&mut gizmos, &visibility.polygon, SIGHT_COLOR);
    gizmos.circle_2d(map_to_world(visibility.viewer), 4.0, VIEWER_COLOR);
}
