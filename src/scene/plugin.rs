// src/scene/plugin.rs

//! Bevy-`Plugin`, das Wand- und Sichtgeometrie pro Frame aktuell hält.

use super::geometry::SceneGeometry;
use super::resources::SightParameters;
use super::systems::{rebuild_walls_system, update_visibility_system};
use super::tile::TileMap;
use crate::debug::visualization::polygon::draw_visibility_system;
use bevy::prelude::*;

/// Registriert `SightParameters`, `TileMap` und `SceneGeometry` (falls noch nicht vorhanden)
/// und hängt die Systeme in `Update` ein: Wände, dann Sicht, dann Gizmos.
pub struct SightPlugin {
    pub draw_gizmos: bool,
}

impl Default for SightPlugin {
    fn default() -> Self {
        Self { draw_gizmos: true }
    }
}

impl Plugin for SightPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SightParameters>()
            .init_resource::<TileMap>()
            .init_resource::<SceneGeometry>()
            .add_systems(
                Update,
                (rebuild_walls_system, update_visibility_system).chain(),
            );

        if self.draw_gizmos {
            app.add_systems(
                Update,
                draw_visibility_system.after(update_visibility_system),
            );
        }
    }
}
