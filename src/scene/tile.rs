// src/scene/tile.rs

use crate::math::types::*;
use bevy::log::debug;
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Inhalt einer Kachel. Nur Wände sind undurchsichtig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
    /// Zerstörbare Kiste; blockiert Bewegung, aber nicht die Sicht
    Crate,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Wall)
    }
}

/// Kachelwelt in Zeilen-Reihenfolge.
/// `generation` wird bei jeder Änderung erhöht und dient als Cache-Schlüssel der Wandgeometrie.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    generation: u64,
}

impl TileMap {
    /// Leere Karte nur aus Boden
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Floor; width * height],
            generation: 0,
        }
    }

    /// Karte mit einem geschlossenen Wandring am Rand
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut map = Self::new(width, height);
        for row in 0..height {
            for col in 0..width {
                if col == 0 || row == 0 || col + 1 == width || row + 1 == height {
                    map.tiles[row * width + col] = Tile::Wall;
                }
            }
        }
        map
    }

    /// Umrandete Karte mit zufällig verteilten Wänden und Kisten.
    /// `density` ist die Wahrscheinlichkeit einer Wand pro Innenkachel; die Mitte bleibt frei.
    pub fn generate(width: usize, height: usize, seed: u64, density: f64) -> Self {
        let mut map = Self::bordered(width, height);
        let mut rng = StdRng::seed_from_u64(seed);
        let density = density.clamp(0.0, 1.0);
        let (center_col, center_row) = (width / 2, height / 2);

        for row in 1..height.saturating_sub(1) {
            for col in 1..width.saturating_sub(1) {
                if col.abs_diff(center_col) <= 1 && row.abs_diff(center_row) <= 1 {
                    continue;
                }
                let tile = if rng.random_bool(density) {
                    Tile::Wall
                } else if rng.random_bool(density * 0.5) {
                    Tile::Crate
                } else {
                    Tile::Floor
                };
                map.tiles[row * width + col] = tile;
            }
        }

        debug!(
            "TileMap {}x{} generiert (seed {}, {} Wände)",
            width,
            height,
            seed,
            map.tiles.iter().filter(|tile| tile.is_solid()).count()
        );
        map
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn contains(&self, col: usize, row: usize) -> bool {
        col < self.width && row < self.height
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Tile> {
        self.contains(col, row)
            .then(|| self.tiles[row * self.width + col])
    }

    /// Setzt eine Kachel. Erhöht `generation` nur, wenn sich tatsächlich etwas ändert.
    pub fn set(&mut self, col: usize, row: usize, tile: Tile) -> bool {
        if !self.contains(col, row) {
            return false;
        }
        let slot = &mut self.tiles[row * self.width + col];
        if *slot == tile {
            return false;
        }
        *slot = tile;
        self.generation += 1;
        true
    }

    pub fn is_solid(&self, col: usize, row: usize) -> bool {
        self.get(col, row).is_some_and(Tile::is_solid)
    }

    pub fn tile_bounds(&self, col: usize, row: usize, tile_size: f32) -> Bounds2D {
        let min = Point2D::new(col as f32, row as f32) * tile_size;
        Bounds2D::from_points(min, min + Point2D::splat(tile_size))
    }

    pub fn tile_center(&self, col: usize, row: usize, tile_size: f32) -> Point2D {
        (Point2D::new(col as f32, row as f32) + Point2D::splat(0.5)) * tile_size
    }

    /// Kachel unter einem Weltpunkt
    pub fn world_to_tile(&self, point: Point2D, tile_size: f32) -> Option<(usize, usize)> {
        if tile_size <= 0.0 || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let col = (point.x / tile_size).floor() as usize;
        let row = (point.y / tile_size).floor() as usize;
        self.contains(col, row).then_some((col, row))
    }

    /// Ein Rechteck (4 Ecken, positive Fläche) pro Kachel; leere Loops für nicht-solide Kacheln.
    pub fn wall_bounds(&self, tile_size: f32) -> Paths {
        (0..self.height)
            .flat_map(|row| (0..self.width).map(move |col| (col, row)))
            .map(|(col, row)| {
                if self.is_solid(col, row) {
                    self.tile_bounds(col, row, tile_size).corners().to_vec()
                } else {
                    Vec::new()
                }
            })
            .collect()
    }
}

impl Default for TileMap {
    fn default() -> Self {
        Self::bordered(16, 12)
    }
}
