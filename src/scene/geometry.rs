// src/scene/geometry.rs

//! Verbindet Kachelwelt und Geometrie-Engine:
//! Wand-Rechtecke werden vereinigt, geflacht, vereinfacht und in eine BVH gelegt;
//! darauf läuft pro Betrachter die Sichtberechnung.

use super::resources::SightParameters;
use super::tile::TileMap;
use crate::math::error::{GeometryError, GeometryResult};
use crate::math::geometry::bvh::SegmentBvh;
use crate::math::geometry::occluder::Occluder;
use crate::math::geometry::polygon::{
    FillRule, PolygonBoolean, PolygonProperties, PolygonTree, simplify_paths,
};
use crate::math::geometry::visibility;
use crate::math::types::*;
use bevy::log::debug;
use bevy::prelude::Resource;

/// Wandgeometrie einer Kartenversion. Nach dem Bau unveränderlich.
#[derive(Debug, Clone)]
pub struct WallResult {
    pub bounds: Bounds2D,
    /// Vereinigung aller Wandkacheln mit Lochstruktur
    pub tree: PolygonTree,
    /// Geflachte und vereinfachte Loops (Außenränder positiv, Löcher negativ)
    pub loops: Paths,
    pub bvh: SegmentBvh,
    pub generation: u64,
    tile_size: f32,
    simplify_tolerance: f32,
}

impl WallResult {
    /// Keine Wandkante schneidet die Strecke `a`-`b`
    pub fn line_of_sight(&self, a: Point2D, b: Point2D) -> bool {
        self.bvh.nearest_segment_hit(a, b).is_none()
    }

    /// Äußere Umrisse aller Wandgruppen
    pub fn hulls(&self) -> Paths {
        self.tree.outer_hulls()
    }

    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// Gebaut für diese Kartenversion und diese Parameter?
    pub fn is_current(&self, map: &TileMap, params: &SightParameters) -> bool {
        self.generation == map.generation()
            && self.tile_size == params.tile_size
            && self.simplify_tolerance == params.simplify_tolerance
    }
}

/// Sichtbarer und verdeckter Bereich für eine Betrachterposition
#[derive(Debug, Clone)]
pub struct VisibilityResult {
    pub viewer: Point2D,
    /// Sichtpolygon in Winkelreihenfolge
    pub polygon: Path,
    /// Nebel: Wandhülle minus (Sichtpolygon ∪ Wände)
    pub invisible: PolygonTree,
}

impl VisibilityResult {
    pub fn is_visible(&self, point: Point2D) -> bool {
        self.polygon.len() >= 3 && self.polygon.contains_point(point)
    }

    /// Nebel-Loops zum Zeichnen mit Even-Odd-Füllung
    pub fn fog_loops(&self) -> Paths {
        self.invisible.flatten()
    }
}

pub fn compute_wall_paths(map: &TileMap, params: &SightParameters) -> GeometryResult<WallResult> {
    params.validate()?;

    let rectangles = map.wall_bounds(params.tile_size);
    let tree = PolygonBoolean::new(FillRule::Positive).union(&rectangles)?;
    let loops = simplify_paths(&tree.flatten(), params.simplify_tolerance);
    let bvh = SegmentBvh::from_loops(&loops);
    let bounds = loops
        .iter()
        .filter_map(|ring| ring.bounds())
        .fold(Bounds2D::empty(), |acc, bounds| acc.union(&bounds));

    debug!(
        "Wandgeometrie für Generation {}: {} Loops, {} Kanten, BVH-Tiefe {}",
        map.generation(),
        loops.len(),
        bvh.len(),
        bvh.depth()
    );

    Ok(WallResult {
        bounds,
        tree,
        loops,
        bvh,
        generation: map.generation(),
        tile_size: params.tile_size,
        simplify_tolerance: params.simplify_tolerance,
    })
}

pub fn compute_visibility(
    walls: &WallResult,
    viewer: Point2D,
    params: &SightParameters,
) -> GeometryResult<VisibilityResult> {
    params.validate()?;

    let options = params.visibility_options();
    let polygon =
        visibility::compute_visibility_with(viewer, &walls.loops, &walls.bvh, &options);

    // Löcher der Wandvereinigung bleiben als Löcher erhalten, deshalb geht der Baum direkt hinein
    let engine = PolygonBoolean::new(FillRule::NonZero);
    let hull = engine.union(&walls.hulls())?;
    let sight = engine.union(std::slice::from_ref(&polygon))?;
    let invisible = engine.difference(&hull, &[&sight, &walls.tree])?;

    debug!(
        "Sicht von {:?}: {} Punkte, {} Nebel-Loops",
        viewer,
        polygon.len(),
        invisible.node_count()
    );

    Ok(VisibilityResult {
        viewer,
        polygon,
        invisible,
    })
}

/// Zwischengespeicherte Wand- und Sichtgeometrie.
/// Schlägt ein Neuaufbau fehl, bleibt das letzte gültige Ergebnis stehen;
/// der Fehler geht an den Aufrufer.
#[derive(Resource, Debug, Default)]
pub struct SceneGeometry {
    walls: Option<WallResult>,
    visibility: Option<VisibilityResult>,
}

impl SceneGeometry {
    pub fn walls(&self) -> Option<&WallResult> {
        self.walls.as_ref()
    }

    pub fn visibility(&self) -> Option<&VisibilityResult> {
        self.visibility.as_ref()
    }

    /// Baut die Wände neu, falls Karte oder Parameter sich geändert haben.
    /// `Ok(true)` nach einem Neuaufbau, `Ok(false)` wenn der Cache noch gilt.
    pub fn refresh_walls(&mut self, map: &TileMap, params: &SightParameters) -> GeometryResult<bool> {
        if self
            .walls
            .as_ref()
            .is_some_and(|walls| walls.is_current(map, params))
        {
            return Ok(false);
        }

        self.walls = Some(compute_wall_paths(map, params)?);
        Ok(true)
    }

    pub fn refresh_visibility(
        &mut self,
        viewer: Point2D,
        params: &SightParameters,
    ) -> GeometryResult<&VisibilityResult> {
        let walls = self.walls.as_ref().ok_or(GeometryError::EmptyScene)?;

        let result = compute_visibility(walls, viewer, params);
        self.publish_visibility(result)
    }

    /// Übernimmt ein neues Sichtergebnis; ein Fehler lässt den letzten Stand stehen.
    fn publish_visibility(
        &mut self,
        result: GeometryResult<VisibilityResult>,
    ) -> GeometryResult<&VisibilityResult> {
        Ok(self.visibility.insert(result?))
    }

    /// Sichtlinie zwischen zwei Kachelmitten. Kacheln außerhalb der Karte sehen nichts.
    pub fn tiles_in_line_of_sight(
        &self,
        map: &TileMap,
        a_tile: (usize, usize),
        b_tile: (usize, usize),
        tile_size: f32,
    ) -> GeometryResult<bool> {
        let walls = self.walls.as_ref().ok_or(GeometryError::EmptyScene)?;
        if !map.contains(a_tile.0, a_tile.1) || !map.contains(b_tile.0, b_tile.1) {
            return Ok(false);
        }

        let a = map.tile_center(a_tile.0, a_tile.1, tile_size);
        let b = map.tile_center(b_tile.0, b_tile.1, tile_size);
        Ok(walls.line_of_sight(a, b))
    }
}
