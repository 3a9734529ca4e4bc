// src/math/geometry/polygon/simplify.rs

use crate::math::types::*;
use crate::math::utils::simple_geometry;

/// Entfernt Mikro-Kanten aus einem geschlossenen Loop:
/// aufeinanderfolgende Punkte näher als `tolerance` und Punkte, die weniger
/// als `tolerance` von der Geraden durch ihre Nachbarn entfernt liegen.
///
/// Gibt `None` zurück, wenn weniger als 3 Punkte übrig bleiben.
pub fn simplify_loop(path: &[Point2D], tolerance: f32) -> Option<Path> {
    let tolerance_sq = tolerance * tolerance;

    let mut points: Path = Vec::with_capacity(path.len());
    for &point in path {
        match points.last() {
            Some(&last) if simple_geometry::distance_sq(last, point) <= tolerance_sq => {}
            _ => points.push(point),
        }
    }
    // Schließende Kante
    while points.len() > 1
        && simple_geometry::distance_sq(points[0], points[points.len() - 1]) <= tolerance_sq
    {
        points.pop();
    }

    // Nahezu kollineare Punkte, bis sich nichts mehr ändert
    let mut changed = true;
    while changed && points.len() >= 3 {
        changed = false;
        let mut i = 0;
        while i < points.len() && points.len() >= 3 {
            let n = points.len();
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            if simple_geometry::point_line_distance(points[i], prev, next) <= tolerance {
                points.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }

    (points.len() >= 3).then_some(points)
}

/// Vereinfacht alle Loops und verwirft degenerierte
pub fn simplify_paths(paths: &[Path], tolerance: f32) -> Paths {
    paths
        .iter()
        .filter_map(|path| simplify_loop(path, tolerance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_near_duplicates() {
        let path = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.01, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(0.0, 4.0),
            Vec2::new(0.0, 0.01),
        ];
        let simplified = simplify_loop(&path, 0.025).unwrap();
        assert_eq!(simplified.len(), 4);
    }

    #[test]
    fn test_removes_collinear_tile_seams() {
        // Zwei verschmolzene Kacheln mit Zwischenpunkten auf den Kanten
        let path = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        let simplified = simplify_loop(&path, 0.025).unwrap();
        assert_eq!(
            simplified,
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(2.0, 0.0),
                Vec2::new(2.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_collapsed_loop_is_dropped() {
        let sliver = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 0.01),
        ];
        assert!(simplify_loop(&sliver, 0.025).is_none());
        assert!(simplify_loop(&[], 0.025).is_none());

        let paths = simplify_paths(&[sliver, vec![Vec2::ZERO, Vec2::X, Vec2::Y]], 0.025);
        assert_eq!(paths.len(), 1);
    }
}
