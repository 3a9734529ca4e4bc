// src/math/geometry/visibility.rs

//! Sichtpolygon eines Betrachters gegen undurchsichtige Wand-Loops.
//!
//! Ablauf eines Durchlaufs:
//! 1. Jeder Vertex wird relativ zum Betrachter als `Start`, `End` oder `Middle`
//!    klassifiziert; dabei entstehen die Hinderniskanten.
//! 2. Alle Vertices werden stabil nach Polarwinkel sortiert.
//! 3. Deckungsgleiche `Start`/`End`-Paare werden zu einem `Middle` verschmolzen.
//! 4. Verdeckte Vertices fallen weg.
//! 5. `Start`- und `End`-Vertices werden bis zum nächsten Hindernis verlängert.
//!
//! Die Loops müssen so orientiert sein, wie der Boolean-Engine sie liefert:
//! Außenränder mit positiver Fläche, Löcher mit negativer.

use super::intersection::side_of_line;
use super::occluder::{BruteForceOccluder, Occluder};
use crate::math::types::*;
use crate::math::utils::constants;
use bevy::log::trace;
use serde::{Deserialize, Serialize};

/// Klassifikation eines Vertex relativ zum Sichtstrahl durch ihn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// Das Polygon beginnt mit steigendem Winkel zu verdecken
    Start,
    /// Das Polygon hört mit steigendem Winkel auf zu verdecken
    End,
    /// Liegt innerhalb einer Kantenfolge, wird nicht verlängert
    Middle,
}

/// Vertex mit Polarwinkel, nur während eines Durchlaufs gültig
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedPoint {
    pub point: Point2D,
    pub angle: f32,
    pub kind: VertexKind,
}

/// Welche Kantenseite als Hindernis zählt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceMode {
    /// Zum Betrachter gewandte Kanten verdecken (Standard)
    #[default]
    CullBackFaces,
    /// Abgewandte Kanten verdecken
    CullFrontFaces,
}

/// Verhalten, wenn keine Hindernis-Vertices vorhanden sind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoObstaclePolicy {
    /// Leeres Polygon; wer volle Sicht will, muss eine umschließende Hülle liefern
    #[default]
    Empty,
    /// Quadrat mit halber Kantenlänge `max_view_distance` um den Betrachter
    FullView,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityOptions {
    pub face_mode: FaceMode,
    /// Reichweite einer Verlängerung, die kein Hindernis trifft
    pub max_view_distance: f32,
    /// Unterhalb dieses quadrierten Abstands zum Vertex wird nur protokolliert
    pub near_extension_distance_sq: f32,
    pub no_obstacle_policy: NoObstaclePolicy,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            face_mode: FaceMode::default(),
            max_view_distance: 10_000.0,
            near_extension_distance_sq: constants::NEAR_EXTENSION_DISTANCE_SQ,
            no_obstacle_policy: NoObstaclePolicy::default(),
        }
    }
}

/// Ergebnis von Schritt 1
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub points: Vec<TaggedPoint>,
    /// Kanten, die in diesem Modus als Hindernis gelten
    pub obstructions: Vec<Segment>,
}

/// Polarwinkel von `point` aus Sicht von `viewer`, in `(-pi, pi]`
pub fn polar_angle(viewer: Point2D, point: Point2D) -> f32 {
    (point.y - viewer.y).atan2(point.x - viewer.x)
}

/// Schritt 1: klassifiziert alle Vertices aller Hindernis-Loops.
///
/// Seitenvergleiche sind exakt. Ein Nachbar genau auf dem Sichtstrahl (`OnLine`)
/// fällt in den gemischten Zweig und wird je nach Kantenrichtung als Vorder-
/// oder Rückseite behandelt.
pub fn classify_vertices(
    viewer: Point2D,
    obstacles: &[Path],
    face_mode: FaceMode,
) -> Classification {
    let mut classification = Classification::default();
    let cull_front = face_mode == FaceMode::CullFrontFaces;

    for obstacle in obstacles {
        let n = obstacle.len();
        if n < 3 {
            continue;
        }

        for i in 0..n {
            let vertex = obstacle[i];
            let prev = obstacle[(i + n - 1) % n];
            let next = obstacle[(i + 1) % n];

            let direction = vertex - viewer;
            if direction == Point2D::ZERO {
                continue;
            }

            let prev_side = side_of_line(prev, viewer, direction);
            let next_side = side_of_line(next, viewer, direction);
            let edge = Segment::new(vertex, next);

            let kind = match (prev_side, next_side) {
                (Side::Right, Side::Right) => {
                    if cull_front {
                        classification.obstructions.push(edge);
                    }
                    Some(VertexKind::Start)
                }
                (Side::Left, Side::Left) => {
                    classification.obstructions.push(edge);
                    Some(VertexKind::End)
                }
                _ => {
                    // Kante läuft zu kleineren Winkeln: Vorderseite
                    let back_facing = prev_side == Side::Left || next_side == Side::Right;
                    if back_facing == cull_front {
                        classification.obstructions.push(edge);
                        Some(VertexKind::Middle)
                    } else {
                        None
                    }
                }
            };

            if let Some(kind) = kind {
                classification.points.push(TaggedPoint {
                    point: vertex,
                    angle: polar_angle(viewer, vertex),
                    kind,
                });
            }
        }
    }

    classification
}

/// Schritt 2: stabil nach Winkel; Gleichstand behält die Reihenfolge des Auftretens
pub fn sort_by_angle(points: &mut [TaggedPoint]) {
    points.sort_by(|a, b| a.angle.total_cmp(&b.angle));
}

/// Schritt 3: benachbarte, exakt gleiche `Start`/`End`-Paare werden ein `Middle`
pub fn merge_coincident(points: Vec<TaggedPoint>) -> Vec<TaggedPoint> {
    let mut merged = Vec::with_capacity(points.len());
    let mut iter = points.into_iter().peekable();

    while let Some(current) = iter.next() {
        let pair = iter.peek().is_some_and(|next| {
            next.point == current.point
                && matches!(
                    (current.kind, next.kind),
                    (VertexKind::Start, VertexKind::End) | (VertexKind::End, VertexKind::Start)
                )
        });

        if pair {
            iter.next();
            merged.push(TaggedPoint {
                kind: VertexKind::Middle,
                ..current
            });
        } else {
            merged.push(current);
        }
    }

    merged
}

/// Schritt 4: verdeckt, wenn die Strecke Betrachter→Vertex vorher eine Kante trifft
pub fn is_occluded<O: Occluder + ?Sized>(viewer: Point2D, point: Point2D, occluder: &O) -> bool {
    occluder
        .nearest_segment_hit(viewer, point)
        .is_some_and(|hit| hit.t < 1.0 - constants::OCCLUSION_T_EPSILON)
}

/// Schritt 5: Punkt, an dem der Strahl durch `point` hinter dem Vertex auf ein Hindernis trifft.
///
/// Streift der Strahl exakt eine weitere Wandecke (etwa von einer Kachelmitte aus
/// entlang einer Diagonalen), endet die Verlängerung an dieser Ecke; der schmale
/// Keil dahinter fehlt dann im Sichtpolygon.
pub fn extend_past<O: Occluder + ?Sized>(
    viewer: Point2D,
    point: Point2D,
    occluder: &O,
    options: &VisibilityOptions,
) -> Point2D {
    let direction = point - viewer;
    match occluder.nearest_ray_hit(viewer, direction, 1.0 + constants::EXTENSION_T_EPSILON) {
        Some(hit) => {
            let distance_sq = hit.point.distance_squared(point);
            if distance_sq < options.near_extension_distance_sq {
                trace!(
                    "Verlängerung von {:?} landet sehr nah am Vertex ({:?}, d² = {})",
                    point, hit.point, distance_sq
                );
            }
            hit.point
        }
        None => {
            let reach = options.max_view_distance.max(direction.length());
            viewer + direction.normalize_or_zero() * reach
        }
    }
}

fn full_view_square(viewer: Point2D, half_extent: f32) -> Path {
    Bounds2D::from_points(
        viewer - Point2D::splat(half_extent),
        viewer + Point2D::splat(half_extent),
    )
    .corners()
    .to_vec()
}

/// Sichtpolygon mit beliebigem Occluder (im Produktivpfad die BVH der Wände)
pub fn compute_visibility_with<O: Occluder + ?Sized>(
    viewer: Point2D,
    obstacles: &[Path],
    occluder: &O,
    options: &VisibilityOptions,
) -> Path {
    let classification = classify_vertices(viewer, obstacles, options.face_mode);
    sweep(viewer, classification.points, occluder, options)
}

/// Sichtpolygon gegen die eigene Hinderniskantenliste (lineare Suche)
pub fn compute_visibility(
    viewer: Point2D,
    obstacles: &[Path],
    options: &VisibilityOptions,
) -> Path {
    let classification = classify_vertices(viewer, obstacles, options.face_mode);
    let occluder = BruteForceOccluder::new(&classification.obstructions);
    sweep(viewer, classification.points, &occluder, options)
}

fn sweep<O: Occluder + ?Sized>(
    viewer: Point2D,
    mut points: Vec<TaggedPoint>,
    occluder: &O,
    options: &VisibilityOptions,
) -> Path {
    if points.is_empty() {
        return match options.no_obstacle_policy {
            NoObstaclePolicy::Empty => Vec::new(),
            NoObstaclePolicy::FullView => full_view_square(viewer, options.max_view_distance),
        };
    }

    sort_by_angle(&mut points);
    let points = merge_coincident(points);

    let mut polygon = Vec::with_capacity(points.len() * 2);
    let mut visible = 0usize;
    for tagged in points {
        if is_occluded(viewer, tagged.point, occluder) {
            continue;
        }
        visible += 1;

        match tagged.kind {
            VertexKind::Start => {
                polygon.push(extend_past(viewer, tagged.point, occluder, options));
                polygon.push(tagged.point);
            }
            VertexKind::End => {
                polygon.push(tagged.point);
                polygon.push(extend_past(viewer, tagged.point, occluder, options));
            }
            VertexKind::Middle => polygon.push(tagged.point),
        }
    }

    trace!(
        "Sichtpolygon: {} sichtbare Vertices, {} Punkte",
        visible,
        polygon.len()
    );
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::bvh::SegmentBvh;
    use crate::math::geometry::intersection::distance_squared;
    use crate::math::geometry::polygon::PolygonProperties;
    use approx::assert_relative_eq;

    /// Positive Fläche, im Bildschirm im Uhrzeigersinn
    fn square(x0: f32, y0: f32, x1: f32, y1: f32) -> Path {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }

    fn options() -> VisibilityOptions {
        VisibilityOptions {
            max_view_distance: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_single_square() {
        let obstacles = vec![square(1.0, 1.0, 3.0, 3.0)];
        let classification = classify_vertices(Vec2::ZERO, &obstacles, FaceMode::CullBackFaces);

        let kind_of = |p: Vec2| {
            classification
                .points
                .iter()
                .find(|t| t.point == p)
                .map(|t| t.kind)
        };
        assert_eq!(kind_of(Vec2::new(3.0, 1.0)), Some(VertexKind::Start));
        assert_eq!(kind_of(Vec2::new(1.0, 3.0)), Some(VertexKind::End));
        assert_eq!(kind_of(Vec2::new(1.0, 1.0)), Some(VertexKind::Middle));
        // Rückseitige Ecke ist im Standardmodus nicht dabei
        assert_eq!(kind_of(Vec2::new(3.0, 3.0)), None);

        // Hindernisse: Kante des End-Vertex und die Vorderkante der mittleren Ecke
        assert_eq!(classification.obstructions.len(), 2);
        assert!(classification.obstructions.contains(&Segment::new(
            Vec2::new(1.0, 3.0),
            Vec2::new(1.0, 1.0)
        )));
        assert!(classification.obstructions.contains(&Segment::new(
            Vec2::new(1.0, 1.0),
            Vec2::new(3.0, 1.0)
        )));
    }

    #[test]
    fn test_classify_cull_front_faces() {
        let obstacles = vec![square(1.0, 1.0, 3.0, 3.0)];
        let classification = classify_vertices(Vec2::ZERO, &obstacles, FaceMode::CullFrontFaces);

        let middle: Vec<Vec2> = classification
            .points
            .iter()
            .filter(|t| t.kind == VertexKind::Middle)
            .map(|t| t.point)
            .collect();
        assert_eq!(middle, vec![Vec2::new(3.0, 3.0)]);
        // Start-Kante, End-Kante und Rückkante
        assert_eq!(classification.obstructions.len(), 3);
    }

    #[test]
    fn test_square_extends_tangent_corners() {
        let obstacles = vec![square(1.0, 1.0, 3.0, 3.0)];
        let polygon = compute_visibility(Vec2::ZERO, &obstacles, &options());

        assert_eq!(polygon.len(), 5);
        // Sortiert nach Winkel: (3,1) ist Start, (1,3) ist End
        assert_eq!(polygon[1], Vec2::new(3.0, 1.0));
        assert_eq!(polygon[2], Vec2::new(1.0, 1.0));
        assert_eq!(polygon[3], Vec2::new(1.0, 3.0));

        let start_extension = polygon[0];
        let end_extension = polygon[4];
        assert_relative_eq!(start_extension.length(), 100.0, epsilon = 1e-3);
        assert_relative_eq!(end_extension.length(), 100.0, epsilon = 1e-3);
        assert_relative_eq!(
            polar_angle(Vec2::ZERO, start_extension),
            polar_angle(Vec2::ZERO, Vec2::new(3.0, 1.0)),
            epsilon = 1e-5
        );
        assert_relative_eq!(
            polar_angle(Vec2::ZERO, end_extension),
            polar_angle(Vec2::ZERO, Vec2::new(1.0, 3.0)),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_extension_stops_at_grazed_corner() {
        // Diagonale von der Kachelmitte: der Strahl durch (1,1) streift die Ecke (2,2)
        let walls = [
            Segment::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 2.0)),
            Segment::new(Vec2::new(2.0, 3.0), Vec2::new(2.0, 2.0)),
            Segment::new(Vec2::new(10.0, -20.0), Vec2::new(10.0, 20.0)),
        ];
        let occluder = BruteForceOccluder::new(&walls);
        let viewer = Vec2::splat(0.5);

        let extension = extend_past(viewer, Vec2::ONE, &occluder, &options());
        assert_relative_eq!(extension.x, 2.0, epsilon = 1e-5);
        assert_relative_eq!(extension.y, 2.0, epsilon = 1e-5);

        // Unterhalb der Kachel läuft er bis zur fernen Wand
        let extension = extend_past(viewer, Vec2::new(1.0, 0.7), &occluder, &options());
        assert_relative_eq!(extension.x, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_no_obstacles() {
        let polygon = compute_visibility(Vec2::new(3.0, 4.0), &[], &options());
        assert!(polygon.is_empty());

        let full = compute_visibility(
            Vec2::new(3.0, 4.0),
            &[],
            &VisibilityOptions {
                no_obstacle_policy: NoObstaclePolicy::FullView,
                ..options()
            },
        );
        assert_eq!(full.len(), 4);
        assert_relative_eq!(full.area(), 200.0 * 200.0, epsilon = 1.0);
        assert!(full.contains_point(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn test_merge_coincident_pair() {
        let p = Vec2::new(1.0, 1.0);
        let points = vec![
            TaggedPoint {
                point: Vec2::new(2.0, 0.0),
                angle: 0.0,
                kind: VertexKind::Middle,
            },
            TaggedPoint {
                point: p,
                angle: 0.78,
                kind: VertexKind::End,
            },
            TaggedPoint {
                point: p,
                angle: 0.78,
                kind: VertexKind::Start,
            },
            TaggedPoint {
                point: Vec2::new(0.0, 2.0),
                angle: 1.57,
                kind: VertexKind::Start,
            },
        ];
        let merged = merge_coincident(points);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[1].point, p);
        assert_eq!(merged[1].kind, VertexKind::Middle);
        assert_eq!(merged[2].kind, VertexKind::Start);
    }

    #[test]
    fn test_sort_is_stable() {
        let mut points = vec![
            TaggedPoint {
                point: Vec2::new(2.0, 2.0),
                angle: 0.5,
                kind: VertexKind::Start,
            },
            TaggedPoint {
                point: Vec2::new(1.0, 0.0),
                angle: 0.0,
                kind: VertexKind::Middle,
            },
            TaggedPoint {
                point: Vec2::new(1.0, 1.0),
                angle: 0.5,
                kind: VertexKind::End,
            },
        ];
        sort_by_angle(&mut points);
        assert_eq!(points[0].kind, VertexKind::Middle);
        assert_eq!(points[1].point, Vec2::new(2.0, 2.0));
        assert_eq!(points[2].point, Vec2::new(1.0, 1.0));
    }

    /// Raum 0..10 als Loch (negative Fläche) in einem Wandblock, Säule 4..6 darin
    fn room_with_pillar() -> Vec<Path> {
        let mut room = square(0.0, 0.0, 10.0, 10.0);
        room.reverse();
        vec![square(-1.0, -1.0, 11.0, 11.0), room, square(4.0, 4.0, 6.0, 6.0)]
    }

    #[test]
    fn test_visibility_bounded_by_room() {
        let obstacles = room_with_pillar();
        let bvh = SegmentBvh::from_loops(&obstacles);
        let viewer = Vec2::new(2.0, 5.0);
        let polygon = compute_visibility_with(viewer, &obstacles, &bvh, &options());

        assert!(polygon.len() >= 4);
        for point in &polygon {
            assert!(point.x >= -1e-3 && point.x <= 10.0 + 1e-3, "{point:?}");
            assert!(point.y >= -1e-3 && point.y <= 10.0 + 1e-3, "{point:?}");
        }
        // Äußere Wand wird nie erreicht
        assert!(!polygon.contains(&Vec2::new(-1.0, -1.0)));

        assert!(polygon.contains_point(Vec2::new(1.0, 1.0)));
        assert!(polygon.contains_point(Vec2::new(3.5, 5.0)));
        // Hinter der Säule
        assert!(!polygon.contains_point(Vec2::new(8.0, 5.0)));
        // In der Säule
        assert!(!polygon.contains_point(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_bvh_and_brute_force_agree() {
        let obstacles = room_with_pillar();
        for viewer in [
            Vec2::new(2.0, 5.0),
            Vec2::new(1.5, 1.5),
            Vec2::new(8.25, 7.5),
        ] {
            let classification = classify_vertices(viewer, &obstacles, FaceMode::CullBackFaces);
            let bvh = SegmentBvh::build(classification.obstructions);
            let with_bvh = compute_visibility_with(viewer, &obstacles, &bvh, &options());
            let brute = compute_visibility(viewer, &obstacles, &options());
            assert_eq!(with_bvh.len(), brute.len());
            for (a, b) in with_bvh.iter().zip(&brute) {
                assert!(distance_squared(*a, *b) < 1e-6, "{a:?} != {b:?}");
            }
        }
    }

    #[test]
    fn test_empty_room_is_fully_visible() {
        let mut room = square(0.0, 0.0, 10.0, 10.0);
        room.reverse();
        let obstacles = vec![room];
        let polygon = compute_visibility(Vec2::new(3.0, 7.0), &obstacles, &options());

        assert_eq!(polygon.len(), 4);
        assert_relative_eq!(polygon.area(), 100.0, epsilon = 1e-3);
    }
}
