// src/math/geometry/polygon/operations/boolean.rs

use super::super::core::{Orientation, PolygonProperties, ensure_orientation, open_ring};
use super::super::tree::{PolygonNode, PolygonTree};
use crate::math::{error::*, types::*};
use bevy::log::{trace, warn};
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon as GeoPolygon};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Boolean-Operationstypen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOperation {
    /// Union (A ∪ B)
    Union,
    /// Difference (A - B)
    Difference,
}

impl BooleanOperation {
    fn name(self) -> &'static str {
        match self {
            BooleanOperation::Union => "union",
            BooleanOperation::Difference => "difference",
        }
    }
}

/// Füllregel für einzelne Eingabe-Loops.
///
/// Jeder Loop ist ein eigener Operand mit Windungszahl ±1:
/// `Positive` füllt nur Loops mit positiver Fläche, `NonZero` füllt jeden Loop
/// unabhängig von seiner Orientierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    #[default]
    Positive,
    NonZero,
}

/// Boolean-Engine für Polygon-Operationen auf Basis von `geo`
#[derive(Debug, Clone, Copy, Default)]
pub struct PolygonBoolean {
    fill_rule: FillRule,
}

impl PolygonBoolean {
    /// Erstellt eine neue Boolean-Engine
    pub fn new(fill_rule: FillRule) -> Self {
        Self { fill_rule }
    }

    /// Vereinigung einer Menge einfacher Loops.
    /// Loops mit weniger als 3 Punkten werden übersprungen.
    pub fn union(&self, polygons: &[Path]) -> GeometryResult<PolygonTree> {
        let operands: Vec<MultiPolygon<f64>> = polygons
            .iter()
            .filter_map(|path| self.to_geo_polygon(path).ok())
            .map(|polygon| MultiPolygon::new(vec![polygon]))
            .collect();

        let merged = run_guarded(BooleanOperation::Union, || union_all(operands))?;
        Ok(tree_from_multipolygon(&merged))
    }

    /// `subject` minus die Vereinigung aller `clips`, jeweils mit Lochstruktur
    pub fn difference(
        &self,
        subject: &PolygonTree,
        clips: &[&PolygonTree],
    ) -> GeometryResult<PolygonTree> {
        let subject = multipolygon_from_tree(subject);
        let clips: Vec<MultiPolygon<f64>> =
            clips.iter().map(|tree| multipolygon_from_tree(tree)).collect();

        let result = run_guarded(BooleanOperation::Difference, || {
            let clip = union_all(clips);
            subject.difference(&clip)
        })?;
        Ok(tree_from_multipolygon(&result))
    }

    /// Wandelt einen Loop gemäß Füllregel in ein geo-Polygon (f64) um
    pub fn to_geo_polygon(&self, path: &[Point2D]) -> GeometryResult<GeoPolygon<f64>> {
        let mut ring = open_ring(path.to_vec());
        ring.dedup();
        if ring.len() < 3 {
            return Err(GeometryError::InsufficientPoints {
                expected: 3,
                actual: ring.len(),
            });
        }

        match (self.fill_rule, ring.orientation()) {
            (_, Orientation::Collinear) => {
                return Err(GeometryError::InsufficientPoints {
                    expected: 3,
                    actual: 0,
                });
            }
            (FillRule::Positive, Orientation::Clockwise) => {
                trace!("Loop mit negativer Fläche unter FillRule::Positive ignoriert");
                return Err(GeometryError::InsufficientPoints {
                    expected: 3,
                    actual: 0,
                });
            }
            (FillRule::NonZero, Orientation::Clockwise) => ring.reverse(),
            _ => {}
        }

        Ok(GeoPolygon::new(to_line_string(&ring), Vec::new()))
    }
}

/// Führt die geo-Operation aus und fängt Panics des Clipping-Algorithmus ab
fn run_guarded<F>(operation: BooleanOperation, f: F) -> GeometryResult<MultiPolygon<f64>>
where
    F: FnOnce() -> MultiPolygon<f64>,
{
    catch_unwind(AssertUnwindSafe(f)).map_err(|_| {
        warn!("Boolean-Operation '{}' ist fehlgeschlagen", operation.name());
        GeometryError::BooleanOperationFailed {
            operation: operation.name().to_string(),
        }
    })
}

/// Paarweise, balancierte Vereinigung
fn union_all(mut layer: Vec<MultiPolygon<f64>>) -> MultiPolygon<f64> {
    while layer.len() > 1 {
        let mut next = Vec::with_capacity(layer.len().div_ceil(2));
        let mut operands = layer.into_iter();
        while let Some(a) = operands.next() {
            match operands.next() {
                Some(b) => next.push(a.union(&b)),
                None => next.push(a),
            }
        }
        layer = next;
    }
    layer
        .pop()
        .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
}

fn to_line_string(ring: &[Point2D]) -> LineString<f64> {
    LineString::new(
        ring.iter()
            .map(|p| Coord {
                x: p.x as f64,
                y: p.y as f64,
            })
            .collect(),
    )
}

fn from_line_string(line: &LineString<f64>) -> Path {
    let ring: Path = line
        .coords()
        .map(|c| Point2D::new(c.x as f32, c.y as f32))
        .collect();
    open_ring(ring)
}

/// Baut den Polygonbaum aus dem geo-Ergebnis.
/// Außenränder erhalten positive Fläche, Löcher negative.
fn tree_from_multipolygon(multi: &MultiPolygon<f64>) -> PolygonTree {
    let mut nodes: Vec<(f32, PolygonNode)> = multi
        .iter()
        .filter_map(|polygon| {
            let mut exterior = from_line_string(polygon.exterior());
            if exterior.len() < 3 {
                return None;
            }
            ensure_orientation(&mut exterior, Orientation::CounterClockwise);

            let mut node = PolygonNode::new(exterior, false);
            for interior in polygon.interiors() {
                let mut hole = from_line_string(interior);
                if hole.len() < 3 {
                    continue;
                }
                ensure_orientation(&mut hole, Orientation::Clockwise);
                node.children.push(PolygonNode::new(hole, true));
            }
            Some((node.polygon.area(), node))
        })
        .collect();

    // Größte zuerst, damit Inseln ihre Löcher schon vorfinden
    nodes.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut tree = PolygonTree::new();
    for (_, node) in nodes {
        let anchor = node.polygon[0];
        tree.insert_solid(node, anchor);
    }
    tree
}

/// Gegenrichtung: jeder gefüllte Knoten mit seinen direkten Löchern wird ein geo-Polygon
fn multipolygon_from_tree(tree: &PolygonTree) -> MultiPolygon<f64> {
    let polygons = tree
        .iter()
        .filter(|node| !node.is_hole && node.polygon.len() >= 3)
        .map(|node| {
            let interiors = node
                .children
                .iter()
                .filter(|hole| hole.polygon.len() >= 3)
                .map(|hole| to_line_string(&hole.polygon))
                .collect();
            GeoPolygon::new(to_line_string(&node.polygon), interiors)
        })
        .collect();
    MultiPolygon::new(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Path {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }

    #[test]
    fn test_union_of_overlapping_squares_is_one_polygon() {
        let engine = PolygonBoolean::new(FillRule::Positive);
        let tree = engine
            .union(&[rect(0.0, 0.0, 1.0, 1.0), rect(0.5, 0.0, 1.5, 1.0)])
            .unwrap();

        assert_eq!(tree.children.len(), 1);
        assert!(tree.children[0].children.is_empty());
        assert_relative_eq!(tree.area(), 1.5, epsilon = 1e-5);
        // Die Vereinigung ist ein Rechteck 1.5 x 1
        assert_eq!(tree.children[0].polygon.len(), 4);
    }

    #[test]
    fn test_union_with_itself_is_idempotent() {
        let engine = PolygonBoolean::new(FillRule::Positive);
        let square = rect(1.0, 1.0, 3.0, 3.0);
        let tree = engine.union(&[square.clone(), square.clone()]).unwrap();

        assert_eq!(tree.children.len(), 1);
        let result = &tree.children[0].polygon;
        assert_relative_eq!(result.signed_area(), 4.0, epsilon = 1e-5);
        for corner in &square {
            assert!(result.contains(corner));
        }
    }

    #[test]
    fn test_ring_of_tiles_has_hole() {
        let mut tiles = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                if i == 1 && j == 1 {
                    continue;
                }
                let (x, y) = (i as f32, j as f32);
                tiles.push(rect(x, y, x + 1.0, y + 1.0));
            }
        }

        let tree = PolygonBoolean::new(FillRule::Positive)
            .union(&tiles)
            .unwrap();
        assert_eq!(tree.children.len(), 1);
        let outer = &tree.children[0];
        assert_eq!(outer.children.len(), 1);
        assert!(outer.children[0].is_hole);
        assert!(outer.polygon.signed_area() > 0.0);
        assert!(outer.children[0].polygon.signed_area() < 0.0);
        assert_relative_eq!(tree.area(), 8.0, epsilon = 1e-4);
    }

    #[test]
    fn test_degenerate_inputs_are_skipped() {
        let engine = PolygonBoolean::new(FillRule::Positive);
        let tree = engine
            .union(&[
                Vec::new(),
                vec![Vec2::ZERO, Vec2::X],
                rect(0.0, 0.0, 1.0, 1.0),
            ])
            .unwrap();
        assert_eq!(tree.children.len(), 1);

        assert!(engine.union(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_fill_rule_orientation() {
        let mut clockwise = rect(0.0, 0.0, 1.0, 1.0);
        clockwise.reverse();

        let positive = PolygonBoolean::new(FillRule::Positive)
            .union(&[clockwise.clone()])
            .unwrap();
        assert!(positive.is_empty());

        let nonzero = PolygonBoolean::new(FillRule::NonZero)
            .union(&[clockwise])
            .unwrap();
        assert_eq!(nonzero.children.len(), 1);
    }

    #[test]
    fn test_clipping_panic_becomes_error() {
        let result = run_guarded(BooleanOperation::Union, || panic!("sweep line out of order"));
        assert_eq!(
            result,
            Err(GeometryError::BooleanOperationFailed {
                operation: "union".to_string()
            })
        );

        let result = run_guarded(BooleanOperation::Difference, || -> MultiPolygon<f64> {
            panic!("degenerate ring")
        });
        assert!(matches!(
            result,
            Err(GeometryError::BooleanOperationFailed { operation }) if operation == "difference"
        ));

        let ok = run_guarded(BooleanOperation::Union, || MultiPolygon::new(Vec::new()));
        assert!(ok.is_ok_and(|multi| multi.0.is_empty()));
    }

    #[test]
    fn test_difference_keeps_uncovered_part() {
        let engine = PolygonBoolean::new(FillRule::NonZero);
        let subject = engine.union(&[rect(0.0, 0.0, 4.0, 4.0)]).unwrap();
        let left = engine.union(&[rect(0.0, 0.0, 2.0, 4.0)]).unwrap();
        let corner = engine.union(&[rect(2.0, 0.0, 4.0, 2.0)]).unwrap();

        let rest = engine.difference(&subject, &[&left, &corner]).unwrap();
        assert_relative_eq!(rest.area(), 4.0, epsilon = 1e-4);
        assert!(rest.contains_point(Vec2::new(3.0, 3.0)));
        assert!(!rest.contains_point(Vec2::new(1.0, 1.0)));

        let nothing = engine.difference(&subject, &[&subject]).unwrap();
        assert!(nothing.area() < 1e-4);
    }
}
