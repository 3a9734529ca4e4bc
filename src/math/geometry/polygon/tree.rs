// src/math/geometry/polygon/tree.rs

use super::core::PolygonProperties;
use crate::math::types::*;

/// Knoten eines Polygonbaums: Außenrand oder Loch, mit verschachtelten Kindern.
/// Kinder eines Außenrands sind Löcher, Kinder eines Lochs sind Inseln.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonNode {
    pub polygon: Path,
    pub is_hole: bool,
    pub children: Vec<PolygonNode>,
}

impl PolygonNode {
    pub fn new(polygon: Path, is_hole: bool) -> Self {
        Self {
            polygon,
            is_hole,
            children: Vec::new(),
        }
    }
}

/// Ergebnis einer booleschen Operation.
///
/// Die Wurzel selbst trägt kein Polygon; ihre direkten Kinder sind
/// Außenränder (Tiefe 0), deren Kinder Löcher (Tiefe 1) usw.
/// Gerade Tiefe ist gefüllt, ungerade Tiefe ist ein Loch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonTree {
    pub children: Vec<PolygonNode>,
}

impl PolygonTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Anzahl aller Knoten unterhalb der Wurzel
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Maximale Verschachtelungstiefe; 0 für einen leeren Baum
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&PolygonNode, usize)> =
            self.children.iter().map(|node| (node, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        max_depth
    }

    /// Pre-Order Traversierung (Eltern vor Kindern) über einen expliziten Stack
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Alle Polygone als flache Loop-Liste, in Pre-Order.
    /// Die Verschachtelung geht verloren; nur die Orientierung bleibt erhalten.
    pub fn flatten(&self) -> Paths {
        self.iter().map(|node| node.polygon.clone()).collect()
    }

    /// Die Außenränder der obersten Ebene ohne ihre Löcher
    pub fn outer_hulls(&self) -> Paths {
        self.children
            .iter()
            .map(|node| node.polygon.clone())
            .collect()
    }

    /// Gesamte gefüllte Fläche (Außenränder minus Löcher, rekursiv)
    pub fn area(&self) -> f32 {
        self.iter()
            .map(|node| {
                if node.is_hole {
                    -node.polygon.area()
                } else {
                    node.polygon.area()
                }
            })
            .sum()
    }

    /// Punkt liegt in einer gefüllten Region (gerade Tiefe)
    pub fn contains_point(&self, point: Point2D) -> bool {
        let mut level = &self.children;
        let mut inside = false;
        while let Some(node) = level.iter().find(|node| node.polygon.contains_point(point)) {
            inside = !node.is_hole;
            level = &node.children;
        }
        inside
    }

    /// Fügt einen Außenrand mit seinen Löchern an der richtigen Stelle ein.
    /// Liegt `anchor` in einem Loch eines vorhandenen Knotens, wird der Knoten dort zur Insel.
    /// Größere Polygone müssen zuerst eingefügt werden.
    pub fn insert_solid(&mut self, node: PolygonNode, anchor: Point2D) {
        let mut level = &mut self.children;
        loop {
            let found = level.iter().enumerate().find_map(|(i, solid)| {
                if !solid.polygon.contains_point(anchor) {
                    return None;
                }
                solid
                    .children
                    .iter()
                    .position(|hole| hole.polygon.contains_point(anchor))
                    .map(|h| (i, h))
            });

            match found {
                Some((i, h)) => level = &mut level[i].children[h].children,
                None => {
                    level.push(node);
                    return;
                }
            }
        }
    }
}

/// Iterator für [`PolygonTree::iter`]
pub struct PreOrder<'a> {
    stack: Vec<&'a PolygonNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a PolygonNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
