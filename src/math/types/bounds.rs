// src/math/types/bounds.rs

use crate::math::types::*;

/// Achse, entlang derer die BVH eine Segmentmenge teilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// 2D Bounding Box (Axis-Aligned Bounding Box)
///
/// Eine leere Box wird durch `min = +inf`, `max = -inf` dargestellt, damit
/// `union`/`expand_*` ohne Sonderfall mit ihr starten können. Jede aus Punkten
/// gebaute Box erfüllt `min <= max` komponentenweise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2D,
    pub max: Point2D,
}

impl Bounds2D {
    /// Erstellt eine Bounding Box aus zwei beliebigen Punkten
    pub fn from_points(p1: Point2D, p2: Point2D) -> Self {
        Self {
            min: Point2D::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            max: Point2D::new(p1.x.max(p2.x), p1.y.max(p2.y)),
        }
    }

    /// Erstellt eine Bounding Box die alle Punkte umschließt
    pub fn from_points_iter<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point2D>,
    {
        let mut points_iter = points.into_iter();
        let first_point = points_iter.next()?;

        let mut bounds = Self {
            min: first_point,
            max: first_point,
        };
        for point in points_iter {
            bounds.expand_to_include_point(point);
        }

        Some(bounds)
    }

    /// Leere Bounding Box (Sentinel vor dem ersten Merge)
    pub fn empty() -> Self {
        Self {
            min: Point2D::new(f32::INFINITY, f32::INFINITY),
            max: Point2D::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Prüft ob die Bounding Box leer ist
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Breite der Bounding Box
    pub fn width(&self) -> f32 {
        (self.max.x - self.min.x).max(0.0)
    }

    /// Höhe der Bounding Box
    pub fn height(&self) -> f32 {
        (self.max.y - self.min.y).max(0.0)
    }

    /// Die längere Seite; bei Gleichstand X
    pub fn longest_axis(&self) -> Axis {
        if self.width() >= self.height() {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// Vereinigt zwei Bounding Boxes
    pub fn union(&self, other: &Bounds2D) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Erweitert die Bounding Box um einen Punkt
    pub fn expand_to_include_point(&mut self, point: Point2D) {
        if self.is_empty() {
            self.min = point;
            self.max = point;
        } else {
            self.min = self.min.min(point);
            self.max = self.max.max(point);
        }
    }

    /// Erweitert die Bounding Box um einen Margin
    pub fn expand(&self, margin: f32) -> Self {
        if self.is_empty() {
            return *self;
        }

        Self {
            min: Point2D::new(self.min.x - margin, self.min.y - margin),
            max: Point2D::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Erzeugt die vier Eckpunkte der Bounding Box.
    /// Die Reihenfolge hat positive Fläche (gegen den Uhrzeigersinn bei y nach oben).
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.min,
            Point2D::new(self.max.x, self.min.y),
            self.max,
            Point2D::new(self.min.x, self.max.y),
        ]
    }
}

impl Default for Bounds2D {
    fn default() -> Self {
        Self::empty()
    }
}
