// src/math/types/segment.rs

use super::{Bounds2D, Point2D};

/// Lage eines Punktes relativ zu einer gerichteten Geraden.
///
/// Bildschirmkonvention (y nach unten): ein positives Kreuzprodukt
/// `cross(richtung, punkt - ursprung)` liegt rechts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    OnLine,
}

/// Gerichtete Wandkante von `start` nach `end`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2D,
    pub end: Point2D,
}

impl Segment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn midpoint(&self) -> Point2D {
        (self.start + self.end) * 0.5
    }

    /// Segment mit Länge Null
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn bounds(&self) -> Bounds2D {
        Bounds2D::from_points(self.start, self.end)
    }
}

/// Halbgerade `origin + t * direction` mit `t >= 0`; `direction` muss nicht normiert sein.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point2D,
    pub direction: Point2D,
}

impl Ray {
    pub fn new(origin: Point2D, direction: Point2D) -> Self {
        Self { origin, direction }
    }

    /// Strahl von `origin` durch `target`; `target` liegt bei `t = 1`.
    pub fn through(origin: Point2D, target: Point2D) -> Self {
        Self::new(origin, target - origin)
    }

    pub fn point_at(&self, t: f32) -> Point2D {
        self.origin + self.direction * t
    }
}
