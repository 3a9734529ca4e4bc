// src/math/geometry/polygon/core.rs

use crate::math::types::*;

/// Orientierung im mathematischen Sinn (y nach oben).
/// In Bildschirmkoordinaten (y nach unten) erscheint `CounterClockwise` im Uhrzeigersinn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
    Collinear,
}

/// Trait für Eigenschaften eines geschlossenen Punkt-Loops
pub trait PolygonProperties {
    /// Vorzeichenbehaftete Fläche (Shoelace); positiv bei `CounterClockwise`
    fn signed_area(&self) -> f32;

    /// Betrag der Fläche
    fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Prüft ob ein Punkt innerhalb liegt (Ray-Casting, even-odd)
    fn contains_point(&self, point: Point2D) -> bool;

    /// Prüft die Orientierung (im Uhrzeigersinn oder gegen)
    fn orientation(&self) -> Orientation;

    /// Alle Kanten inklusive der schließenden Kante
    fn edges(&self) -> Vec<Segment>;

    /// Bounding Box; `None` für leere Loops
    fn bounds(&self) -> Option<Bounds2D>;
}

impl PolygonProperties for [Point2D] {
    fn signed_area(&self) -> f32 {
        let n = self.len();
        if n < 3 {
            return 0.0;
        }

        let mut area = 0.0f64;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self[i].x as f64 * self[j].y as f64;
            area -= self[j].x as f64 * self[i].y as f64;
        }

        (area * 0.5) as f32
    }

    fn contains_point(&self, point: Point2D) -> bool {
        let n = self.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self[i];
            let vj = self[j];

            if ((vi.y > point.y) != (vj.y > point.y))
                && (point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    fn orientation(&self) -> Orientation {
        let area = self.signed_area();
        if area == 0.0 {
            Orientation::Collinear
        } else if area > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    fn edges(&self) -> Vec<Segment> {
        let n = self.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .map(|i| Segment::new(self[i], self[(i + 1) % n]))
            .collect()
    }

    fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points_iter(self.iter().copied())
    }
}

/// Entfernt einen expliziten Schlusspunkt (`first == last`)
pub fn open_ring(mut path: Path) -> Path {
    if path.len() > 1 && path.first() == path.last() {
        path.pop();
    }
    path
}

/// Dreht den Loop um, falls er nicht die gewünschte Orientierung hat.
/// Kollineare Loops bleiben unverändert.
pub fn ensure_orientation(path: &mut Path, wanted: Orientation) {
    let current = path.orientation();
    if current != Orientation::Collinear && wanted != Orientation::Collinear && current != wanted
    {
        path.reverse();
    }
}
