// src/math/utils.rs

/// Numerische Konstanten der Geometrie-Engine
pub mod constants {
    /// Schwelle für Determinanten paralleler/degenerierter Geraden.
    /// Nahezu parallele Eingaben liefern "kein Schnitt", auch wenn es exakt einen gäbe.
    pub const PARALLEL_EPSILON: f64 = 1e-10;

    /// Spielraum im Segment-Parameter, bevor ein Treffer als "näher als der Vertex" gilt.
    pub const OCCLUSION_T_EPSILON: f32 = 1e-4;

    /// Spielraum im Strahl-Parameter, mit dem die eigenen Kanten eines Vertex
    /// bei der Verlängerung übersprungen werden.
    pub const EXTENSION_T_EPSILON: f32 = 1e-4;

    /// Standard-Toleranz für das Vereinfachen geflachter Wand-Loops (Welteinheiten).
    pub const SIMPLIFY_TOLERANCE: f32 = 0.025;

    /// Unterhalb dieses quadrierten Abstands wird eine Verlängerung nur protokolliert.
    pub const NEAR_EXTENSION_DISTANCE_SQ: f32 = 0.1;
}

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use bevy::math::Vec2;

    /// Quadrierter Abstand, für Vergleiche ohne Wurzel
    pub fn distance_sq(p1: Vec2, p2: Vec2) -> f32 {
        (p2.x - p1.x).powi(2) + (p2.y - p1.y).powi(2)
    }

    /// 2D-Kreuzprodukt `a.x * b.y - a.y * b.x`
    pub fn cross(a: Vec2, b: Vec2) -> f32 {
        a.x * b.y - a.y * b.x
    }

    /// Abstand eines Punktes zur Geraden durch `a` und `b`
    pub fn point_line_distance(point: Vec2, a: Vec2, b: Vec2) -> f32 {
        let line = b - a;
        let length = line.length();
        if length == 0.0 {
            return point.distance(a);
        }
        cross(line, point - a).abs() / length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bevy::math::Vec2;

    #[test]
    fn test_distance_sq() {
        let d = simple_geometry::distance_sq(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0));
        assert_relative_eq!(d, 25.0);
    }

    #[test]
    fn test_point_line_distance() {
        let d = simple_geometry::point_line_distance(
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 0.0),
        );
        assert_relative_eq!(d, 3.0);

        // Degenerierte Linie fällt auf Punktabstand zurück
        let d = simple_geometry::point_line_distance(Vec2::new(3.0, 4.0), Vec2::ZERO, Vec2::ZERO);
        assert_relative_eq!(d, 5.0);
    }
}
