// src/math/geometry/intersection.rs

//! Schnitt-Prädikate für Strahlen, Segmente und Bounding Boxes.
//!
//! Alle Determinanten werden in f64 gerechnet und gegen
//! [`constants::PARALLEL_EPSILON`] geprüft; alle anderen Vergleiche sind exakt.

use crate::math::types::*;
use crate::math::utils::{constants, simple_geometry};

/// Parameter eines Schnitts: `t` entlang des Strahls bzw. ersten Segments,
/// `u` entlang des getroffenen Segments (0 = start, 1 = end).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionParams {
    pub t: f32,
    pub u: f32,
}

/// Quadrierter euklidischer Abstand
pub fn distance_squared(a: Point2D, b: Point2D) -> f32 {
    simple_geometry::distance_sq(a, b)
}

/// Vorzeichen von `cross(line_direction, point - line_point)`.
/// Exakt Null ist `OnLine`, ohne Toleranz.
pub fn side_of_line(point: Point2D, line_point: Point2D, line_direction: Point2D) -> Side {
    let cross = simple_geometry::cross(line_direction, point - line_point);
    if cross > 0.0 {
        Side::Right
    } else if cross < 0.0 {
        Side::Left
    } else {
        Side::OnLine
    }
}

/// Löst `origin + t * direction = a + u * (b - a)`.
/// `None` bei (nahezu) parallelen Geraden.
fn solve_line_system(
    origin: Point2D,
    direction: Point2D,
    a: Point2D,
    b: Point2D,
) -> Option<IntersectionParams> {
    let (dx, dy) = (direction.x as f64, direction.y as f64);
    let (ex, ey) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let (wx, wy) = ((a.x - origin.x) as f64, (a.y - origin.y) as f64);

    let denominator = dx * ey - dy * ex;
    if denominator.abs() < constants::PARALLEL_EPSILON {
        return None;
    }

    let t = (wx * ey - wy * ex) / denominator;
    let u = (wx * dy - wy * dx) / denominator;
    Some(IntersectionParams {
        t: t as f32,
        u: u as f32,
    })
}

/// Schnittparameter Strahl/Segment mit `t >= 0` und `u` in `[0, 1]`
pub fn ray_segment_params(
    origin: Point2D,
    direction: Point2D,
    a: Point2D,
    b: Point2D,
) -> Option<IntersectionParams> {
    let params = solve_line_system(origin, direction, a, b)?;
    if params.t < 0.0 || params.u < 0.0 || params.u > 1.0 {
        return None;
    }
    Some(params)
}

/// Schnittpunkt eines Strahls mit dem Segment `a`-`b`
pub fn ray_segment_intersect(
    origin: Point2D,
    direction: Point2D,
    a: Point2D,
    b: Point2D,
) -> Option<Point2D> {
    ray_segment_params(origin, direction, a, b).map(|p| origin + direction * p.t)
}

/// Schnittparameter zweier Segmente, beide Parameter in `[0, 1]`
pub fn segment_segment_params(
    p1: Point2D,
    p2: Point2D,
    q1: Point2D,
    q2: Point2D,
) -> Option<IntersectionParams> {
    let params = solve_line_system(p1, p2 - p1, q1, q2)?;
    if params.t < 0.0 || params.t > 1.0 || params.u < 0.0 || params.u > 1.0 {
        return None;
    }
    Some(params)
}

/// Schnittpunkt der Segmente `p1`-`p2` und `q1`-`q2`
pub fn segment_segment_intersect(
    p1: Point2D,
    p2: Point2D,
    q1: Point2D,
    q2: Point2D,
) -> Option<Point2D> {
    segment_segment_params(p1, p2, q1, q2).map(|p| p1 + (p2 - p1) * p.t)
}

/// Slab-Test. Liefert `(t_min, t_max)` des überlappenden Strahlabschnitts.
/// Berührung am Rand zählt als Schnitt; `None` wenn die Box ganz hinter dem Ursprung liegt.
pub fn ray_aabb_intersect(ray: &Ray, aabb: &Bounds2D) -> Option<(f32, f32)> {
    if aabb.is_empty() {
        return None;
    }

    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;

    for (origin, direction, min, max) in [
        (ray.origin.x, ray.direction.x, aabb.min.x, aabb.max.x),
        (ray.origin.y, ray.direction.y, aabb.min.y, aabb.max.y),
    ] {
        if direction == 0.0 {
            if origin < min || origin > max {
                return None;
            }
            continue;
        }

        let t1 = (min - origin) / direction;
        let t2 = (max - origin) / direction;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));
    }

    if t_max < t_min || t_max < 0.0 {
        return None;
    }
    Some((t_min, t_max))
}

/// Liang-Barsky Clipping des Segments `a`-`b` an den vier Halbebenen der Box
pub fn segment_aabb_intersect(a: Point2D, b: Point2D, aabb: &Bounds2D) -> bool {
    if aabb.is_empty() {
        return false;
    }

    let d = b - a;
    let checks = [
        (-d.x, a.x - aabb.min.x),
        (d.x, aabb.max.x - a.x),
        (-d.y, a.y - aabb.min.y),
        (d.y, aabb.max.y - a.y),
    ];

    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;
    for (p, q) in checks {
        if p == 0.0 {
            // Parallel zur Kante: komplett außerhalb?
            if q < 0.0 {
                return false;
            }
            continue;
        }

        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }

    true
}
