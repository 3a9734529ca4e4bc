// src/math/geometry/occluder.rs

use super::intersection::{ray_segment_params, segment_segment_params};
use crate::math::types::*;

/// Nächster Treffer einer Strahl- oder Segmentabfrage.
/// `t` ist der Parameter entlang der Abfrage, `segment_index` der Index im Speicher des Occluders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub point: Point2D,
    pub segment: Segment,
    pub segment_index: usize,
    pub t: f32,
}

impl SegmentHit {
    /// Strikt kleineres `t` gewinnt; bei Gleichstand der kleinere Index.
    pub(crate) fn is_closer_than(&self, other: &Option<SegmentHit>) -> bool {
        match other {
            None => true,
            Some(best) => {
                self.t < best.t || (self.t == best.t && self.segment_index < best.segment_index)
            }
        }
    }
}

/// Alles, was Sichtlinien gegen Wandkanten prüfen kann
pub trait Occluder {
    /// Nächster Treffer von `origin + t * direction` mit `t >= min_t`.
    fn nearest_ray_hit(&self, origin: Point2D, direction: Point2D, min_t: f32)
    -> Option<SegmentHit>;

    /// Nächster Treffer des Segments `start`-`end`; `t` in `[0, 1]`.
    fn nearest_segment_hit(&self, start: Point2D, end: Point2D) -> Option<SegmentHit>;
}

/// Lineare Suche über eine Kantenliste
#[derive(Debug, Clone, Copy)]
pub struct BruteForceOccluder<'a> {
    segments: &'a [Segment],
}

impl<'a> BruteForceOccluder<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &'a [Segment] {
        self.segments
    }
}

impl Occluder for BruteForceOccluder<'_> {
    fn nearest_ray_hit(
        &self,
        origin: Point2D,
        direction: Point2D,
        min_t: f32,
    ) -> Option<SegmentHit> {
        let mut best: Option<SegmentHit> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            let Some(params) = ray_segment_params(origin, direction, segment.start, segment.end)
            else {
                continue;
            };
            if params.t < min_t {
                continue;
            }
            let hit = SegmentHit {
                point: origin + direction * params.t,
                segment: *segment,
                segment_index: index,
                t: params.t,
            };
            if hit.is_closer_than(&best) {
                best = Some(hit);
            }
        }
        best
    }

    fn nearest_segment_hit(&self, start: Point2D, end: Point2D) -> Option<SegmentHit> {
        let mut best: Option<SegmentHit> = None;
        for (index, segment) in self.segments.iter().enumerate() {
            let Some(params) = segment_segment_params(start, end, segment.start, segment.end)
            else {
                continue;
            };
            let hit = SegmentHit {
                point: start + (end - start) * params.t,
                segment: *segment,
                segment_index: index,
                t: params.t,
            };
            if hit.is_closer_than(&best) {
                best = Some(hit);
            }
        }
        best
    }
}
