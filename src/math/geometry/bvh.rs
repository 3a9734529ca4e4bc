// src/math/geometry/bvh.rs

//! Bounding Volume Hierarchy über Wandsegmente.
//!
//! Einmal gebaut, danach unveränderlich. Jede Änderung der Wände erfordert
//! einen kompletten Neubau über [`SegmentBvh::build`].

use super::intersection::{
    ray_aabb_intersect, ray_segment_params, segment_aabb_intersect, segment_segment_params,
};
use super::occluder::{Occluder, SegmentHit};
use super::polygon::PolygonProperties;
use crate::math::types::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BvhNodeKind {
    /// Halboffener Bereich `[start, end)` im Segmentspeicher
    Leaf { start: usize, end: usize },
    Internal { left: usize, right: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    /// Umschließt alle Segmente des Teilbaums
    pub bounds: Bounds2D,
    pub kind: BvhNodeKind,
}

/// Binärer Baum über einem flachen Segment-Array.
/// Beim Bau werden die Segmente umsortiert; `SegmentHit::segment_index`
/// bezieht sich auf [`SegmentBvh::segments`].
#[derive(Debug, Clone, Default)]
pub struct SegmentBvh {
    segments: Vec<Segment>,
    nodes: Vec<BvhNode>,
    root: Option<usize>,
}

impl SegmentBvh {
    /// Baut den Baum. Leere Eingabe ergibt einen Baum ohne Knoten.
    pub fn build(segments: Vec<Segment>) -> Self {
        let mut bvh = Self {
            nodes: Vec::with_capacity(segments.len().saturating_mul(2)),
            segments,
            root: None,
        };
        if !bvh.segments.is_empty() {
            let len = bvh.segments.len();
            bvh.root = Some(bvh.build_range(0, len));
        }
        bvh
    }

    /// Baut aus den Kanten geschlossener Loops
    pub fn from_loops(loops: &[Path]) -> Self {
        let segments = loops
            .iter()
            .flat_map(|path| path.edges())
            .filter(|segment| !segment.is_degenerate())
            .collect();
        Self::build(segments)
    }

    fn range_bounds(&self, start: usize, end: usize) -> Bounds2D {
        self.segments[start..end]
            .iter()
            .fold(Bounds2D::empty(), |bounds, segment| bounds.union(&segment.bounds()))
    }

    /// Gibt den Index des erzeugten Knotens zurück
    fn build_range(&mut self, start: usize, end: usize) -> usize {
        let bounds = self.range_bounds(start, end);

        if end - start <= 1 {
            self.nodes.push(BvhNode {
                bounds,
                kind: BvhNodeKind::Leaf { start, end },
            });
            return self.nodes.len() - 1;
        }

        let range = &mut self.segments[start..end];
        match bounds.longest_axis() {
            Axis::X => range.sort_by(|a, b| a.midpoint().x.total_cmp(&b.midpoint().x)),
            Axis::Y => range.sort_by(|a, b| a.midpoint().y.total_cmp(&b.midpoint().y)),
        }

        // Balancierte Teilung nach Anzahl, nicht nach räumlichem Median
        let mid = start + (end - start) / 2;
        let left = self.build_range(start, mid);
        let right = self.build_range(mid, end);

        self.nodes.push(BvhNode {
            bounds,
            kind: BvhNodeKind::Internal { left, right },
        });
        self.nodes.len() - 1
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    pub fn root(&self) -> Option<&BvhNode> {
        self.root.map(|index| &self.nodes[index])
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Bounding Box aller Segmente (leer, wenn keine)
    pub fn bounds(&self) -> Bounds2D {
        self.root().map(|node| node.bounds).unwrap_or_default()
    }

    /// Tiefe des Baums; ein einzelnes Blatt hat Tiefe 1
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut max_depth = 0;
        let mut stack = vec![(root, 1)];
        while let Some((index, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let BvhNodeKind::Internal { left, right } = self.nodes[index].kind {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Nächster Treffer des Strahls (`t >= 0`) samt getroffenem Segment
    pub fn ray_intersect(&self, ray: &Ray) -> Option<(Point2D, Segment)> {
        self.nearest_ray_hit(ray.origin, ray.direction, 0.0)
            .map(|hit| (hit.point, hit.segment))
    }

    /// Nächster Schnitt des Segments mit einer Wandkante
    pub fn segment_intersect(&self, segment: &Segment) -> Option<(Point2D, Segment)> {
        self.nearest_segment_hit(segment.start, segment.end)
            .map(|hit| (hit.point, hit.segment))
    }

    fn visit_ray(&self, index: usize, ray: &Ray, min_t: f32, best: &mut Option<SegmentHit>) {
        let node = &self.nodes[index];
        let Some((t_enter, t_exit)) = ray_aabb_intersect(ray, &node.bounds) else {
            return;
        };
        if t_exit < min_t {
            return;
        }
        if let Some(current) = best {
            if t_enter > current.t {
                return;
            }
        }

        match node.kind {
            BvhNodeKind::Leaf { start, end } => {
                for segment_index in start..end {
                    let segment = self.segments[segment_index];
                    let Some(params) =
                        ray_segment_params(ray.origin, ray.direction, segment.start, segment.end)
                    else {
                        continue;
                    };
                    if params.t < min_t {
                        continue;
                    }
                    let hit = SegmentHit {
                        point: ray.point_at(params.t),
                        segment,
                        segment_index,
                        t: params.t,
                    };
                    if hit.is_closer_than(best) {
                        *best = Some(hit);
                    }
                }
            }
            BvhNodeKind::Internal { left, right } => {
                self.visit_ray(left, ray, min_t, best);
                self.visit_ray(right, ray, min_t, best);
            }
        }
    }

    fn visit_segment(
        &self,
        index: usize,
        start: Point2D,
        end: Point2D,
        best: &mut Option<SegmentHit>,
    ) {
        let node = &self.nodes[index];
        if !segment_aabb_intersect(start, end, &node.bounds) {
            return;
        }
        if let Some(current) = best {
            let as_ray = Ray::through(start, end);
            match ray_aabb_intersect(&as_ray, &node.bounds) {
                Some((t_enter, _)) if t_enter <= current.t => {}
                _ => return,
            }
        }

        match node.kind {
            BvhNodeKind::Leaf {
                start: first,
                end: last,
            } => {
                for segment_index in first..last {
                    let segment = self.segments[segment_index];
                    let Some(params) =
                        segment_segment_params(start, end, segment.start, segment.end)
                    else {
                        continue;
                    };
                    let hit = SegmentHit {
                        point: start + (end - start) * params.t,
                        segment,
                        segment_index,
                        t: params.t,
                    };
                    if hit.is_closer_than(best) {
                        *best = Some(hit);
                    }
                }
            }
            BvhNodeKind::Internal { left, right } => {
                self.visit_segment(left, start, end, best);
                self.visit_segment(right, start, end, best);
            }
        }
    }
}

impl Occluder for SegmentBvh {
    fn nearest_ray_hit(
        &self,
        origin: Point2D,
        direction: Point2D,
        min_t: f32,
    ) -> Option<SegmentHit> {
        let root = self.root?;
        let ray = Ray::new(origin, direction);
        let mut best = None;
        self.visit_ray(root, &ray, min_t, &mut best);
        best
    }

    fn nearest_segment_hit(&self, start: Point2D, end: Point2D) -> Option<SegmentHit> {
        let root = self.root?;
        let mut best = None;
        self.visit_segment(root, start, end, &mut best);
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::geometry::occluder::BruteForceOccluder;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_point(rng: &mut StdRng) -> Vec2 {
        Vec2::new(
            rng.random_range(-50.0f32..50.0),
            rng.random_range(-50.0f32..50.0),
        )
    }

    fn random_segments(rng: &mut StdRng, count: usize) -> Vec<Segment> {
        (0..count)
            .map(|_| {
                let start = random_point(rng);
                let offset = Vec2::new(
                    rng.random_range(-8.0f32..8.0),
                    rng.random_range(-8.0f32..8.0),
                );
                Segment::new(start, start + offset)
            })
            .collect()
    }

    #[test]
    fn test_empty_bvh() {
        let bvh = SegmentBvh::build(Vec::new());
        assert!(bvh.is_empty());
        assert!(bvh.nodes().is_empty());
        assert_eq!(bvh.depth(), 0);
        assert!(bvh.bounds().is_empty());
        assert!(bvh.ray_intersect(&Ray::new(Vec2::ZERO, Vec2::X)).is_none());
        assert!(
            bvh.segment_intersect(&Segment::new(Vec2::ZERO, Vec2::X))
                .is_none()
        );
    }

    #[test]
    fn test_single_segment_ray() {
        let wall = Segment::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 10.0));
        let bvh = SegmentBvh::build(vec![wall]);
        assert_eq!(bvh.nodes().len(), 1);

        let (point, segment) = bvh
            .ray_intersect(&Ray::new(Vec2::new(-5.0, 5.0), Vec2::new(1.0, 0.0)))
            .unwrap();
        assert_relative_eq!(point.x, 0.0);
        assert_relative_eq!(point.y, 5.0);
        assert_eq!(segment, wall);
    }

    #[test]
    fn test_nodes_bound_their_segments() {
        let mut rng = StdRng::seed_from_u64(11);
        let bvh = SegmentBvh::build(random_segments(&mut rng, 64));

        fn collect(bvh: &SegmentBvh, index: usize, out: &mut Vec<Segment>) {
            match bvh.nodes()[index].kind {
                BvhNodeKind::Leaf { start, end } => {
                    out.extend_from_slice(&bvh.segments()[start..end])
                }
                BvhNodeKind::Internal { left, right } => {
                    collect(bvh, left, out);
                    collect(bvh, right, out);
                }
            }
        }

        for (index, node) in bvh.nodes().iter().enumerate() {
            assert!(node.bounds.min.x <= node.bounds.max.x);
            assert!(node.bounds.min.y <= node.bounds.max.y);
            let mut segments = Vec::new();
            collect(&bvh, index, &mut segments);
            let tight = Bounds2D::from_points_iter(
                segments.iter().flat_map(|s| [s.start, s.end]),
            )
            .unwrap();
            assert_eq!(node.bounds, tight);
        }
    }

    #[test]
    fn test_balanced_depth() {
        let mut rng = StdRng::seed_from_u64(3);
        let bvh = SegmentBvh::build(random_segments(&mut rng, 1000));
        // 1000 Blätter, balanciert nach Anzahl: ceil(log2(1000)) + 1
        assert_eq!(bvh.depth(), 11);
        assert_eq!(bvh.nodes().len(), 1999);
    }

    #[test]
    fn test_ray_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let bvh = SegmentBvh::build(random_segments(&mut rng, 200));
        let brute = BruteForceOccluder::new(bvh.segments());

        for _ in 0..500 {
            let origin = random_point(&mut rng);
            let direction = Vec2::from_angle(rng.random_range(0.0f32..std::f32::consts::TAU));
            let expected = brute.nearest_ray_hit(origin, direction, 0.0);
            let actual = bvh.nearest_ray_hit(origin, direction, 0.0);
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_segment_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(1337);
        let bvh = SegmentBvh::build(random_segments(&mut rng, 200));
        let brute = BruteForceOccluder::new(bvh.segments());

        for _ in 0..500 {
            let start = random_point(&mut rng);
            let end = random_point(&mut rng);
            let expected = brute.nearest_segment_hit(start, end);
            let actual = bvh.nearest_segment_hit(start, end);
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_from_loops_skips_closing_duplicate() {
        let square = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(0.0, 0.0),
        ];
        let bvh = SegmentBvh::from_loops(&[square]);
        assert_eq!(bvh.len(), 4);
    }
}
