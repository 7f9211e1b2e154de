//! Closed-2-manifold validation by edge counting.

use crate::float_types::{EPSILON, Real};
use crate::solid::Solid;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::Debug;

// Coordinates are quantized before hashing so vertices that boolean
// operations produced independently but at the same location count as one.
const QUANTIZATION_FACTOR: Real = 1e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct QuantizedPoint(i64, i64, i64);

fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
    QuantizedPoint(
        (p.x * QUANTIZATION_FACTOR).round() as i64,
        (p.y * QUANTIZATION_FACTOR).round() as i64,
        (p.z * QUANTIZATION_FACTOR).round() as i64,
    )
}

impl<S: Clone + Debug + Send + Sync> Solid<S> {
    /// Number of boundary segments that are not shared by exactly two faces.
    ///
    /// Counts over the triangulated surface with undirected, quantized
    /// segment keys. Plane clipping leaves T-junctions: a face the clipper
    /// never touched borders several shorter collinear edges of a split
    /// neighbor. Every edge is therefore subdivided at the mesh vertices
    /// lying on its interior before counting, so both sides of such a
    /// border contribute the same segments. Zero for a closed surface; an
    /// empty solid has no edges and therefore no defects.
    pub fn edge_defects(&self) -> usize {
        let mut vertex_reps: HashMap<QuantizedPoint, Point3<Real>> = HashMap::new();
        let mut edges: Vec<(Point3<Real>, Point3<Real>)> = Vec::new();

        for poly in &self.polygons {
            for tri in poly.triangulate() {
                for &(i0, i1) in &[(0, 1), (1, 2), (2, 0)] {
                    let a = tri[i0].pos;
                    let b = tri[i1].pos;
                    vertex_reps.entry(quantize_point(&a)).or_insert(a);
                    vertex_reps.entry(quantize_point(&b)).or_insert(b);
                    edges.push((a, b));
                }
            }
        }

        let candidates: Vec<Point3<Real>> = vertex_reps.into_values().collect();
        let mut segment_counts: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();

        for (a, b) in &edges {
            let qa = quantize_point(a);
            let qb = quantize_point(b);
            if qa == qb {
                continue;
            }

            let dir = b - a;
            let len_sq = dir.norm_squared();
            let mut stops: Vec<(Real, QuantizedPoint)> = vec![(0.0, qa), (1.0, qb)];

            for p in &candidates {
                // cheap reject before the projection
                if p.x < a.x.min(b.x) - EPSILON
                    || p.x > a.x.max(b.x) + EPSILON
                    || p.y < a.y.min(b.y) - EPSILON
                    || p.y > a.y.max(b.y) + EPSILON
                    || p.z < a.z.min(b.z) - EPSILON
                    || p.z > a.z.max(b.z) + EPSILON
                {
                    continue;
                }

                let t = (p - a).dot(&dir) / len_sq;
                if t <= 0.0 || t >= 1.0 {
                    continue;
                }
                let offset = (p - a) - dir * t;
                if offset.norm_squared() >= EPSILON * EPSILON {
                    continue;
                }
                let q = quantize_point(p);
                if q != qa && q != qb {
                    stops.push((t, q));
                }
            }

            stops.sort_by(|x, y| x.0.partial_cmp(&y.0).unwrap_or(std::cmp::Ordering::Equal));
            stops.dedup_by(|x, y| x.1 == y.1);

            for pair in stops.windows(2) {
                let (p0, p1) = (pair[0].1, pair[1].1);
                let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
                *segment_counts.entry(key).or_insert(0) += 1;
            }
        }

        segment_counts.values().filter(|&&count| count != 2).count()
    }

    /// Checks that this solid's surface is closed: every boundary segment
    /// borders exactly two faces.
    pub fn is_manifold(&self) -> bool {
        self.edge_defects() == 0
    }
}
