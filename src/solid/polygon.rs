//! Planar convex polygons, the faces a [`Solid`](crate::solid::Solid) is bounded by.

use crate::float_types::{Real, parry3d::bounding_volume::Aabb};
use crate::solid::plane::Plane;
use crate::solid::vertex::Vertex;
use nalgebra::Point3;
use std::sync::OnceLock;

/// A planar convex polygon with at least three vertices, wound
/// counter-clockwise as seen from outside the solid it bounds.
///
/// `metadata` is carried through every boolean operation untouched; the
/// drilling pipeline uses it to hand a material reference through cuts
/// without ever inspecting it.
#[derive(Debug, Clone)]
pub struct Polygon<S: Clone> {
    /// Vertices in winding order.
    pub vertices: Vec<Vertex>,

    /// The supporting plane, cached so BSP classification does not
    /// recompute it per test.
    pub plane: Plane,

    /// Lazily calculated AABB spanning `vertices`.
    pub bounding_box: OnceLock<Aabb>,

    /// Opaque per-face metadata.
    pub metadata: Option<S>,
}

impl<S: Clone + PartialEq> PartialEq for Polygon<S> {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.metadata == other.metadata
    }
}

impl<S: Clone> Polygon<S> {
    /// Build a polygon from vertices, deriving the supporting plane.
    ///
    /// # Panics
    /// If fewer than three vertices are given.
    pub fn new(vertices: Vec<Vertex>, metadata: Option<S>) -> Self {
        assert!(vertices.len() >= 3, "degenerate polygon: fewer than 3 vertices");
        let plane = Plane::from_vertices(&vertices);
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Build a polygon that keeps an already-known plane. Used when
    /// splitting: recomputing the plane from split vertices would drift
    /// numerically, the halves must stay on the parent's plane.
    pub fn with_plane(vertices: Vec<Vertex>, plane: Plane, metadata: Option<S>) -> Self {
        assert!(vertices.len() >= 3, "degenerate polygon: fewer than 3 vertices");
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Reverse winding and flip all normals, turning the face inside out.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Fan-triangulate the polygon.
    ///
    /// Valid because every face is convex, and BSP splitting of a convex
    /// polygon only ever produces convex parts.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let mut triangles = Vec::with_capacity(self.vertices.len().saturating_sub(2));
        for i in 1..self.vertices.len() - 1 {
            triangles.push([
                self.vertices[0].clone(),
                self.vertices[i].clone(),
                self.vertices[i + 1].clone(),
            ]);
        }
        triangles
    }

    /// Recompute the supporting plane from the current vertex positions and
    /// assign its normal to every vertex.
    pub fn set_new_normal(&mut self) {
        self.plane = Plane::from_vertices(&self.vertices);
        let normal = self.plane.normal();
        for v in &mut self.vertices {
            v.normal = normal;
        }
    }

    /// Returns the axis-aligned bounding box of this polygon's vertices.
    pub fn bounding_box(&self) -> &Aabb {
        self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
            for v in &self.vertices {
                mins.x = mins.x.min(v.pos.x);
                mins.y = mins.y.min(v.pos.y);
                mins.z = mins.z.min(v.pos.z);
                maxs.x = maxs.x.max(v.pos.x);
                maxs.y = maxs.y.max(v.pos.y);
                maxs.z = maxs.z.max(v.pos.z);
            }
            Aabb::new(mins, maxs)
        })
    }
}
