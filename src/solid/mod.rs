//! `Solid`: a boundary representation made of planar convex polygons, with
//! BSP-backed boolean operations.

use crate::errors::CsgError;
use crate::float_types::{
    Real,
    parry3d::bounding_volume::{Aabb, BoundingVolume},
};
use crate::solid::{bsp::Node, plane::Plane, polygon::Polygon, vertex::Vertex};
use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};
use std::{fmt::Debug, sync::OnceLock};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod vertex;

/// A closed, orientable boundary representation of a 3D object.
///
/// Invariant: outside of transient states inside a boolean operation, the
/// polygon set forms a closed 2-manifold with consistent outward winding.
/// Operations either preserve this or, for [`Solid::subtract`], refuse to
/// run on operands that violate it. A solid with zero faces is legal and
/// represents "nothing".
#[derive(Debug, Clone)]
pub struct Solid<S: Clone> {
    /// Boundary polygons.
    pub polygons: Vec<Polygon<S>>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,

    /// Opaque metadata (e.g. a material reference), cloned onto every
    /// solid this one produces.
    pub metadata: Option<S>,
}

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// Returns a new empty solid.
    pub fn new() -> Self {
        Solid {
            polygons: Vec::new(),
            bounding_box: OnceLock::new(),
            metadata: None,
        }
    }

    /// Build a solid from an existing polygon list.
    pub fn from_polygons(polygons: &[Polygon<S>], metadata: Option<S>) -> Self {
        Solid {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
            metadata,
        }
    }

    /// Number of boundary faces.
    pub fn face_count(&self) -> usize {
        self.polygons.len()
    }

    /// Helper to collect all vertices of the solid.
    #[cfg(not(feature = "parallel"))]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Parallel helper to collect all vertices of the solid.
    #[cfg(feature = "parallel")]
    pub fn vertices(&self) -> Vec<Vertex> {
        self.polygons
            .par_iter()
            .flat_map(|p| p.vertices.clone())
            .collect()
    }

    /// Triangulate each polygon, returning a solid containing only triangles.
    pub fn triangulate(&self) -> Solid<S> {
        let triangles: Vec<Polygon<S>> = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate()
                    .into_iter()
                    .map(move |tri| Polygon::new(tri.to_vec(), poly.metadata.clone()))
            })
            .collect();

        Solid::from_polygons(&triangles, self.metadata.clone())
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding-box tests,
    /// so faces that obviously cannot intersect the other operand skip the
    /// BSP clipping entirely.
    fn partition_polys(
        polys: &[Polygon<S>],
        other_bb: &Aabb,
    ) -> (Vec<Polygon<S>>, Vec<Polygon<S>>) {
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    /// Return a new solid representing the union of the two solids.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    pub fn union(&self, other: &Solid<S>) -> Solid<S> {
        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);

        Solid::from_polygons(&final_polys, self.metadata.clone())
    }

    /// Return a new solid representing the difference of the two solids.
    /// The cut surface contributed by `other` is orientation-flipped so it
    /// faces outward into the new cavity.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn difference(&self, other: &Solid<S>) -> Solid<S> {
        if self.polygons.is_empty() {
            return self.clone();
        }

        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _b_passthru) = Self::partition_polys(&other.polygons, &self.bounding_box());

        // No boundary of `other` comes near `self`, so the surfaces cannot
        // intersect: `other` either misses `self` entirely or swallows it
        // whole. Containment parity decides which.
        if b_clip.is_empty() {
            return if other.contains_point(&self.polygons[0].vertices[0].pos) {
                Solid::from_polygons(&[], self.metadata.clone())
            } else {
                self.clone()
            };
        }

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);

        Solid::from_polygons(&final_polys, self.metadata.clone())
    }

    /// Return a new solid representing the intersection of the two solids.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersection(&self, other: &Solid<S>) -> Solid<S> {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Solid::from_polygons(&a.all_polygons(), self.metadata.clone())
    }

    /// Subtract `cutter` from this solid, validating both operands first.
    ///
    /// # Errors
    /// [`CsgError::NonManifoldOperand`] if either operand is not a closed
    /// 2-manifold. The operation is not applied; callers keep their
    /// previous solid unchanged.
    ///
    /// A subtraction that fully consumes the target is legal and yields a
    /// solid with zero faces.
    pub fn subtract(&self, cutter: &Solid<S>) -> Result<Solid<S>, CsgError> {
        for (operand, solid) in [("target", self), ("cutter", cutter)] {
            let defective_edges = solid.edge_defects();
            if defective_edges != 0 {
                return Err(CsgError::NonManifoldOperand {
                    operand,
                    defective_edges,
                });
            }
        }
        Ok(self.difference(cutter))
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the solid.
    /// Normals are transformed with the inverse transpose.
    pub fn transform(&self, mat: &Matrix4<Real>) -> Solid<S> {
        let normal_mat = mat
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
            .transpose();
        let mut solid = self.clone();

        for poly in &mut solid.polygons {
            for vert in &mut poly.vertices {
                let homog_pos = mat * vert.pos.to_homogeneous();
                vert.pos = Point3::from_homogeneous(homog_pos).unwrap_or(vert.pos);
                vert.normal = normal_mat.transform_vector(&vert.normal).normalize();
            }

            // keep the cached plane consistent with the new vertex positions
            poly.plane = Plane::from_vertices(&poly.vertices);
            poly.bounding_box = OnceLock::new();
        }

        solid.bounding_box = OnceLock::new();
        solid
    }

    /// Returns a new solid translated by `x`, `y` and `z`.
    pub fn translate(&self, x: Real, y: Real, z: Real) -> Solid<S> {
        self.transform(&Translation3::new(x, y, z).to_homogeneous())
    }

    /// Returns a new solid rotated by `x_deg`, `y_deg`, `z_deg` degrees.
    pub fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Solid<S> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
        self.transform(&(rz * ry * rx).to_homogeneous())
    }

    /// Returns an [`Aabb`] spanning all polygons. An empty solid gets a
    /// trivial AABB at the origin.
    pub fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for poly in &self.polygons {
                for v in &poly.vertices {
                    mins.x = mins.x.min(v.pos.x);
                    mins.y = mins.y.min(v.pos.y);
                    mins.z = mins.z.min(v.pos.z);
                    maxs.x = maxs.x.max(v.pos.x);
                    maxs.y = maxs.y.max(v.pos.y);
                    maxs.z = maxs.z.max(v.pos.z);
                }
            }

            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Enclosed volume by the signed-tetrahedron method: for each triangle
    /// of the boundary, `v0 · (v1 × v2) / 6`, summed. Positive for outward
    /// winding; an empty solid has volume zero.
    pub fn volume(&self) -> Real {
        let mut six_volumes = 0.0;
        for poly in &self.polygons {
            for tri in poly.triangulate() {
                six_volumes += tri[0]
                    .pos
                    .coords
                    .dot(&tri[1].pos.coords.cross(&tri[2].pos.coords));
            }
        }
        six_volumes / 6.0
    }

    /// Invert this solid (flip inside vs. outside).
    pub fn inverse(&self) -> Solid<S> {
        let mut solid = self.clone();
        for p in &mut solid.polygons {
            p.flip();
        }
        solid
    }
}

impl<S: Clone + Send + Sync + Debug> Default for Solid<S> {
    fn default() -> Self {
        Self::new()
    }
}
