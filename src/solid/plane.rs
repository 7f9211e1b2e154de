//! Planes in 3D space, and polygon splitting against them.

use crate::float_types::{EPSILON, Real};
use crate::solid::polygon::Polygon;
use crate::solid::vertex::Vertex;
use nalgebra::{Point3, Vector3};

// Polygon/point classification relative to a plane. `SPANNING` is the
// bitwise OR of `FRONT` and `BACK`, so per-vertex results can be folded
// into a whole-polygon classification with `|`.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in normal-offset form: points `p` on the plane satisfy
/// `normal · p = w`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal vector of the plane
    pub normal: Vector3<Real>,
    /// Distance from origin along normal
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and offset.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        Plane {
            normal: normal.normalize(),
            w,
        }
    }

    /// Create a plane from three points, normal following the right-hand
    /// rule: `(b - a) × (c - a)`.
    pub fn from_points(a: Point3<Real>, b: Point3<Real>, c: Point3<Real>) -> Self {
        let normal = (b - a).cross(&(c - a));
        if normal.norm_squared() < EPSILON * EPSILON {
            // Degenerate triangle
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }
        let normal = normal.normalize();
        Plane {
            normal,
            w: normal.dot(&a.coords),
        }
    }

    /// Derive the supporting plane of a polygon's vertex loop using
    /// Newell's method, which tolerates slight non-planarity and does not
    /// depend on which three vertices are picked.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let mut normal = Vector3::zeros();
        for i in 0..n {
            let current = vertices[i].pos;
            let next = vertices[(i + 1) % n].pos;
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }

        if normal.norm_squared() < EPSILON * EPSILON {
            // Collinear or coincident vertices
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let normal = normal.normalize();
        Plane {
            normal,
            w: normal.dot(&vertices[0].pos.coords),
        }
    }

    /// The unit normal of the plane.
    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    /// The offset (distance from origin along the normal).
    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane in place.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Classify a point as [`FRONT`], [`BACK`] or [`COPLANAR`].
    ///
    /// A point within [`EPSILON`] of the plane is coplanar; this is the
    /// tie-break that keeps near-coplanar vertices from being split.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let distance = self.normal.dot(&point.coords) - self.w;
        if distance > EPSILON {
            FRONT
        } else if distance < -EPSILON {
            BACK
        } else {
            COPLANAR
        }
    }

    /// Classify a whole polygon: the OR-fold of its vertex classifications,
    /// so a polygon with vertices on both sides comes back [`SPANNING`].
    pub fn classify_polygon<S: Clone>(&self, polygon: &Polygon<S>) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Split `polygon` by this plane into four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Coplanar polygons are grouped by whether their normal agrees with
    /// this plane's normal. A spanning polygon is cut along the
    /// intersection segment; each edge that crosses the plane contributes
    /// one interpolated vertex to both halves, so the halves share the cut
    /// edge exactly and no crack opens. Splitting a convex polygon with a
    /// plane yields convex parts, so the convexity invariant is preserved.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon<S: Clone>(
        &self,
        polygon: &Polygon<S>,
    ) -> (
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
        Vec<Polygon<S>>,
    ) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let mut front_verts: Vec<Vertex> = Vec::with_capacity(polygon.vertices.len() + 1);
                let mut back_verts: Vec<Vertex> = Vec::with_capacity(polygon.vertices.len() + 1);

                for i in 0..polygon.vertices.len() {
                    let j = (i + 1) % polygon.vertices.len();
                    let type_i = types[i];
                    let type_j = types[j];
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        front_verts.push(vertex_i.clone());
                    }
                    if type_i != FRONT {
                        back_verts.push(vertex_i.clone());
                    }

                    // Edge crosses the plane: interpolate the crossing point
                    // and hand it to both halves.
                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t);
                            front_verts.push(crossing.clone());
                            back_verts.push(crossing);
                        }
                    }
                }

                if front_verts.len() >= 3 {
                    front.push(Polygon::with_plane(
                        front_verts,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
                if back_verts.len() >= 3 {
                    back.push(Polygon::with_plane(
                        back_verts,
                        polygon.plane.clone(),
                        polygon.metadata.clone(),
                    ));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
