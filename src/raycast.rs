//! Ray casting against a [`Solid`], used to resolve pointer clicks to
//! surface hits.

use crate::float_types::{
    EPSILON, Real,
    parry3d::{query::RayCast, shape::Triangle},
};
use crate::solid::Solid;
use nalgebra::{Isometry3, Point3, Vector3};
use std::fmt::Debug;

pub use crate::float_types::parry3d::query::Ray;

/// The nearest surface intersection of a ray with a solid.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceHit {
    /// Index of the struck face in the solid's polygon enumeration order.
    pub face: usize,
    /// Ray parameter of the hit; strictly positive.
    pub distance: Real,
    /// World-space intersection point.
    pub point: Point3<Real>,
    /// The struck face's plane normal (not the interpolated shading normal).
    pub normal: Vector3<Real>,
}

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// Casts `ray` against every face and returns the nearest hit with a
    /// strictly positive distance, or `None` if the ray misses the solid
    /// entirely or all intersections lie behind the origin.
    ///
    /// Deterministic tie-break: faces are tested in enumeration order and a
    /// candidate only replaces the current best when its distance is
    /// *strictly* smaller, so when two coplanar faces intersect the ray at
    /// exactly the same distance, the first face in the polygon list wins.
    pub fn cast_ray(&self, ray: &Ray) -> Option<SurfaceHit> {
        let iso = Isometry3::identity();
        let mut best: Option<SurfaceHit> = None;

        for (face, poly) in self.polygons.iter().enumerate() {
            for tri in poly.triangulate() {
                let triangle = Triangle::new(tri[0].pos, tri[1].pos, tri[2].pos);

                let Some(hit) = triangle.cast_ray_and_get_normal(&iso, ray, Real::MAX, true)
                else {
                    continue;
                };
                let distance = hit.time_of_impact;
                if distance <= 0.0 {
                    continue;
                }
                if best.as_ref().is_none_or(|b| distance < b.distance) {
                    best = Some(SurfaceHit {
                        face,
                        distance,
                        point: ray.point_at(distance),
                        normal: poly.plane.normal(),
                    });
                }
            }
        }
        best
    }

    /// All positive-distance intersections of `origin + t * direction` with
    /// the boundary, sorted ascending and deduplicated within [`EPSILON`]
    /// (a ray grazing a shared edge would otherwise count twice).
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);
        let iso = Isometry3::identity();
        let mut hits = Vec::new();

        for poly in &self.polygons {
            for tri in poly.triangulate() {
                let triangle = Triangle::new(tri[0].pos, tri[1].pos, tri[2].pos);
                if let Some(hit) = triangle.cast_ray_and_get_normal(&iso, &ray, Real::MAX, true)
                {
                    if hit.time_of_impact > 0.0 {
                        hits.push((ray.point_at(hit.time_of_impact), hit.time_of_impact));
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < EPSILON);
        hits
    }

    /// Point-in-solid test by ray-crossing parity.
    pub fn contains_point(&self, point: &Point3<Real>) -> bool {
        self.ray_intersections(point, &Vector3::new(1.0, 1.0, 1.0))
            .len()
            % 2
            == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_nearest_face_of_board() {
        let board: Solid<()> = Solid::board(2.0, 10.0, 0.5, None);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));

        let hit = board.cast_ray(&ray).expect("ray aimed at the board");
        assert!((hit.distance - 4.75).abs() < 1e-9);
        assert!((hit.point.z - 0.25).abs() < 1e-9);
        assert!((hit.normal - Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn ray_behind_origin_misses() {
        let board: Solid<()> = Solid::board(2.0, 10.0, 0.5, None);
        // Pointing away from the board: every intersection is at t <= 0.
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(board.cast_ray(&ray).is_none());
    }
}
