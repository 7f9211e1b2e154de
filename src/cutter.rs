//! Placement and construction of the cylindrical cutter solid.

use crate::float_types::{EPSILON, Real};
use crate::raycast::SurfaceHit;
use crate::solid::Solid;
use log::debug;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

/// Cutter length as a multiple of the target's largest extent. Generous so
/// a cut is always a through-cut, never a blind pocket left by a
/// floating-point shortfall.
pub const LENGTH_FACTOR: Real = 10.0;

/// Number of side quads approximating the cylinder wall.
pub const SEGMENTS: usize = 32;

/// How the cutter axis is chosen for a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrientationPolicy {
    /// Axis fixed to the board's local drill axis (its thickness axis):
    /// every hole bores straight through regardless of view angle.
    #[default]
    Directed,
    /// Axis aligned from the hit point toward the camera, recomputed per
    /// click from the camera position at click time.
    CameraFacing,
}

/// Resolve the cutter axis for a hit under the given policy.
///
/// Pure function of its inputs. In camera-facing mode with the camera
/// coincident with the hit point, the direction degenerates; the face
/// normal at the hit is used instead. That is a recoverable fallback, not
/// an error.
pub fn cutter_axis(
    policy: OrientationPolicy,
    hit: &SurfaceHit,
    camera_position: &Point3<Real>,
    drill_axis: &Vector3<Real>,
) -> Vector3<Real> {
    match policy {
        OrientationPolicy::Directed => drill_axis.normalize(),
        OrientationPolicy::CameraFacing => {
            let toward_camera = camera_position - hit.point;
            if toward_camera.norm_squared() < EPSILON * EPSILON {
                debug!("camera coincident with hit point; falling back to face normal");
                hit.normal.normalize()
            } else {
                toward_camera.normalize()
            }
        },
    }
}

/// Build a cylindrical cutter centered on `hit.point` along `axis`.
///
/// `length` must exceed the target solid's extent along the axis for the
/// cut to go all the way through; the controller passes
/// [`LENGTH_FACTOR`] × the target's largest bounding-box extent.
pub fn build_cutter<S: Clone + Send + Sync + Debug>(
    hit: &SurfaceHit,
    axis: &Vector3<Real>,
    diameter: Real,
    length: Real,
    metadata: Option<S>,
) -> Solid<S> {
    let half = axis * (length * 0.5);
    Solid::cylinder_ptp(
        hit.point - half,
        hit.point + half,
        diameter * 0.5,
        SEGMENTS,
        metadata,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit_at(point: Point3<Real>, normal: Vector3<Real>) -> SurfaceHit {
        SurfaceHit {
            face: 0,
            distance: 1.0,
            point,
            normal,
        }
    }

    #[test]
    fn directed_axis_ignores_camera() {
        let hit = hit_at(Point3::new(0.3, -2.0, 0.25), Vector3::z());
        let axis = cutter_axis(
            OrientationPolicy::Directed,
            &hit,
            &Point3::new(100.0, 50.0, 3.0),
            &Vector3::z(),
        );
        assert!((axis - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn camera_facing_axis_points_at_camera() {
        let hit = hit_at(Point3::origin(), Vector3::z());
        let axis = cutter_axis(
            OrientationPolicy::CameraFacing,
            &hit,
            &Point3::new(0.0, 0.0, 15.0),
            &Vector3::x(),
        );
        assert!((axis - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn coincident_camera_falls_back_to_face_normal() {
        let hit = hit_at(Point3::new(1.0, 2.0, 3.0), Vector3::y());
        let axis = cutter_axis(
            OrientationPolicy::CameraFacing,
            &hit,
            &Point3::new(1.0, 2.0, 3.0),
            &Vector3::x(),
        );
        assert!((axis - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn cutter_spans_hit_point_symmetrically() {
        let hit = hit_at(Point3::new(0.0, 0.0, 0.25), Vector3::z());
        let cutter: Solid<()> = build_cutter(&hit, &Vector3::z(), 0.2, 5.0, None);

        let bb = cutter.bounding_box();
        assert!((bb.mins.z - (0.25 - 2.5)).abs() < 1e-9);
        assert!((bb.maxs.z - (0.25 + 2.5)).abs() < 1e-9);
        assert!(cutter.is_manifold());
    }
}
