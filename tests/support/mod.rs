//! Test support library
//! Helper functions shared by the integration tests.

use drillpress::{
    float_types::Real,
    solid::{polygon::Polygon, vertex::Vertex},
};
use nalgebra::{Point3, Vector3};

/// Returns the bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
#[allow(dead_code)]
pub fn bounding_box(polygons: &[Polygon<()>]) -> [Real; 6] {
    let mut bounds = [
        Real::MAX,
        Real::MAX,
        Real::MAX,
        -Real::MAX,
        -Real::MAX,
        -Real::MAX,
    ];
    for poly in polygons {
        for v in &poly.vertices {
            bounds[0] = bounds[0].min(v.pos.x);
            bounds[1] = bounds[1].min(v.pos.y);
            bounds[2] = bounds[2].min(v.pos.z);
            bounds[3] = bounds[3].max(v.pos.x);
            bounds[4] = bounds[4].max(v.pos.y);
            bounds[5] = bounds[5].max(v.pos.z);
        }
    }
    bounds
}

/// Build a polygon from raw positions; `Polygon::new` derives the plane.
#[allow(dead_code)]
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon<()> {
    Polygon::new(
        points
            .iter()
            .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
            .collect(),
        None,
    )
}
