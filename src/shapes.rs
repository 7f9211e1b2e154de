//! Parametric constructors for the solids the drilling pipeline works with:
//! the rectangular board being drilled and the cylindrical cutter.

use crate::float_types::{EPSILON, Real, TAU};
use crate::solid::Solid;
use crate::solid::polygon::Polygon;
use crate::solid::vertex::Vertex;
use nalgebra::{Point3, Vector3};
use std::fmt::Debug;

impl<S: Clone + Send + Sync + Debug> Solid<S> {
    /// A rectangular board centered at the origin: `width` along X,
    /// `length` along Y, `thickness` along Z. Six quads, outward normals,
    /// counter-clockwise winding viewed from outside.
    pub fn board(width: Real, length: Real, thickness: Real, metadata: Option<S>) -> Solid<S> {
        let (hw, hl, ht) = (width * 0.5, length * 0.5, thickness * 0.5);

        let face = |normal: Vector3<Real>, corners: [[Real; 3]; 4]| {
            Polygon::new(
                corners
                    .iter()
                    .map(|&[x, y, z]| Vertex::new(Point3::new(x, y, z), normal))
                    .collect(),
                metadata.clone(),
            )
        };

        let polygons = vec![
            // bottom (z = -ht)
            face(
                -Vector3::z(),
                [
                    [-hw, -hl, -ht],
                    [-hw, hl, -ht],
                    [hw, hl, -ht],
                    [hw, -hl, -ht],
                ],
            ),
            // top (z = +ht)
            face(
                Vector3::z(),
                [[-hw, -hl, ht], [hw, -hl, ht], [hw, hl, ht], [-hw, hl, ht]],
            ),
            // front (y = -hl)
            face(
                -Vector3::y(),
                [
                    [-hw, -hl, -ht],
                    [hw, -hl, -ht],
                    [hw, -hl, ht],
                    [-hw, -hl, ht],
                ],
            ),
            // back (y = +hl)
            face(
                Vector3::y(),
                [[-hw, hl, -ht], [-hw, hl, ht], [hw, hl, ht], [hw, hl, -ht]],
            ),
            // left (x = -hw)
            face(
                -Vector3::x(),
                [
                    [-hw, -hl, -ht],
                    [-hw, -hl, ht],
                    [-hw, hl, ht],
                    [-hw, hl, -ht],
                ],
            ),
            // right (x = +hw)
            face(
                Vector3::x(),
                [[hw, -hl, -ht], [hw, hl, -ht], [hw, hl, ht], [hw, -hl, ht]],
            ),
        ];

        Solid::from_polygons(&polygons, metadata)
    }

    /// A cylinder between `start` and `end` with the given radius,
    /// approximated by `segments` side quads plus triangle-fan caps.
    /// Returns an empty solid when the axis is degenerate (`start` ≈ `end`)
    /// or `segments < 3`.
    pub fn cylinder_ptp(
        start: Point3<Real>,
        end: Point3<Real>,
        radius: Real,
        segments: usize,
        metadata: Option<S>,
    ) -> Solid<S> {
        let axis = end - start;
        if axis.norm_squared() < EPSILON * EPSILON || segments < 3 || radius < EPSILON {
            return Solid::new();
        }
        let axis_z = axis.normalize();

        // Build a frame around the axis from whichever world axis is least
        // aligned with it.
        let axis_x = if axis_z.y.abs() > 0.5 {
            Vector3::x()
        } else {
            Vector3::y()
        }
        .cross(&axis_z)
        .normalize();
        let axis_y = axis_x.cross(&axis_z).normalize();

        let bottom_center = Vertex::new(start, -axis_z);
        let top_center = Vertex::new(end, axis_z);

        // stack: 0.0 bottom ring, 1.0 top ring. normal_blend lets cap-ring
        // vertices take the cap normal instead of the radial one.
        let point = |stack: Real, slice: Real, normal_blend: Real| {
            let angle = slice * TAU;
            let radial = axis_x * angle.cos() + axis_y * angle.sin();
            let pos = start + axis * stack + radial * radius;
            let normal = radial * (1.0 - normal_blend.abs()) + axis_z * normal_blend;
            Vertex::new(pos, normal.normalize())
        };

        let mut polygons = Vec::with_capacity(segments * 3);
        for i in 0..segments {
            let slice0 = i as Real / segments as Real;
            let slice1 = (i + 1) as Real / segments as Real;

            // bottom cap fan
            polygons.push(Polygon::new(
                vec![
                    bottom_center.clone(),
                    point(0.0, slice0, -1.0),
                    point(0.0, slice1, -1.0),
                ],
                metadata.clone(),
            ));
            // top cap fan
            polygons.push(Polygon::new(
                vec![
                    top_center.clone(),
                    point(1.0, slice1, 1.0),
                    point(1.0, slice0, 1.0),
                ],
                metadata.clone(),
            ));
            // side wall quad
            polygons.push(Polygon::new(
                vec![
                    point(0.0, slice1, 0.0),
                    point(0.0, slice0, 0.0),
                    point(1.0, slice0, 0.0),
                    point(1.0, slice1, 0.0),
                ],
                metadata.clone(),
            ));
        }

        Solid::from_polygons(&polygons, metadata)
    }
}
