//! [BSP](https://en.wikipedia.org/wiki/Binary_space_partitioning) tree node structure and operations.
//!
//! The boolean operations on [`Solid`](crate::solid::Solid) are sequences of
//! the clip/invert primitives defined here, in the classic csg.js order.

use crate::float_types::Real;
use crate::solid::plane::{BACK, COPLANAR, FRONT, Plane};
use crate::solid::polygon::Polygon;

/// A BSP tree node, containing polygons plus optional front/back subtrees.
#[derive(Debug, Clone)]
pub struct Node<S: Clone> {
    /// Splitting plane for this node, `None` for an empty leaf.
    pub plane: Option<Plane>,

    /// Subtree in the plane's front half-space.
    pub front: Option<Box<Node<S>>>,

    /// Subtree in the plane's back half-space.
    pub back: Option<Box<Node<S>>>,

    /// Polygons lying exactly on `plane` (after the node has been built).
    pub polygons: Vec<Polygon<S>>,
}

impl<S: Clone> Node<S> {
    /// Create a new empty BSP node.
    pub const fn new() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Build a BSP tree from a polygon list.
    pub fn from_polygons(polygons: &[Polygon<S>]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Convert solid space to empty space and vice versa: flip every
    /// polygon and plane, and swap front/back subtrees throughout.
    pub fn invert(&mut self) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons.iter_mut().for_each(|p| p.flip());
            if let Some(ref mut plane) = node.plane {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);

            if let Some(ref mut front) = node.front {
                stack.push(front);
            }
            if let Some(ref mut back) = node.back {
                stack.push(back);
            }
        }
    }

    /// Choose a splitting plane among a sample of candidate face planes,
    /// scoring each by how many polygons it would split and how evenly it
    /// balances the rest.
    fn pick_splitting_plane(polygons: &[Polygon<S>]) -> Plane {
        const K_SPANS: Real = 8.0; // weight for split polygons
        const K_BALANCE: Real = 1.0; // weight for front/back imbalance
        const SAMPLE: usize = 20;

        let mut best_plane = polygons[0].plane.clone();
        let mut best_score = Real::MAX;

        for candidate in polygons.iter().take(polygons.len().min(SAMPLE)) {
            let plane = &candidate.plane;
            let mut num_front: i32 = 0;
            let mut num_back: i32 = 0;
            let mut num_spanning: i32 = 0;

            for poly in polygons {
                match plane.classify_polygon(poly) {
                    COPLANAR => {},
                    FRONT => num_front += 1,
                    BACK => num_back += 1,
                    _ => num_spanning += 1,
                }
            }

            let score = K_SPANS * num_spanning as Real
                + K_BALANCE * ((num_front - num_back) as Real).abs();
            if score < best_score {
                best_score = score;
                best_plane = plane.clone();
            }
        }
        best_plane
    }

    /// Remove from `polygons` every part that lies inside this tree's
    /// solid volume, returning the surviving (possibly split) parts.
    ///
    /// Iterative traversal; the polygon batches walking down a deep tree
    /// would overflow the call stack recursively.
    pub fn clip_polygons(&self, polygons: &[Polygon<S>]) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            let Some(plane) = node.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_parts = Vec::with_capacity(polys.len());
            let mut back_parts = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front, mut back) =
                    plane.split_polygon(polygon);

                // Coplanar polygons follow the half-space their normal
                // points into.
                front_parts.extend(coplanar_front);
                back_parts.extend(coplanar_back);
                front_parts.append(&mut front);
                back_parts.append(&mut back);
            }

            match &node.front {
                Some(front_node) if !front_parts.is_empty() => {
                    stack.push((front_node, front_parts));
                },
                Some(_) => {},
                // No front subtree: front space is outside, parts survive.
                None => result.extend(front_parts),
            }

            // No back subtree means back space is solid: parts are dropped.
            if let Some(back_node) = &node.back {
                if !back_parts.is_empty() {
                    stack.push((back_node, back_parts));
                }
            }
        }
        result
    }

    /// Remove every polygon in this tree that is inside `bsp`'s solid.
    pub fn clip_to(&mut self, bsp: &Node<S>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.polygons = bsp.clip_polygons(&node.polygons);
            if let Some(front) = node.front.as_mut() {
                stack.push(front);
            }
            if let Some(back) = node.back.as_mut() {
                stack.push(back);
            }
        }
    }

    /// Collect all polygons stored anywhere in this tree.
    pub fn all_polygons(&self) -> Vec<Polygon<S>> {
        let mut result = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            result.extend_from_slice(&node.polygons);
            stack.extend(
                [&node.front, &node.back]
                    .iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }

    /// Insert `polygons` into the tree, extending it with new nodes where
    /// the polygons reach space no existing plane partitions.
    pub fn build(&mut self, polygons: &[Polygon<S>]) {
        if polygons.is_empty() {
            return;
        }

        let mut stack = vec![(self, polygons.to_vec())];

        while let Some((node, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            if node.plane.is_none() {
                node.plane = Some(Self::pick_splitting_plane(&polys));
            }
            let plane = node.plane.as_ref().expect("plane chosen above");

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, mut front_parts, mut back_parts) =
                    plane.split_polygon(polygon);

                node.polygons.extend(coplanar_front);
                node.polygons.extend(coplanar_back);
                front.append(&mut front_parts);
                back.append(&mut back_parts);
            }

            if !front.is_empty() {
                let front_node = node.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node, front));
            }
            if !back.is_empty() {
                let back_node = node.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node, back));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::vertex::Vertex;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn build_and_collect_round_trip() {
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(1.0, 0.0, 0.0), Vector3::z()),
            Vertex::new(Point3::new(0.5, 1.0, 0.0), Vector3::z()),
        ];
        let polygon: Polygon<()> = Polygon::new(vertices, None);

        let node = Node::from_polygons(std::slice::from_ref(&polygon));
        assert_eq!(node.all_polygons().len(), 1);
    }

    #[test]
    fn clipping_against_own_tree_keeps_boundary() {
        let board: crate::solid::Solid<()> = crate::solid::Solid::board(2.0, 2.0, 1.0, None);
        let node = Node::from_polygons(&board.polygons);

        // Boundary polygons are on the tree's planes, not inside it.
        let kept = node.clip_polygons(&board.polygons);
        assert!(!kept.is_empty());
    }
}
