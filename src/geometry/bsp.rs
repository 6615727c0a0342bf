// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! BSP tree used to clip one solid's polygons against another
//!
//! A tree is built fresh from one operand's polygons per boolean
//! operation, consumed during that operation, and discarded. The back
//! half-space of every partition plane is the inside of the solid, so
//! polygons that fall through to an empty back child are "inside" and
//! get dropped by clipping; polygons reaching an empty front child are
//! "outside" and survive.

use super::{Plane, Polygon};
use crate::error::KernelError;

#[derive(Debug, Clone)]
pub(crate) struct BspNode {
    plane: Option<Plane>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
    polygons: Vec<Polygon>,
}

impl BspNode {
    pub fn new(polygons: Vec<Polygon>, eps: f64) -> Result<Self, KernelError> {
        let mut node = Self::empty();
        node.build(polygons, eps)?;
        Ok(node)
    }

    fn empty() -> Self {
        Self {
            plane: None,
            front: None,
            back: None,
            polygons: Vec::new(),
        }
    }

    /// Insert polygons, partitioning by the first polygon's plane at each
    /// node. Spanning polygons are split; coplanar ones stay at this node.
    pub fn build(&mut self, polygons: Vec<Polygon>, eps: f64) -> Result<(), KernelError> {
        if polygons.is_empty() {
            return Ok(());
        }

        if self.plane.is_none() {
            self.plane = Some(polygons[0].plane);
        }
        let plane = match self.plane {
            Some(plane) => plane,
            None => return Ok(()),
        };

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for polygon in &polygons {
            plane.split_polygon(
                polygon,
                eps,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
            )?;
        }
        self.polygons.extend(coplanar_front);
        self.polygons.extend(coplanar_back);

        if !front.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BspNode::empty()))
                .build(front, eps)?;
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BspNode::empty()))
                .build(back, eps)?;
        }
        Ok(())
    }

    /// Flip the tree to represent the complement solid.
    pub fn invert(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Remove the parts of `polygons` inside the solid this tree encodes.
    /// Coplanar polygons follow their normal: aligned ones are treated as
    /// front (kept at an outside leaf), opposed ones as back.
    pub fn clip_polygons(
        &self,
        polygons: Vec<Polygon>,
        eps: f64,
    ) -> Result<Vec<Polygon>, KernelError> {
        let plane = match self.plane {
            Some(plane) => plane,
            None => return Ok(polygons),
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        for polygon in &polygons {
            plane.split_polygon(
                polygon,
                eps,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
            )?;
        }
        // Coplanar polygons follow their normal through the clip.
        front.append(&mut coplanar_front);
        back.append(&mut coplanar_back);

        let mut front = match &self.front {
            Some(node) => node.clip_polygons(front, eps)?,
            None => front,
        };
        let back = match &self.back {
            Some(node) => node.clip_polygons(back, eps)?,
            None => Vec::new(), // empty back child is solid interior
        };

        front.extend(back);
        Ok(front)
    }

    /// Clip every polygon stored in this tree against `other`.
    pub fn clip_to(&mut self, other: &BspNode, eps: f64) -> Result<(), KernelError> {
        let own = std::mem::take(&mut self.polygons);
        self.polygons = other.clip_polygons(own, eps)?;
        if let Some(front) = &mut self.front {
            front.clip_to(other, eps)?;
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other, eps)?;
        }
        Ok(())
    }

    /// Collect every polygon stored in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut polygons = self.polygons.clone();
        if let Some(front) = &self.front {
            polygons.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            polygons.extend(back.all_polygons());
        }
        polygons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Primitive, Vertex};
    use nalgebra::Vector3;

    const EPS: f64 = 1e-5;

    fn centered_cube() -> Vec<Polygon> {
        Primitive::cube(Vector3::new(2.0, 2.0, 2.0), true)
            .unwrap()
            .to_solid()
            .unwrap()
            .polygons
    }

    fn square_at_z(z: f64, half: f64) -> Polygon {
        Polygon::new(vec![
            Vertex::from_coords(-half, -half, z),
            Vertex::from_coords(half, -half, z),
            Vertex::from_coords(half, half, z),
            Vertex::from_coords(-half, half, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_keeps_all_polygons() {
        let tree = BspNode::new(centered_cube(), EPS).unwrap();
        assert_eq!(tree.all_polygons().len(), 6);
    }

    #[test]
    fn test_clip_drops_interior_polygons() {
        // Back of every partition plane is inside, so a patch buried in the
        // cube is consumed while one far outside passes through untouched.
        let tree = BspNode::new(centered_cube(), EPS).unwrap();

        let inside = tree
            .clip_polygons(vec![square_at_z(0.0, 0.5)], EPS)
            .unwrap();
        assert!(inside.is_empty());

        let outside = tree
            .clip_polygons(vec![square_at_z(5.0, 0.5)], EPS)
            .unwrap();
        assert_eq!(outside.len(), 1);
        assert_eq!(outside[0].vertices.len(), 4);
    }

    #[test]
    fn test_invert_swaps_interior() {
        let mut tree = BspNode::new(centered_cube(), EPS).unwrap();
        tree.invert();

        // The complement solid contains everything far away instead.
        let far = tree.clip_polygons(vec![square_at_z(5.0, 0.5)], EPS).unwrap();
        assert!(far.is_empty());

        let near = tree.clip_polygons(vec![square_at_z(0.0, 0.5)], EPS).unwrap();
        assert_eq!(near.len(), 1);
    }

    #[test]
    fn test_spanning_patch_is_split() {
        // A patch poking through one face comes back clipped to the
        // outside part only.
        let tree = BspNode::new(centered_cube(), EPS).unwrap();
        let patch = Polygon::new(vec![
            Vertex::from_coords(0.0, -0.5, 0.5),
            Vertex::from_coords(3.0, -0.5, 0.5),
            Vertex::from_coords(3.0, 0.5, 0.5),
            Vertex::from_coords(0.0, 0.5, 0.5),
        ])
        .unwrap();

        let kept = tree.clip_polygons(vec![patch], EPS).unwrap();
        assert_eq!(kept.len(), 1);
        for v in &kept[0].vertices {
            assert!(v.position.x >= 1.0 - EPS, "kept part must be outside");
        }
    }
}
