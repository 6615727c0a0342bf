// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Solid: a closed polygon boundary, the kernel's public value type

use super::{BoundingBox, Polygon};
use crate::error::KernelError;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// An unordered collection of polygons forming the closed boundary of a
/// solid. Value type: operations consume or borrow solids and return new
/// ones; no solid holds references into another.
///
/// Insertion order is kept for determinism but carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Solid {
    pub polygons: Vec<Polygon>,
}

impl Solid {
    pub fn empty() -> Self {
        Self {
            polygons: Vec::new(),
        }
    }

    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.vertices.len()).sum()
    }

    /// Turn the solid inside out by reversing every winding.
    pub fn flip(&mut self) {
        for polygon in &mut self.polygons {
            polygon.flip();
        }
    }

    /// Apply an affine transform, mapping every vertex and recomputing
    /// every supporting plane from the transformed loop. A singular matrix
    /// cannot preserve a solid and is rejected; a negative determinant
    /// (mirror) reverses each loop so windings stay outward.
    pub fn transform(&self, matrix: &Matrix4<f64>) -> Result<Solid, KernelError> {
        let det = matrix.determinant();
        if det.abs() < 1e-12 {
            return Err(KernelError::InvalidParameter {
                target: "transform",
                reason: "singular matrix (zero determinant)".into(),
            });
        }
        let reverse = det < 0.0;
        let polygons = self
            .polygons
            .iter()
            .map(|p| p.transform(matrix, reverse))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Solid::from_polygons(polygons))
    }

    /// Rigid translation. Infallible: it cannot degenerate geometry.
    pub fn translate(&self, offset: Vector3<f64>) -> Solid {
        let matrix = Matrix4::new_translation(&offset);
        let polygons = self
            .polygons
            .iter()
            .map(|p| {
                let vertices = p.vertices.iter().map(|v| v.transform(&matrix)).collect();
                let mut plane = p.plane;
                plane.w += plane.normal.dot(&offset);
                Polygon { vertices, plane }
            })
            .collect();
        Solid::from_polygons(polygons)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_polygons(&self.polygons)
    }

    /// Enclosed volume by the divergence theorem over fan-triangulated
    /// polygons. Outward winding gives a positive value; the sign flips
    /// for an inside-out solid.
    pub fn volume(&self) -> f64 {
        let mut six_v = 0.0;
        for polygon in &self.polygons {
            let p0 = polygon.vertices[0].position.coords;
            for i in 1..polygon.vertices.len() - 1 {
                let p1 = polygon.vertices[i].position.coords;
                let p2 = polygon.vertices[i + 1].position.coords;
                six_v += p0.dot(&p1.cross(&p2));
            }
        }
        six_v / 6.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use approx::assert_relative_eq;

    fn unit_cube() -> Solid {
        Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false)
            .unwrap()
            .to_solid()
            .unwrap()
    }

    #[test]
    fn test_unit_cube_volume() {
        assert_relative_eq!(unit_cube().volume(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_translate_shifts_bbox_and_planes() {
        let moved = unit_cube().translate(Vector3::new(10.0, 0.0, -5.0));
        let bbox = moved.bounding_box();
        assert_relative_eq!(bbox.min.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.x, 11.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.min.z, -5.0, epsilon = 1e-12);

        // Every vertex still lies on its polygon's plane.
        for polygon in moved.polygons() {
            for v in &polygon.vertices {
                assert!(polygon.plane.signed_distance(&v.position).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_singular_transform_rejected() {
        let mut m = Matrix4::identity();
        m[(0, 0)] = 0.0;
        let result = unit_cube().transform(&m);
        assert!(matches!(
            result,
            Err(KernelError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_mirror_keeps_outward_winding() {
        let mut m = Matrix4::identity();
        m[(0, 0)] = -1.0;
        let mirrored = unit_cube().transform(&m).unwrap();
        assert_relative_eq!(mirrored.volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transform_round_trip() {
        let cube = unit_cube();
        let m = nalgebra::Rotation3::from_euler_angles(0.3, -0.7, 1.1)
            .to_homogeneous()
            .append_translation(&Vector3::new(4.0, -2.0, 9.0));
        let inverse = m.try_inverse().unwrap();
        let round_trip = cube.transform(&m).unwrap().transform(&inverse).unwrap();

        assert_relative_eq!(round_trip.volume(), cube.volume(), epsilon = 1e-9);
        assert!(round_trip
            .bounding_box()
            .approx_eq(&cube.bounding_box(), 1e-9));
    }

    #[test]
    fn test_flip_negates_volume() {
        let mut cube = unit_cube();
        cube.flip();
        assert_relative_eq!(cube.volume(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_bounding_box_of_empty_solid() {
        let bbox = Solid::empty().bounding_box();
        assert!(bbox.min.x > bbox.max.x);
    }
}
