// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Planar polygon loops, the atomic surface unit of a solid

use super::{Plane, Vertex};
use crate::error::KernelError;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// An ordered loop of three or more coplanar vertices plus its supporting
/// plane. Insertion order defines the winding; in a valid solid every
/// polygon winds counter-clockwise when seen from outside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Build a polygon from its vertex loop. The supporting plane comes
    /// from Newell's method over the whole loop, which stays stable when
    /// the leading vertices are nearly collinear (high-resolution caps).
    pub fn new(vertices: Vec<Vertex>) -> Result<Self, KernelError> {
        if vertices.len() < 3 {
            return Err(KernelError::DegenerateInput(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        let plane = newell_plane(&vertices)?;
        Ok(Self { vertices, plane })
    }

    /// Piece produced by a plane split. Keeps the parent polygon's plane;
    /// recomputing it from a thin fragment would only lose precision.
    pub(crate) fn from_split(vertices: Vec<Vertex>, plane: Plane) -> Result<Self, KernelError> {
        if vertices.len() < 3 || distinct_corners(&vertices) < 3 {
            return Err(KernelError::DegenerateInput(
                "split produced a polygon with fewer than 3 distinct vertices".into(),
            ));
        }
        Ok(Self { vertices, plane })
    }

    /// Reverse the winding so the opposite side becomes outward.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    /// Map every vertex through `matrix` and recompute the supporting
    /// plane from the transformed loop. `reverse` restores outward winding
    /// under an orientation-reversing (negative determinant) transform.
    pub fn transform(&self, matrix: &Matrix4<f64>, reverse: bool) -> Result<Self, KernelError> {
        let mut vertices: Vec<Vertex> = self.vertices.iter().map(|v| v.transform(matrix)).collect();
        if reverse {
            vertices.reverse();
        }
        Self::new(vertices)
    }
}

/// Newell's method: sum the projected edge contributions of the loop.
fn newell_plane(vertices: &[Vertex]) -> Result<Plane, KernelError> {
    let mut normal: Vector3<f64> = Vector3::zeros();
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i].position;
        let b = vertices[(i + 1) % n].position;
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    let len = normal.norm();
    if len < 1e-12 {
        return Err(KernelError::DegenerateInput(
            "polygon has no area".into(),
        ));
    }
    let normal = normal / len;
    let w = vertices
        .iter()
        .map(|v| normal.dot(&v.position.coords))
        .sum::<f64>()
        / n as f64;
    Ok(Plane::new(normal, w))
}

/// Count loop corners that differ from their predecessor, exactly.
fn distinct_corners(vertices: &[Vertex]) -> usize {
    let n = vertices.len();
    (0..n)
        .filter(|&i| vertices[i].position != vertices[(i + n - 1) % n].position)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_newell_plane_of_square() {
        let poly = Polygon::new(vec![
            Vertex::from_coords(0.0, 0.0, 3.0),
            Vertex::from_coords(1.0, 0.0, 3.0),
            Vertex::from_coords(1.0, 1.0, 3.0),
            Vertex::from_coords(0.0, 1.0, 3.0),
        ])
        .unwrap();
        assert_relative_eq!(poly.plane.normal.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(poly.plane.w, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flip_reverses_winding() {
        let mut poly = Polygon::new(vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.0, 1.0, 0.0),
        ])
        .unwrap();
        let first = poly.vertices[0];
        poly.flip();
        assert_relative_eq!(poly.plane.normal.z, -1.0, epsilon = 1e-12);
        assert_eq!(poly.vertices[2], first);
    }

    #[test]
    fn test_too_few_vertices() {
        let result = Polygon::new(vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
        ]);
        assert!(matches!(result, Err(KernelError::DegenerateInput(_))));
    }

    #[test]
    fn test_zero_area_loop() {
        let result = Polygon::new(vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(2.0, 0.0, 0.0),
        ]);
        assert!(matches!(result, Err(KernelError::DegenerateInput(_))));
    }

    #[test]
    fn test_split_piece_with_duplicate_corners_fails() {
        let plane = Plane::new(Vector3::new(0.0, 0.0, 1.0), 0.0);
        let v = Vertex::from_coords(1.0, 0.0, 0.0);
        let result = Polygon::from_split(vec![v, v, Vertex::from_coords(0.0, 1.0, 0.0)], plane);
        assert!(matches!(result, Err(KernelError::DegenerateInput(_))));
    }

    #[test]
    fn test_transform_recomputes_plane() {
        let poly = Polygon::new(vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 1.0, 0.0),
            Vertex::from_coords(0.0, 1.0, 0.0),
        ])
        .unwrap();

        // Rotate 90 degrees about x: the +z normal must become -y, and the
        // offset must be recomputed, not reused.
        let m = nalgebra::Rotation3::from_euler_angles(std::f64::consts::FRAC_PI_2, 0.0, 0.0)
            .to_homogeneous();
        let rotated = poly.transform(&m, false).unwrap();
        assert_relative_eq!(rotated.plane.normal.y, -1.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.plane.w, 0.0, epsilon = 1e-9);
    }
}
