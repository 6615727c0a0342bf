// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Boundary vertex: a bare position, freely copied

use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};

/// A point on a solid's boundary. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Linear interpolation toward `other`; `t = 0` is `self`, `t = 1` is
    /// `other`. Used by the splitter to insert vertices on a cut plane.
    pub fn interpolate(&self, other: &Vertex, t: f64) -> Self {
        Self::new(self.position + (other.position - self.position) * t)
    }

    pub fn transform(&self, matrix: &Matrix4<f64>) -> Self {
        Self::new(matrix.transform_point(&self.position))
    }
}
