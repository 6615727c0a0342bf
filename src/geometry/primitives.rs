// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Parametric primitive generators

use super::{Polygon, Solid, Vertex};
use crate::error::KernelError;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Angular resolution used when a model leaves `fn` unspecified.
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Parametric shape descriptions. Constructors validate their parameters;
/// generation itself is pure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Sphere { r: f64, segments: u32 },
    Cylinder { h: f64, d: f64, segments: u32 },
}

impl Primitive {
    /// Axis-aligned cube spanning `[0, size]` per axis, or centered on the
    /// origin when `center` is set.
    pub fn cube(size: Vector3<f64>, center: bool) -> Result<Self, KernelError> {
        let p = Self::Cube { size, center };
        p.validate()?;
        Ok(p)
    }

    /// Sphere of radius `r` centered on the origin, tessellated into
    /// `segments` slices around the z axis.
    pub fn sphere(r: f64, segments: u32) -> Result<Self, KernelError> {
        let p = Self::Sphere { r, segments };
        p.validate()?;
        Ok(p)
    }

    /// Cylinder of height `h` and diameter `d`, centered on the z axis and
    /// spanning `z in [0, h]` (not centered; translate callers rely on
    /// this). Rim vertex `i` sits at angle `i * 2PI / segments`.
    pub fn cylinder(h: f64, d: f64, segments: u32) -> Result<Self, KernelError> {
        let p = Self::Cylinder { h, d, segments };
        p.validate()?;
        Ok(p)
    }

    /// Re-check parameters. Fields can arrive through serde, so generation
    /// validates again rather than trusting the constructors alone.
    pub fn validate(&self) -> Result<(), KernelError> {
        match *self {
            Self::Cube { size, .. } => {
                if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0)
                    || !(size.x.is_finite() && size.y.is_finite() && size.z.is_finite())
                {
                    return Err(invalid("cube", format!("size must be positive, got {size}")));
                }
            }
            Self::Sphere { r, segments } => {
                if !(r > 0.0) || !r.is_finite() {
                    return Err(invalid("sphere", format!("radius must be positive, got {r}")));
                }
                if segments < 3 {
                    return Err(invalid("sphere", format!("fn must be >= 3, got {segments}")));
                }
            }
            Self::Cylinder { h, d, segments } => {
                if !(h > 0.0) || !h.is_finite() {
                    return Err(invalid("cylinder", format!("height must be positive, got {h}")));
                }
                if !(d > 0.0) || !d.is_finite() {
                    return Err(invalid("cylinder", format!("diameter must be positive, got {d}")));
                }
                if segments < 3 {
                    return Err(invalid("cylinder", format!("fn must be >= 3, got {segments}")));
                }
            }
        }
        Ok(())
    }

    /// Tessellate into a closed solid with outward windings.
    pub fn to_solid(&self) -> Result<Solid, KernelError> {
        self.validate()?;
        match *self {
            Self::Cube { size, center } => cube_solid(size, center),
            Self::Sphere { r, segments } => sphere_solid(r, segments),
            Self::Cylinder { h, d, segments } => cylinder_solid(h, d, segments),
        }
    }
}

fn invalid(target: &'static str, reason: String) -> KernelError {
    KernelError::InvalidParameter { target, reason }
}

fn cube_solid(size: Vector3<f64>, center: bool) -> Result<Solid, KernelError> {
    let (min, max) = if center {
        (-size / 2.0, size / 2.0)
    } else {
        (Vector3::zeros(), size)
    };

    let corners = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    // One quad per face, wound outward.
    let faces: [[usize; 4]; 6] = [
        [4, 5, 6, 7], // z+
        [1, 0, 3, 2], // z-
        [5, 1, 2, 6], // x+
        [0, 4, 7, 3], // x-
        [7, 6, 2, 3], // y+
        [0, 1, 5, 4], // y-
    ];

    let mut polygons = Vec::with_capacity(6);
    for face in faces {
        polygons.push(Polygon::new(
            face.iter().map(|&i| Vertex::new(corners[i])).collect(),
        )?);
    }
    Ok(Solid::from_polygons(polygons))
}

fn sphere_solid(r: f64, segments: u32) -> Result<Solid, KernelError> {
    let slices = segments as usize;
    let stacks = ((segments / 2).max(2)) as usize;

    let point = |i: usize, j: usize| -> Point3<f64> {
        let theta = 2.0 * PI * i as f64 / slices as f64;
        let phi = PI * j as f64 / stacks as f64;
        Point3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    };

    let mut polygons = Vec::with_capacity(slices * stacks);
    for i in 0..slices {
        for j in 0..stacks {
            // Quad cell; collapses to a triangle at the poles.
            let loop_points = [
                point(i, j),
                point(i, j + 1),
                point(i + 1, j + 1),
                point(i + 1, j),
            ];
            let mut vertices: Vec<Vertex> = Vec::with_capacity(4);
            for p in loop_points {
                if vertices.last().map(|v: &Vertex| v.position) != Some(p) {
                    vertices.push(Vertex::new(p));
                }
            }
            if vertices.first().map(|v| v.position) == vertices.last().map(|v| v.position) {
                vertices.pop();
            }
            if vertices.len() >= 3 {
                polygons.push(Polygon::new(vertices)?);
            }
        }
    }
    Ok(Solid::from_polygons(polygons))
}

fn cylinder_solid(h: f64, d: f64, segments: u32) -> Result<Solid, KernelError> {
    let r = d / 2.0;
    let n = segments as usize;

    // Rings are computed once so shared edges reuse bit-identical positions.
    let bottom: Vec<Point3<f64>> = (0..n)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / n as f64;
            Point3::new(r * angle.cos(), r * angle.sin(), 0.0)
        })
        .collect();
    let top: Vec<Point3<f64>> = bottom
        .iter()
        .map(|p| Point3::new(p.x, p.y, h))
        .collect();

    let mut polygons = Vec::with_capacity(n + 2);

    // Side walls: one quad per segment, wound outward.
    for i in 0..n {
        let j = (i + 1) % n;
        polygons.push(Polygon::new(vec![
            Vertex::new(bottom[i]),
            Vertex::new(bottom[j]),
            Vertex::new(top[j]),
            Vertex::new(top[i]),
        ])?);
    }

    // Top cap: counter-clockwise seen from z+.
    polygons.push(Polygon::new(top.iter().map(|&p| Vertex::new(p)).collect())?);

    // Bottom cap: reversed so it faces z-.
    polygons.push(Polygon::new(
        bottom.iter().rev().map(|&p| Vertex::new(p)).collect(),
    )?);

    Ok(Solid::from_polygons(polygons))
}
