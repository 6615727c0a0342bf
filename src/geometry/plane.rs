// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Oriented planes and the polygon splitter at the heart of BSP clipping

use super::Polygon;
use crate::error::KernelError;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Oriented plane: unit normal plus signed offset from the origin.
///
/// Points with `normal . p > w` are in front of the plane. Throughout the
/// boolean engine the back half-space of a partition plane is the inside
/// of the solid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vector3<f64>,
    pub w: f64,
}

impl Plane {
    pub fn new(normal: Vector3<f64>, w: f64) -> Self {
        Self { normal, w }
    }

    /// Plane through three non-collinear points, normal by the right-hand
    /// rule over the traversal `a -> b -> c`.
    pub fn from_points(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
    ) -> Result<Self, KernelError> {
        let n = (b - a).cross(&(c - a));
        if n.norm() < 1e-12 {
            return Err(KernelError::DegenerateInput(
                "collinear points define no plane".into(),
            ));
        }
        let normal = n.normalize();
        Ok(Self::new(normal, normal.dot(&a.coords)))
    }

    /// Signed distance from the plane; positive is in front.
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&point.coords) - self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    pub fn flipped(&self) -> Self {
        Self::new(-self.normal, -self.w)
    }

    /// Cut `polygon` by this plane into four bins: coplanar with aligned
    /// normal, coplanar with opposed normal, strictly in front, strictly
    /// behind. A spanning polygon is split, with new vertices interpolated
    /// on the intersected edges; both pieces keep the parent's plane.
    ///
    /// `eps` is the classification tolerance from `CsgConfig`. A split
    /// that would emit a polygon with fewer than three distinct corners
    /// indicates degenerate input and fails.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
        eps: f64,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) -> Result<(), KernelError> {
        let mut polygon_type = COPLANAR;
        let mut types = Vec::with_capacity(polygon.vertices.len());

        for v in &polygon.vertices {
            let d = self.signed_distance(&v.position);
            let t = if d < -eps {
                BACK
            } else if d > eps {
                FRONT
            } else {
                COPLANAR
            };
            polygon_type |= t;
            types.push(t);
        }

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            }
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let ti = types[i];
                    let tj = types[j];
                    let vi = polygon.vertices[i];
                    let vj = polygon.vertices[j];

                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.position.coords))
                            / self.normal.dot(&(vj.position - vi.position));
                        let v = vi.interpolate(&vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }

                front.push(Polygon::from_split(f, polygon.plane)?);
                back.push(Polygon::from_split(b, polygon.plane)?);
            }
        }

        Ok(())
    }
}
