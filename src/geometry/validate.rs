// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Solid validation: closure and manifoldness of polygon boundaries
//!
//! A solid keeps no shared vertex indices, so edges are keyed on their
//! endpoint positions quantized at the classification tolerance. The
//! checks expect edge-to-edge tessellation, which primitives and
//! well-formed imports satisfy; clipped boolean output may carry
//! T-vertices along seams that these checks do not resolve.

use super::Solid;
use crate::error::KernelError;
use ahash::AHashMap;
use nalgebra::Point3;

/// Position quantized onto a grid of the given tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct PointKey(i64, i64, i64);

fn point_key(p: &Point3<f64>, eps: f64) -> PointKey {
    let q = |x: f64| (x / eps).round() as i64;
    PointKey(q(p.x), q(p.y), q(p.z))
}

/// Per-edge traversal counts: `fwd` runs min-key to max-key, `rev` the
/// other way.
#[derive(Debug, Clone, Copy, Default)]
struct EdgeUse {
    fwd: u32,
    rev: u32,
}

fn edge_uses(solid: &Solid, eps: f64) -> AHashMap<(PointKey, PointKey), EdgeUse> {
    let mut uses: AHashMap<(PointKey, PointKey), EdgeUse> = AHashMap::new();

    for polygon in &solid.polygons {
        let n = polygon.vertices.len();
        for i in 0..n {
            let a = point_key(&polygon.vertices[i].position, eps);
            let b = point_key(&polygon.vertices[(i + 1) % n].position, eps);
            if a == b {
                continue; // collapses below tolerance
            }
            let entry = uses.entry((a.min(b), a.max(b))).or_default();
            if a < b {
                entry.fwd += 1;
            } else {
                entry.rev += 1;
            }
        }
    }

    uses
}

/// Every edge is traversed exactly once in each direction: the boundary
/// is watertight with consistent winding.
pub fn is_closed(solid: &Solid, eps: f64) -> bool {
    if solid.is_empty() {
        return false;
    }
    edge_uses(solid, eps)
        .values()
        .all(|u| u.fwd == 1 && u.rev == 1)
}

/// No edge borders more than two polygons.
pub fn is_manifold(solid: &Solid, eps: f64) -> bool {
    edge_uses(solid, eps)
        .values()
        .all(|u| u.fwd + u.rev <= 2)
}

/// Defensive operand check for the boolean engine.
pub fn require_closed(solid: &Solid, eps: f64) -> Result<(), KernelError> {
    let uses = edge_uses(solid, eps);
    if uses.is_empty() {
        return Err(KernelError::NonManifoldInput(
            "solid has no edges".into(),
        ));
    }
    let open = uses.values().filter(|u| u.fwd != 1 || u.rev != 1).count();
    if open > 0 {
        return Err(KernelError::NonManifoldInput(format!(
            "{open} of {} edges are not shared by exactly two opposed traversals",
            uses.len()
        )));
    }
    Ok(())
}

/// Validation report for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct SolidValidation {
    pub is_closed: bool,
    pub is_manifold: bool,
    pub edge_count: usize,
    pub boundary_edge_count: usize,
}

pub fn validate_solid(solid: &Solid, eps: f64) -> SolidValidation {
    let uses = edge_uses(solid, eps);
    SolidValidation {
        is_closed: !uses.is_empty() && uses.values().all(|u| u.fwd == 1 && u.rev == 1),
        is_manifold: uses.values().all(|u| u.fwd + u.rev <= 2),
        edge_count: uses.len(),
        boundary_edge_count: uses.values().filter(|u| u.fwd + u.rev == 1).count(),
    }
}
