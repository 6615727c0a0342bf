// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Polycarve CSG Kernel
//!
//! A BSP-based constructive solid geometry engine: tessellated
//! primitives, affine transforms, and boolean combination of closed
//! polygon solids, driven by an arena-allocated evaluation tree.

pub mod config;
pub mod error;
pub mod geometry;
pub mod tree;

pub use config::{CsgConfig, DEFAULT_EPSILON};
pub use error::KernelError;
pub use geometry::{
    BooleanOp, BoundingBox, Plane, Polygon, Primitive, Solid, Vertex, DEFAULT_SEGMENTS,
};
pub use tree::{Evaluator, Node, NodeId, NodeKind, ParallelEvaluator, TransformOp, Tree};

use anyhow::Result;

/// Evaluate the subtree rooted at `root` with the default configuration.
pub fn evaluate(tree: &Tree, root: NodeId) -> Result<Solid> {
    Evaluator::new().evaluate(tree, root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_basic_difference() {
        let mut tree = Tree::new();
        let plate = tree.cube(Vector3::new(20.0, 20.0, 5.0), false).unwrap();
        let hole = tree.cylinder(7.0, 6.0, None).unwrap();
        let hole = tree
            .translate(Vector3::new(10.0, 10.0, -1.0), hole)
            .unwrap();
        let root = tree.difference(vec![plate, hole]).unwrap();

        let solid = evaluate(&tree, root).unwrap();
        // The drilled hole removes at most pi r^2 h = 45 pi.
        assert!(!solid.is_empty());
        assert!(solid.volume() < 2000.0);
        assert!(solid.volume() > 2000.0 - 45.0 * std::f64::consts::PI);
    }
}
