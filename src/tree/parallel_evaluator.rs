// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Parallel tree evaluator using rayon
//!
//! Sibling subtrees are independent, so they evaluate on the rayon pool;
//! the boolean fold that joins them stays sequential because each step
//! consumes the previous result.

use super::{NodeId, NodeKind, Tree, TransformOp};
use crate::config::CsgConfig;
use crate::geometry::{combine, BooleanOp, Solid};
use anyhow::{Context, Result};
use dashmap::DashMap;
use rayon::prelude::*;

pub struct ParallelEvaluator {
    config: CsgConfig,
}

impl ParallelEvaluator {
    pub fn new() -> Self {
        Self {
            config: CsgConfig::default(),
        }
    }

    pub fn with_config(config: CsgConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, tree: &Tree, root: NodeId) -> Result<Solid> {
        let cache = DashMap::new();
        self.evaluate_node(tree, root, &cache)
    }

    fn evaluate_node(
        &self,
        tree: &Tree,
        id: NodeId,
        cache: &DashMap<NodeId, Solid>,
    ) -> Result<Solid> {
        if let Some(solid) = cache.get(&id) {
            return Ok(solid.clone());
        }

        let node = tree.node(id)?;
        let solid = match &node.kind {
            NodeKind::Primitive(primitive) => primitive
                .to_solid()
                .with_context(|| format!("node {id} ({})", node.kind.name()))?,

            NodeKind::Transform { op, children } => {
                let child = self.fold(tree, id, children, BooleanOp::Union, cache)?;
                match op {
                    TransformOp::Translate(offset) => child.translate(*offset),
                    op => child
                        .transform(&op.to_matrix())
                        .with_context(|| format!("node {id} ({})", node.kind.name()))?,
                }
            }

            NodeKind::Boolean { op, children } => self.fold(tree, id, children, *op, cache)?,
        };

        cache.insert(id, solid.clone());
        Ok(solid)
    }

    fn fold(
        &self,
        tree: &Tree,
        id: NodeId,
        children: &[NodeId],
        op: BooleanOp,
        cache: &DashMap<NodeId, Solid>,
    ) -> Result<Solid> {
        let solids: Vec<Solid> = children
            .par_iter()
            .map(|&child| self.evaluate_node(tree, child, cache))
            .collect::<Result<_>>()?;

        let mut result: Option<Solid> = None;
        for solid in solids {
            result = Some(match result {
                None => solid,
                Some(acc) => combine(&acc, &solid, op, &self.config)
                    .with_context(|| format!("node {id} ({op})"))?,
            });
        }
        Ok(result.unwrap_or_else(Solid::empty))
    }
}

impl Default for ParallelEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::evaluator::tests::hub_tree;
    use crate::tree::Evaluator;
    use approx::assert_relative_eq;

    #[test]
    fn test_parallel_matches_sequential() {
        let (tree, root) = hub_tree();
        let sequential = Evaluator::new().evaluate(&tree, root).unwrap();
        let parallel = ParallelEvaluator::new().evaluate(&tree, root).unwrap();
        assert_relative_eq!(parallel.volume(), sequential.volume(), epsilon = 1e-6);
        assert!(parallel
            .bounding_box()
            .approx_eq(&sequential.bounding_box(), 1e-9));
    }

    #[test]
    fn test_parallel_reports_unknown_node() {
        let tree = Tree::new();
        assert!(ParallelEvaluator::new().evaluate(&tree, 3).is_err());
    }
}
