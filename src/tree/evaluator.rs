// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Tree evaluator - turns an evaluation tree into a solid

use super::{NodeId, NodeKind, Tree, TransformOp};
use crate::config::CsgConfig;
use crate::geometry::{combine, Solid};
use ahash::AHashMap;
use anyhow::{Context, Result};

/// Sequential evaluator. Each call keeps a per-call memo keyed by node
/// id, so a subtree shared by several parents is evaluated once.
pub struct Evaluator {
    config: CsgConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            config: CsgConfig::default(),
        }
    }

    pub fn with_config(config: CsgConfig) -> Self {
        Self { config }
    }

    /// Evaluate the subtree rooted at `root`.
    pub fn evaluate(&self, tree: &Tree, root: NodeId) -> Result<Solid> {
        let mut cache = AHashMap::new();
        self.evaluate_node(tree, root, &mut cache)
    }

    fn evaluate_node(
        &self,
        tree: &Tree,
        id: NodeId,
        cache: &mut AHashMap<NodeId, Solid>,
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
                let child = self.evaluate_union(tree, children, cache)?;
                match op {
                    TransformOp::Translate(offset) => child.translate(*offset),
                    op => child
                        .transform(&op.to_matrix())
                        .with_context(|| format!("node {id} ({})", node.kind.name()))?,
                }
            }

            NodeKind::Boolean { op, children } => {
                let mut result: Option<Solid> = None;
                for &child in children {
                    let child_solid = self.evaluate_node(tree, child, cache)?;
                    result = Some(match result {
                        None => child_solid,
                        Some(acc) => combine(&acc, &child_solid, *op, &self.config)
                            .with_context(|| format!("node {id} ({})", node.kind.name()))?,
                    });
                }
                result.unwrap_or_else(Solid::empty)
            }
        };

        cache.insert(id, solid.clone());
        Ok(solid)
    }

    /// Multiple children under a transform combine as an implicit union.
    fn evaluate_union(
        &self,
        tree: &Tree,
        children: &[NodeId],
        cache: &mut AHashMap<NodeId, Solid>,
    ) -> Result<Solid> {
        let mut result: Option<Solid> = None;
        for &child in children {
            let child_solid = self.evaluate_node(tree, child, cache)?;
            result = Some(match result {
                None => child_solid,
                Some(acc) => {
                    combine(&acc, &child_solid, crate::geometry::BooleanOp::Union, &self.config)
                        .context("implicit union under transform")?
                }
            });
        }
        Ok(result.unwrap_or_else(Solid::empty))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
