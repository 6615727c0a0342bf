// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Evaluation tree: an arena of operation nodes
//!
//! Nodes live in a flat `Vec` and refer to children by index, so shared
//! subtrees are represented once and evaluated once. Builders validate
//! parameters and child ids at construction; evaluation can then assume
//! a well-formed tree.

mod evaluator;
mod node;
mod parallel_evaluator;

pub use evaluator::Evaluator;
pub use node::{Node, NodeId, NodeKind, TransformOp};
pub use parallel_evaluator::ParallelEvaluator;

use crate::error::KernelError;
use crate::geometry::{BooleanOp, Primitive, DEFAULT_SEGMENTS};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Arena of evaluation nodes. The root is whichever id the caller hands
/// to the evaluator; a tree may hold several independent models.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node without checking its children. Ill-formed child ids
    /// surface as `UnknownNode` at evaluation time.
    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, KernelError> {
        self.nodes.get(id).ok_or(KernelError::UnknownNode(id))
    }

    fn check_children(&self, children: &[NodeId]) -> Result<(), KernelError> {
        for &child in children {
            if child >= self.nodes.len() {
                return Err(KernelError::UnknownNode(child));
            }
        }
        Ok(())
    }

    /// Leaf builder for any validated primitive.
    pub fn primitive(&mut self, primitive: Primitive) -> NodeId {
        self.push(Node::new(NodeKind::Primitive(primitive)))
    }

    pub fn cube(&mut self, size: Vector3<f64>, center: bool) -> Result<NodeId, KernelError> {
        Ok(self.primitive(Primitive::cube(size, center)?))
    }

    /// `segments` of `None` resolves to [`DEFAULT_SEGMENTS`] here, so the
    /// stored node always carries an explicit count.
    pub fn sphere(&mut self, r: f64, segments: Option<u32>) -> Result<NodeId, KernelError> {
        let segments = segments.unwrap_or(DEFAULT_SEGMENTS);
        Ok(self.primitive(Primitive::sphere(r, segments)?))
    }

    pub fn cylinder(
        &mut self,
        h: f64,
        d: f64,
        segments: Option<u32>,
    ) -> Result<NodeId, KernelError> {
        let segments = segments.unwrap_or(DEFAULT_SEGMENTS);
        Ok(self.primitive(Primitive::cylinder(h, d, segments)?))
    }

    pub fn transform(
        &mut self,
        op: TransformOp,
        children: Vec<NodeId>,
    ) -> Result<NodeId, KernelError> {
        self.check_children(&children)?;
        Ok(self.push(Node::new(NodeKind::Transform { op, children })))
    }

    pub fn translate(
        &mut self,
        offset: Vector3<f64>,
        child: NodeId,
    ) -> Result<NodeId, KernelError> {
        self.transform(TransformOp::Translate(offset), vec![child])
    }

    pub fn boolean(
        &mut self,
        op: BooleanOp,
        children: Vec<NodeId>,
    ) -> Result<NodeId, KernelError> {
        self.check_children(&children)?;
        Ok(self.push(Node::new(NodeKind::Boolean { op, children })))
    }

    pub fn union(&mut self, children: Vec<NodeId>) -> Result<NodeId, KernelError> {
        self.boolean(BooleanOp::Union, children)
    }

    pub fn difference(&mut self, children: Vec<NodeId>) -> Result<NodeId, KernelError> {
        self.boolean(BooleanOp::Difference, children)
    }

    pub fn intersection(&mut self, children: Vec<NodeId>) -> Result<NodeId, KernelError> {
        self.boolean(BooleanOp::Intersection, children)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a tree and re-validate what the builders normally
    /// guarantee: children must point at earlier nodes, and primitive
    /// parameters must be in range.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let tree: Tree = serde_json::from_str(json)?;
        for (id, node) in tree.nodes.iter().enumerate() {
            for &child in node.children() {
                if child >= id {
                    return Err(KernelError::UnknownNode(child).into());
                }
            }
            if let NodeKind::Primitive(primitive) = &node.kind {
                primitive.validate()?;
            }
        }
        Ok(tree)
    }
}
