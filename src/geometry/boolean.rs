// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Boolean combination of solids via BSP clipping
//!
//! Each operation builds one BSP tree per operand, clips each operand's
//! polygons against the other tree, and merges the surviving fragments.
//! The output encloses the exact point-set combination of the operand
//! volumes but is not topologically minimal: coplanar fragments are left
//! as-is.

use super::bsp::BspNode;
use super::{validate, Solid};
use crate::config::CsgConfig;
use crate::error::KernelError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Union => write!(f, "union"),
            Self::Difference => write!(f, "difference"),
            Self::Intersection => write!(f, "intersection"),
        }
    }
}

/// Combine two solids. Operand order matters for `Difference` (`a - b`)
/// and is irrelevant for the other two up to polygon layout.
pub fn combine(
    a: &Solid,
    b: &Solid,
    op: BooleanOp,
    config: &CsgConfig,
) -> Result<Solid, KernelError> {
    if a.is_empty() || b.is_empty() {
        return Err(KernelError::DegenerateInput(format!(
            "{op} operand has no polygons"
        )));
    }
    if config.validate_inputs {
        validate::require_closed(a, config.epsilon)?;
        validate::require_closed(b, config.epsilon)?;
    }
    match op {
        BooleanOp::Union => union_impl(a, b, config.epsilon),
        BooleanOp::Difference => difference_impl(a, b, config.epsilon),
        BooleanOp::Intersection => intersection_impl(a, b, config.epsilon),
    }
}

/// `a ∪ b`
pub fn union(a: &Solid, b: &Solid, config: &CsgConfig) -> Result<Solid, KernelError> {
    combine(a, b, BooleanOp::Union, config)
}

/// `a - b`
pub fn difference(a: &Solid, b: &Solid, config: &CsgConfig) -> Result<Solid, KernelError> {
    combine(a, b, BooleanOp::Difference, config)
}

/// `a ∩ b`
pub fn intersection(a: &Solid, b: &Solid, config: &CsgConfig) -> Result<Solid, KernelError> {
    combine(a, b, BooleanOp::Intersection, config)
}

fn union_impl(a: &Solid, b: &Solid, eps: f64) -> Result<Solid, KernelError> {
    let mut a = BspNode::new(a.polygons.clone(), eps)?;
    let mut b = BspNode::new(b.polygons.clone(), eps)?;

    a.clip_to(&b, eps)?;
    b.clip_to(&a, eps)?;
    // Remove b's fragments coplanar with a's remaining surface.
    b.invert();
    b.clip_to(&a, eps)?;
    b.invert();
    a.build(b.all_polygons(), eps)?;

    Ok(Solid::from_polygons(a.all_polygons()))
}

fn difference_impl(a: &Solid, b: &Solid, eps: f64) -> Result<Solid, KernelError> {
    let mut a = BspNode::new(a.polygons.clone(), eps)?;
    let mut b = BspNode::new(b.polygons.clone(), eps)?;

    // a - b as the complement of (complement of a) ∪ b.
    a.invert();
    a.clip_to(&b, eps)?;
    b.clip_to(&a, eps)?;
    b.invert();
    b.clip_to(&a, eps)?;
    b.invert();
    a.build(b.all_polygons(), eps)?;
    a.invert();

    Ok(Solid::from_polygons(a.all_polygons()))
}

fn intersection_impl(a: &Solid, b: &Solid, eps: f64) -> Result<Solid, KernelError> {
    let mut a = BspNode::new(a.polygons.clone(), eps)?;
    let mut b = BspNode::new(b.polygons.clone(), eps)?;

    a.invert();
    b.clip_to(&a, eps)?;
    b.invert();
    a.clip_to(&b, eps)?;
    b.clip_to(&a, eps)?;
    a.build(b.all_polygons(), eps)?;
    a.invert();

    Ok(Solid::from_polygons(a.all_polygons()))
}
