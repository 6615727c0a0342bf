// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Kernel error types

use thiserror::Error;

/// Errors produced by primitive construction, transforms, and boolean
/// evaluation. Tree walkers wrap these with the failing node's identity.
#[derive(Debug, Error)]
pub enum KernelError {
    /// A primitive or transform was given out-of-range parameters.
    #[error("invalid parameter for {target}: {reason}")]
    InvalidParameter {
        target: &'static str,
        reason: String,
    },

    /// An operand or split result has no usable geometry.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Defensive validation found an operand that is not a closed 2-manifold.
    #[error("non-manifold input: {0}")]
    NonManifoldInput(String),

    /// An evaluation tree referenced an id outside its arena.
    #[error("unknown node id {0}")]
    UnknownNode(usize),
}
