// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Numeric policy for the CSG engine

use serde::{Deserialize, Serialize};

/// Default plane-side classification tolerance, in model units.
///
/// Too small produces sliver polygons on nearly-coplanar cuts; too large
/// erodes thin features. It is a tuned constant, not a derived value.
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Tolerances threaded through plane classification and the boolean engine.
///
/// Every plane-distance comparison in a boolean operation reads
/// [`CsgConfig::epsilon`]; nothing consults a hidden constant at call time,
/// so tests can probe sensitivity by passing their own value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CsgConfig {
    /// A point within this distance of a plane counts as on the plane.
    pub epsilon: f64,
    /// Check that both operands are closed manifolds before a boolean runs,
    /// reporting `NonManifoldInput` instead of undefined output.
    pub validate_inputs: bool,
}

impl CsgConfig {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            validate_inputs: false,
        }
    }
}

impl Default for CsgConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            validate_inputs: false,
        }
    }
}
