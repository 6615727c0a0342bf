// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Geometric core: vertices, planes, polygon-soup solids, primitive
//! tessellation, and BSP-based boolean combination.

pub mod bbox;
pub mod boolean;
pub(crate) mod bsp;
pub mod plane;
pub mod polygon;
pub mod primitives;
pub mod solid;
pub mod validate;
pub mod vertex;

pub use bbox::BoundingBox;
pub use boolean::{combine, difference, intersection, union, BooleanOp};
pub use plane::Plane;
pub use polygon::Polygon;
pub use primitives::{Primitive, DEFAULT_SEGMENTS};
pub use solid::Solid;
pub use validate::{is_closed, is_manifold, validate_solid, SolidValidation};
pub use vertex::Vertex;
