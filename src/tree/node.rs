// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polycarve Team

//! Evaluation-tree node definitions

use crate::geometry::{BooleanOp, Primitive};
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Index of a node in its [`Tree`](super::Tree) arena. Children always
/// carry lower ids than their parent, so a tree cannot express a cycle.
pub type NodeId = usize;

/// A single operation in the evaluation tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind }
    }

    /// Child ids for traversal, empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Primitive(_) => &[],
            NodeKind::Transform { children, .. } => children,
            NodeKind::Boolean { children, .. } => children,
        }
    }
}

/// The closed set of node kinds the evaluator understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeKind {
    /// Leaf: a parametric shape, tessellated on evaluation.
    Primitive(Primitive),

    /// Affine transform of the union of its children.
    Transform {
        op: TransformOp,
        children: Vec<NodeId>,
    },

    /// Boolean combination folded left-to-right over the children.
    Boolean {
        op: BooleanOp,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Short operation name, used in error context.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primitive(Primitive::Cube { .. }) => "cube",
            Self::Primitive(Primitive::Sphere { .. }) => "sphere",
            Self::Primitive(Primitive::Cylinder { .. }) => "cylinder",
            Self::Transform { op, .. } => op.name(),
            Self::Boolean { op: BooleanOp::Union, .. } => "union",
            Self::Boolean { op: BooleanOp::Difference, .. } => "difference",
            Self::Boolean { op: BooleanOp::Intersection, .. } => "intersection",
        }
    }
}

/// Affine transform operations. Rotation angles are in degrees, applied
/// x then y then z.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransformOp {
    Translate(Vector3<f64>),
    Rotate(Vector3<f64>),
    Scale(Vector3<f64>),
    /// Reflect across the plane through the origin with this normal.
    Mirror(Vector3<f64>),
    Multmatrix(Matrix4<f64>),
}

impl TransformOp {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Translate(_) => "translate",
            Self::Rotate(_) => "rotate",
            Self::Scale(_) => "scale",
            Self::Mirror(_) => "mirror",
            Self::Multmatrix(_) => "multmatrix",
        }
    }

    /// Homogeneous matrix for this transform.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        use nalgebra::UnitQuaternion;

        match self {
            Self::Translate(v) => Matrix4::new_translation(v),
            Self::Rotate(angles) => {
                let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), angles.x.to_radians());
                let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), angles.y.to_radians());
                let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angles.z.to_radians());
                (rz * ry * rx).to_homogeneous()
            }
            Self::Scale(s) => Matrix4::new_nonuniform_scaling(s),
            Self::Mirror(normal) => {
                // Householder reflection; a zero normal degrades to the
                // identity rather than a singular matrix.
                let n = normal.norm_squared();
                if n == 0.0 {
                    return Matrix4::identity();
                }
                let h = nalgebra::Matrix3::identity()
                    - (2.0 / n) * (normal * normal.transpose());
                h.to_homogeneous()
            }
            Self::Multmatrix(m) => *m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_translate_matrix() {
        let m = TransformOp::Translate(Vector3::new(1.0, 2.0, 3.0)).to_matrix();
        let p = m.transform_point(&Point3::origin());
        assert_relative_eq!(p, Point3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_matrix_is_degrees() {
        let m = TransformOp::Rotate(Vector3::new(0.0, 0.0, 90.0)).to_matrix();
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_mirror_matrix_reflects_across_plane() {
        let m = TransformOp::Mirror(Vector3::new(1.0, 0.0, 0.0)).to_matrix();
        let p = m.transform_point(&Point3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(p, Point3::new(-2.0, 3.0, 4.0), epsilon = 1e-12);

        // Non-axis normal, unnormalized.
        let m = TransformOp::Mirror(Vector3::new(1.0, 1.0, 0.0)).to_matrix();
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_mirror_determinant_is_negative() {
        let m = TransformOp::Mirror(Vector3::new(0.0, 1.0, 0.0)).to_matrix();
        assert!(m.determinant() < 0.0);
    }
}
