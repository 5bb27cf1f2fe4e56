//! Constructive solid geometry node.

use crate::{Intersection, Scene, ShapeId};

/// Boolean operation combining two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CsgOp {
    /// Everything inside either operand.
    Union,
    /// Only what is inside both operands.
    Intersection,
    /// The left operand with the right one carved out.
    Difference,
}

impl CsgOp {
    /// Whether a crossing survives the operation.
    ///
    /// `left_hit` says which operand the crossing belongs to; `in_left` and
    /// `in_right` say whether the ray is currently inside each operand.
    pub fn allows(self, left_hit: bool, in_left: bool, in_right: bool) -> bool {
        match self {
            CsgOp::Union => (left_hit && !in_right) || (!left_hit && !in_left),
            CsgOp::Intersection => (left_hit && in_right) || (!left_hit && in_left),
            CsgOp::Difference => (left_hit && !in_right) || (!left_hit && in_left),
        }
    }
}

/// Two operands combined by a [`CsgOp`].
///
/// Operands are fixed at construction; see [`Scene::csg`](crate::Scene::csg).
#[derive(Debug, PartialEq)]
pub struct Csg {
    op: CsgOp,
    operands: [ShapeId; 2],
}

impl Csg {
    pub(crate) fn new(op: CsgOp, left: ShapeId, right: ShapeId) -> Self {
        Self {
            op,
            operands: [left, right],
        }
    }

    /// The boolean operation.
    pub fn op(&self) -> CsgOp {
        self.op
    }

    /// Left operand.
    pub fn left(&self) -> ShapeId {
        self.operands[0]
    }

    /// Right operand.
    pub fn right(&self) -> ShapeId {
        self.operands[1]
    }

    /// Both operands, left first.
    pub fn operands(&self) -> &[ShapeId; 2] {
        &self.operands
    }

    /// Keep the crossings that lie on the combined surface.
    ///
    /// `xs` must be sorted by `t`. The walk starts outside both operands and
    /// toggles the matching inside flag at every crossing, so crossings at
    /// negative `t` still count.
    pub fn filter(&self, scene: &Scene, xs: Vec<Intersection>) -> Vec<Intersection> {
        let mut in_left = false;
        let mut in_right = false;
        let mut kept = Vec::with_capacity(xs.len());

        for x in xs {
            let left_hit = scene.includes(self.left(), x.shape);
            if self.op.allows(left_hit, in_left, in_right) {
                kept.push(x);
            }
            if left_hit {
                in_left = !in_left;
            } else {
                in_right = !in_right;
            }
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_rule_table() {
        let expected = [
            (true, true, true, false),
            (true, true, false, true),
            (true, false, true, false),
            (true, false, false, true),
            (false, true, true, false),
            (false, true, false, false),
            (false, false, true, true),
            (false, false, false, true),
        ];
        for (lhit, inl, inr, result) in expected {
            assert_eq!(CsgOp::Union.allows(lhit, inl, inr), result, "{lhit} {inl} {inr}");
        }
    }

    #[test]
    fn test_intersection_rule_table() {
        let expected = [
            (true, true, true, true),
            (true, true, false, false),
            (true, false, true, true),
            (true, false, false, false),
            (false, true, true, true),
            (false, true, false, true),
            (false, false, true, false),
            (false, false, false, false),
        ];
        for (lhit, inl, inr, result) in expected {
            assert_eq!(
                CsgOp::Intersection.allows(lhit, inl, inr),
                result,
                "{lhit} {inl} {inr}"
            );
        }
    }

    #[test]
    fn test_difference_rule_table() {
        let expected = [
            (true, true, true, false),
            (true, true, false, true),
            (true, false, true, false),
            (true, false, false, true),
            (false, true, true, true),
            (false, true, false, true),
            (false, false, true, false),
            (false, false, false, false),
        ];
        for (lhit, inl, inr, result) in expected {
            assert_eq!(
                CsgOp::Difference.allows(lhit, inl, inr),
                result,
                "{lhit} {inl} {inr}"
            );
        }
    }
}
