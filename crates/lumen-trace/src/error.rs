//! Error types for scene construction.

use thiserror::Error;

use crate::ShapeId;

/// Errors raised while building or mutating a scene.
///
/// Rendering itself never fails: geometric degeneracies produce empty hit
/// lists and an exhausted recursion budget produces black.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TraceError {
    /// A transform without an inverse was attached to a shape, pattern or camera.
    #[error("transform is not invertible")]
    SingularTransform,

    /// The shape id does not refer to a live shape in this scene.
    #[error("shape not found: {0:?}")]
    UnknownShape(ShapeId),

    /// The operation needs a group but the shape is something else.
    #[error("shape {0:?} is not a group")]
    NotAGroup(ShapeId),

    /// The shape is not a direct child of the given group.
    #[error("shape {child:?} is not a child of {group:?}")]
    NotAChild {
        /// Group that was expected to own the child.
        group: ShapeId,
        /// Shape that was expected to be a child.
        child: ShapeId,
    },

    /// Attaching would make a composite its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Prospective parent.
        parent: ShapeId,
        /// Prospective child.
        child: ShapeId,
    },

    /// Both operands of a CSG node would be the same shape.
    #[error("shape {0:?} cannot be both operands of a CSG node")]
    DuplicateOperand(ShapeId),

    /// CSG operands are fixed for the lifetime of the CSG node.
    #[error("shape {0:?} is a CSG operand and cannot be detached")]
    CsgOperand(ShapeId),
}
