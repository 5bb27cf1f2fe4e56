//! Aggregate node.

use crate::ShapeId;

/// Ordered list of child shapes sharing one transform.
///
/// Membership is managed through [`Scene::add_child`](crate::Scene::add_child)
/// and [`Scene::remove_child`](crate::Scene::remove_child) so that parent
/// links stay consistent.
#[derive(Debug, Default, PartialEq)]
pub struct Group {
    children: Vec<ShapeId>,
}

impl Group {
    /// Child ids in insertion order.
    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }

    pub(crate) fn push(&mut self, child: ShapeId) {
        self.children.push(child);
    }

    /// Remove `child` if present.
    pub(crate) fn detach(&mut self, child: ShapeId) {
        self.children.retain(|&c| c != child);
    }
}
