use serde::{Deserialize, Serialize};

/// A node as the host describes it: identity plus how many direct children
/// it has in the full collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode<Id = String> {
    pub id: Id,
    #[serde(default)]
    pub child_count: u32,
}

impl<Id> TreeNode<Id> {
    pub fn new(id: Id, child_count: u32) -> Self {
        Self { id, child_count }
    }

    pub fn leaf(id: Id) -> Self {
        Self { id, child_count: 0 }
    }
}

/// One entry of the visible (flattened) tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRow<Id = String> {
    pub source_id: Id,
    pub parent_id: Option<Id>,
    pub indent: u32,
    pub is_expanded: bool,
    pub child_count: u32,
}

impl<Id> TreeRow<Id> {
    pub fn has_children(&self) -> bool {
        self.child_count > 0
    }
}
