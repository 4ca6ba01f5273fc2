//! Flattened visible rows of a hierarchical view.
//!
//! The host owns the full node collection; this list owns only the visible
//! flattening. Expanding splices a row's direct children in right after it;
//! collapsing splices out every following row that is indented deeper.

use crate::types::{TreeNode, TreeRow};

/// Host side of a tree: resolves a node's direct children.
///
/// `None` or an empty list means the children cannot be resolved.
pub trait TreeSource<Id> {
    fn children(&self, parent: &Id) -> Option<Vec<TreeNode<Id>>>;
}

impl<Id, F> TreeSource<Id> for F
where
    F: Fn(&Id) -> Option<Vec<TreeNode<Id>>>,
{
    fn children(&self, parent: &Id) -> Option<Vec<TreeNode<Id>>> {
        self(parent)
    }
}

/// Where a new row landed and how far later rows moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Insertion {
    pub index: usize,
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRowList<Id = String> {
    rows: Vec<TreeRow<Id>>,
}

impl<Id> Default for TreeRowList<Id> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<Id: Clone + PartialEq> TreeRowList<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the list with collapsed top-level rows.
    pub fn from_roots(roots: Vec<TreeNode<Id>>) -> Self {
        let rows = roots
            .into_iter()
            .map(|node| TreeRow {
                source_id: node.id,
                parent_id: None,
                indent: 0,
                is_expanded: false,
                child_count: node.child_count,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[TreeRow<Id>] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&TreeRow<Id>> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// End (exclusive) of the run of rows indented deeper than `index`.
    fn subtree_end(&self, index: usize) -> usize {
        let Some(row) = self.rows.get(index) else {
            return index;
        };
        let indent = row.indent;
        let start = index + 1;
        let run = self
            .rows
            .get(start..)
            .map_or(0, |rest| rest.iter().take_while(|r| r.indent > indent).count());
        start + run
    }

    /// Splice the row's direct children in after it.
    ///
    /// Returns the number of rows inserted. Already-expanded rows and rows
    /// whose children cannot be resolved are left unchanged.
    pub fn expand<S: TreeSource<Id> + ?Sized>(&mut self, index: usize, source: &S) -> usize {
        let Some(row) = self.rows.get(index) else {
            return 0;
        };
        if row.is_expanded {
            return 0;
        }
        let parent_id = row.source_id.clone();
        let indent = row.indent + 1;
        let children = source.children(&parent_id).unwrap_or_default();
        if children.is_empty() {
            tracing::debug!(index, "expand: no children resolved");
            return 0;
        }

        let count = children.len();
        let tail = self.rows.split_off(index + 1);
        self.rows.extend(children.into_iter().map(|node| TreeRow {
            source_id: node.id,
            parent_id: Some(parent_id.clone()),
            indent,
            is_expanded: false,
            child_count: node.child_count,
        }));
        self.rows.extend(tail);
        if let Some(row) = self.rows.get_mut(index) {
            row.is_expanded = true;
        }
        tracing::debug!(index, inserted = count, "expand");
        count
    }

    /// Remove every following row indented deeper than the row, in one splice.
    ///
    /// The removed rows are returned with their own expand flags reset, so a
    /// later expand starts again from direct children only. Collapsing a
    /// collapsed row is a no-op.
    pub fn collapse(&mut self, index: usize) -> Vec<TreeRow<Id>> {
        let Some(row) = self.rows.get_mut(index) else {
            return Vec::new();
        };
        if !row.is_expanded {
            return Vec::new();
        }
        row.is_expanded = false;
        let end = self.subtree_end(index);
        let removed: Vec<TreeRow<Id>> = self
            .rows
            .drain(index + 1..end)
            .map(|mut r| {
                r.is_expanded = false;
                r
            })
            .collect();
        tracing::debug!(index, removed = removed.len(), "collapse");
        removed
    }

    /// Expand or collapse. Returns the signed change in row count.
    pub fn toggle<S: TreeSource<Id> + ?Sized>(&mut self, index: usize, source: &S) -> i64 {
        let expanded = self.rows.get(index).is_some_and(|r| r.is_expanded);
        if expanded {
            -len_to_i64(self.collapse(index).len())
        } else {
            len_to_i64(self.expand(index, source))
        }
    }

    /// Index of the nearest row above `index` with a smaller indent.
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        let indent = self.rows.get(index)?.indent;
        if indent == 0 {
            return None;
        }
        let above = self.rows.get(..index)?;
        above.iter().rposition(|r| r.indent < indent)
    }

    /// Add a child (subtask) under the row at `parent_index`.
    ///
    /// The parent's `child_count` grows by one. `child_count` counts direct
    /// children only, so no other ancestor changes. When the parent is expanded
    /// the row is placed at the end of its visible subtree; a collapsed
    /// parent only records the new count.
    pub fn insert_child(&mut self, parent_index: usize, node: TreeNode<Id>) -> Option<Insertion> {
        let parent = self.rows.get_mut(parent_index)?;
        parent.child_count += 1;
        if !parent.is_expanded {
            return Some(Insertion {
                index: parent_index,
                offset: 0,
            });
        }
        let row = TreeRow {
            source_id: node.id,
            parent_id: Some(parent.source_id.clone()),
            indent: parent.indent + 1,
            is_expanded: false,
            child_count: node.child_count,
        };
        let index = self.subtree_end(parent_index);
        self.rows.insert(index, row);
        Some(Insertion { index, offset: 1 })
    }

    /// Add a top-level row at `index` (clamped to the end).
    pub fn insert_root(&mut self, index: usize, node: TreeNode<Id>) -> Insertion {
        let index = self.next_sibling_boundary(index.min(self.rows.len()));
        self.rows.insert(
            index,
            TreeRow {
                source_id: node.id,
                parent_id: None,
                indent: 0,
                is_expanded: false,
                child_count: node.child_count,
            },
        );
        Insertion { index, offset: 1 }
    }

    /// Move forward out of any subtree so a root never splits one.
    fn next_sibling_boundary(&self, index: usize) -> usize {
        let run = self
            .rows
            .get(index..)
            .map_or(0, |rest| rest.iter().take_while(|r| r.indent > 0).count());
        index + run
    }

    /// Remove a row with its visible descendants. Returns the removed count.
    pub fn remove(&mut self, index: usize) -> usize {
        if index >= self.rows.len() {
            return 0;
        }
        let parent = self.parent_index(index);
        let end = self.subtree_end(index);
        self.rows.drain(index..end);
        if let Some(parent) = parent.and_then(|p| self.rows.get_mut(p)) {
            parent.child_count = parent.child_count.saturating_sub(1);
            if parent.child_count == 0 {
                parent.is_expanded = false;
            }
        }
        end - index
    }
}

fn len_to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn source(parent: &String) -> Option<Vec<TreeNode>> {
        match parent.as_str() {
            "a" => Some(vec![TreeNode::new("a1".into(), 1), TreeNode::leaf("a2".into())]),
            "a1" => Some(vec![TreeNode::leaf("a1x".into())]),
            _ => None,
        }
    }

    fn list() -> TreeRowList {
        TreeRowList::from_roots(vec![TreeNode::new("a".into(), 2), TreeNode::leaf("b".into())])
    }

    #[test]
    fn test_expand_inserts_after_parent() {
        let mut tree = list();
        assert_eq!(tree.expand(0, &source), 2);
        let ids: Vec<_> = tree.rows().iter().map(|r| r.source_id.as_str()).collect();
        assert_eq!(ids, ["a", "a1", "a2", "b"]);
        assert_eq!(tree.rows()[1].indent, 1);
        assert_eq!(tree.rows()[1].parent_id.as_deref(), Some("a"));
        assert!(tree.rows()[0].is_expanded);
    }

    #[test]
    fn test_collapse_removes_all_descendants() {
        let mut tree = list();
        tree.expand(0, &source);
        tree.expand(1, &source);
        assert_eq!(tree.len(), 5);
        let removed = tree.collapse(0);
        assert_eq!(removed.len(), 3);
        assert!(removed.iter().all(|r| !r.is_expanded));
        assert_eq!(tree, list());
    }

    #[test]
    fn test_toggle_reports_signed_change() {
        let mut tree = list();
        assert_eq!(tree.toggle(0, &source), 2);
        assert_eq!(tree.toggle(0, &source), -2);
        assert_eq!(tree.toggle(1, &source), 0);
    }

    #[test]
    fn test_unresolvable_children() {
        let mut tree = list();
        assert_eq!(tree.expand(1, &source), 0);
        assert!(!tree.rows()[1].is_expanded);
    }

    #[test]
    fn test_parent_index() {
        let mut tree = list();
        tree.expand(0, &source);
        tree.expand(1, &source);
        assert_eq!(tree.parent_index(2), Some(1));
        assert_eq!(tree.parent_index(3), Some(0));
        assert_eq!(tree.parent_index(0), None);
    }

    #[test]
    fn test_insert_child_at_subtree_end() {
        let mut tree = list();
        tree.expand(0, &source);
        tree.expand(1, &source);
        let ins = tree.insert_child(0, TreeNode::leaf("a3".into())).unwrap();
        assert_eq!(ins, Insertion { index: 4, offset: 1 });
        assert_eq!(tree.rows()[0].child_count, 3);
        assert_eq!(tree.rows()[4].source_id, "a3");

        // a grandchild only counts against its own parent
        tree.insert_child(1, TreeNode::leaf("a1y".into())).unwrap();
        assert_eq!(tree.rows()[1].child_count, 2);
        assert_eq!(tree.rows()[0].child_count, 3);
        assert_eq!(tree.rows()[4].indent, 1);
    }

    #[test]
    fn test_insert_child_collapsed_parent() {
        let mut tree = list();
        let ins = tree.insert_child(1, TreeNode::leaf("b1".into())).unwrap();
        assert_eq!(ins.offset, 0);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.rows()[1].child_count, 1);
    }

    #[test]
    fn test_insert_root_skips_subtree() {
        let mut tree = list();
        tree.expand(0, &source);
        let ins = tree.insert_root(1, TreeNode::leaf("c".into()));
        assert_eq!(ins.index, 3);
        assert_eq!(tree.rows()[3].indent, 0);
    }

    #[test]
    fn test_remove_updates_parent() {
        let mut tree = list();
        tree.expand(0, &source);
        tree.expand(1, &source);
        assert_eq!(tree.remove(1), 2);
        assert_eq!(tree.rows()[0].child_count, 1);
        assert_eq!(tree.len(), 3);
    }
}
