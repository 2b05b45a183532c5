//! Flattening a forest into the rows currently on screen.

use std::collections::HashSet;

use horizon_treegrid_core::logging::targets;

use super::node::{GridNode, RowKey};

/// Which rows count as expanded while flattening.
#[derive(Debug, Clone, Copy)]
pub enum ExpandedRows<'a> {
    /// Every expandable row is expanded (nothing has been toggled yet).
    All,
    /// Only the rows in the set are expanded.
    Only(&'a HashSet<RowKey>),
}

impl ExpandedRows<'_> {
    /// Whether a row with this key is expanded. Rows without a key are only
    /// expanded under [`ExpandedRows::All`].
    pub fn contains(&self, key: Option<&RowKey>) -> bool {
        match self {
            ExpandedRows::All => true,
            ExpandedRows::Only(set) => key.is_some_and(|key| set.contains(key)),
        }
    }
}

/// A node annotated with where and how it is displayed.
#[derive(Debug)]
pub struct VisibleRow<'a, N> {
    pub node: &'a N,
    pub key: Option<RowKey>,
    /// Key of the nearest keyed ancestor.
    pub parent: Option<RowKey>,
    /// Nesting depth, 0 for roots.
    pub level: usize,
    pub has_children: bool,
    /// Always `false` for rows without children.
    pub expanded: bool,
    pub is_last_child: bool,
}

impl<N> Clone for VisibleRow<'_, N> {
    fn clone(&self) -> Self {
        Self {
            node: self.node,
            key: self.key.clone(),
            parent: self.parent.clone(),
            level: self.level,
            has_children: self.has_children,
            expanded: self.expanded,
            is_last_child: self.is_last_child,
        }
    }
}

/// Produce the visible rows in pre-order, skipping collapsed subtrees.
#[tracing::instrument(skip_all, target = "horizon_treegrid::model", level = "trace")]
pub fn flatten_tree<'a, N: GridNode>(roots: &'a [N], expanded: ExpandedRows<'_>) -> Vec<VisibleRow<'a, N>> {
    let mut rows = Vec::new();
    push_level(roots, None, 0, expanded, &mut rows);
    tracing::trace!(target: targets::MODEL, visible = rows.len(), "flattened tree");
    rows
}

fn push_level<'a, N: GridNode>(
    nodes: &'a [N],
    parent: Option<&RowKey>,
    level: usize,
    expanded: ExpandedRows<'_>,
    rows: &mut Vec<VisibleRow<'a, N>>,
) {
    let count = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        let key = node.key();
        let has_children = node.has_children();
        let is_expanded = has_children && expanded.contains(key.as_ref());

        rows.push(VisibleRow {
            node,
            key: key.clone(),
            parent: parent.cloned(),
            level,
            has_children,
            expanded: is_expanded,
            is_last_child: i + 1 == count,
        });

        if is_expanded {
            if let Some(children) = node.children() {
                let child_parent = key.as_ref().or(parent);
                push_level(children, child_parent, level + 1, expanded, rows);
            }
        }
    }
}
