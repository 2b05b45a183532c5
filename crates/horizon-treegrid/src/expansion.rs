//! Expand/collapse state.
//!
//! Until the user first interacts with the tree, every row with children is
//! shown expanded without being recorded anywhere. The first toggle writes the
//! full "everything expanded" set down and then applies the flip, so the rest
//! of the tree does not jump closed. From then on only the explicit set
//! counts, even when it becomes empty again.
//!
//! In controlled mode the host owns the set. Transitions are computed and
//! reported but never applied; the host hands back the updated set.

use std::collections::HashSet;

use horizon_treegrid_core::logging::targets;

use crate::model::{ExpandedRows, GridNode, RowIndex, RowKey};

/// A reported expansion change, carrying the state after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle {
    pub key: RowKey,
    pub expanded: bool,
}

/// Expansion state of the rows of one grid.
#[derive(Debug, Clone, Default)]
pub struct ExpansionState {
    expanded: HashSet<RowKey>,
    interacted: bool,
    controlled: Option<HashSet<RowKey>>,
}

impl ExpansionState {
    /// Uncontrolled state with nothing toggled yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose expanded set is supplied by the host.
    pub fn controlled(expanded: HashSet<RowKey>) -> Self {
        Self {
            controlled: Some(expanded),
            ..Self::default()
        }
    }

    /// Replace the host-owned set, or pass `None` to return to uncontrolled
    /// mode.
    pub fn set_controlled(&mut self, expanded: Option<HashSet<RowKey>>) {
        self.controlled = expanded;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// Whether a toggle has ever been applied in uncontrolled mode.
    pub fn has_interacted(&self) -> bool {
        self.interacted
    }

    /// The rows to treat as expanded while flattening.
    pub fn expanded_rows(&self) -> ExpandedRows<'_> {
        match &self.controlled {
            Some(set) => ExpandedRows::Only(set),
            None if !self.interacted && self.expanded.is_empty() => ExpandedRows::All,
            None => ExpandedRows::Only(&self.expanded),
        }
    }

    /// Whether the row is currently expanded. Leaves are never expanded.
    pub fn is_expanded<N: GridNode>(&self, key: &RowKey, index: &RowIndex<'_, N>) -> bool {
        index.get(key.as_str()).is_some_and(|node| node.has_children())
            && self.expanded_rows().contains(Some(key))
    }

    /// The explicit expanded set, with the implicit "all expanded" state
    /// written out.
    pub fn expanded_keys<N: GridNode>(&self, index: &RowIndex<'_, N>) -> HashSet<RowKey> {
        match self.expanded_rows() {
            ExpandedRows::All => index.expandable_keys(),
            ExpandedRows::Only(set) => set.clone(),
        }
    }

    fn materialize<N: GridNode>(&mut self, index: &RowIndex<'_, N>) {
        if self.interacted {
            return;
        }
        if self.expanded.is_empty() {
            self.expanded = index.expandable_keys();
            tracing::debug!(
                target: targets::EXPANSION,
                count = self.expanded.len(),
                "materialized implicit expand-all"
            );
        }
        self.interacted = true;
    }

    /// Flip the row's expansion.
    ///
    /// Returns the change to report, or `None` for unknown rows and leaves.
    pub fn toggle<N: GridNode>(&mut self, key: &RowKey, index: &RowIndex<'_, N>) -> Option<Toggle> {
        let expanded = !self.is_expanded(key, index);
        self.set_expanded(key, expanded, index)
    }

    /// Expand or collapse the row.
    ///
    /// Returns the change to report, or `None` when nothing changes.
    pub fn set_expanded<N: GridNode>(
        &mut self,
        key: &RowKey,
        expanded: bool,
        index: &RowIndex<'_, N>,
    ) -> Option<Toggle> {
        if self.controlled.is_none() {
            self.materialize(index);
        }
        let node = index.get(key.as_str())?;
        if !node.has_children() || self.is_expanded(key, index) == expanded {
            return None;
        }

        if self.controlled.is_none() {
            if expanded {
                self.expanded.insert(key.clone());
            } else {
                self.expanded.remove(key);
            }
        }
        tracing::trace!(
            target: targets::EXPANSION,
            %key,
            expanded,
            controlled = self.is_controlled(),
            "row toggled"
        );
        Some(Toggle {
            key: key.clone(),
            expanded,
        })
    }

    /// Expand every row with children.
    pub fn expand_all<N: GridNode>(&mut self, index: &RowIndex<'_, N>) -> Vec<Toggle> {
        let mut keys: Vec<RowKey> = index.expandable_keys().into_iter().collect();
        keys.sort();
        keys.iter()
            .filter_map(|key| self.set_expanded(key, true, index))
            .collect()
    }

    /// Collapse every row.
    pub fn collapse_all<N: GridNode>(&mut self, index: &RowIndex<'_, N>) -> Vec<Toggle> {
        let mut keys: Vec<RowKey> = index.expandable_keys().into_iter().collect();
        keys.sort();
        keys.iter()
            .filter_map(|key| self.set_expanded(key, false, index))
            .collect()
    }

    /// Expand every ancestor of the row so it becomes visible.
    pub fn reveal<N: GridNode>(&mut self, key: &RowKey, index: &RowIndex<'_, N>) -> Vec<Toggle> {
        let mut ancestors = index.ancestors(key.as_str());
        // Outermost first, so reports read top-down.
        ancestors.reverse();
        ancestors
            .iter()
            .filter_map(|ancestor| self.set_expanded(ancestor, true, index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Row, flatten_tree};

    fn forest() -> Vec<Row> {
        vec![
            Row::new(1, "folder").with_children(vec![
                Row::new(2, "file"),
                Row::new(3, "folder").with_children(vec![Row::new(4, "file")]),
            ]),
            Row::new(5, "folder").with_children(vec![Row::new(6, "file")]),
        ]
    }

    fn keys(items: &[i64]) -> HashSet<RowKey> {
        items.iter().map(|&k| RowKey::from(k)).collect()
    }

    #[test]
    fn test_untouched_state_expands_everything() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let state = ExpansionState::new();

        assert!(matches!(state.expanded_rows(), ExpandedRows::All));
        assert!(state.is_expanded(&RowKey::from(3), &index));
        assert!(!state.is_expanded(&RowKey::from(4), &index));
        assert_eq!(flatten_tree(&roots, state.expanded_rows()).len(), 6);
    }

    #[test]
    fn test_first_toggle_materializes_expand_all() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let mut state = ExpansionState::new();

        let toggle = state.toggle(&RowKey::from(3), &index);
        assert_eq!(
            toggle,
            Some(Toggle {
                key: RowKey::from(3),
                expanded: false
            })
        );
        assert!(state.has_interacted());
        assert_eq!(state.expanded_keys(&index), keys(&[1, 5]));
    }

    #[test]
    fn test_first_toggle_on_leaf() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let mut state = ExpansionState::new();

        assert_eq!(state.toggle(&RowKey::from(2), &index), None);
        assert_eq!(state.expanded_keys(&index), keys(&[1, 3, 5]));
    }

    #[test]
    fn test_explicit_set_stays_explicit_when_emptied() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let mut state = ExpansionState::new();

        state.collapse_all(&index);
        assert!(state.expanded_keys(&index).is_empty());
        assert_eq!(flatten_tree(&roots, state.expanded_rows()).len(), 2);

        let toggle = state.toggle(&RowKey::from(1), &index);
        assert_eq!(toggle.map(|t| t.expanded), Some(true));
        assert_eq!(state.expanded_keys(&index), keys(&[1]));
    }

    #[test]
    fn test_controlled_mode_reports_without_applying() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let mut state = ExpansionState::controlled(keys(&[1]));

        let toggle = state.toggle(&RowKey::from(1), &index);
        assert_eq!(toggle.map(|t| t.expanded), Some(false));
        assert_eq!(state.expanded_keys(&index), keys(&[1]));

        let toggle = state.toggle(&RowKey::from(5), &index);
        assert_eq!(toggle.map(|t| t.expanded), Some(true));
        assert!(!state.has_interacted());

        state.set_controlled(Some(keys(&[5])));
        assert!(state.is_expanded(&RowKey::from(5), &index));
        assert!(!state.is_expanded(&RowKey::from(1), &index));
    }

    #[test]
    fn test_reveal_expands_ancestors() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let mut state = ExpansionState::new();
        state.collapse_all(&index);

        let toggles = state.reveal(&RowKey::from(4), &index);
        assert_eq!(
            toggles.iter().map(|t| t.key.clone()).collect::<Vec<_>>(),
            vec![RowKey::from(1), RowKey::from(3)]
        );
        assert_eq!(state.expanded_keys(&index), keys(&[1, 3]));
    }

    #[test]
    fn test_unknown_row() {
        let roots = forest();
        let index = RowIndex::build(&roots);
        let mut state = ExpansionState::new();
        assert_eq!(state.toggle(&RowKey::from(99), &index), None);
    }
}
