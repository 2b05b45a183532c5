//! Identifier lookup over the whole forest.

use std::collections::{HashMap, HashSet};

use horizon_treegrid_core::logging::targets;

use super::node::{GridNode, RowKey};

#[derive(Debug)]
struct IndexEntry<'a, N> {
    node: &'a N,
    parent: Option<RowKey>,
    level: usize,
}

/// Maps every keyed node of a forest, visible or not, to the node itself.
///
/// The index borrows the forest; it is rebuilt whenever the host supplies
/// new rows. Nodes without an identifier are left out but their descendants
/// are still visited. If two nodes share an identifier the first one in
/// pre-order wins.
#[derive(Debug)]
pub struct RowIndex<'a, N> {
    entries: HashMap<RowKey, IndexEntry<'a, N>>,
}

impl<'a, N: GridNode> RowIndex<'a, N> {
    /// Index every node of the forest.
    pub fn build(roots: &'a [N]) -> Self {
        let mut index = Self {
            entries: HashMap::new(),
        };
        index.visit(roots, None, 0);
        index
    }

    fn visit(&mut self, nodes: &'a [N], parent: Option<&RowKey>, level: usize) {
        for node in nodes {
            let key = node.key();
            if let Some(key) = &key {
                if self.entries.contains_key(key) {
                    tracing::debug!(target: targets::MODEL, %key, "duplicate row id ignored");
                } else {
                    self.entries.insert(
                        key.clone(),
                        IndexEntry {
                            node,
                            parent: parent.cloned(),
                            level,
                        },
                    );
                }
            }
            if let Some(children) = node.children() {
                self.visit(children, key.as_ref().or(parent), level + 1);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&'a N> {
        self.entries.get(key).map(|entry| entry.node)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Key of the nearest keyed ancestor.
    pub fn parent_of(&self, key: &str) -> Option<&RowKey> {
        self.entries.get(key)?.parent.as_ref()
    }

    /// Structural depth of the node, 0 for roots.
    pub fn level_of(&self, key: &str) -> Option<usize> {
        self.entries.get(key).map(|entry| entry.level)
    }

    /// Keyed ancestors of a node, nearest first.
    pub fn ancestors(&self, key: &str) -> Vec<RowKey> {
        let mut chain = Vec::new();
        let mut current = self.parent_of(key);
        while let Some(parent) = current {
            chain.push(parent.clone());
            current = self.parent_of(parent.as_str());
        }
        chain
    }

    /// Whether `ancestor` sits somewhere above `key`.
    pub fn is_ancestor(&self, ancestor: &str, key: &str) -> bool {
        self.ancestors(key).iter().any(|k| k.as_str() == ancestor)
    }

    /// Keys of every node that has a non-empty child sequence.
    pub fn expandable_keys(&self) -> HashSet<RowKey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.node.has_children())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RowKey> {
        self.entries.keys()
    }
}
