//! Host-facing grid configuration.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::drag_drop::DropZone;
use crate::error::HostError;
use crate::model::{CellValue, ColumnDef, GridNode, RowId, RowKey};
use crate::settings::GridSettings;

/// Future returned by host persistence callbacks.
pub type HostFuture = BoxFuture<'static, Result<(), HostError>>;

/// A host future that has already succeeded, for synchronous callbacks.
pub fn host_ok() -> HostFuture {
    futures_util::future::ready(Ok(())).boxed()
}

/// The host's answer to "where may this row be dropped?".
pub enum ValidTargets {
    /// The set is known now.
    Ready(HashSet<RowId>),
    /// The set arrives later.
    Pending(BoxFuture<'static, Result<HashSet<RowId>, HostError>>),
}

impl fmt::Debug for ValidTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidTargets::Ready(set) => f.debug_tuple("Ready").field(set).finish(),
            ValidTargets::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// One entry of a row's trailing actions column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

impl RowAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            enabled: true,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

pub type CanDragFn<N> = Arc<dyn Fn(&N) -> bool + Send + Sync>;
pub type CanDropFn<N> = Arc<dyn Fn(&N, &N, DropZone) -> bool + Send + Sync>;
pub type ValidDropTargetsFn<N> = Arc<dyn Fn(&N) -> ValidTargets + Send + Sync>;
pub type OnDropFn = Arc<dyn Fn(&RowId, &RowId, DropZone) -> HostFuture + Send + Sync>;
pub type OnEditCommitFn<N> = Arc<dyn Fn(&N, &str, CellValue) -> HostFuture + Send + Sync>;
pub type RowActionsFn<N> = Arc<dyn Fn(&N) -> Vec<RowAction> + Send + Sync>;

/// Everything the host configures on a grid.
///
/// Predicates and callbacks are optional; an omitted one falls back to the
/// permissive default noted on its builder method. Predicates run while the
/// grid holds its state lock and must not call back into the grid.
///
/// ```
/// use horizon_treegrid::prelude::*;
///
/// let config = TreeGridConfig::<Row>::new()
///     .with_column(ColumnDef::new("name", "Name"))
///     .with_can_drop(|_source, target, zone| zone != DropZone::Inside || target.node_type == "folder")
///     .with_on_drop(|source, target, zone| {
///         println!("move {source} {zone} {target}");
///         host_ok()
///     });
/// ```
pub struct TreeGridConfig<N> {
    pub(crate) columns: Vec<ColumnDef<N>>,
    pub(crate) settings: GridSettings,
    pub(crate) view_mode: String,
    pub(crate) controlled_expansion: Option<HashSet<RowKey>>,
    pub(crate) footer: Option<String>,
    pub(crate) callbacks: Callbacks<N>,
}

pub(crate) struct Callbacks<N> {
    pub(crate) can_drag: Option<CanDragFn<N>>,
    pub(crate) can_drop: Option<CanDropFn<N>>,
    pub(crate) valid_drop_targets: Option<ValidDropTargetsFn<N>>,
    pub(crate) on_drop: Option<OnDropFn>,
    pub(crate) on_edit_commit: Option<OnEditCommitFn<N>>,
    pub(crate) row_actions: Option<RowActionsFn<N>>,
}

impl<N> Default for Callbacks<N> {
    fn default() -> Self {
        Self {
            can_drag: None,
            can_drop: None,
            valid_drop_targets: None,
            on_drop: None,
            on_edit_commit: None,
            row_actions: None,
        }
    }
}

impl<N: GridNode> Callbacks<N> {
    pub(crate) fn can_drag(&self, node: &N) -> bool {
        self.can_drag.as_ref().is_none_or(|can_drag| can_drag(node))
    }

    pub(crate) fn can_drop(&self, source: &N, target: &N, zone: DropZone) -> bool {
        self.can_drop
            .as_ref()
            .is_none_or(|can_drop| can_drop(source, target, zone))
    }
}

impl<N: GridNode> Default for TreeGridConfig<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GridNode> TreeGridConfig<N> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            settings: GridSettings::default(),
            view_mode: String::new(),
            controlled_expansion: None,
            footer: None,
            callbacks: Callbacks::default(),
        }
    }

    pub fn with_column(mut self, column: ColumnDef<N>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnDef<N>>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn with_settings(mut self, settings: GridSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the initial view mode consulted by column predicates.
    pub fn with_view_mode(mut self, view_mode: impl Into<String>) -> Self {
        self.view_mode = view_mode.into();
        self
    }

    /// Let the host own the expanded set; toggles are only reported.
    pub fn with_controlled_expansion(mut self, expanded: impl IntoIterator<Item = RowKey>) -> Self {
        self.controlled_expansion = Some(expanded.into_iter().collect());
        self
    }

    /// Content appended after all rows.
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    /// Whether a row may be dragged. Omitted: every keyed row may.
    pub fn with_can_drag<F>(mut self, can_drag: F) -> Self
    where
        F: Fn(&N) -> bool + Send + Sync + 'static,
    {
        self.callbacks.can_drag = Some(Arc::new(can_drag));
        self
    }

    /// Whether `source` may be dropped into `zone` of `target`. Omitted:
    /// always.
    pub fn with_can_drop<F>(mut self, can_drop: F) -> Self
    where
        F: Fn(&N, &N, DropZone) -> bool + Send + Sync + 'static,
    {
        self.callbacks.can_drop = Some(Arc::new(can_drop));
        self
    }

    /// The rows a dragged row may land on, asked once per drag. Omitted: no
    /// extra restriction.
    pub fn with_valid_drop_targets<F>(mut self, valid_drop_targets: F) -> Self
    where
        F: Fn(&N) -> ValidTargets + Send + Sync + 'static,
    {
        self.callbacks.valid_drop_targets = Some(Arc::new(valid_drop_targets));
        self
    }

    /// Called with `(source, target, zone)` once a drop passes every check.
    pub fn with_on_drop<F>(mut self, on_drop: F) -> Self
    where
        F: Fn(&RowId, &RowId, DropZone) -> HostFuture + Send + Sync + 'static,
    {
        self.callbacks.on_drop = Some(Arc::new(on_drop));
        self
    }

    /// Called with `(row, column id, parsed value)` to persist an edit.
    /// Omitted: commits succeed immediately.
    pub fn with_on_edit_commit<F>(mut self, on_edit_commit: F) -> Self
    where
        F: Fn(&N, &str, CellValue) -> HostFuture + Send + Sync + 'static,
    {
        self.callbacks.on_edit_commit = Some(Arc::new(on_edit_commit));
        self
    }

    /// Content of the trailing actions column. Omitted: no actions column.
    pub fn with_row_actions<F>(mut self, row_actions: F) -> Self
    where
        F: Fn(&N) -> Vec<RowAction> + Send + Sync + 'static,
    {
        self.callbacks.row_actions = Some(Arc::new(row_actions));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    #[test]
    fn test_permissive_defaults() {
        let config = TreeGridConfig::<Row>::new();
        let a = Row::new(1, "file");
        let b = Row::new(2, "file");

        assert!(config.callbacks.can_drag(&a));
        assert!(config.callbacks.can_drop(&a, &b, DropZone::Inside));
        assert!(config.callbacks.row_actions.is_none());
    }

    #[test]
    fn test_builder() {
        let config = TreeGridConfig::<Row>::new()
            .with_column(ColumnDef::new("name", "Name"))
            .with_view_mode("edit")
            .with_footer("3 items")
            .with_can_drag(|row| row.node_type != "locked")
            .with_can_drop(|_, target, zone| zone != DropZone::Inside || target.node_type == "folder");

        assert_eq!(config.columns.len(), 1);
        assert_eq!(config.view_mode, "edit");
        assert!(!config.callbacks.can_drag(&Row::new(1, "locked")));
        assert!(!config.callbacks.can_drop(&Row::new(1, "a"), &Row::new(2, "file"), DropZone::Inside));
        assert!(config.callbacks.can_drop(&Row::new(1, "a"), &Row::new(2, "file"), DropZone::After));
    }

    #[tokio::test]
    async fn test_host_ok() {
        assert_eq!(host_ok().await, Ok(()));
    }
}
