//! The tree grid orchestrator.
//!
//! [`TreeGrid`] owns every piece of UI state of one grid (expansion, drag
//! gesture, editors) and composes it with the host's rows and columns into a
//! [`GridView`] on demand. The host drives it with input events and reads
//! notifications from [`GridSignals`].
//!
//! The grid is a cheap, cloneable handle. State lives behind a mutex so the
//! futures returned for host callbacks can finish their transition after the
//! host resolves them; no lock is held while host futures run, and signals are
//! emitted only after the lock is released.
//!
//! # Example
//!
//! ```
//! use horizon_treegrid::prelude::*;
//!
//! let rows = vec![
//!     Row::new(1, "folder").with_field("name", "Docs").with_children(vec![
//!         Row::new(2, "file").with_field("name", "a.txt"),
//!         Row::new(3, "file").with_field("name", "b.txt"),
//!     ]),
//! ];
//! let grid = TreeGrid::new(rows, TreeGridConfig::new().with_column(ColumnDef::new("name", "Name")));
//!
//! grid.signals().row_toggled.connect(|(id, expanded)| println!("{id} expanded: {expanded}"));
//!
//! assert_eq!(grid.render().row_keys(), ["1", "2", "3"]);
//! grid.toggle_row(1).unwrap();
//! assert_eq!(grid.render().row_keys(), ["1"]);
//! ```

mod config;
mod drag;
mod edit;
mod render;
mod signals;
mod view;

use std::collections::HashSet;
use std::sync::Arc;

use horizon_treegrid_core::logging::targets;
use parking_lot::Mutex;

use crate::drag_drop::{DragDropManager, ZoneId};
use crate::editing::{CellKey, EditingState, resolve_edit_mode};
use crate::error::{GridError, GridResult};
use crate::expansion::{ExpansionState, Toggle};
use crate::model::{ColumnDef, EditMode, GridNode, RowId, RowIndex, RowKey};
use crate::settings::GridSettings;

use config::Callbacks;

pub use config::{
    CanDragFn, CanDropFn, HostFuture, OnDropFn, OnEditCommitFn, RowAction, RowActionsFn,
    TreeGridConfig, ValidDropTargetsFn, ValidTargets, host_ok,
};
pub use drag::{DragEnd, DragStart, DropIntent, PendingDrop, ValidTargetsTask};
pub use edit::CommitFuture;
pub use signals::GridSignals;
pub use view::{CellDragView, CellView, ColumnHeader, EditorView, GridView, RowView};

/// Keys the grid reacts to on a focused row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridKey {
    /// Toggle the row.
    Enter,
    /// Toggle the row.
    Space,
    /// Cancel the open edit, or the drag if no edit is open.
    Escape,
}

/// Something to tell the host once the state lock is released.
enum Notice {
    Changed,
    RowToggled(RowId, bool),
    RowEditorsClosed(RowId),
    DragStarted(RowId),
    HoverChanged(Option<ZoneId>),
}

struct GridState<N> {
    rows: Vec<N>,
    columns: Vec<ColumnDef<N>>,
    view_mode: String,
    settings: GridSettings,
    footer: Option<String>,
    expansion: ExpansionState,
    editing: EditingState,
    drag: DragDropManager,
}

impl<N: GridNode> GridState<N> {
    fn in_edit_view(&self) -> bool {
        self.view_mode == self.settings.edit_view_mode
    }

    /// Forget auto-closed cells that no longer resolve to unlocked, so they
    /// open again once the host designates them anew.
    fn release_auto_closed(&mut self) {
        let in_edit_view = self.in_edit_view();
        let index = RowIndex::build(&self.rows);
        let columns = &self.columns;
        self.editing.retain_auto_closed(|key| {
            let Some(node) = index.get(key.row.as_str()) else {
                return false;
            };
            columns
                .iter()
                .find(|column| column.id() == key.column)
                .is_some_and(|column| cell_edit_mode(column, node, in_edit_view) == Some(EditMode::Unlocked))
        });
    }

    /// Whether any visible unlocked cell of the row still shows its editor.
    fn has_open_unlocked(&self, row: &RowKey, index: &RowIndex<'_, N>) -> bool {
        let Some(node) = index.get(row.as_str()) else {
            return false;
        };
        let in_edit_view = self.in_edit_view();
        self.columns
            .iter()
            .filter(|column| column.is_visible(&self.view_mode))
            .filter(|column| cell_edit_mode(column, node, in_edit_view) == Some(EditMode::Unlocked))
            .any(|column| {
                let key = CellKey::new(row.clone(), column.id());
                self.editing.cell_mode(&key, Some(EditMode::Unlocked)).is_editing()
            })
    }
}

/// Resolve the edit policy of one cell.
fn cell_edit_mode<N: GridNode>(column: &ColumnDef<N>, node: &N, in_edit_view: bool) -> Option<EditMode> {
    resolve_edit_mode(column.explicit_edit_mode(node), in_edit_view, column.is_editable(node))
}

fn find_column<'a, N: GridNode>(columns: &'a [ColumnDef<N>], id: &str) -> GridResult<&'a ColumnDef<N>> {
    columns
        .iter()
        .find(|column| column.id() == id)
        .ok_or_else(|| GridError::unknown_column(id))
}

fn push_toggles<N: GridNode>(notices: &mut Vec<Notice>, index: &RowIndex<'_, N>, toggles: &[Toggle]) {
    for toggle in toggles {
        if let Some(id) = index.get(toggle.key.as_str()).and_then(GridNode::id) {
            notices.push(Notice::RowToggled(id, toggle.expanded));
        }
    }
    if !toggles.is_empty() {
        notices.push(Notice::Changed);
    }
}

struct Shared<N> {
    state: Mutex<GridState<N>>,
    callbacks: Callbacks<N>,
    signals: GridSignals,
}

/// A headless tree data grid.
///
/// Row identifiers are accepted as anything convertible to a [`RowKey`]
/// (`i64`, `&str`, `&RowId`, ...); a numeric id and its string form address
/// the same row.
pub struct TreeGrid<N> {
    shared: Arc<Shared<N>>,
}

impl<N> Clone for TreeGrid<N> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<N: GridNode + Clone> TreeGrid<N> {
    /// Create a grid over `rows`.
    pub fn new(rows: Vec<N>, config: TreeGridConfig<N>) -> Self {
        let TreeGridConfig {
            columns,
            settings,
            view_mode,
            controlled_expansion,
            footer,
            callbacks,
        } = config;

        let expansion = match controlled_expansion {
            Some(expanded) => ExpansionState::controlled(expanded),
            None => ExpansionState::new(),
        };
        let drag = DragDropManager::new(settings.drag_activation, settings.auto_expand_delay());
        tracing::debug!(
            target: targets::GRID,
            roots = rows.len(),
            columns = columns.len(),
            %view_mode,
            "tree grid created"
        );

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(GridState {
                    rows,
                    columns,
                    view_mode,
                    settings,
                    footer,
                    expansion,
                    editing: EditingState::new(),
                    drag,
                }),
                callbacks,
                signals: GridSignals::new(),
            }),
        }
    }

    /// Signals for host notification.
    pub fn signals(&self) -> &GridSignals {
        &self.shared.signals
    }

    /// Run a state transition, then emit what it produced.
    fn update<R>(&self, f: impl FnOnce(&mut GridState<N>, &Callbacks<N>, &mut Vec<Notice>) -> R) -> R {
        let mut notices = Vec::new();
        let result = {
            let mut state = self.shared.state.lock();
            f(&mut state, &self.shared.callbacks, &mut notices)
        };
        self.emit(notices);
        result
    }

    fn read<R>(&self, f: impl FnOnce(&GridState<N>) -> R) -> R {
        f(&self.shared.state.lock())
    }

    fn emit(&self, notices: Vec<Notice>) {
        if notices.is_empty() {
            return;
        }
        let signals = &self.shared.signals;
        for notice in notices {
            match notice {
                Notice::Changed => {}
                Notice::RowToggled(id, expanded) => signals.row_toggled.emit((id, expanded)),
                Notice::RowEditorsClosed(id) => signals.row_editors_closed.emit(id),
                Notice::DragStarted(id) => signals.drag_started.emit(id),
                Notice::HoverChanged(zone) => signals.hover_changed.emit(zone),
            }
        }
        signals.changed.emit(());
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Replace the forest.
    ///
    /// Editor state of rows that disappeared is dropped, and a drag whose
    /// source disappeared is cancelled.
    pub fn set_rows(&self, rows: Vec<N>) {
        self.update(|state, _, notices| {
            state.rows = rows;
            let index = RowIndex::build(&state.rows);
            state.editing.retain_rows(|key| index.contains(key.as_str()));
            let source_gone = state
                .drag
                .session()
                .is_some_and(|session| !index.contains(session.active().as_str()));
            if source_gone {
                tracing::debug!(target: targets::GRID, "drag source removed; drag cancelled");
                state.drag.cancel();
                notices.push(Notice::HoverChanged(None));
            }
            tracing::debug!(target: targets::GRID, indexed = index.len(), "rows replaced");
            state.release_auto_closed();
            notices.push(Notice::Changed);
        });
    }

    /// A copy of the row with this id, searched across the whole forest.
    pub fn row(&self, id: impl Into<RowKey>) -> Option<N> {
        let key = id.into();
        self.read(|state| RowIndex::build(&state.rows).get(key.as_str()).cloned())
    }

    pub fn set_columns(&self, columns: Vec<ColumnDef<N>>) {
        self.update(|state, _, notices| {
            state.columns = columns;
            state.release_auto_closed();
            notices.push(Notice::Changed);
        });
    }

    pub fn view_mode(&self) -> String {
        self.read(|state| state.view_mode.clone())
    }

    /// Switch the view mode; column visibility and edit modes follow it.
    pub fn set_view_mode(&self, view_mode: impl Into<String>) {
        let view_mode = view_mode.into();
        self.update(|state, _, notices| {
            if state.view_mode == view_mode {
                return;
            }
            tracing::debug!(target: targets::GRID, from = %state.view_mode, to = %view_mode, "view mode changed");
            state.view_mode = view_mode;
            state.release_auto_closed();
            notices.push(Notice::Changed);
        });
    }

    pub fn set_footer(&self, footer: Option<String>) {
        self.update(|state, _, notices| {
            state.footer = footer;
            notices.push(Notice::Changed);
        });
    }

    pub fn settings(&self) -> GridSettings {
        self.read(|state| state.settings.clone())
    }

    pub fn set_settings(&self, settings: GridSettings) {
        self.update(|state, _, notices| {
            state.drag.set_activation(settings.drag_activation);
            state.drag.set_auto_expand_delay(settings.auto_expand_delay());
            state.settings = settings;
            state.release_auto_closed();
            notices.push(Notice::Changed);
        });
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Flip a row's expansion.
    ///
    /// Returns the new state, or `None` if the row has no children. In
    /// controlled mode the change is only reported through
    /// [`GridSignals::row_toggled`].
    pub fn toggle_row(&self, id: impl Into<RowKey>) -> GridResult<Option<bool>> {
        let key = id.into();
        self.update(|state, _, notices| {
            let index = RowIndex::build(&state.rows);
            if !index.contains(key.as_str()) {
                return Err(GridError::unknown_row(&key));
            }
            let toggle = state.expansion.toggle(&key, &index);
            let expanded = toggle.as_ref().map(|toggle| toggle.expanded);
            push_toggles(notices, &index, toggle.as_slice());
            Ok(expanded)
        })
    }

    /// Expand or collapse a row. Returns `true` if that is a change.
    pub fn set_row_expanded(&self, id: impl Into<RowKey>, expanded: bool) -> GridResult<bool> {
        let key = id.into();
        self.update(|state, _, notices| {
            let index = RowIndex::build(&state.rows);
            if !index.contains(key.as_str()) {
                return Err(GridError::unknown_row(&key));
            }
            let toggle = state.expansion.set_expanded(&key, expanded, &index);
            let changed = toggle.is_some();
            push_toggles(notices, &index, toggle.as_slice());
            Ok(changed)
        })
    }

    pub fn expand_all(&self) {
        self.update(|state, _, notices| {
            let index = RowIndex::build(&state.rows);
            let toggles = state.expansion.expand_all(&index);
            push_toggles(notices, &index, &toggles);
        });
    }

    pub fn collapse_all(&self) {
        self.update(|state, _, notices| {
            let index = RowIndex::build(&state.rows);
            let toggles = state.expansion.collapse_all(&index);
            push_toggles(notices, &index, &toggles);
        });
    }

    /// Expand every ancestor of a row so it is on screen.
    pub fn reveal_row(&self, id: impl Into<RowKey>) -> GridResult<()> {
        let key = id.into();
        self.update(|state, _, notices| {
            let index = RowIndex::build(&state.rows);
            if !index.contains(key.as_str()) {
                return Err(GridError::unknown_row(&key));
            }
            let toggles = state.expansion.reveal(&key, &index);
            push_toggles(notices, &index, &toggles);
            Ok(())
        })
    }

    /// Hand the expanded set to the host (`Some`) or take it back (`None`).
    pub fn set_controlled_expansion(&self, expanded: Option<HashSet<RowKey>>) {
        self.update(|state, _, notices| {
            state.expansion.set_controlled(expanded);
            notices.push(Notice::Changed);
        });
    }

    pub fn is_row_expanded(&self, id: impl Into<RowKey>) -> bool {
        let key = id.into();
        self.read(|state| {
            let index = RowIndex::build(&state.rows);
            state.expansion.is_expanded(&key, &index)
        })
    }

    /// Keys of every expanded row, with the untouched "all expanded" state
    /// written out.
    pub fn expanded_rows(&self) -> HashSet<RowKey> {
        self.read(|state| {
            let index = RowIndex::build(&state.rows);
            state.expansion.expanded_keys(&index)
        })
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Handle a key pressed while `row` has focus. Returns `true` if the key
    /// did something.
    pub fn handle_key(&self, row: impl Into<RowKey>, key: GridKey) -> GridResult<bool> {
        match key {
            GridKey::Enter | GridKey::Space => Ok(self.toggle_row(row)?.is_some()),
            GridKey::Escape => {
                if self.cancel_active_edit() {
                    return Ok(true);
                }
                Ok(self.cancel_drag())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn forest() -> Vec<Row> {
        vec![
            Row::new(1, "folder").with_children(vec![
                Row::new(2, "file"),
                Row::new(3, "folder").with_children(vec![Row::new(4, "file")]),
            ]),
        ]
    }

    fn grid() -> TreeGrid<Row> {
        TreeGrid::new(forest(), TreeGridConfig::new().with_column(ColumnDef::new("id", "Id")))
    }

    #[test]
    fn test_toggle_reports_and_notifies() {
        let grid = grid();
        let toggled = Arc::new(Mutex::new(Vec::new()));
        let changed = Arc::new(Mutex::new(0));
        {
            let toggled = Arc::clone(&toggled);
            grid.signals().row_toggled.connect(move |args| toggled.lock().push(args.clone()));
            let changed = Arc::clone(&changed);
            grid.signals().changed.connect(move |_| *changed.lock() += 1);
        }

        assert_eq!(grid.toggle_row(3), Ok(Some(false)));
        assert_eq!(*toggled.lock(), vec![(RowId::from(3), false)]);
        assert_eq!(*changed.lock(), 1);

        // Leaves do not toggle and do not notify.
        assert_eq!(grid.toggle_row(2), Ok(None));
        assert_eq!(*changed.lock(), 1);
    }

    #[test]
    fn test_unknown_row() {
        let grid = grid();
        assert_eq!(grid.toggle_row(99), Err(GridError::unknown_row(99)));
        assert!(grid.reveal_row("nope").is_err());
    }

    #[test]
    fn test_controlled_expansion_only_reports() {
        let grid = TreeGrid::new(
            forest(),
            TreeGridConfig::new().with_controlled_expansion([RowKey::from(1)]),
        );
        assert!(grid.is_row_expanded(1));
        assert!(!grid.is_row_expanded(3));

        assert_eq!(grid.toggle_row(3), Ok(Some(true)));
        assert!(!grid.is_row_expanded(3));

        grid.set_controlled_expansion(Some([RowKey::from(1), RowKey::from(3)].into()));
        assert!(grid.is_row_expanded(3));
    }

    #[test]
    fn test_handle_key() {
        let grid = grid();
        assert_eq!(grid.handle_key(1, GridKey::Enter), Ok(true));
        assert!(!grid.is_row_expanded(1));
        assert_eq!(grid.handle_key(1, GridKey::Space), Ok(true));
        assert!(grid.is_row_expanded(1));
        assert_eq!(grid.handle_key(2, GridKey::Enter), Ok(false));
        assert_eq!(grid.handle_key(2, GridKey::Escape), Ok(false));
    }

    #[test]
    fn test_reveal_expands_ancestors() {
        let grid = grid();
        grid.collapse_all();
        assert!(!grid.is_row_expanded(1));

        grid.reveal_row(4).unwrap();
        assert!(grid.is_row_expanded(1));
        assert!(grid.is_row_expanded(3));
    }

    #[test]
    fn test_row_lookup() {
        let grid = grid();
        assert_eq!(grid.row(4).map(|row| row.node_type), Some("file".to_string()));
        assert!(grid.row(5).is_none());
    }

    #[test]
    fn test_set_view_mode_is_idempotent() {
        let grid = grid();
        let changed = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&changed);
        grid.signals().changed.connect(move |_| *counter.lock() += 1);

        grid.set_view_mode("edit");
        grid.set_view_mode("edit");
        assert_eq!(grid.view_mode(), "edit");
        assert_eq!(*changed.lock(), 1);
    }
}
