//! Inline editing on the grid.

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use horizon_treegrid_core::logging::targets;

use super::config::host_ok;
use super::{GridState, Notice, TreeGrid, cell_edit_mode, find_column};
use crate::editing::{CellKey, CellMode, CommitTicket};
use crate::error::{GridError, GridResult, HostError};
use crate::model::{CellValue, EditMode, GridNode, RowIndex, RowKey};

/// Resolves once the host has accepted or rejected a commit and the grid has
/// applied the outcome.
pub type CommitFuture = BoxFuture<'static, GridResult<()>>;

impl<N: GridNode> GridState<N> {
    fn current_cell_mode(&self, key: &CellKey) -> GridResult<(CellMode, Option<EditMode>)> {
        let index = RowIndex::build(&self.rows);
        let node = index.get(key.row.as_str()).ok_or_else(|| GridError::unknown_row(&key.row))?;
        let column = find_column(&self.columns, &key.column)?;
        let mode = cell_edit_mode(column, node, self.in_edit_view());
        Ok((self.editing.cell_mode(key, mode), mode))
    }

    /// After an unlocked editor closed, report the row if that was its last.
    fn notify_if_row_closed(&self, row: &RowKey, notices: &mut Vec<Notice>) {
        let index = RowIndex::build(&self.rows);
        if self.has_open_unlocked(row, &index) {
            return;
        }
        if let Some(id) = index.get(row.as_str()).and_then(GridNode::id) {
            tracing::debug!(target: targets::EDITING, %row, "all unlocked editors of row closed");
            notices.push(Notice::RowEditorsClosed(id));
        }
    }
}

impl<N: GridNode + Clone> TreeGrid<N> {
    /// What a cell currently shows.
    pub fn cell_mode(&self, row: impl Into<RowKey>, column: &str) -> GridResult<CellMode> {
        let key = CellKey::new(row, column);
        self.read(|state| state.current_cell_mode(&key).map(|(mode, _)| mode))
    }

    /// The value shown in the cell's open editor.
    ///
    /// Falls back to the row's value when nothing has been typed yet, and is
    /// `None` when the cell shows no editor.
    pub fn edit_value(&self, row: impl Into<RowKey>, column: &str) -> GridResult<Option<CellValue>> {
        let key = CellKey::new(row, column);
        self.read(|state| {
            let (mode, _) = state.current_cell_mode(&key)?;
            if !mode.is_editing() {
                return Ok(None);
            }
            if let Some(value) = state.editing.value(&key) {
                return Ok(Some(value.clone()));
            }
            let index = RowIndex::build(&state.rows);
            let node = index.get(key.row.as_str()).ok_or_else(|| GridError::unknown_row(&key.row))?;
            Ok(Some(find_column(&state.columns, &key.column)?.value(node)))
        })
    }

    /// Open a cell's editor on request (for example on double-click).
    ///
    /// The editor is seeded with the row's value. Any other editor opened this
    /// way is abandoned without a commit. Returns `false` for cells that are
    /// not editable and for cells whose locked editor is already showing.
    pub fn start_edit(&self, row: impl Into<RowKey>, column: &str) -> GridResult<bool> {
        let key = CellKey::new(row, column);
        self.update(|state, _, notices| {
            let index = RowIndex::build(&state.rows);
            let node = index.get(key.row.as_str()).ok_or_else(|| GridError::unknown_row(&key.row))?;
            let column = find_column(&state.columns, &key.column)?;
            if !column.is_editable(node) && column.explicit_edit_mode(node).is_none() {
                tracing::trace!(target: targets::EDITING, cell = %key, "cell is not editable");
                return Ok(false);
            }
            if cell_edit_mode(column, node, state.in_edit_view()) == Some(EditMode::Locked) {
                tracing::trace!(target: targets::EDITING, cell = %key, "cell already shows a locked editor");
                return Ok(false);
            }
            let seed = column.value(node);
            state.editing.start_edit(key, seed);
            notices.push(Notice::Changed);
            Ok(true)
        })
    }

    /// Record a change typed into an open editor.
    ///
    /// If the column auto-commits and the cell is not locked, the first
    /// change of the editing session commits right away and the commit is
    /// returned; later changes in the same session only update the value.
    pub fn update_edit(
        &self,
        row: impl Into<RowKey>,
        column: &str,
        value: CellValue,
    ) -> GridResult<Option<CommitFuture>> {
        let key = CellKey::new(row, column);
        let auto_commit = self.update(|state, _, notices| -> GridResult<bool> {
            let (mode, _) = state.current_cell_mode(&key)?;
            if !mode.is_editing() {
                return Err(not_editing(&key));
            }
            state.editing.update_value(&key, value.clone());
            notices.push(Notice::Changed);

            let index = RowIndex::build(&state.rows);
            let auto = index
                .get(key.row.as_str())
                .zip(find_column(&state.columns, &key.column).ok())
                .is_some_and(|(node, column)| column.auto_commits(node));
            Ok(auto && mode != CellMode::Locked && state.editing.claim_auto_commit(&key))
        })?;

        if !auto_commit {
            return Ok(None);
        }
        tracing::trace!(target: targets::EDITING, cell = %key, "auto-commit on change");
        self.commit_cell(key, value).map(Some)
    }

    /// Commit a cell's editor value.
    ///
    /// The value goes through the column parser and then to the host. The
    /// returned future resolves once the host answered: on success the editor
    /// closes (unless locked); on failure it stays open with `value` and the
    /// host's error is returned. A parse failure is handled like a host
    /// failure, without calling the host.
    pub fn commit_edit(&self, row: impl Into<RowKey>, column: &str, value: CellValue) -> GridResult<CommitFuture> {
        self.commit_cell(CellKey::new(row, column), value)
    }

    fn commit_cell(&self, key: CellKey, raw: CellValue) -> GridResult<CommitFuture> {
        let (ticket, node, parsed) = self.update(|state, _, notices| -> GridResult<(CommitTicket, N, CellValue)> {
            let (mode, edit_mode) = state.current_cell_mode(&key)?;
            if !mode.is_editing() {
                return Err(not_editing(&key));
            }
            let ticket = state.editing.begin_commit(key.clone(), edit_mode);
            let index = RowIndex::build(&state.rows);
            let node = index.get(key.row.as_str()).ok_or_else(|| GridError::unknown_row(&key.row))?;
            let column = find_column(&state.columns, &key.column)?;
            match column.parse(&raw) {
                Ok(parsed) => Ok((ticket, node.clone(), parsed)),
                Err(message) => {
                    tracing::warn!(target: targets::EDITING, cell = %key, %message, "edit value rejected by parser");
                    state.editing.commit_failed(&ticket, raw.clone());
                    notices.push(Notice::Changed);
                    Err(GridError::parse(key.column.clone(), message))
                }
            }
        })?;

        tracing::trace!(target: targets::EDITING, cell = %key, "commit sent to host");
        let host = match &self.shared.callbacks.on_edit_commit {
            Some(on_edit_commit) => on_edit_commit(&node, &key.column, parsed),
            None => host_ok(),
        };
        let grid = self.clone();
        Ok(async move {
            let result = host.await;
            grid.finish_commit(&ticket, raw, result)
        }
        .boxed())
    }

    fn finish_commit(&self, ticket: &CommitTicket, raw: CellValue, result: Result<(), HostError>) -> GridResult<()> {
        self.update(|state, _, notices| {
            notices.push(Notice::Changed);
            match result {
                Ok(()) => {
                    tracing::debug!(target: targets::EDITING, cell = %ticket.key(), "commit succeeded");
                    if state.editing.commit_succeeded(ticket, &raw) {
                        state.notify_if_row_closed(&ticket.key().row, notices);
                    }
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(target: targets::EDITING, cell = %ticket.key(), error = %err, "commit failed; editor kept open");
                    state.editing.commit_failed(ticket, raw);
                    Err(GridError::Commit(err))
                }
            }
        })
    }

    /// Cancel a cell's edit.
    ///
    /// Unlocked and user-opened editors close and drop their value; a locked
    /// editor stays open and shows the row's value again.
    pub fn cancel_edit(&self, row: impl Into<RowKey>, column: &str) -> GridResult<()> {
        let key = CellKey::new(row, column);
        self.update(|state, _, notices| {
            let (mode, edit_mode) = state.current_cell_mode(&key)?;
            if !mode.is_editing() {
                return Err(not_editing(&key));
            }
            tracing::trace!(target: targets::EDITING, cell = %key, "edit cancelled");
            if state.editing.cancel(&key, edit_mode) {
                state.notify_if_row_closed(&key.row, notices);
            }
            notices.push(Notice::Changed);
            Ok(())
        })
    }

    /// Close the editor opened with [`start_edit`](Self::start_edit), if any,
    /// without committing.
    pub fn cancel_active_edit(&self) -> bool {
        self.update(|state, _, notices| {
            let Some(key) = state.editing.take_active() else {
                return false;
            };
            tracing::trace!(target: targets::EDITING, cell = %key, "open edit abandoned");
            notices.push(Notice::Changed);
            true
        })
    }
}

fn not_editing(key: &CellKey) -> GridError {
    GridError::NotEditing {
        row: key.row.to_string(),
        column: key.column.clone(),
    }
}
