//! Notifications a grid sends to its host.

use horizon_treegrid_core::Signal;

use crate::drag_drop::ZoneId;
use crate::model::RowId;

/// Signals emitted by a [`TreeGrid`](super::TreeGrid).
///
/// Every signal is emitted after the grid has released its internal lock, so
/// slots may call back into the grid.
#[derive(Debug, Default)]
pub struct GridSignals {
    /// Emitted after any state transition that changes what `render` returns.
    pub changed: Signal<()>,
    /// Emitted with `(row, expanded)` for every expansion change, including
    /// changes only reported in controlled mode.
    pub row_toggled: Signal<(RowId, bool)>,
    /// Emitted when the last open unlocked editor of a row closes.
    pub row_editors_closed: Signal<RowId>,
    /// Emitted when a drag becomes active.
    pub drag_started: Signal<RowId>,
    /// Emitted when the drop zone under the pointer changes.
    pub hover_changed: Signal<Option<ZoneId>>,
}

impl GridSignals {
    pub fn new() -> Self {
        Self::default()
    }
}
