//! Per-cell edit modes.

use std::fmt;

use crate::model::{EditMode, RowKey};

/// Identifies one cell: a row key plus a column id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: RowKey,
    pub column: String,
}

impl CellKey {
    pub fn new(row: impl Into<RowKey>, column: impl Into<String>) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.row, self.column)
    }
}

/// Resolve the edit policy of a cell.
///
/// An explicit column policy wins. Otherwise an editable cell is locked open
/// while the grid shows the edit view, and off in every other view.
pub fn resolve_edit_mode(explicit: Option<EditMode>, in_edit_view: bool, editable: bool) -> Option<EditMode> {
    explicit.or((in_edit_view && editable).then_some(EditMode::Locked))
}

/// What a cell currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellMode {
    /// Read view.
    Off,
    /// Editor that never closes.
    Locked,
    /// Unlocked editor that has not been committed or cancelled yet.
    UnlockedOpen,
    /// Unlocked cell that already finished its edit; shows the read view.
    UnlockedClosed,
    /// Editor opened on request (for example by a double-click).
    UserOpen,
}

impl CellMode {
    /// Whether the cell shows an editor.
    pub fn is_editing(self) -> bool {
        matches!(self, CellMode::Locked | CellMode::UnlockedOpen | CellMode::UserOpen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_edit_mode() {
        assert_eq!(resolve_edit_mode(Some(EditMode::Unlocked), true, true), Some(EditMode::Unlocked));
        assert_eq!(resolve_edit_mode(None, true, true), Some(EditMode::Locked));
        assert_eq!(resolve_edit_mode(None, true, false), None);
        assert_eq!(resolve_edit_mode(None, false, true), None);
    }

    #[test]
    fn test_is_editing() {
        assert!(CellMode::Locked.is_editing());
        assert!(CellMode::UserOpen.is_editing());
        assert!(!CellMode::UnlockedClosed.is_editing());
        assert!(!CellMode::Off.is_editing());
    }

    #[test]
    fn test_cell_key_display() {
        assert_eq!(CellKey::new(3, "name").to_string(), "3/name");
    }
}
