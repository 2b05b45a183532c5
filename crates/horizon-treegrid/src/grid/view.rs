//! The render output: a plain description of what to paint.
//!
//! Nothing here borrows from the grid, so a view can be handed to another
//! thread or kept around while the grid keeps changing.

use crate::drag_drop::{DropZone, ZoneId};
use crate::editing::CellMode;
use crate::model::{CellValue, EditorKind, HorizontalAlignment, RowId, RowKey};

use super::config::RowAction;

/// A rendered grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<RowView>,
    /// Whether the trailing actions column is shown.
    pub show_actions: bool,
    pub footer: Option<String>,
    /// The row being dragged, if a drag is active.
    pub dragging: Option<RowKey>,
}

impl GridView {
    /// Look up a rendered row by key.
    pub fn row(&self, key: impl Into<RowKey>) -> Option<&RowView> {
        let key = key.into();
        self.rows.iter().find(|row| row.key.as_ref() == Some(&key))
    }

    /// Keys of the rendered rows in display order; rows without an id are
    /// skipped.
    pub fn row_keys(&self) -> Vec<&str> {
        self.rows
            .iter()
            .filter_map(|row| row.key.as_ref().map(RowKey::as_str))
            .collect()
    }
}

/// A visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnHeader {
    pub id: String,
    pub header: String,
    pub width: Option<f32>,
    pub alignment: HorizontalAlignment,
}

/// One visible row, in tree-grid terms.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub key: Option<RowKey>,
    pub id: Option<RowId>,
    pub node_type: String,
    /// Nesting depth, 0 for roots.
    pub level: usize,
    pub has_children: bool,
    pub expanded: bool,
    pub is_last_child: bool,
    /// One-based level for assistive technology.
    pub aria_level: usize,
    /// `None` for leaves, which are neither expanded nor collapsed.
    pub aria_expanded: Option<bool>,
    pub cells: Vec<CellView>,
    /// Trailing actions; `None` when the grid has no actions column.
    pub actions: Option<Vec<RowAction>>,
}

impl RowView {
    pub fn cell(&self, column: &str) -> Option<&CellView> {
        self.cells.iter().find(|cell| cell.column == column)
    }
}

/// One cell of a visible row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellView {
    pub column: String,
    pub mode: CellMode,
    /// Read-view text.
    pub text: String,
    /// Present when the cell shows an editor.
    pub editor: Option<EditorView>,
    /// Left indentation in pixels; only on the first column.
    pub indent: Option<f32>,
    /// Drag wiring; only on the first column of rows with an id.
    pub drag: Option<CellDragView>,
}

/// The editor to paint in an open cell.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    pub kind: EditorKind,
    pub value: CellValue,
}

/// Drag handle and drop zones of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct CellDragView {
    pub can_drag: bool,
    /// The `<zone>:<id>` handles in before/inside/after order.
    pub zones: [String; 3],
    /// This row is the one being dragged.
    pub is_source: bool,
    /// The zone of this row under the pointer.
    pub hovered_zone: Option<DropZone>,
    /// The active drag's valid targets exclude this row.
    pub drop_disabled: bool,
}

impl CellDragView {
    pub(crate) fn new(key: &RowKey, can_drag: bool) -> Self {
        Self {
            can_drag,
            zones: DropZone::ALL.map(|zone| ZoneId::new(zone, key.clone()).to_string()),
            is_source: false,
            hovered_zone: None,
            drop_disabled: false,
        }
    }
}
