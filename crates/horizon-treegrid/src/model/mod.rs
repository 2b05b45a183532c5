//! Data model for the tree grid.
//!
//! The host owns the data; this module describes how the grid reads it.
//!
//! # Core Types
//!
//! - `GridNode`: The trait host tree nodes implement
//! - `Row`: A ready-made, JSON-deserializable `GridNode`
//! - `RowId` / `RowKey`: Host identifiers and their string-coerced form
//! - `CellValue`: Dynamically typed cell content
//! - `ColumnDef`: Per-column strategies (render, edit, parse, visibility)
//!
//! # Derived Views
//!
//! - `flatten_tree`: Forest + expansion → the ordered `VisibleRow`s on screen
//! - `RowIndex`: Key → node over the whole forest, collapsed parts included
//!
//! ```text
//! ┌─────────────┐  flatten_tree    ┌──────────────┐
//! │ host forest │─────────────────>│ VisibleRow[] │──> render
//! │ (GridNode)  │                  └──────────────┘
//! │             │  RowIndex::build ┌──────────────┐
//! │             │─────────────────>│ key -> node  │──> drag/drop, editing
//! └─────────────┘                  └──────────────┘
//! ```

mod column;
mod flatten;
mod index;
mod node;
mod value;

pub use column::{
    ColumnDef, EditMode, EditModeFn, EditorKind, FormatFn, HorizontalAlignment, ParseFn,
    RenderFn, RowPredicate, VisibilityFn,
};
pub use flatten::{ExpandedRows, VisibleRow, flatten_tree};
pub use index::RowIndex;
pub use node::{GridNode, Row, RowId, RowKey};
pub use value::CellValue;
