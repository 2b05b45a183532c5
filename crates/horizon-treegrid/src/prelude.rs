//! Prelude module for Horizon TreeGrid.
//!
//! ```
//! use horizon_treegrid::prelude::*;
//! ```
//!
//! This provides access to:
//! - The grid itself (`TreeGrid`, `TreeGridConfig`, `GridSettings`)
//! - Host data (`Row`, `GridNode`, `RowId`, `CellValue`, `ColumnDef`)
//! - Drag-and-drop types (`DropZone`, `ZoneId`, `DragActivation`)
//! - Editing and render output (`CellMode`, `GridView`)

// ============================================================================
// Grid
// ============================================================================

pub use crate::grid::{
    DragEnd, DragStart, DropIntent, GridKey, GridSignals, HostFuture, RowAction, TreeGrid,
    TreeGridConfig, ValidTargets, host_ok,
};
pub use crate::{GridError, GridResult, GridSettings, HostError};

// ============================================================================
// Host Data
// ============================================================================

pub use crate::model::{
    CellValue, ColumnDef, EditMode, EditorKind, GridNode, HorizontalAlignment, Row, RowId, RowKey,
};

// ============================================================================
// Drag and Drop
// ============================================================================

pub use crate::drag_drop::{DragActivation, DragState, DropCandidate, DropZone, ZoneId};
pub use crate::geometry::{Point, Rect};

// ============================================================================
// Editing and Rendering
// ============================================================================

pub use crate::editing::CellMode;
pub use crate::grid::{CellView, GridView, RowView};
