//! Horizon TreeGrid - a headless tree-structured data grid.
//!
//! The host supplies a forest of rows and a set of column definitions; the
//! grid keeps the UI state around them and describes what to paint:
//!
//! - which rows are visible and how deep they sit ([`model::flatten_tree`])
//! - which rows are expanded ([`expansion`])
//! - drag-and-drop reordering and reparenting with before/inside/after zones
//!   ([`drag_drop`])
//! - inline cell editing with locked, unlocked and on-request editors
//!   ([`editing`])
//!
//! Rendering, persistence and layout stay with the host. Every persistence
//! point is a host callback returning a future, and every notification goes
//! through a [`Signal`](horizon_treegrid_core::Signal).
//!
//! # Example
//!
//! ```
//! use horizon_treegrid::prelude::*;
//!
//! let rows: Vec<Row> = serde_json::from_str(
//!     r#"[{"id": 1, "type": "folder", "name": "src", "children": [
//!            {"id": 2, "type": "file", "name": "lib.rs"},
//!            {"id": 3, "type": "file", "name": "main.rs"}
//!        ]}]"#,
//! )
//! .unwrap();
//!
//! let grid = TreeGrid::new(
//!     rows,
//!     TreeGridConfig::new()
//!         .with_column(ColumnDef::new("name", "Name"))
//!         .with_on_drop(|source, target, zone| {
//!             println!("move {source} {zone} {target}");
//!             host_ok()
//!         }),
//! );
//!
//! grid.start_drag(3).unwrap();
//! let end = grid.drop_on(Some("before:2")).unwrap();
//! assert_eq!(
//!     end.intent(),
//!     Some(&DropIntent { source: RowId::from(3), target: RowId::from(2), zone: DropZone::Before })
//! );
//! ```

pub mod drag_drop;
pub mod editing;
mod error;
pub mod expansion;
pub mod geometry;
pub mod grid;
pub mod model;
pub mod prelude;
mod settings;

pub use error::{GridError, GridResult, HostError};
pub use grid::{GridKey, TreeGrid, TreeGridConfig};
pub use settings::GridSettings;
