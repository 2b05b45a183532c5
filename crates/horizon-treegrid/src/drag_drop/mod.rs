//! Drag-and-drop reordering and reparenting of rows.
//!
//! Every row offers three drop zones, stacked top to bottom:
//!
//! ```text
//! ┌──────────────────────────┐
//! │ before:<id>              │  insert as previous sibling
//! ├──────────────────────────┤
//! │ inside:<id>              │  insert as child
//! ├──────────────────────────┤
//! │ after:<id>               │  insert as next sibling
//! └──────────────────────────┘
//! ```
//!
//! The gesture runs Idle → (Pending →) Dragging → Idle. A drop reaches the
//! host only when the host's `can_drop` predicate and its valid-target set
//! both allow it; anything else ends the drag silently.
//!
//! # Modules
//!
//! - `zone`: zone kinds and `<zone>:<id>` handles
//! - `collision`: picking one zone among overlapping candidates
//! - `activation`: delay- and distance-based drag activation
//! - `manager`: the per-grid gesture state and hover auto-expand timer

mod activation;
mod collision;
mod manager;
mod zone;

pub use activation::{Activation, DragActivation, PendingDrag};
pub use collision::{Collision, CollisionClass, closest_target, rank_collisions};
pub use manager::{DragDropManager, DragSession, DragState};
pub use zone::{DropCandidate, DropZone, ZoneId, ZoneParseError, row_drop_candidates};
