//! Core systems for Horizon TreeGrid.
//!
//! This crate holds the pieces of the tree grid that know nothing about trees
//! or grids:
//!
//! - [`Signal`]: Qt-style signal/slot notification used for every event the
//!   grid reports to its host (row toggles, edits closing, re-render requests)
//! - [`TimerManager`]: one-shot timers driven by caller-supplied instants,
//!   used for the hover auto-expand delay
//! - [`logging`]: tracing targets for log filtering
//!
//! # Example
//!
//! ```
//! use horizon_treegrid_core::Signal;
//!
//! let toggled = Signal::<(String, bool)>::new();
//! toggled.connect(|(id, expanded)| {
//!     println!("row {id} is now {}", if *expanded { "open" } else { "closed" });
//! });
//! toggled.emit(("1".to_string(), false));
//! ```

mod error;
pub mod logging;
mod signal;
mod timer;

pub use error::{CoreError, Result, SignalError, TimerError};
pub use signal::{ConnectionId, Signal};
pub use timer::{TimerId, TimerManager};
