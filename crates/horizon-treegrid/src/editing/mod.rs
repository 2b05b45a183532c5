//! Inline cell editing.
//!
//! Each cell resolves to one of three policies per row: locked (editor always
//! shown), unlocked (editor shown until its first commit or cancel) or off
//! (read view unless opened on request). See [`CellMode`] for the states a
//! cell moves through and [`EditingState`] for the bookkeeping behind them.
//!
//! Commits are asynchronous. A commit that resolves after the user has moved
//! on to another edit leaves that newer edit alone; a commit the host rejects
//! keeps the editor open with the attempted value.

mod mode;
mod state;

pub use mode::{CellKey, CellMode, resolve_edit_mode};
pub use state::{ActiveCell, CommitTicket, EditingState};
