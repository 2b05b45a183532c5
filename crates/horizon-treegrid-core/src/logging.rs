//! Logging facilities for Horizon TreeGrid.
//!
//! Horizon TreeGrid uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in the host application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_treegrid::drag_drop=debug")
//!         .init();
//! }
//! ```
//!
//! Every log statement in the workspace names one of the [`targets`] below,
//! so a single subsystem can be switched on without the noise of the rest.
//! `#[tracing::instrument]` attributes only accept literals, so they spell
//! out the same target strings; each target is the module path it covers.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "horizon_treegrid_core::signal";
    /// Timer system target.
    pub const TIMER: &str = "horizon_treegrid_core::timer";
    /// Tree model target (flattening and row index).
    pub const MODEL: &str = "horizon_treegrid::model";
    /// Expansion state target.
    pub const EXPANSION: &str = "horizon_treegrid::expansion";
    /// Drag-and-drop engine target.
    pub const DRAG_DROP: &str = "horizon_treegrid::drag_drop";
    /// Inline editing target.
    pub const EDITING: &str = "horizon_treegrid::editing";
    /// Grid orchestrator target.
    pub const GRID: &str = "horizon_treegrid::grid";
}

#[cfg(test)]
mod tests {
    use super::targets;

    const ALL: [&str; 7] = [
        targets::SIGNAL,
        targets::TIMER,
        targets::MODEL,
        targets::EXPANSION,
        targets::DRAG_DROP,
        targets::EDITING,
        targets::GRID,
    ];

    #[test]
    fn test_targets_are_distinct_module_paths() {
        for (i, target) in ALL.iter().enumerate() {
            assert!(target.starts_with("horizon_treegrid"), "{target}");
            assert!(target.contains("::"), "{target}");
            assert!(!ALL[i + 1..].contains(target), "{target} listed twice");
        }
    }

    #[test]
    fn test_core_targets_match_instrumented_modules() {
        assert_eq!(targets::SIGNAL, format!("{}::signal", env!("CARGO_CRATE_NAME")));
        assert_eq!(targets::TIMER, format!("{}::timer", env!("CARGO_CRATE_NAME")));
    }
}
