//! Plain configuration knobs.
//!
//! Everything here is data, so it can be shipped in a JSON file next to the
//! host's other settings. Missing keys fall back to the defaults.
//!
//! ```
//! use horizon_treegrid::GridSettings;
//!
//! let settings = GridSettings::from_json_str(r#"{"edit_view_mode": "bulk-edit"}"#).unwrap();
//! assert_eq!(settings.edit_view_mode, "bulk-edit");
//! assert_eq!(settings.auto_expand_delay_ms, 500);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::drag_drop::DragActivation;

/// Grid behaviour settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// The view mode in which editable columns are locked open.
    pub edit_view_mode: String,
    /// How long a collapsed row must be hovered during a drag before it opens.
    pub auto_expand_delay_ms: u64,
    /// When a press on a row becomes a drag.
    pub drag_activation: DragActivation,
    /// Horizontal indentation per nesting level, in pixels.
    pub indent_width: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            edit_view_mode: Self::DEFAULT_EDIT_VIEW_MODE.to_string(),
            auto_expand_delay_ms: 500,
            drag_activation: DragActivation::default(),
            indent_width: 20.0,
        }
    }
}

impl GridSettings {
    pub const DEFAULT_EDIT_VIEW_MODE: &'static str = "edit";

    /// Parse settings from JSON.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_edit_view_mode(mut self, mode: impl Into<String>) -> Self {
        self.edit_view_mode = mode.into();
        self
    }

    pub fn with_auto_expand_delay(mut self, delay: Duration) -> Self {
        self.auto_expand_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_drag_activation(mut self, activation: DragActivation) -> Self {
        self.drag_activation = activation;
        self
    }

    pub fn with_indent_width(mut self, width: f32) -> Self {
        self.indent_width = width;
        self
    }

    pub fn auto_expand_delay(&self) -> Duration {
        Duration::from_millis(self.auto_expand_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GridSettings::default();
        assert_eq!(settings.edit_view_mode, "edit");
        assert_eq!(settings.auto_expand_delay(), Duration::from_millis(500));
        assert_eq!(settings.drag_activation, DragActivation::distance(4.0));
    }

    #[test]
    fn test_from_json() {
        let settings = GridSettings::from_json_str(
            r#"{
                "auto_expand_delay_ms": 750,
                "drag_activation": {"mode": "delay", "delay_ms": 150, "tolerance": 5.0},
                "indent_width": 12.5
            }"#,
        )
        .unwrap();

        assert_eq!(settings.edit_view_mode, "edit");
        assert_eq!(settings.auto_expand_delay(), Duration::from_millis(750));
        assert_eq!(
            settings.drag_activation,
            DragActivation::delay(Duration::from_millis(150), 5.0)
        );
        assert_eq!(settings.indent_width, 12.5);
    }

    #[test]
    fn test_invalid_json() {
        assert!(GridSettings::from_json_str(r#"{"indent_width": "wide"}"#).is_err());
    }
}
