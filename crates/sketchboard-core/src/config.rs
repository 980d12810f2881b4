//! Engine configuration passed in at construction.

use crate::tools::{ToolKind, ToolSettings};
use kurbo::Size;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Per-board engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Board whose elements are loaded and saved.
    pub board_id: String,
    /// Stamped as creator on new elements.
    pub user_id: Option<String>,
    /// Drawing surface; pointer positions are clamped into it.
    pub surface: Size,
    /// Click slop for brush strokes.
    pub hit_tolerance: f64,
    /// Half-extent of the resize grip grab area.
    pub handle_tolerance: f64,
    /// Smallest width or height a resize may produce.
    pub min_resize: f64,
    /// Quiet period before a save is written.
    pub autosave_debounce_ms: u64,
    pub default_tool: ToolKind,
    pub tool_settings: ToolSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            board_id: "default".to_string(),
            user_id: None,
            surface: Size::new(1920.0, 1080.0),
            hit_tolerance: 5.0,
            handle_tolerance: 6.0,
            min_resize: 20.0,
            autosave_debounce_ms: 100,
            default_tool: ToolKind::default(),
            tool_settings: ToolSettings::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(board_id: impl Into<String>) -> Self {
        Self {
            board_id: board_id.into(),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_surface(mut self, width: f64, height: f64) -> Self {
        self.surface = Size::new(width, height);
        self
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_id.trim().is_empty() {
            return Err(ConfigError::Invalid("board id is empty".to_string()));
        }
        if !positive(self.surface.width) || !positive(self.surface.height) {
            return Err(ConfigError::Invalid(format!(
                "surface must be positive, got {}x{}",
                self.surface.width, self.surface.height
            )));
        }
        if !non_negative(self.hit_tolerance) || !non_negative(self.handle_tolerance) {
            return Err(ConfigError::Invalid("tolerances must not be negative".to_string()));
        }
        if !positive(self.min_resize) {
            return Err(ConfigError::Invalid("minimum resize size must be positive".to_string()));
        }
        Ok(())
    }
}

// Both reject NaN.
fn positive(value: f64) -> bool {
    value > 0.0
}

fn non_negative(value: f64) -> bool {
    value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.hit_tolerance - 5.0).abs() < f64::EPSILON);
        assert!((config.min_resize - 20.0).abs() < f64::EPSILON);
        assert_eq!(config.autosave_debounce_ms, 100);
        assert_eq!(config.default_tool, ToolKind::Brush);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(
            r#"{"boardId":"b1","userId":"u1","surface":{"width":800,"height":600},"defaultTool":"select"}"#,
        )
        .unwrap();
        assert_eq!(config.board_id, "b1");
        assert_eq!(config.user_id.as_deref(), Some("u1"));
        assert_eq!(config.default_tool, ToolKind::Select);
        assert!((config.surface.width - 800.0).abs() < f64::EPSILON);
        assert!((config.handle_tolerance - 6.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = EngineConfig::from_json(r#"{"minResize":0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let result = EngineConfig::from_json(r#"{"surface":{"width":-1,"height":10}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let result = EngineConfig::from_json("not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig::new("board").with_user("me").with_surface(640.0, 480.0);
        let back = EngineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
