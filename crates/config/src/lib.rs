//! Shared configuration for the whiteboard
//!
//! This crate provides the single source of truth for canvas dimensions,
//! the playback clock sample rate and drawing tool defaults shared by every
//! whiteboard instance.

use serde::{Deserialize, Serialize};

/// Default canvas width in logical pixels
pub const DEFAULT_WIDTH: u32 = 640;

/// Default canvas height in logical pixels
pub const DEFAULT_HEIGHT: u32 = 480;

/// Default clock sample interval in milliseconds
pub const DEFAULT_SAMPLE_RATE_MS: u64 = 250;

/// Default eraser rectangle edge in logical pixels
pub const DEFAULT_ERASER_SIZE: f32 = 10.0;

/// Default stroke width in logical pixels
pub const DEFAULT_LINE_WIDTH: f32 = 3.0;

/// Default stroke color
pub const DEFAULT_STROKE_COLOR: &str = "#000000";

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Canvas dimensions in logical (backing store) pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Whiteboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhiteboardConfig {
    /// Backing canvas dimensions
    pub canvas: CanvasConfig,
    /// Interval between playback/recording clock ticks
    pub sample_rate_ms: u64,
    /// Width of the rectangle cleared by one eraser move
    pub eraser_width: f32,
    /// Height of the rectangle cleared by one eraser move
    pub eraser_height: f32,
    /// Stroke width used by raster surfaces
    pub line_width: f32,
    /// Color set (and logged) when a whiteboard is created
    pub stroke_color: String,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            sample_rate_ms: DEFAULT_SAMPLE_RATE_MS,
            eraser_width: DEFAULT_ERASER_SIZE,
            eraser_height: DEFAULT_ERASER_SIZE,
            line_width: DEFAULT_LINE_WIDTH,
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
        }
    }
}

impl WhiteboardConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_ms == 0 {
            return Err(ConfigError::Invalid("sample_rate_ms must be non-zero".into()));
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.eraser_width < 0.0 || self.eraser_height < 0.0 || self.line_width <= 0.0 {
            return Err(ConfigError::Invalid("tool sizes must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WhiteboardConfig::default();
        assert_eq!(config.canvas.width, DEFAULT_WIDTH);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.sample_rate_ms, 250);
        assert_eq!(config.eraser_width, 10.0);
        assert_eq!(config.stroke_color, "#000000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            WhiteboardConfig::from_json(r#"{"sample_rate_ms": 100, "canvas": {"width": 800}}"#)
                .unwrap();
        assert_eq!(config.sample_rate_ms, 100);
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.line_width, DEFAULT_LINE_WIDTH);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let err = WhiteboardConfig::from_json(r#"{"sample_rate_ms": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = WhiteboardConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
