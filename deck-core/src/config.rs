//! Editor configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::element::{IMAGE_MAX_HEIGHT, IMAGE_MAX_WIDTH};

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Logical slide canvas width.
pub const CANVAS_WIDTH: f32 = 720.0;

/// Logical slide canvas height.
pub const CANVAS_HEIGHT: f32 = 540.0;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON could not be parsed.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Tunables for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum undo entries kept, `None` for unlimited.
    pub history_capacity: Option<usize>,
    /// Logical canvas width.
    pub canvas_width: f32,
    /// Logical canvas height.
    pub canvas_height: f32,
    /// Width of the box inserted images are fitted into.
    pub image_max_width: f32,
    /// Height of the box inserted images are fitted into.
    pub image_max_height: f32,
    /// Lowest zoom, in percent.
    pub zoom_min: u16,
    /// Highest zoom, in percent.
    pub zoom_max: u16,
    /// Zoom in/out step, in percent.
    pub zoom_step: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: Some(DEFAULT_HISTORY_CAPACITY),
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            image_max_width: IMAGE_MAX_WIDTH,
            image_max_height: IMAGE_MAX_HEIGHT,
            zoom_min: 10,
            zoom_max: 400,
            zoom_step: 10,
        }
    }
}

impl EditorConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the history capacity.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: Option<usize>) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Set the logical canvas size the UI lays slides out on.
    #[must_use]
    pub fn with_canvas_size(mut self, width: f32, height: f32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the image fitting box.
    #[must_use]
    pub fn with_image_box(mut self, max_width: f32, max_height: f32) -> Self {
        self.image_max_width = max_width;
        self.image_max_height = max_height;
        self
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
            }
        };
        positive("canvas_width", self.canvas_width)?;
        positive("canvas_height", self.canvas_height)?;
        positive("image_max_width", self.image_max_width)?;
        positive("image_max_height", self.image_max_height)?;
        if self.history_capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        if self.zoom_step == 0 || self.zoom_min == 0 || self.zoom_min > self.zoom_max {
            return Err(ConfigError::Invalid(format!(
                "zoom range {}..={} step {} is not usable",
                self.zoom_min, self.zoom_max, self.zoom_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.history_capacity, Some(DEFAULT_HISTORY_CAPACITY));
        assert!((config.image_max_width - 300.0).abs() < f32::EPSILON);
        assert!((config.image_max_height - 200.0).abs() < f32::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = EditorConfig::from_json("{}").expect("parse");
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{"history_capacity": null, "zoom_step": 25}"#)
            .expect("parse");
        assert_eq!(config.history_capacity, None);
        assert_eq!(config.zoom_step, 25);
        assert_eq!(config.zoom_max, 400);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EditorConfig::from_json(r#"{"image_max_width": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"history_capacity": 0}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json(r#"{"zoom_min": 500}"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_builders() {
        let config = EditorConfig::new()
            .with_history_capacity(None)
            .with_image_box(640.0, 480.0);
        assert_eq!(config.history_capacity, None);
        assert!((config.image_max_height - 480.0).abs() < f32::EPSILON);
    }
}
