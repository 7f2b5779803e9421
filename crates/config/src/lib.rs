//! Shared configuration for gpen
//!
//! This crate provides the single source of truth for operator defaults
//! and the names of the persistent falloff curves shared by the protocol
//! crate and the editing core.

use serde::{Deserialize, Serialize};

/// Curve name used by the fat stroke (offset duplication) engine
pub const FAT_STROKE_CURVE: &str = "FAT_STROKE";

/// Curve name used by the fade stroke edge (taper) engine
pub const ENTRY_AND_EXIT_CURVE: &str = "ENTRY_AND_EXIT";

/// Default lateral half-width of a fat stroke, in view units
pub const DEFAULT_FAT_STROKE_WIDTH: f32 = 0.02;

/// Default lateral position shift of a fat stroke, in view units
pub const DEFAULT_FAT_STROKE_POSITION: f32 = 0.0;

/// Default arc length budget for edge tapering
pub const DEFAULT_FADE_LENGTH: f32 = 0.5;

/// Default base pressure written when thickness initialization is requested
pub const DEFAULT_BASE_PRESSURE: f32 = 1.0;

/// Default base strength written when thickness initialization is requested
pub const DEFAULT_BASE_STRENGTH: f32 = 1.0;

/// Default nearest-color distance threshold (half RGBA distance)
pub const DEFAULT_COLOR_THRESHOLD: f32 = 0.05;

/// Name given to a new layer when there is no active layer to copy from
pub const DEFAULT_LAYER_NAME: &str = "GP_Layer";

/// Editor defaults for every parameterized operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fat stroke half-width
    pub fat_stroke_width: f32,
    /// Fat stroke lateral position shift
    pub fat_stroke_position: f32,
    /// Fade edge arc length budget
    pub fade_length: f32,
    /// Nearest-color threshold
    pub color_threshold: f32,
    /// Fallback layer name
    pub layer_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            fat_stroke_width: DEFAULT_FAT_STROKE_WIDTH,
            fat_stroke_position: DEFAULT_FAT_STROKE_POSITION,
            fade_length: DEFAULT_FADE_LENGTH,
            color_threshold: DEFAULT_COLOR_THRESHOLD,
            layer_name: DEFAULT_LAYER_NAME.to_string(),
        }
    }
}

impl EditorConfig {
    /// Fat stroke half-width clamped to a non-negative distance
    pub fn fat_stroke_width(&self) -> f32 {
        self.fat_stroke_width.max(0.0)
    }

    /// Fade length clamped to a non-negative budget
    pub fn fade_length(&self) -> f32 {
        self.fade_length.max(0.0)
    }

    /// Color threshold clamped to a non-negative distance
    pub fn color_threshold(&self) -> f32 {
        self.color_threshold.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.fat_stroke_width, DEFAULT_FAT_STROKE_WIDTH);
        assert_eq!(config.fade_length, DEFAULT_FADE_LENGTH);
        assert_eq!(config.layer_name, DEFAULT_LAYER_NAME);
    }

    #[test]
    fn test_negative_values_clamped() {
        let config = EditorConfig {
            fat_stroke_width: -1.0,
            fade_length: -2.0,
            color_threshold: -0.5,
            ..Default::default()
        };
        assert_eq!(config.fat_stroke_width(), 0.0);
        assert_eq!(config.fade_length(), 0.0);
        assert_eq!(config.color_threshold(), 0.0);
    }
}
