//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::draw::FontWeight;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Seeds the tool settings every new editor starts with. Annotations copy
/// these values when they are created; later changes never touch them.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DrawingConfig {
    /// Default stroke color - a named color, `#RRGGBB` hex, or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_color")]
    pub default_color: ColorSpec,

    /// Default stroke width in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_stroke_width")]
    pub default_stroke_width: f64,

    /// Default opacity (valid range: 0.0 - 1.0)
    #[serde(default = "default_opacity")]
    pub default_opacity: f64,

    /// Default font size for text in pixels (valid range: 8.0 - 144.0)
    #[serde(default = "default_font_size")]
    pub default_font_size: f64,

    /// Font family or comma-separated fallback list
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight: "normal" or "bold"
    #[serde(default)]
    pub font_weight: FontWeight,

    /// Optional fill color for circles and rectangles
    #[serde(default)]
    pub fill_color: Option<ColorSpec>,

    /// Mosaic block size in pixels (valid range: 2 - 100)
    #[serde(default = "default_mosaic_size")]
    pub mosaic_size: u32,

    /// Blur strength kept with the tool settings (valid range: 0.0 - 50.0)
    #[serde(default = "default_blur_amount")]
    pub blur_amount: f64,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_color: default_color(),
            default_stroke_width: default_stroke_width(),
            default_opacity: default_opacity(),
            default_font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: FontWeight::default(),
            fill_color: None,
            mosaic_size: default_mosaic_size(),
            blur_amount: default_blur_amount(),
        }
    }
}

/// Arrow drawing settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ArrowConfig {
    /// Arrowhead barb length in pixels (valid range: 5.0 - 60.0)
    #[serde(default = "default_head_size")]
    pub head_size: f64,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            head_size: default_head_size(),
        }
    }
}

/// Export settings.
///
/// Controls where flattened images are written and how they are named.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Directory for exported images; empty means next to the original image.
    /// Supports `~/` expansion.
    #[serde(default)]
    pub output_directory: String,

    /// Inserted between the original file stem and the timestamp
    #[serde(default = "default_filename_suffix")]
    pub filename_suffix: String,

    /// chrono format string for the timestamp part of the filename
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_directory: String::new(),
            filename_suffix: default_filename_suffix(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_color() -> ColorSpec {
    ColorSpec::Name("#EF4444".to_string())
}

fn default_stroke_width() -> f64 {
    3.0
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    16.0
}

fn default_font_family() -> String {
    "Arial, sans-serif".to_string()
}

fn default_mosaic_size() -> u32 {
    10
}

fn default_blur_amount() -> f64 {
    5.0
}

fn default_head_size() -> f64 {
    15.0
}

fn default_filename_suffix() -> String {
    "_edited".to_string()
}

fn default_timestamp_format() -> String {
    "%Y%m%d_%H%M%S".to_string()
}
