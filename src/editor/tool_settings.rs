use crate::config::Config;
use crate::draw::annotation::DEFAULT_ARROW_HEAD;
use crate::draw::{Color, FontDescriptor, FontWeight, Style};

/// Current tool parameters. Copied into annotations at creation time; later
/// changes never affect existing annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub color: Color,
    pub stroke_width: f64,
    pub opacity: f64,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub fill_color: Option<Color>,
    pub mosaic_size: u32,
    pub blur_amount: f64,
    pub arrow_head_size: f64,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            color: Color::from_rgb8(0xEF, 0x44, 0x44),
            stroke_width: 3.0,
            opacity: 1.0,
            font_size: 16.0,
            font_family: "Arial, sans-serif".to_string(),
            font_weight: FontWeight::Normal,
            fill_color: None,
            mosaic_size: 10,
            blur_amount: 5.0,
            arrow_head_size: DEFAULT_ARROW_HEAD,
        }
    }
}

impl ToolSettings {
    pub fn from_config(config: &Config) -> Self {
        let drawing = &config.drawing;
        Self {
            color: drawing.default_color.to_color(),
            stroke_width: drawing.default_stroke_width,
            opacity: drawing.default_opacity,
            font_size: drawing.default_font_size,
            font_family: drawing.font_family.clone(),
            font_weight: drawing.font_weight,
            fill_color: drawing.fill_color.as_ref().map(|spec| spec.to_color()),
            mosaic_size: drawing.mosaic_size,
            blur_amount: drawing.blur_amount,
            arrow_head_size: config.arrow.head_size,
        }
    }

    /// Style for stroked annotations (pen, arrow).
    pub fn stroke_style(&self) -> Style {
        Style {
            color: self.color,
            stroke_width: self.stroke_width,
            opacity: self.opacity,
            fill_color: None,
        }
    }

    /// Style for closed shapes, carrying the optional fill.
    pub fn shape_style(&self) -> Style {
        Style {
            fill_color: self.fill_color,
            ..self.stroke_style()
        }
    }

    pub fn font(&self) -> FontDescriptor {
        FontDescriptor::new(self.font_family.clone(), self.font_weight)
    }
}
