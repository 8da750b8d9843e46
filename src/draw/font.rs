//! Font descriptor for text annotations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Font weight carried by text annotations and the tool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    pub fn as_str(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Font configuration for text rendering.
///
/// Describes which font family and weight to use. The family may be a
/// comma-separated fallback list (`"Arial, sans-serif"`), which Pango accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font family name or fallback list
    pub family: String,

    pub weight: FontWeight,
}

impl FontDescriptor {
    /// Creates a new font descriptor with the specified parameters.
    pub fn new(family: impl Into<String>, weight: FontWeight) -> Self {
        Self {
            family: family.into(),
            weight,
        }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family, Fallback Weight Size"
    /// Example: "Arial, sans-serif Bold 16"
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.trim().to_string()];

        if self.weight != FontWeight::Normal {
            parts.push(capitalize_first(self.weight.as_str()));
        }

        parts.push(format!("{}", size.round() as i32));

        parts.join(" ")
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("Arial, sans-serif", FontWeight::Normal)
    }
}

/// Capitalizes the first letter of a string.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}
