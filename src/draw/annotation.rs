//! Annotation data model: geometry, style and the per-type payload.
//!
//! Annotations are value types. The store replaces them wholesale on update,
//! which is what lets the history engine keep `before`/`after` snapshots
//! without any shared mutable state.

use super::color::Color;
use super::font::{FontDescriptor, FontWeight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping key carried by every annotation. There is only one layer.
pub const DEFAULT_LAYER_ID: &str = "default";

/// Default arrowhead length in pixels.
pub const DEFAULT_ARROW_HEAD: f64 = 15.0;

/// Point in base-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle in base-image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalized rectangle spanned by two drag corners.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Tight box around a polyline. Returns `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Opaque annotation identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub String);

impl AnnotationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnotationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Visual style shared by all annotation kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub color: Color,
    pub stroke_width: f64,
    pub opacity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
}

/// Per-type payload. The variant is the annotation's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationKind {
    Pen {
        points: Vec<Point>,
    },
    Highlighter {
        points: Vec<Point>,
    },
    Arrow {
        start: Point,
        end: Point,
        #[serde(rename = "headSize", default = "default_head_size")]
        head_size: f64,
    },
    Circle {
        radius: f64,
    },
    Rectangle,
    Text {
        text: String,
        #[serde(rename = "fontSize")]
        font_size: f64,
        #[serde(rename = "fontFamily")]
        font_family: String,
        #[serde(rename = "fontWeight", default)]
        font_weight: FontWeight,
    },
    Mosaic {
        #[serde(rename = "pixelSize")]
        pixel_size: u32,
    },
}

fn default_head_size() -> f64 {
    DEFAULT_ARROW_HEAD
}

impl AnnotationKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            AnnotationKind::Pen { .. } => "pen",
            AnnotationKind::Highlighter { .. } => "highlighter",
            AnnotationKind::Arrow { .. } => "arrow",
            AnnotationKind::Circle { .. } => "circle",
            AnnotationKind::Rectangle => "rectangle",
            AnnotationKind::Text { .. } => "text",
            AnnotationKind::Mosaic { .. } => "mosaic",
        }
    }

    /// Font for text annotations; `None` for every other kind.
    pub fn font(&self) -> Option<FontDescriptor> {
        match self {
            AnnotationKind::Text {
                font_family,
                font_weight,
                ..
            } => Some(FontDescriptor::new(font_family.clone(), *font_weight)),
            _ => None,
        }
    }

    fn translated(&self, dx: f64, dy: f64) -> Self {
        let shift = |points: &[Point]| points.iter().map(|p| p.translated(dx, dy)).collect();
        match self {
            AnnotationKind::Pen { points } => AnnotationKind::Pen {
                points: shift(points),
            },
            AnnotationKind::Highlighter { points } => AnnotationKind::Highlighter {
                points: shift(points),
            },
            AnnotationKind::Arrow {
                start,
                end,
                head_size,
            } => AnnotationKind::Arrow {
                start: start.translated(dx, dy),
                end: end.translated(dx, dy),
                head_size: *head_size,
            },
            other => other.clone(),
        }
    }
}

/// A committed annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    #[serde(default = "default_layer_id")]
    pub layer_id: String,
    pub bounds: Bounds,
    pub style: Style,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub updated_at: u64,
}

fn default_layer_id() -> String {
    DEFAULT_LAYER_ID.to_string()
}

impl Annotation {
    pub fn new(id: AnnotationId, kind: AnnotationKind, bounds: Bounds, style: Style, now: u64) -> Self {
        Self {
            id,
            kind,
            layer_id: default_layer_id(),
            bounds,
            style,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy moved by `(dx, dy)`. Point geometry moves with the bounds.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            kind: self.kind.translated(dx, dy),
            bounds: self.bounds.translated(dx, dy),
            ..self.clone()
        }
    }
}

/// Partial replacement applied by `Editor::update`. `None` keeps the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationPatch {
    pub bounds: Option<Bounds>,
    pub kind: Option<AnnotationKind>,
    pub style: Option<Style>,
}

impl AnnotationPatch {
    pub fn bounds(bounds: Bounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn style(style: Style) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// Patch that turns `current` into `current.translated(dx, dy)`.
    pub fn translation(current: &Annotation, dx: f64, dy: f64) -> Self {
        let moved = current.translated(dx, dy);
        Self {
            bounds: Some(moved.bounds),
            kind: Some(moved.kind),
            style: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_none() && self.kind.is_none() && self.style.is_none()
    }

    /// Merges the patch into a copy of `base`, stamping `updated_at`.
    pub fn apply(&self, base: &Annotation, now: u64) -> Annotation {
        Annotation {
            bounds: self.bounds.unwrap_or(base.bounds),
            kind: self.kind.clone().unwrap_or_else(|| base.kind.clone()),
            style: self.style.clone().unwrap_or_else(|| base.style.clone()),
            updated_at: now,
            ..base.clone()
        }
    }
}
