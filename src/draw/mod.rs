//! Annotation model and Cairo rendering.
//!
//! This module defines the core drawing types:
//! - [`Annotation`]: a committed annotation (geometry, style, per-type payload)
//! - [`AnnotationStore`]: the ordered annotation list plus the selection
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`compositor`]: the fixed five-layer pipeline used for display and export
//! - [`mosaic`]: the block-averaging pixelation filter

pub mod annotation;
pub mod color;
pub mod compositor;
pub mod font;
pub mod mosaic;
pub mod render;
pub mod store;

// Re-export commonly used types at module level
pub use annotation::{
    Annotation, AnnotationId, AnnotationKind, AnnotationPatch, Bounds, DEFAULT_LAYER_ID, Point,
    Style,
};
pub use color::Color;
pub use compositor::{LayerKind, Scene, compose, render_scene};
pub use font::{FontDescriptor, FontWeight};
pub use mosaic::{MosaicPatch, PixelSource, mosaic};
pub use render::{render_annotation, render_text};
pub use store::AnnotationStore;

#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, RED, WHITE, YELLOW};
