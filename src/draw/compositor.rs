//! Fixed-order layer compositing.
//!
//! Live rendering and export share this pipeline, so both produce the same
//! z-order: image, shapes, freehand drawing, text, then mosaic.

use cairo::{Context, Format, ImageSurface};

use super::annotation::{Annotation, AnnotationKind};
use super::mosaic::{mosaic, paint_patch};
use super::render::render_annotation;
use crate::raster::{BaseImage, ImageError};

/// Compositing layers, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Image,
    Shape,
    Drawing,
    Text,
    Mosaic,
}

impl LayerKind {
    pub const ORDER: [LayerKind; 5] = [
        LayerKind::Image,
        LayerKind::Shape,
        LayerKind::Drawing,
        LayerKind::Text,
        LayerKind::Mosaic,
    ];

    /// Layer an annotation kind is drawn on.
    pub fn of(kind: &AnnotationKind) -> LayerKind {
        match kind {
            AnnotationKind::Arrow { .. }
            | AnnotationKind::Circle { .. }
            | AnnotationKind::Rectangle => LayerKind::Shape,
            AnnotationKind::Pen { .. } | AnnotationKind::Highlighter { .. } => LayerKind::Drawing,
            AnnotationKind::Text { .. } => LayerKind::Text,
            AnnotationKind::Mosaic { .. } => LayerKind::Mosaic,
        }
    }
}

/// Everything one frame needs.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Decoded base image; `None` while it is still loading.
    pub base: Option<&'a BaseImage>,
    pub annotations: &'a [Annotation],
    /// In-progress gesture, drawn after the committed annotations of its layer.
    pub preview: Option<&'a Annotation>,
}

impl<'a> Scene<'a> {
    fn layer_members(&self, layer: LayerKind) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.annotations
            .iter()
            .chain(self.preview)
            .filter(move |a| LayerKind::of(&a.kind) == layer)
    }
}

/// Draws one layer of `scene` onto `ctx`.
pub fn render_layer(ctx: &Context, layer: LayerKind, scene: &Scene<'_>) -> Result<(), ImageError> {
    match layer {
        LayerKind::Image => {
            if let Some(base) = scene.base {
                ctx.save()?;
                ctx.set_source_surface(base.surface(), 0.0, 0.0)?;
                ctx.paint()?;
                ctx.restore()?;
            }
        }
        LayerKind::Mosaic => {
            // Mosaic samples the original pixels, so nothing draws until they exist.
            let Some(base) = scene.base else {
                return Ok(());
            };
            for annotation in scene.layer_members(layer) {
                let AnnotationKind::Mosaic { pixel_size } = annotation.kind else {
                    continue;
                };
                if let Some(patch) = mosaic(base.pixels(), &annotation.bounds, pixel_size) {
                    paint_patch(ctx, &patch)?;
                }
            }
        }
        LayerKind::Shape | LayerKind::Drawing | LayerKind::Text => {
            for annotation in scene.layer_members(layer) {
                render_annotation(ctx, annotation)?;
            }
        }
    }
    Ok(())
}

/// Draws every layer in canonical order.
pub fn render_scene(ctx: &Context, scene: &Scene<'_>) -> Result<(), ImageError> {
    for layer in LayerKind::ORDER {
        render_layer(ctx, layer, scene)?;
    }
    Ok(())
}

/// Renders `scene` into a new surface the size of its base image.
///
/// Returns `None` while the base image is not decoded.
pub fn compose(scene: &Scene<'_>) -> Option<Result<ImageSurface, ImageError>> {
    let base = scene.base?;
    Some(compose_onto_base(base, scene))
}

fn compose_onto_base(base: &BaseImage, scene: &Scene<'_>) -> Result<ImageSurface, ImageError> {
    let too_large = || ImageError::TooLarge {
        width: base.width(),
        height: base.height(),
    };
    let width = i32::try_from(base.width()).map_err(|_| too_large())?;
    let height = i32::try_from(base.height()).map_err(|_| too_large())?;

    let surface = ImageSurface::create(Format::ARgb32, width, height)?;
    {
        let ctx = Context::new(&surface)?;
        render_scene(&ctx, scene)?;
        ctx.status()?;
    }
    surface.flush();
    Ok(surface)
}
