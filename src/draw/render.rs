//! Cairo-based rendering functions for annotations.
//!
//! One function per annotation kind; [`render_annotation`] dispatches on the
//! kind. Mosaic annotations need the original image pixels and are painted by
//! the compositor through [`super::mosaic`], not here.

use super::annotation::{Annotation, AnnotationKind, Bounds, Point, Style};
use super::color::Color;
use super::font::{FontDescriptor, FontWeight};
use crate::raster::ImageError;
use crate::util;

/// Highlighter strokes always render at this opacity.
pub const HIGHLIGHTER_OPACITY: f64 = 0.5;

/// Renders a single non-mosaic annotation.
///
/// Mosaic annotations are skipped; see [`super::compositor`]. A failed Cairo
/// operation leaves the context in an error state and is returned.
pub fn render_annotation(ctx: &cairo::Context, annotation: &Annotation) -> Result<(), ImageError> {
    let style = &annotation.style;
    match &annotation.kind {
        AnnotationKind::Pen { points } => {
            render_freehand(ctx, points, style.color, style.stroke_width, style.opacity)?;
        }
        AnnotationKind::Highlighter { points } => {
            render_freehand(
                ctx,
                points,
                style.color,
                style.stroke_width,
                HIGHLIGHTER_OPACITY,
            )?;
        }
        AnnotationKind::Arrow {
            start,
            end,
            head_size,
        } => render_arrow(ctx, *start, *end, *head_size, style)?,
        AnnotationKind::Circle { radius } => {
            render_circle(ctx, annotation.bounds.center(), *radius, style)?
        }
        AnnotationKind::Rectangle => render_rect(ctx, &annotation.bounds, style)?,
        AnnotationKind::Text {
            text,
            font_size,
            font_family,
            font_weight,
        } => render_text(
            ctx,
            annotation.bounds.x,
            annotation.bounds.y,
            text,
            style.color.with_opacity(style.opacity),
            *font_size,
            &FontDescriptor::new(font_family.clone(), *font_weight),
        )?,
        AnnotationKind::Mosaic { .. } => {}
    }
    Ok(())
}

fn set_source(ctx: &cairo::Context, color: Color, opacity: f64) {
    let c = color.with_opacity(opacity);
    ctx.set_source_rgba(c.r, c.g, c.b, c.a);
}

/// Render freehand stroke (polyline through points, round caps and joins)
///
/// Accepts a borrowed slice so in-progress strokes render without cloning.
pub fn render_freehand(
    ctx: &cairo::Context,
    points: &[Point],
    color: Color,
    thick: f64,
    opacity: f64,
) -> Result<(), cairo::Error> {
    let Some((first, rest)) = points.split_first() else {
        return Ok(());
    };

    ctx.save()?;
    set_source(ctx, color, opacity);
    ctx.set_line_width(thick);
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    ctx.move_to(first.x, first.y);
    if rest.is_empty() {
        // A lone point renders as a dot via the round cap.
        ctx.line_to(first.x, first.y);
    }
    for p in rest {
        ctx.line_to(p.x, p.y);
    }

    ctx.stroke()?;
    ctx.restore()
}

/// Render a rectangle with optional fill
fn render_rect(ctx: &cairo::Context, bounds: &Bounds, style: &Style) -> Result<(), cairo::Error> {
    ctx.save()?;
    ctx.set_line_width(style.stroke_width);
    ctx.set_line_join(cairo::LineJoin::Miter);
    ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);

    if let Some(fill) = style.fill_color {
        set_source(ctx, fill, style.opacity);
        ctx.fill_preserve()?;
    }
    set_source(ctx, style.color, style.opacity);
    ctx.stroke()?;
    ctx.restore()
}

/// Render a circle centred on the annotation bounds
fn render_circle(
    ctx: &cairo::Context,
    center: Point,
    radius: f64,
    style: &Style,
) -> Result<(), cairo::Error> {
    if radius <= 0.0 {
        return Ok(());
    }

    ctx.save()?;
    ctx.set_line_width(style.stroke_width);
    ctx.new_path();
    ctx.arc(center.x, center.y, radius, 0.0, 2.0 * std::f64::consts::PI);

    if let Some(fill) = style.fill_color {
        set_source(ctx, fill, style.opacity);
        ctx.fill_preserve()?;
    }
    set_source(ctx, style.color, style.opacity);
    ctx.stroke()?;
    ctx.restore()
}

/// Render an arrow (shaft from start to end, head at end)
fn render_arrow(
    ctx: &cairo::Context,
    start: Point,
    end: Point,
    head_size: f64,
    style: &Style,
) -> Result<(), cairo::Error> {
    ctx.save()?;
    set_source(ctx, style.color, style.opacity);
    ctx.set_line_width(style.stroke_width);
    ctx.set_line_cap(cairo::LineCap::Round);

    ctx.move_to(start.x, start.y);
    ctx.line_to(end.x, end.y);
    ctx.stroke()?;

    let [left, right] = util::arrowhead_points(start, end, head_size);
    ctx.move_to(end.x, end.y);
    ctx.line_to(left.x, left.y);
    ctx.move_to(end.x, end.y);
    ctx.line_to(right.x, right.y);
    ctx.stroke()?;
    ctx.restore()
}

fn text_layout(ctx: &cairo::Context, text: &str, size: f64, font: &FontDescriptor) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(ctx);

    let mut font_desc = pango::FontDescription::from_string(&font.to_pango_string(size));
    // Sizes are in image pixels, not points.
    font_desc.set_absolute_size(size * pango::SCALE as f64);
    if font.weight == FontWeight::Bold {
        font_desc.set_weight(pango::Weight::Bold);
    }
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    layout
}

/// Renders text with its top-left corner at `(x, y)` using Pango.
///
/// Text containing newline characters renders across multiple lines with
/// spacing from the font metrics. The block is never wrapped.
pub fn render_text(
    ctx: &cairo::Context,
    x: f64,
    y: f64,
    text: &str,
    color: Color,
    size: f64,
    font: &FontDescriptor,
) -> Result<(), cairo::Error> {
    if text.is_empty() {
        return Ok(());
    }

    // Save context state to prevent settings from leaking to other drawing operations
    ctx.save()?;
    ctx.set_antialias(cairo::Antialias::Best);

    let layout = text_layout(ctx, text, size, font);
    ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    ctx.move_to(x, y);
    pangocairo::functions::show_layout(ctx, &layout);

    ctx.restore()?;
    // Pango reports failures only through the context status.
    ctx.status()
}

/// Outline colour of the selection overlay.
pub const SELECTION_COLOR: Color = Color::from_rgb8(0x3B, 0x82, 0xF6);
const SELECTION_LINE_WIDTH: f64 = 2.0;
/// Edge length of a selection handle square.
pub const SELECTION_HANDLE_SIZE: f64 = 12.0;

/// Draws the selection outline over `bounds` and a white handle square
/// centred on each of `handles`.
pub fn render_selection(
    ctx: &cairo::Context,
    bounds: &Bounds,
    handles: &[Point],
) -> Result<(), cairo::Error> {
    let c = SELECTION_COLOR;
    ctx.save()?;
    ctx.set_line_width(SELECTION_LINE_WIDTH);
    ctx.set_line_join(cairo::LineJoin::Miter);
    ctx.set_source_rgba(c.r, c.g, c.b, c.a);
    ctx.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
    ctx.stroke()?;

    let half = SELECTION_HANDLE_SIZE / 2.0;
    for handle in handles {
        ctx.rectangle(
            handle.x - half,
            handle.y - half,
            SELECTION_HANDLE_SIZE,
            SELECTION_HANDLE_SIZE,
        );
        ctx.set_source_rgba(1.0, 1.0, 1.0, 1.0);
        ctx.fill_preserve()?;
        ctx.set_source_rgba(c.r, c.g, c.b, c.a);
        ctx.stroke()?;
    }
    ctx.restore()
}

/// Logical size of a text block in pixels.
///
/// Falls back to a character-count estimate when no Cairo context can be set up.
pub fn measure_text(text: &str, size: f64, font: &FontDescriptor) -> (f64, f64) {
    let measured = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1)
        .and_then(|surface| cairo::Context::new(&surface))
        .map(|ctx| {
            let layout = text_layout(&ctx, text, size, font);
            let (_ink, logical) = layout.extents();
            (
                logical.width() as f64 / pango::SCALE as f64,
                logical.height() as f64 / pango::SCALE as f64,
            )
        });

    match measured {
        Ok(extent) => extent,
        Err(e) => {
            log::warn!("Text measurement unavailable ({e}); estimating");
            estimate_text_extent(text, size)
        }
    }
}

fn estimate_text_extent(text: &str, size: f64) -> (f64, f64) {
    let lines = text.lines().count().max(1);
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    (longest as f64 * size * 0.6, lines as f64 * size * 1.2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED};

    fn canvas(w: i32, h: i32) -> (cairo::ImageSurface, cairo::Context) {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, w, h).unwrap();
        let ctx = cairo::Context::new(&surface).unwrap();
        (surface, ctx)
    }

    /// Reads the premultiplied ARGB word at `(x, y)`.
    fn pixel(surface: &mut cairo::ImageSurface, x: usize, y: usize) -> u32 {
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        u32::from_ne_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
    }

    fn style(color: Color, fill: Option<Color>) -> Style {
        Style {
            color,
            stroke_width: 2.0,
            opacity: 1.0,
            fill_color: fill,
        }
    }

    #[test]
    fn filled_rectangle_paints_interior() {
        let (mut surface, ctx) = canvas(40, 40);
        let rect = Annotation::new(
            "r".into(),
            AnnotationKind::Rectangle,
            Bounds::new(5.0, 5.0, 30.0, 30.0),
            style(RED, Some(BLUE)),
            0,
        );
        render_annotation(&ctx, &rect).unwrap();
        drop(ctx);
        assert_eq!(pixel(&mut surface, 20, 20), 0xFF00_00FF);
        assert_eq!(pixel(&mut surface, 1, 1), 0);
    }

    #[test]
    fn highlighter_ignores_style_opacity() {
        let (mut surface, ctx) = canvas(20, 20);
        let stroke = Annotation::new(
            "h".into(),
            AnnotationKind::Highlighter {
                points: vec![Point::new(0.0, 10.0), Point::new(20.0, 10.0)],
            },
            Bounds::new(0.0, 10.0, 20.0, 0.0),
            Style {
                stroke_width: 6.0,
                ..style(RED, None)
            },
            0,
        );
        render_annotation(&ctx, &stroke).unwrap();
        drop(ctx);
        let alpha = pixel(&mut surface, 10, 10) >> 24;
        assert!((126..=129).contains(&alpha), "alpha was {alpha}");
    }

    #[test]
    fn mosaic_is_not_drawn_here() {
        let (mut surface, ctx) = canvas(10, 10);
        let mosaic = Annotation::new(
            "m".into(),
            AnnotationKind::Mosaic { pixel_size: 2 },
            Bounds::new(0.0, 0.0, 10.0, 10.0),
            style(RED, Some(RED)),
            0,
        );
        render_annotation(&ctx, &mosaic).unwrap();
        drop(ctx);
        assert_eq!(pixel(&mut surface, 5, 5), 0);
    }

    #[test]
    fn errored_context_fails_the_draw() {
        let (_surface, ctx) = canvas(20, 20);
        // A negative dash puts the context into a sticky error state.
        ctx.set_dash(&[-1.0], 0.0);
        let rect = Annotation::new(
            "r".into(),
            AnnotationKind::Rectangle,
            Bounds::new(2.0, 2.0, 10.0, 10.0),
            style(RED, None),
            0,
        );
        assert!(matches!(
            render_annotation(&ctx, &rect),
            Err(ImageError::Surface(_))
        ));
    }

    #[test]
    fn selection_draws_outline_and_white_handles() {
        let (mut surface, ctx) = canvas(60, 60);
        let bounds = Bounds::new(20.0, 20.0, 20.0, 20.0);
        render_selection(&ctx, &bounds, &[Point::new(20.0, 20.0)]).unwrap();
        drop(ctx);
        // Outline along the bottom edge, away from the handle.
        assert_eq!(pixel(&mut surface, 30, 40), 0xFF3B_82F6);
        // Handle interior is white.
        assert_eq!(pixel(&mut surface, 20, 20), 0xFFFF_FFFF);
        // Inside the bounds stays untouched.
        assert_eq!(pixel(&mut surface, 30, 30), 0);
    }

    #[test]
    fn estimate_scales_with_font_size() {
        let (w, h) = estimate_text_extent("abcd\nef", 10.0);
        assert!((w - 24.0).abs() < 1e-9);
        assert!((h - 24.0).abs() < 1e-9);
    }
}
