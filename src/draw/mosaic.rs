//! Block-averaging pixelation over a region of the original image.
//!
//! The filter is pure: given the same source, bounds and block size it yields
//! the same patch. The caller decides where to paint it.

use cairo::Context;
use image::{Rgba, RgbaImage};

use super::annotation::Bounds;
use crate::raster::{ImageError, rgba_to_surface};

/// Flat fill used when the source cannot be read (mid-gray at 80% opacity).
pub const FALLBACK_FILL: [u8; 4] = [128, 128, 128, 204];

/// Read access to source pixels. Reads may fail, e.g. for a source that is
/// still being decoded or that refuses access.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// RGB of the pixel at `(x, y)`; `None` when it cannot be read.
    fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]>;
}

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.get_pixel_checked(x, y).map(|p| [p.0[0], p.0[1], p.0[2]])
    }
}

/// Integer pixel rectangle inside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Pixelated replacement for `region`, painted at the region's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicPatch {
    pub region: PixelRect,
    pub pixels: RgbaImage,
    /// True when the source could not be read and the flat fill was used.
    pub fallback: bool,
}

/// Clamps floating bounds to the source: start floored, end ceiled.
/// Returns `None` when nothing of the region lies inside the image.
pub fn clamp_region(bounds: &Bounds, width: u32, height: u32) -> Option<PixelRect> {
    let clamp = |v: f64, max: u32| v.clamp(0.0, max as f64) as u32;
    let x0 = clamp(bounds.x.floor(), width);
    let y0 = clamp(bounds.y.floor(), height);
    let x1 = clamp((bounds.x + bounds.width).ceil(), width);
    let y1 = clamp((bounds.y + bounds.height).ceil(), height);

    (x1 > x0 && y1 > y0).then(|| PixelRect {
        x: x0,
        y: y0,
        width: x1 - x0,
        height: y1 - y0,
    })
}

/// Pixelates `bounds` of `source` with square blocks of `block_size` pixels.
///
/// Blocks are laid out from the clamped region's origin; edge blocks are
/// clamped to the region. Each block takes the truncated mean of its R, G and
/// B channels and full opacity. A block size of 0 is treated as 1.
///
/// If any source pixel cannot be read, the whole clamped region becomes a flat
/// translucent gray, not just the unreadable block.
pub fn mosaic<S: PixelSource + ?Sized>(
    source: &S,
    bounds: &Bounds,
    block_size: u32,
) -> Option<MosaicPatch> {
    let (width, height) = source.dimensions();
    let region = clamp_region(bounds, width, height)?;
    let block = block_size.max(1);

    let mut pixels = RgbaImage::new(region.width, region.height);

    for by in (0..region.height).step_by(block as usize) {
        for bx in (0..region.width).step_by(block as usize) {
            let bw = block.min(region.width - bx);
            let bh = block.min(region.height - by);

            let Some(average) = block_average(source, region.x + bx, region.y + by, bw, bh)
            else {
                log::warn!(
                    "Mosaic source unreadable at ({}, {}); using flat fill",
                    region.x + bx,
                    region.y + by
                );
                return Some(MosaicPatch {
                    region,
                    pixels: RgbaImage::from_pixel(region.width, region.height, Rgba(FALLBACK_FILL)),
                    fallback: true,
                });
            };

            let fill = Rgba([average[0], average[1], average[2], 255]);
            for y in by..by + bh {
                for x in bx..bx + bw {
                    pixels.put_pixel(x, y, fill);
                }
            }
        }
    }

    Some(MosaicPatch {
        region,
        pixels,
        fallback: false,
    })
}

fn block_average<S: PixelSource + ?Sized>(
    source: &S,
    x0: u32,
    y0: u32,
    width: u32,
    height: u32,
) -> Option<[u8; 3]> {
    let mut sums = [0u64; 3];
    for y in y0..y0 + height {
        for x in x0..x0 + width {
            let rgb = source.rgb_at(x, y)?;
            for (sum, channel) in sums.iter_mut().zip(rgb) {
                *sum += channel as u64;
            }
        }
    }
    let count = (width as u64 * height as u64).max(1);
    Some(sums.map(|sum| (sum / count) as u8))
}

/// Paints a patch at its region origin.
pub fn paint_patch(ctx: &Context, patch: &MosaicPatch) -> Result<(), ImageError> {
    let surface = rgba_to_surface(&patch.pixels)?;
    ctx.save()?;
    ctx.set_source_surface(&surface, patch.region.x as f64, patch.region.y as f64)?;
    ctx.paint()?;
    ctx.restore()?;
    Ok(())
}
