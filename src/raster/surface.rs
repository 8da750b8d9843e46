//! Conversion between straight-alpha RGBA buffers and Cairo ARGB32 surfaces.

use cairo::{Format, ImageSurface};
use image::RgbaImage;

use super::decode::ImageError;

/// Copies straight-alpha RGBA pixels into a new premultiplied ARGB32 surface.
pub fn rgba_to_surface(pixels: &RgbaImage) -> Result<ImageSurface, ImageError> {
    let (width, height) = pixels.dimensions();
    let too_large = || ImageError::TooLarge { width, height };
    let w = i32::try_from(width).map_err(|_| too_large())?;
    let h = i32::try_from(height).map_err(|_| too_large())?;

    let stride = Format::ARgb32.stride_for_width(width)?;
    let stride_bytes = usize::try_from(stride).map_err(|_| too_large())?;
    let mut data = vec![0u8; stride_bytes * height as usize];

    for (y, row) in pixels.rows().enumerate() {
        let line = &mut data[y * stride_bytes..];
        for (x, pixel) in row.enumerate() {
            let packed = premultiply(pixel.0).to_ne_bytes();
            line[x * 4..x * 4 + 4].copy_from_slice(&packed);
        }
    }

    Ok(ImageSurface::create_for_data(
        data,
        Format::ARgb32,
        w,
        h,
        stride,
    )?)
}

/// Packs one RGBA pixel as a native-endian premultiplied ARGB32 word.
fn premultiply([r, g, b, a]: [u8; 4]) -> u32 {
    let scale = |c: u8| (c as u32 * a as u32 + 127) / 255;
    ((a as u32) << 24) | (scale(r) << 16) | (scale(g) << 8) | scale(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn premultiply_scales_channels_by_alpha() {
        assert_eq!(premultiply([255, 0, 0, 255]), 0xFFFF_0000);
        assert_eq!(premultiply([255, 255, 255, 0]), 0);
        assert_eq!(premultiply([200, 100, 50, 128]) >> 24, 128);
        assert_eq!((premultiply([200, 100, 50, 128]) >> 16) & 0xFF, 100);
    }

    #[test]
    fn surface_matches_image_size() {
        let pixels = RgbaImage::from_pixel(7, 3, Rgba([1, 2, 3, 255]));
        let surface = rgba_to_surface(&pixels).unwrap();
        assert_eq!(surface.width(), 7);
        assert_eq!(surface.height(), 3);
        assert_eq!(surface.format(), Format::ARgb32);
    }
}
