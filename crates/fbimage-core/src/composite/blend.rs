//! Clipped source-over blit of an RGBA raster onto a framebuffer.

use serde::{Deserialize, Serialize};

use super::framebuffer::FramebufferView;
use crate::raster::{ImageFormat, RasterImage, RGBA_CHANNELS};

/// Where the raster's top-left corner lands, in visible-area pixels.
///
/// May be negative or push the raster partly or fully off screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pixel counts from one composite call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositeStats {
    /// Destination pixels read, blended and written.
    pub written: u64,
    /// Raster pixels dropped because they fell outside the visible area.
    pub clipped: u64,
}

/// Blend one straight-alpha RGBA sample over a packed `0x00RRGGBB` word.
///
/// Per channel: `alpha / 255 * (src - dst) + dst` in `f32`, truncated toward
/// zero. The top byte of the result is always zero.
#[inline]
pub fn blend_over(src: [u8; 4], background: u32) -> u32 {
    let alpha = f32::from(src[3]) / 255.0;
    let channel = |s: u8, d: u32| -> u32 {
        let d = d as f32;
        (alpha * (f32::from(s) - d) + d) as u32
    };
    let r = channel(src[0], (background >> 16) & 0xff);
    let g = channel(src[1], (background >> 8) & 0xff);
    let b = channel(src[2], background & 0xff);
    (r << 16) | (g << 8) | b
}

/// Alpha-blend `raster` onto `dest` at `placement`, then release the raster.
///
/// Pixels outside the visible area are skipped silently. Only PNG-decoded
/// rasters are drawn; an empty raster draws nothing. Either way the raster is
/// empty afterwards and must be reloaded before it can be drawn again.
#[tracing::instrument(level = "debug", skip(raster, dest), fields(format = ?raster.format()))]
pub fn composite(
    raster: &mut RasterImage,
    dest: &mut FramebufferView<'_>,
    placement: Placement,
) -> CompositeStats {
    let stats = match raster.format() {
        ImageFormat::Png => blit(raster, dest, placement),
        ImageFormat::None | ImageFormat::Bitmap | ImageFormat::Jpeg => CompositeStats::default(),
    };
    tracing::debug!(written = stats.written, clipped = stats.clipped, "composite finished");
    raster.release();
    stats
}

fn blit(
    raster: &RasterImage,
    dest: &mut FramebufferView<'_>,
    placement: Placement,
) -> CompositeStats {
    let mut stats = CompositeStats::default();
    for (py, row) in raster.rows().iter().enumerate() {
        let y = i64::from(placement.y) + py as i64;
        for (px, src) in row.chunks_exact(RGBA_CHANNELS).enumerate() {
            let x = i64::from(placement.x) + px as i64;
            let Some(background) = dest.pixel(x, y) else {
                stats.clipped += 1;
                continue;
            };
            let out = blend_over([src[0], src[1], src[2], src[3]], background);
            dest.set_pixel(x, y, out);
            stats.written += 1;
        }
    }
    stats
}
