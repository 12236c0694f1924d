//! The decoded raster and its lifecycle.

use serde::{Deserialize, Serialize};

/// Bytes per pixel of a normalized raster (R, G, B, A).
pub const RGBA_CHANNELS: usize = 4;

/// Source encoding a raster was produced from.
///
/// Only [`ImageFormat::Png`] has a decoder today. `Bitmap` and `Jpeg` are
/// reserved so new decoders can be added without touching the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Nothing loaded.
    #[default]
    None,
    /// Windows bitmap.
    Bitmap,
    /// Portable Network Graphics.
    Png,
    /// JPEG.
    Jpeg,
}

/// A fully decoded, row-major RGBA8 image.
///
/// A raster with `format != ImageFormat::None` always holds exactly `height`
/// rows of `width * 4` bytes each, in R, G, B, A order with straight alpha.
#[derive(Debug, Clone, Default)]
pub struct RasterImage {
    format: ImageFormat,
    width: u32,
    height: u32,
    rows: Vec<Vec<u8>>,
}

impl RasterImage {
    /// Create an empty raster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a loaded raster from already-normalized rows.
    pub(crate) fn from_rows(
        format: ImageFormat,
        width: u32,
        height: u32,
        rows: Vec<Vec<u8>>,
    ) -> Self {
        debug_assert_eq!(rows.len(), height as usize, "Row count mismatch");
        debug_assert!(
            rows.iter().all(|r| r.len() == row_bytes(width)),
            "Row length mismatch"
        );
        Self {
            format,
            width,
            height,
            rows,
        }
    }

    /// Build a PNG-tagged raster from a packed RGBA8 buffer.
    ///
    /// Returns `None` if `pixels.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: &[u8]) -> Option<Self> {
        let stride = row_bytes(width);
        let expected = stride.checked_mul(height as usize)?;
        if pixels.len() != expected {
            return None;
        }
        let rows = if stride == 0 {
            vec![Vec::new(); height as usize]
        } else {
            pixels.chunks_exact(stride).map(<[u8]>::to_vec).collect()
        };
        Some(Self::from_rows(ImageFormat::Png, width, height, rows))
    }

    /// Convert to an `image::RgbaImage` for further processing.
    ///
    /// Returns `None` if nothing is loaded.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        if !self.is_loaded() {
            return None;
        }
        let pixels: Vec<u8> = self.rows.concat();
        image::RgbaImage::from_raw(self.width, self.height, pixels)
    }

    /// The format tag; `ImageFormat::None` after a release.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Width in pixels. Stale once released.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels. Stale once released.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` of the loaded image, or `None` when empty.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.is_loaded().then_some((self.width, self.height))
    }

    /// Whether pixel rows are available.
    pub fn is_loaded(&self) -> bool {
        self.format != ImageFormat::None
    }

    /// All rows, top to bottom. Empty after a release.
    pub fn rows(&self) -> &[Vec<u8>] {
        &self.rows
    }

    /// One row of `width * 4` bytes.
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        self.rows.get(y as usize).map(Vec::as_slice)
    }

    /// The RGBA sample at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let i = x as usize * RGBA_CHANNELS;
        Some([row[i], row[i + 1], row[i + 2], row[i + 3]])
    }

    /// Drop the pixel rows and return to the empty state.
    ///
    /// Safe to call repeatedly. Dimensions are left as they were.
    pub fn release(&mut self) {
        if self.is_loaded() {
            tracing::trace!(width = self.width, height = self.height, "releasing raster");
        }
        self.format = ImageFormat::None;
        self.rows = Vec::new();
    }
}

/// Byte length of one normalized row.
pub(crate) fn row_bytes(width: u32) -> usize {
    width as usize * RGBA_CHANNELS
}
