//! Core types for image decoding.

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Display exponent assumed when remapping a declared source gamma.
pub const DEFAULT_DISPLAY_GAMMA: f64 = 2.2;

/// Colour model declared in the image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorModel {
    /// Single luminance channel.
    Grayscale,
    /// Luminance plus alpha.
    GrayscaleAlpha,
    /// Red, green, blue.
    Truecolor,
    /// Red, green, blue, alpha.
    TruecolorAlpha,
    /// Palette indices.
    Palette,
}

impl From<png::ColorType> for ColorModel {
    fn from(value: png::ColorType) -> Self {
        match value {
            png::ColorType::Grayscale => ColorModel::Grayscale,
            png::ColorType::GrayscaleAlpha => ColorModel::GrayscaleAlpha,
            png::ColorType::Rgb => ColorModel::Truecolor,
            png::ColorType::Rgba => ColorModel::TruecolorAlpha,
            png::ColorType::Indexed => ColorModel::Palette,
        }
    }
}

/// Header metadata read without materializing pixel rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Colour model as stored in the file.
    pub color_model: ColorModel,
    /// Bits per sample as stored in the file (1, 2, 4, 8 or 16).
    pub bit_depth: u8,
    /// Whether the image uses Adam7 interlacing.
    pub interlaced: bool,
    /// Declared file gamma (gAMA chunk), if any.
    pub gamma: Option<f64>,
    /// Whether a tRNS transparency chunk is present.
    pub has_transparency: bool,
}

impl HeaderInfo {
    /// Number of scanline passes needed to reconstruct the image.
    pub fn passes(&self) -> u8 {
        if self.interlaced {
            7
        } else {
            1
        }
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Resource limits checked before row buffers are allocated.
///
/// All fields default to `None` (no limit).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum image width.
    pub max_width: Option<u64>,
    /// Maximum image height.
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
}

impl Limits {
    /// Check dimensions against limits.
    pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), FormatError> {
        if let Some(max_w) = self.max_width {
            if u64::from(width) > max_w {
                return Err(FormatError::LimitExceeded(format!(
                    "width {width} exceeds limit {max_w}"
                )));
            }
        }
        if let Some(max_h) = self.max_height {
            if u64::from(height) > max_h {
                return Err(FormatError::LimitExceeded(format!(
                    "height {height} exceeds limit {max_h}"
                )));
            }
        }
        if let Some(max_px) = self.max_pixels {
            let pixels = u64::from(width) * u64::from(height);
            if pixels > max_px {
                return Err(FormatError::LimitExceeded(format!(
                    "pixel count {pixels} exceeds limit {max_px}"
                )));
            }
        }
        Ok(())
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Display exponent used for gamma remapping.
    pub display_gamma: f64,
    /// Apply gamma correction when the file declares a gamma value.
    pub apply_gamma: bool,
    /// Dimension limits.
    pub limits: Limits,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            display_gamma: DEFAULT_DISPLAY_GAMMA,
            apply_gamma: true,
            limits: Limits::default(),
        }
    }
}

impl DecodeOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
