//! Conversion of codec output lines to RGBA8 rows.
//!
//! The codec is asked to expand palettes, sub-byte greys and tRNS, and to strip
//! 16-bit samples, so by the time a line reaches this module it is one of
//! Grayscale, GrayscaleAlpha, Rgb or Rgba at 8 bits per sample. Grey is widened
//! to three colour channels and a missing alpha channel is synthesized as opaque.

use crate::error::FormatError;
use crate::raster::RGBA_CHANNELS;

/// Deviation from 1.0 below which a gamma remap is treated as the identity.
const GAMMA_THRESHOLD: f64 = 0.05;

/// 8-bit sample layouts the normalizer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SampleLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl SampleLayout {
    /// Map the codec's post-transform output type to a layout.
    pub(crate) fn from_output(
        color: png::ColorType,
        depth: png::BitDepth,
    ) -> Result<Self, FormatError> {
        if depth != png::BitDepth::Eight {
            return Err(FormatError::UnsupportedLayout(format!(
                "{color:?} at {depth:?} bits after expansion"
            )));
        }
        match color {
            png::ColorType::Grayscale => Ok(SampleLayout::Gray),
            png::ColorType::GrayscaleAlpha => Ok(SampleLayout::GrayAlpha),
            png::ColorType::Rgb => Ok(SampleLayout::Rgb),
            png::ColorType::Rgba => Ok(SampleLayout::Rgba),
            png::ColorType::Indexed => Err(FormatError::UnsupportedLayout(
                "palette indices survived expansion".to_string(),
            )),
        }
    }

    pub(crate) fn channels(self) -> usize {
        match self {
            SampleLayout::Gray => 1,
            SampleLayout::GrayAlpha => 2,
            SampleLayout::Rgb => 3,
            SampleLayout::Rgba => 4,
        }
    }
}

/// Lookup table remapping 8-bit colour samples from file gamma to display gamma.
#[derive(Debug, Clone)]
pub(crate) struct GammaTable {
    lut: [u8; 256],
}

impl GammaTable {
    /// Build a table for a file declaring `file_gamma` shown on a display with
    /// exponent `display_gamma`.
    ///
    /// Returns `None` when the correction would be insignificant or the inputs
    /// are not positive.
    pub(crate) fn new(file_gamma: f64, display_gamma: f64) -> Option<Self> {
        if !(file_gamma > 0.0 && display_gamma > 0.0) {
            return None;
        }
        let product = file_gamma * display_gamma;
        if (product - 1.0).abs() < GAMMA_THRESHOLD {
            return None;
        }
        let exponent = 1.0 / product;
        let mut lut = [0u8; 256];
        for (v, slot) in lut.iter_mut().enumerate() {
            let normalized = v as f64 / 255.0;
            *slot = (normalized.powf(exponent) * 255.0 + 0.5).floor().clamp(0.0, 255.0) as u8;
        }
        Some(Self { lut })
    }

    #[inline]
    pub(crate) fn map(&self, v: u8) -> u8 {
        self.lut[v as usize]
    }

    /// Remap R, G and B of every pixel in an RGBA row. Alpha is linear and untouched.
    pub(crate) fn apply_rgba(&self, row: &mut [u8]) {
        for px in row.chunks_exact_mut(RGBA_CHANNELS) {
            px[0] = self.map(px[0]);
            px[1] = self.map(px[1]);
            px[2] = self.map(px[2]);
        }
    }
}

/// Widen one codec line into `out`, which must hold `width * 4` bytes.
pub(crate) fn expand_line(layout: SampleLayout, line: &[u8], out: &mut [u8]) {
    let channels = layout.channels();
    for (src, dst) in line
        .chunks_exact(channels)
        .zip(out.chunks_exact_mut(RGBA_CHANNELS))
    {
        match layout {
            SampleLayout::Gray => {
                dst.copy_from_slice(&[src[0], src[0], src[0], 0xff]);
            }
            SampleLayout::GrayAlpha => {
                dst.copy_from_slice(&[src[0], src[0], src[0], src[1]]);
            }
            SampleLayout::Rgb => {
                dst.copy_from_slice(&[src[0], src[1], src[2], 0xff]);
            }
            SampleLayout::Rgba => dst.copy_from_slice(src),
        }
    }
}
