//! Image decoding pipeline.
//!
//! This module provides functionality for:
//! - Validating the PNG signature and reading header metadata
//! - Decoding PNG images to row-major RGBA8 rasters
//! - Normalizing every source colour model to R, G, B, A bytes
//!
//! # Normalization
//!
//! Regardless of how the file stores pixels, a decoded raster holds exactly
//! four 8-bit samples per pixel:
//! - Palette indices are expanded to direct colour
//! - Sub-byte greys are scaled to full bytes
//! - tRNS transparency becomes an explicit alpha channel
//! - 16-bit samples keep their high byte
//! - Grey is copied into R, G and B; missing alpha is opaque
//! - A declared gAMA is remapped to the display gamma (2.2 by default)
//!
//! # Examples
//!
//! ```ignore
//! use fbimage_core::decode::{decode_png, inspect, DecodeOptions};
//!
//! let (w, h) = inspect("splash.png").unwrap();
//! let raster = decode_png("splash.png", &DecodeOptions::default()).unwrap();
//! assert_eq!(raster.dimensions(), Some((w, h)));
//! ```

mod normalize;
mod png_decode;
mod types;

pub use png_decode::{
    decode_png, decode_png_from_reader, inspect, inspect_header, inspect_reader, is_png,
    PNG_SIGNATURE,
};
pub use types::{ColorModel, DecodeOptions, HeaderInfo, Limits, DEFAULT_DISPLAY_GAMMA};

#[cfg(test)]
pub(crate) use png_decode::fixtures;
