//! fbimage Core - PNG decoding and framebuffer compositing
//!
//! This crate turns PNG files into normalized RGBA8 rasters and alpha-blends
//! them onto caller-provided, memory-mapped 32-bit framebuffers with clipping.
//!
//! The typical flow is inspect or load with an [`ImageLoader`], then
//! [`ImageLoader::composite`], which consumes the loaded raster.
//!
//! ```ignore
//! use fbimage_core::{FramebufferGeometry, FramebufferView, ImageLoader, Placement};
//!
//! let mut loader = ImageLoader::new();
//! loader.load("/usr/share/splash.png")?;
//! let mut fb = FramebufferView::new(mapped_bytes, geometry)?;
//! loader.composite(&mut fb, Placement::new(100, 50));
//! ```

pub mod composite;
pub mod decode;
pub mod error;
pub mod loader;
pub mod raster;

pub use composite::{
    blend_over, composite, CompositeStats, FramebufferGeometry, FramebufferView, Offset, Placement,
    Resolution,
};
pub use decode::{
    decode_png, decode_png_from_reader, inspect, inspect_header, ColorModel, DecodeOptions,
    HeaderInfo, Limits,
};
pub use error::{CompositeError, ErrorCode, FormatError, LoadError};
pub use loader::ImageLoader;
pub use raster::{ImageFormat, RasterImage};
