//! Compositing decoded rasters onto memory-mapped framebuffers.
//!
//! # Destination layout
//!
//! The destination is a 32-bit packed surface. Each visible pixel `(x, y)`
//! lives at byte offset `(x + offset.x) * 4 + (y + offset.y) * stride` and is
//! read and written as a native-endian `u32` holding `0x00RRGGBB`: red in bits
//! 16..24, green in 8..16, blue in the low byte. The top byte is cleared on
//! every write.
//!
//! # Coordinate System
//!
//! - Placement is the raster's top-left corner in visible-area pixels
//! - Origin is the top-left of the visible area
//! - Anything outside `[0, width) x [0, height)` is clipped

mod blend;
mod framebuffer;

pub use blend::{blend_over, composite, CompositeStats, Placement};
pub use framebuffer::{
    FramebufferGeometry, FramebufferView, Offset, Resolution, FRAMEBUFFER_BYTES_PER_PIXEL,
};
