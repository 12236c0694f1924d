//! Destination framebuffer description and bounds-checked pixel access.

use serde::{Deserialize, Serialize};

use crate::error::CompositeError;

/// The only destination pixel depth supported: 32-bit packed `0x00RRGGBB`.
pub const FRAMEBUFFER_BYTES_PER_PIXEL: usize = 4;

/// Visible area in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// Pixel offset of the visible area inside a larger virtual buffer (panning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

/// Fixed hardware geometry of a framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramebufferGeometry {
    /// Bytes per buffer row, including any padding.
    pub stride: usize,
    /// Bytes per pixel. Must be 4.
    pub bytes_per_pixel: usize,
    /// Writable visible area.
    pub resolution: Resolution,
    /// Offset added to every write location.
    pub offset: Offset,
}

impl FramebufferGeometry {
    /// Tightly packed 32-bit geometry with no padding and no offset.
    pub fn packed(width: u32, height: u32) -> Self {
        Self {
            stride: width as usize * FRAMEBUFFER_BYTES_PER_PIXEL,
            bytes_per_pixel: FRAMEBUFFER_BYTES_PER_PIXEL,
            resolution: Resolution { width, height },
            offset: Offset::default(),
        }
    }

    /// Smallest buffer length that covers every visible pixel.
    pub fn required_len(&self) -> Option<usize> {
        let Resolution { width, height } = self.resolution;
        if width == 0 || height == 0 {
            return Some(0);
        }
        let last_row = (self.offset.y as usize)
            .checked_add(height as usize - 1)?
            .checked_mul(self.stride)?;
        let row_span = (self.offset.x as usize)
            .checked_add(width as usize)?
            .checked_mul(self.bytes_per_pixel)?;
        last_row.checked_add(row_span)
    }

    fn validate(&self, buffer_len: usize) -> Result<(), CompositeError> {
        if self.bytes_per_pixel != FRAMEBUFFER_BYTES_PER_PIXEL {
            return Err(CompositeError::Geometry(format!(
                "{} bytes per pixel, only {FRAMEBUFFER_BYTES_PER_PIXEL} is supported",
                self.bytes_per_pixel
            )));
        }
        let row_span = (self.offset.x as usize + self.resolution.width as usize)
            * self.bytes_per_pixel;
        if self.resolution.height > 1 && self.stride < row_span {
            return Err(CompositeError::Geometry(format!(
                "stride {} shorter than visible row span {row_span}",
                self.stride
            )));
        }
        let required = self.required_len().ok_or_else(|| {
            CompositeError::Geometry("geometry overflows the address space".to_string())
        })?;
        if buffer_len < required {
            return Err(CompositeError::Geometry(format!(
                "buffer of {buffer_len} bytes, geometry needs {required}"
            )));
        }
        Ok(())
    }
}

/// A caller-owned, memory-mapped pixel buffer borrowed for one operation.
///
/// The view never outlives the borrow; the caller keeps the mapping valid and
/// serializes access from other threads.
#[derive(Debug)]
pub struct FramebufferView<'a> {
    buffer: &'a mut [u8],
    geometry: FramebufferGeometry,
}

impl<'a> FramebufferView<'a> {
    /// Wrap `buffer`, checking that `geometry` stays inside it.
    pub fn new(
        buffer: &'a mut [u8],
        geometry: FramebufferGeometry,
    ) -> Result<Self, CompositeError> {
        geometry.validate(buffer.len())?;
        Ok(Self { buffer, geometry })
    }

    pub fn geometry(&self) -> &FramebufferGeometry {
        &self.geometry
    }

    pub fn resolution(&self) -> Resolution {
        self.geometry.resolution
    }

    /// Byte offset of visible pixel `(x, y)`, or `None` if it is clipped.
    fn location(&self, x: i64, y: i64) -> Option<usize> {
        let Resolution { width, height } = self.geometry.resolution;
        if x < 0 || y < 0 || x >= i64::from(width) || y >= i64::from(height) {
            return None;
        }
        let col = x as usize + self.geometry.offset.x as usize;
        let row = y as usize + self.geometry.offset.y as usize;
        Some(col * self.geometry.bytes_per_pixel + row * self.geometry.stride)
    }

    /// Read the 32-bit word at visible pixel `(x, y)`.
    pub fn pixel(&self, x: i64, y: i64) -> Option<u32> {
        let loc = self.location(x, y)?;
        let b = &self.buffer[loc..loc + FRAMEBUFFER_BYTES_PER_PIXEL];
        Some(u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Overwrite the 32-bit word at visible pixel `(x, y)`.
    ///
    /// Returns `false` without writing if the pixel is clipped.
    pub fn set_pixel(&mut self, x: i64, y: i64, value: u32) -> bool {
        match self.location(x, y) {
            Some(loc) => {
                self.buffer[loc..loc + FRAMEBUFFER_BYTES_PER_PIXEL]
                    .copy_from_slice(&value.to_ne_bytes());
                true
            }
            None => false,
        }
    }
}
