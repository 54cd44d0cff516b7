//! Packed 4-bit grayscale framebuffer
//!
//! The SSD1322 stores two pixels per byte ("horizontal nibble" packing):
//!
//! ```text
//!  byte i of row y:  [ 7 6 5 4 | 3 2 1 0 ]
//!                      x = 2i    x = 2i+1
//! ```
//!
//! The pixel with the lower x coordinate occupies the high nibble. This is
//! the layout the controller expects on the wire, so a frame's backing
//! bytes can be streamed to display RAM unchanged.

use alloc::vec;
use alloc::vec::Vec;

use crate::error::FrameError;

/// Mask for a single 4-bit sample
pub const NIBBLE_MASK: u8 = 0x0F;

/// Packed 4-bit grayscale raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelStore {
    width: u16,
    height: u16,
    stride: usize,
    data: Vec<u8>,
}

impl PixelStore {
    /// Create a zero-filled framebuffer
    ///
    /// Width must be even and non-zero, height non-zero.
    pub fn new(width: u16, height: u16) -> Result<Self, FrameError> {
        if width == 0 || width % 2 != 0 || height == 0 {
            return Err(FrameError::InvalidDimensions);
        }
        let stride = width as usize / 2;
        Ok(Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        })
    }

    /// Create a framebuffer from packed bytes
    pub fn from_bytes(width: u16, height: u16, bytes: &[u8]) -> Result<Self, FrameError> {
        let mut store = Self::new(width, height)?;
        store.replace(bytes)?;
        Ok(store)
    }

    /// Width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Length of the backing store in bytes
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Packed backing bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Packed bytes of row `y`, or `None` past the last row
    pub fn row(&self, y: u16) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        Some(&self.data[start..start + self.stride])
    }

    /// Iterate over the packed rows
    pub fn rows(&self) -> core::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.stride)
    }

    /// Check whether two framebuffers have the same geometry
    pub fn same_dimensions(&self, other: &PixelStore) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Byte offset and bit shift for an in-range pixel
    ///
    /// Even x lives in the high nibble (shift 4), odd x in the low nibble.
    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        let offset = y * self.stride + x / 2;
        let shift = if x % 2 == 0 { 4 } else { 0 };
        Some((offset, shift))
    }

    /// Read the 4-bit value at (x, y)
    ///
    /// Out-of-range coordinates read as 0.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        match self.locate(x, y) {
            Some((offset, shift)) => (self.data[offset] >> shift) & NIBBLE_MASK,
            None => 0,
        }
    }

    /// Write the low 4 bits of `value` at (x, y)
    ///
    /// Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: i32, y: i32, value: u8) {
        if let Some((offset, shift)) = self.locate(x, y) {
            let byte = &mut self.data[offset];
            *byte = (*byte & !(NIBBLE_MASK << shift)) | ((value & NIBBLE_MASK) << shift);
        }
    }

    /// Overwrite the whole backing store
    pub fn replace(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        if bytes.len() != self.data.len() {
            return Err(FrameError::SizeMismatch);
        }
        self.data.copy_from_slice(bytes);
        Ok(())
    }

    /// Copy another framebuffer of the same dimensions into this one
    pub fn copy_from(&mut self, other: &PixelStore) -> Result<(), FrameError> {
        if !self.same_dimensions(other) {
            return Err(FrameError::SizeMismatch);
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Set every pixel to the low 4 bits of `value`
    pub fn fill(&mut self, value: u8) {
        let v = value & NIBBLE_MASK;
        self.data.fill((v << 4) | v);
    }

    /// Set every pixel to 0
    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}
