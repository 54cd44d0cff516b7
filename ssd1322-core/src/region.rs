//! Region payload and device addressing
//!
//! Turns a changed rectangle into the bytes streamed to display RAM and
//! the column/row window the controller must be set to beforehand.
//!
//! One column address covers two pixels. Frames narrower than the
//! 480-pixel RAM are centered by adding a fixed pixel offset before halving.

use alloc::vec::Vec;

use crate::diff::Rect;
use crate::error::FrameError;
use crate::framebuffer::PixelStore;

/// Device addressing window for a RAM write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    /// First column address
    pub column_start: u8,
    /// Last column address, inclusive
    pub column_end: u8,
    /// First row address
    pub row_start: u8,
    /// Last row address, inclusive
    pub row_end: u8,
}

/// Copy the bytes covered by `rect` into a new buffer, row-major
pub fn extract_payload(store: &PixelStore, rect: &Rect) -> Result<Vec<u8>, FrameError> {
    let mut payload = Vec::new();
    extract_payload_into(store, rect, &mut payload)?;
    Ok(payload)
}

/// Copy the bytes covered by `rect` into `out`, replacing its contents
///
/// `out` is left untouched on error.
pub fn extract_payload_into(
    store: &PixelStore,
    rect: &Rect,
    out: &mut Vec<u8>,
) -> Result<(), FrameError> {
    if rect.min_col > rect.max_col
        || rect.min_row > rect.max_row
        || rect.max_col >= store.width()
        || rect.max_row >= store.height()
    {
        return Err(FrameError::OutOfRange);
    }

    let first = rect.min_col as usize / 2;
    let last = rect.max_col as usize / 2;

    out.clear();
    out.reserve((last - first + 1) * rect.height() as usize);
    for row in store
        .rows()
        .skip(rect.min_row as usize)
        .take(rect.height() as usize)
    {
        out.extend_from_slice(&row[first..=last]);
    }
    Ok(())
}

/// Device addressing for `rect` with the frame centered by `centering_offset` pixels
pub fn compute_addressing(rect: &Rect, centering_offset: u16) -> Window {
    Window {
        column_start: ((rect.min_col + centering_offset) / 2) as u8,
        column_end: ((rect.max_col + centering_offset) / 2) as u8,
        row_start: rect.min_row as u8,
        row_end: rect.max_row as u8,
    }
}
