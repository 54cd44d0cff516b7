//! Differential update
//!
//! Finds the smallest byte-aligned rectangle that covers every byte that
//! differs between the committed frame and a candidate frame. Only that
//! rectangle needs to be streamed to display RAM.

use crate::framebuffer::PixelStore;

/// Inclusive pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    /// Leftmost column (even for diff results)
    pub min_col: u16,
    /// Rightmost column, inclusive (odd for diff results)
    pub max_col: u16,
    /// Top row
    pub min_row: u16,
    /// Bottom row, inclusive
    pub max_row: u16,
}

impl Rect {
    /// Create a rectangle from inclusive bounds
    pub const fn new(min_col: u16, max_col: u16, min_row: u16, max_row: u16) -> Self {
        Self {
            min_col,
            max_col,
            min_row,
            max_row,
        }
    }

    /// Rectangle covering a whole `width` x `height` frame
    pub const fn full(width: u16, height: u16) -> Self {
        Self::new(
            0,
            width.saturating_sub(1),
            0,
            height.saturating_sub(1),
        )
    }

    /// Width in pixels
    pub const fn width(&self) -> u16 {
        self.max_col - self.min_col + 1
    }

    /// Height in pixels
    pub const fn height(&self) -> u16 {
        self.max_row - self.min_row + 1
    }

    /// Check that the rectangle starts and ends on byte boundaries
    pub const fn is_byte_aligned(&self) -> bool {
        self.min_col % 2 == 0 && self.max_col % 2 == 1
    }
}

/// Compare two frames and return the changed rectangle
///
/// Both frames must have the same dimensions; the session checks this
/// before calling. Returns `None` when the frames are identical.
pub fn find_changed_rect(committed: &PixelStore, candidate: &PixelStore) -> Option<Rect> {
    debug_assert!(committed.same_dimensions(candidate));

    let mut min_row = u16::MAX;
    let mut max_row = 0u16;
    let mut min_byte = usize::MAX;
    let mut max_byte = 0usize;

    for (y, (old, new)) in committed.rows().zip(candidate.rows()).enumerate() {
        if old == new {
            continue;
        }

        let y = y as u16;
        min_row = min_row.min(y);
        max_row = max_row.max(y);

        // Rows differ, so both searches find a byte
        let first = old.iter().zip(new).position(|(a, b)| a != b);
        let last = old.iter().zip(new).rposition(|(a, b)| a != b);
        if let (Some(first), Some(last)) = (first, last) {
            min_byte = min_byte.min(first);
            max_byte = max_byte.max(last);
        }
    }

    if min_row > max_row {
        return None;
    }

    // Byte index i covers pixels 2i and 2i+1
    let min_col = (min_byte * 2) as u16;
    let mut max_col = (max_byte * 2 + 1) as u16;

    // Keep the right edge on a byte boundary
    if max_col % 2 == 0 && max_col < committed.width() - 1 {
        max_col += 1;
    }

    let rect = Rect::new(min_col, max_col, min_row, max_row);

    #[cfg(feature = "defmt")]
    defmt::trace!(
        "diff: cols {}..={} rows {}..={}",
        rect.min_col,
        rect.max_col,
        rect.min_row,
        rect.max_row
    );

    Some(rect)
}
