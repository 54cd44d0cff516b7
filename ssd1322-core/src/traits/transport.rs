//! Display transport traits
//!
//! A transport knows how to address display RAM and stream pixel bytes
//! into it. The opcodes involved live with the implementation; the core
//! only computes the window and the payload.

use crate::config::DisplayConfig;
use crate::region::Window;

/// Byte transport to display RAM
///
/// Implemented by the SPI interface in `ssd1322-drivers` and by
/// [`MockTransport`](crate::MockTransport) for tests.
pub trait Transport {
    /// Error type for bus operations
    type Error;

    /// Write `payload` into the RAM window
    ///
    /// Sets the column window, sets the row window, enables RAM writes,
    /// then streams the payload row-major.
    fn send_window(&mut self, window: Window, payload: &[u8]) -> Result<(), Self::Error>;

    /// Write a complete frame
    ///
    /// `window` is the session's full-frame window and always matches the
    /// payload length.
    fn send_full_frame(&mut self, window: Window, payload: &[u8]) -> Result<(), Self::Error>;

    /// Panel geometry the transport was set up for, if it has one
    ///
    /// A session refuses to start when this disagrees with its own
    /// configuration.
    fn panel_config(&self) -> Option<&DisplayConfig> {
        None
    }
}

/// Horizontal scroll frame interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ScrollSpeed {
    /// Step every 6 frames
    Frames6 = 0x00,
    /// Step every 10 frames
    Frames10 = 0x01,
    /// Step every 100 frames
    Frames100 = 0x02,
    /// Step every 200 frames
    Frames200 = 0x03,
}

/// Horizontal scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScrollDirection {
    /// Content moves left
    Left,
    /// Content moves right
    Right,
}

/// Panel control commands beyond RAM writes
pub trait DisplayControl: Transport {
    /// Set segment output current (0-255)
    fn set_contrast(&mut self, contrast: u8) -> Result<(), Self::Error>;

    /// Swap black and white on the panel
    fn set_inverted(&mut self, inverted: bool) -> Result<(), Self::Error>;

    /// Turn the panel on or off (RAM contents are kept)
    fn set_display_on(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Start scrolling rows `start_row..=end_row`
    fn scroll_horizontal(
        &mut self,
        start_row: u8,
        end_row: u8,
        speed: ScrollSpeed,
        direction: ScrollDirection,
    ) -> Result<(), Self::Error>;

    /// Stop scrolling
    fn stop_scroll(&mut self) -> Result<(), Self::Error>;
}
