//! SSD1322 command set
//!
//! Opcodes from the SSD1322 datasheet and the power-on initialization
//! sequence. On the 4-wire bus the opcode is sent with D/C low and its
//! arguments with D/C high.

use heapless::Vec;
use ssd1322_core::{DisplayConfig, ScrollDirection, ScrollSpeed, Window};

/// SSD1322 opcodes
pub mod cmd {
    /// Set column start/end address
    pub const SET_COLUMN_ADDRESS: u8 = 0x15;
    /// Enable writes to display RAM
    pub const WRITE_RAM: u8 = 0x5C;
    /// Set row start/end address
    pub const SET_ROW_ADDRESS: u8 = 0x75;
    /// Re-map and dual COM line mode
    pub const SET_REMAP: u8 = 0xA0;
    /// Display start line
    pub const SET_START_LINE: u8 = 0xA1;
    /// Display vertical offset
    pub const SET_DISPLAY_OFFSET: u8 = 0xA2;
    /// Normal display
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    /// Inverse display
    pub const INVERSE_DISPLAY: u8 = 0xA7;
    /// Exit partial display mode
    pub const EXIT_PARTIAL_DISPLAY: u8 = 0xA9;
    /// Function selection (internal VDD regulator)
    pub const FUNCTION_SELECTION: u8 = 0xAB;
    /// Display off (sleep)
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Display on
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Phase 1 / phase 2 period length
    pub const SET_PHASE_LENGTH: u8 = 0xB1;
    /// Front clock divider and oscillator frequency
    pub const SET_CLOCK_DIVIDER: u8 = 0xB3;
    /// External VSL
    pub const SET_VSL: u8 = 0xB4;
    /// Second pre-charge period
    pub const SET_SECOND_PRECHARGE: u8 = 0xB6;
    /// Select the default linear grayscale table
    pub const DEFAULT_GRAYSCALE_TABLE: u8 = 0xB9;
    /// Pre-charge voltage
    pub const SET_PRECHARGE_VOLTAGE: u8 = 0xBB;
    /// VCOMH voltage
    pub const SET_VCOMH: u8 = 0xBE;
    /// Segment output current (contrast)
    pub const SET_CONTRAST: u8 = 0xC1;
    /// Master contrast current control
    pub const MASTER_CONTRAST: u8 = 0xC7;
    /// Multiplex ratio
    pub const SET_MUX_RATIO: u8 = 0xCA;
    /// Display enhancement B
    pub const DISPLAY_ENHANCEMENT_B: u8 = 0xD1;
    /// Command lock
    pub const SET_COMMAND_LOCK: u8 = 0xFD;
    /// Horizontal scroll left
    pub const SCROLL_LEFT: u8 = 0x26;
    /// Horizontal scroll right
    pub const SCROLL_RIGHT: u8 = 0x27;
    /// Stop scrolling
    pub const DEACTIVATE_SCROLL: u8 = 0x2E;
    /// Start scrolling
    pub const ACTIVATE_SCROLL: u8 = 0x2F;
}

/// Maximum argument bytes of any command used by this driver
pub const MAX_ARGS: usize = 6;

/// Number of commands in [`init_sequence`]
pub const INIT_SEQUENCE_LEN: usize = 19;

/// Contrast programmed at initialization
pub const DEFAULT_CONTRAST: u8 = 0xFF;

/// A single opcode with its argument bytes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    opcode: u8,
    args: Vec<u8, MAX_ARGS>,
}

impl Command {
    /// Command without arguments
    pub fn new(opcode: u8) -> Self {
        Self {
            opcode,
            args: Vec::new(),
        }
    }

    /// Command with arguments
    ///
    /// At most [`MAX_ARGS`] bytes are kept. Passing more is a bug and
    /// panics in debug builds.
    pub fn with_args(opcode: u8, args: &[u8]) -> Self {
        debug_assert!(
            args.len() <= MAX_ARGS,
            "command {:#04x} takes at most {} argument bytes",
            opcode,
            MAX_ARGS
        );
        let len = args.len().min(MAX_ARGS);
        Self {
            opcode,
            args: Vec::from_slice(&args[..len]).unwrap_or_default(),
        }
    }

    /// Opcode byte
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Argument bytes
    pub fn args(&self) -> &[u8] {
        &self.args
    }

    /// Set the column address window
    pub fn column_address(start: u8, end: u8) -> Self {
        Self::with_args(cmd::SET_COLUMN_ADDRESS, &[start, end])
    }

    /// Set the row address window
    pub fn row_address(start: u8, end: u8) -> Self {
        Self::with_args(cmd::SET_ROW_ADDRESS, &[start, end])
    }

    /// Enable RAM writes; following data bytes fill the window
    pub fn write_ram() -> Self {
        Self::new(cmd::WRITE_RAM)
    }

    /// Segment output current
    pub fn contrast(contrast: u8) -> Self {
        Self::with_args(cmd::SET_CONTRAST, &[contrast])
    }

    /// Normal or inverse display
    pub fn inverted(inverted: bool) -> Self {
        if inverted {
            Self::new(cmd::INVERSE_DISPLAY)
        } else {
            Self::new(cmd::NORMAL_DISPLAY)
        }
    }

    /// Display on or off
    pub fn display_on(on: bool) -> Self {
        if on {
            Self::new(cmd::DISPLAY_ON)
        } else {
            Self::new(cmd::DISPLAY_OFF)
        }
    }

    /// Horizontal scroll setup for rows `start_row..=end_row`
    pub fn scroll(
        start_row: u8,
        end_row: u8,
        speed: ScrollSpeed,
        direction: ScrollDirection,
    ) -> Self {
        let opcode = match direction {
            ScrollDirection::Left => cmd::SCROLL_LEFT,
            ScrollDirection::Right => cmd::SCROLL_RIGHT,
        };
        // Dummy bytes are always zero
        Self::with_args(opcode, &[0x00, start_row, speed as u8, end_row, 0x00, 0x00])
    }

    /// Start the configured scroll
    pub fn activate_scroll() -> Self {
        Self::new(cmd::ACTIVATE_SCROLL)
    }

    /// Stop scrolling
    pub fn deactivate_scroll() -> Self {
        Self::new(cmd::DEACTIVATE_SCROLL)
    }

    /// Commands that open `window` for a RAM write
    pub fn window(window: &Window) -> [Self; 3] {
        [
            Self::column_address(window.column_start, window.column_end),
            Self::row_address(window.row_start, window.row_end),
            Self::write_ram(),
        ]
    }
}

/// Re-map register bytes for the panel orientation and COM layout
pub fn remap_bytes(config: &DisplayConfig) -> [u8; 2] {
    let first = if config.rotated { 0x06 } else { 0x14 };
    let mut second = 0x11;
    if config.sequential {
        second |= 0x01;
    }
    if config.swap_top_bottom {
        second |= 0x02;
    }
    [first, second]
}

/// Power-on initialization sequence
///
/// Leaves the display off; the driver clears RAM before switching it on.
pub fn init_sequence(config: &DisplayConfig) -> [Command; INIT_SEQUENCE_LEN] {
    let mux_ratio = config.height.saturating_sub(1) as u8;
    let remap = remap_bytes(config);

    [
        // Unlock command interface
        Command::with_args(cmd::SET_COMMAND_LOCK, &[0x12]),
        Command::new(cmd::DISPLAY_OFF),
        Command::with_args(cmd::SET_CLOCK_DIVIDER, &[0xF2]),
        Command::with_args(cmd::SET_MUX_RATIO, &[mux_ratio]),
        Command::with_args(cmd::SET_DISPLAY_OFFSET, &[0x00]),
        Command::with_args(cmd::SET_START_LINE, &[0x00]),
        Command::with_args(cmd::SET_REMAP, &remap),
        // Internal VDD regulator
        Command::with_args(cmd::FUNCTION_SELECTION, &[0x01]),
        Command::with_args(cmd::SET_VSL, &[0xA0, 0xFD]),
        Command::contrast(DEFAULT_CONTRAST),
        Command::with_args(cmd::MASTER_CONTRAST, &[0x0F]),
        Command::new(cmd::DEFAULT_GRAYSCALE_TABLE),
        Command::with_args(cmd::SET_PHASE_LENGTH, &[0xE2]),
        Command::with_args(cmd::DISPLAY_ENHANCEMENT_B, &[0x82, 0x20]),
        Command::with_args(cmd::SET_PRECHARGE_VOLTAGE, &[0x1F]),
        Command::with_args(cmd::SET_SECOND_PRECHARGE, &[0x08]),
        Command::with_args(cmd::SET_VCOMH, &[0x07]),
        Command::new(cmd::NORMAL_DISPLAY),
        Command::new(cmd::EXIT_PARTIAL_DISPLAY),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_command_args() {
        let c = Command::column_address(0x1C, 0x5B);
        assert_eq!(c.opcode(), cmd::SET_COLUMN_ADDRESS);
        assert_eq!(c.args(), &[0x1C, 0x5B]);

        let c = Command::write_ram();
        assert_eq!(c.opcode(), cmd::WRITE_RAM);
        assert!(c.args().is_empty());
    }

    #[test]
    fn test_with_args_at_capacity() {
        let c = Command::with_args(0x00, &[1, 2, 3, 4, 5, 6]);
        assert_eq!(c.args(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "at most 6 argument bytes")]
    fn test_with_args_too_many() {
        Command::with_args(0x00, &[1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_remap_bytes() {
        assert_eq!(remap_bytes(&DisplayConfig::new(256, 64)), [0x14, 0x11]);
        assert_eq!(
            remap_bytes(&DisplayConfig::new(256, 64).rotated(true)),
            [0x06, 0x11]
        );
        assert_eq!(
            remap_bytes(&DisplayConfig::new(256, 64).swap_top_bottom(true)),
            [0x14, 0x13]
        );
    }

    #[test]
    fn test_init_sequence() {
        let seq = init_sequence(&DisplayConfig::new(256, 64));
        assert_eq!(seq[0], Command::with_args(cmd::SET_COMMAND_LOCK, &[0x12]));
        assert_eq!(seq[3], Command::with_args(cmd::SET_MUX_RATIO, &[63]));
        assert_eq!(seq[6].args(), &[0x14, 0x11]);
        assert_eq!(seq[9], Command::contrast(0xFF));
        assert_eq!(seq[1], Command::display_on(false));
        assert_eq!(
            seq[INIT_SEQUENCE_LEN - 1],
            Command::new(cmd::EXIT_PARTIAL_DISPLAY)
        );

        let seq = init_sequence(&DisplayConfig::new(128, 32));
        assert_eq!(seq[3].args(), &[31]);
    }

    #[test]
    fn test_scroll_command() {
        let c = Command::scroll(2, 10, ScrollSpeed::Frames100, ScrollDirection::Right);
        assert_eq!(c.opcode(), cmd::SCROLL_RIGHT);
        assert_eq!(c.args(), &[0x00, 2, 0x02, 10, 0x00, 0x00]);

        let c = Command::scroll(0, 63, ScrollSpeed::Frames6, ScrollDirection::Left);
        assert_eq!(c.opcode(), cmd::SCROLL_LEFT);
    }

    #[test]
    fn test_window_commands() {
        let window = Window {
            column_start: 56,
            column_end: 183,
            row_start: 0,
            row_end: 63,
        };
        let [col, row, write] = Command::window(&window);
        assert_eq!(col.args(), &[56, 183]);
        assert_eq!(row.args(), &[0, 63]);
        assert_eq!(write.opcode(), cmd::WRITE_RAM);
    }

    proptest! {
        #[test]
        fn prop_with_args_keeps_args(
            opcode in any::<u8>(),
            args in proptest::collection::vec(any::<u8>(), 0..=MAX_ARGS),
        ) {
            let c = Command::with_args(opcode, &args);
            prop_assert_eq!(c.opcode(), opcode);
            prop_assert_eq!(c.args(), &args[..]);
        }

        #[test]
        fn prop_mux_ratio_tracks_height(height in 1u16..=128) {
            let seq = init_sequence(&DisplayConfig::new(256, height));
            prop_assert_eq!(seq[3].args(), &[(height - 1) as u8][..]);
        }
    }
}
