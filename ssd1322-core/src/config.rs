//! Display configuration
//!
//! Geometry and panel wiring options. With the `serde` feature the
//! configuration can be stored as postcard binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Columns of display RAM on the SSD1322, in pixels
pub const DEVICE_RAM_COLUMNS: u16 = 480;

/// Rows of display RAM on the SSD1322
pub const MAX_HEIGHT: u16 = 128;

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Frame width in pixels (even, at most `ram_columns`)
    pub width: u16,
    /// Frame height in pixels (1-128)
    pub height: u16,
    /// Physical RAM width in pixels; the frame is centered within it
    pub ram_columns: u16,
    /// Rotate the panel by 180°
    pub rotated: bool,
    /// Sequential (instead of alternate) COM pin layout
    pub sequential: bool,
    /// Swap the top and bottom halves of the panel
    pub swap_top_bottom: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::new(256, 64)
    }
}

impl DisplayConfig {
    /// Create a config for a `width` x `height` panel on a 480-column RAM
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            version: CONFIG_VERSION,
            width,
            height,
            ram_columns: DEVICE_RAM_COLUMNS,
            rotated: false,
            sequential: false,
            swap_top_bottom: false,
        }
    }

    /// Override the physical RAM width
    pub const fn with_ram_columns(mut self, ram_columns: u16) -> Self {
        self.ram_columns = ram_columns;
        self
    }

    /// Rotate the panel by 180°
    pub const fn rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    /// Use the sequential COM pin layout
    pub const fn sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Swap the top and bottom halves of the panel
    pub const fn swap_top_bottom(mut self, swap: bool) -> Self {
        self.swap_top_bottom = swap;
        self
    }

    /// Check the geometry against the controller limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ram_columns == 0 || self.ram_columns > DEVICE_RAM_COLUMNS {
            return Err(ConfigError::InvalidRamColumns);
        }
        if self.width == 0 || self.width % 2 != 0 || self.width > self.ram_columns {
            return Err(ConfigError::InvalidWidth);
        }
        if self.height == 0 || self.height > MAX_HEIGHT {
            return Err(ConfigError::InvalidHeight);
        }
        Ok(())
    }

    /// Pixel offset that centers the frame in display RAM
    ///
    /// Column addresses cover two pixels, so only an even offset maps frame
    /// bytes onto RAM bytes. An odd offset (width 254 on 480 columns gives
    /// 113) is rounded down when addressing: every pixel lands one nibble
    /// to the left and the full-frame window is one column address wider
    /// than a frame row. Such widths are accepted; pick widths where
    /// `(ram_columns - width) / 2` is even, or adjust `ram_columns`.
    pub const fn centering_offset(&self) -> u16 {
        self.ram_columns.saturating_sub(self.width) / 2
    }

    /// Check if the offset maps frame bytes onto whole RAM column addresses
    pub const fn is_column_aligned(&self) -> bool {
        self.centering_offset() % 2 == 0
    }

    /// Check if `other` describes the same frame on the same RAM
    ///
    /// Panel wiring flags are ignored.
    pub const fn same_geometry(&self, other: &DisplayConfig) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.ram_columns == other.ram_columns
    }

    /// Size of one full frame in bytes (two pixels per byte)
    pub const fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize / 2
    }

    /// Encode as postcard binary data into `buf`
    ///
    /// Returns the used part of `buf`.
    #[cfg(feature = "serde")]
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Decode postcard binary data and validate the result
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if config.version != CONFIG_VERSION {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Config version mismatch: found {}, expected {}",
                config.version,
                CONFIG_VERSION
            );
            return Err(ConfigError::Deserialize);
        }
        config.validate()?;
        Ok(config)
    }
}
