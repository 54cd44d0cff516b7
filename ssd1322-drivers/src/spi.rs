//! SSD1322 4-wire SPI interface
//!
//! The controller is driven over SPI Mode 0 (up to 10 MHz) with a separate
//! data/command select line:
//!
//! - D/C low: the byte on the bus is an opcode
//! - D/C high: the byte is a command argument or display RAM data
//!
//! Chip select is handled by the `SpiDevice` implementation.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiDevice};

use ssd1322_core::{
    compute_addressing, DisplayConfig, DisplayControl, Rect, ScrollDirection, ScrollSpeed,
    Transport, Window,
};

use crate::command::{init_sequence, Command};

/// Reset pulse length and recovery time
const RESET_DELAY_MS: u32 = 200;

/// Zero bytes streamed per SPI write while clearing RAM
const CLEAR_CHUNK: usize = 64;

/// SPI interface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceError<SpiE, PinE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// Setting the D/C pin failed
    Pin(PinE),
}

type InterfaceResult<SPI, DC> =
    Result<(), InterfaceError<<SPI as SpiErrorType>::Error, <DC as PinErrorType>::Error>>;

/// SSD1322 on a 4-wire SPI bus
pub struct SpiInterface<SPI, DC> {
    spi: SPI,
    dc: DC,
    config: DisplayConfig,
}

impl<SPI, DC> SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    /// Create an interface for the panel described by `config`
    ///
    /// No bytes are sent until [`init`](Self::init).
    pub fn new(spi: SPI, dc: DC, config: DisplayConfig) -> Self {
        Self { spi, dc, config }
    }

    /// Panel configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Consume the interface and return the bus and D/C pin
    pub fn release(self) -> (SPI, DC) {
        (self.spi, self.dc)
    }

    /// Hardware reset through the RST pin
    ///
    /// Holds reset low for 200 ms, then waits 200 ms after release.
    pub fn reset<RST, D>(&mut self, rst: &mut RST, delay: &mut D) -> Result<(), RST::Error>
    where
        RST: OutputPin,
        D: DelayNs,
    {
        rst.set_low()?;
        delay.delay_ms(RESET_DELAY_MS);
        rst.set_high()?;
        delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Send the initialization sequence, clear RAM and switch the panel on
    pub fn init(&mut self) -> InterfaceResult<SPI, DC> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "ssd1322: init {}x{} panel",
            self.config.width,
            self.config.height
        );

        for command in init_sequence(&self.config).iter() {
            self.send_command(command)?;
        }
        self.clear_ram()?;
        self.send_command(&Command::display_on(true))
    }

    /// Send one opcode and its arguments
    pub fn send_command(&mut self, command: &Command) -> InterfaceResult<SPI, DC> {
        self.dc.set_low().map_err(InterfaceError::Pin)?;
        self.spi
            .write(&[command.opcode()])
            .map_err(InterfaceError::Spi)?;
        if !command.args().is_empty() {
            self.write_data(command.args())?;
        }
        Ok(())
    }

    /// Stream bytes with D/C high
    fn write_data(&mut self, data: &[u8]) -> InterfaceResult<SPI, DC> {
        self.dc.set_high().map_err(InterfaceError::Pin)?;
        self.spi.write(data).map_err(InterfaceError::Spi)
    }

    /// Open `window` for a RAM write
    fn open_window(&mut self, window: &Window) -> InterfaceResult<SPI, DC> {
        for command in Command::window(window).iter() {
            self.send_command(command)?;
        }
        Ok(())
    }

    /// Window covering the whole centered frame
    pub fn full_window(&self) -> Window {
        compute_addressing(
            &Rect::full(self.config.width, self.config.height),
            self.config.centering_offset(),
        )
    }

    /// Fill the frame's RAM window with zeros
    fn clear_ram(&mut self) -> InterfaceResult<SPI, DC> {
        let window = self.full_window();
        self.open_window(&window)?;

        let zeros = [0u8; CLEAR_CHUNK];
        let mut remaining = self.config.frame_len();
        while remaining > 0 {
            let n = remaining.min(CLEAR_CHUNK);
            self.write_data(&zeros[..n])?;
            remaining -= n;
        }
        Ok(())
    }
}

impl<SPI, DC> Transport for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    type Error = InterfaceError<SPI::Error, DC::Error>;

    fn send_window(&mut self, window: Window, payload: &[u8]) -> Result<(), Self::Error> {
        self.open_window(&window)?;
        self.write_data(payload)
    }

    fn send_full_frame(&mut self, window: Window, payload: &[u8]) -> Result<(), Self::Error> {
        self.send_window(window, payload)
    }

    fn panel_config(&self) -> Option<&DisplayConfig> {
        Some(&self.config)
    }
}

impl<SPI, DC> DisplayControl for SpiInterface<SPI, DC>
where
    SPI: SpiDevice,
    DC: OutputPin,
{
    fn set_contrast(&mut self, contrast: u8) -> Result<(), Self::Error> {
        self.send_command(&Command::contrast(contrast))
    }

    fn set_inverted(&mut self, inverted: bool) -> Result<(), Self::Error> {
        self.send_command(&Command::inverted(inverted))
    }

    fn set_display_on(&mut self, on: bool) -> Result<(), Self::Error> {
        self.send_command(&Command::display_on(on))
    }

    fn scroll_horizontal(
        &mut self,
        start_row: u8,
        end_row: u8,
        speed: ScrollSpeed,
        direction: ScrollDirection,
    ) -> Result<(), Self::Error> {
        self.send_command(&Command::scroll(start_row, end_row, speed, direction))?;
        self.send_command(&Command::activate_scroll())
    }

    fn stop_scroll(&mut self) -> Result<(), Self::Error> {
        self.send_command(&Command::deactivate_scroll())
    }
}
