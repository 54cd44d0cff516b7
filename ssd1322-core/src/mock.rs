//! In-memory transport
//!
//! Records every transfer instead of driving a bus. Failures can be
//! scripted to exercise the session's retry behaviour.

use alloc::vec::Vec;

use crate::config::DisplayConfig;
use crate::region::Window;
use crate::traits::{DisplayControl, ScrollDirection, ScrollSpeed, Transport};

/// Mock transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MockError {
    /// Failure scripted with [`MockTransport::fail_next`]
    Injected,
}

/// A transfer accepted by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
    /// Windowed RAM write
    Window { window: Window, payload: Vec<u8> },
    /// Full frame RAM write
    FullFrame { window: Window, payload: Vec<u8> },
    /// Contrast change
    Contrast(u8),
    /// Inversion change
    Inverted(bool),
    /// Display power change
    DisplayOn(bool),
    /// Scroll started
    Scroll {
        start_row: u8,
        end_row: u8,
        speed: ScrollSpeed,
        direction: ScrollDirection,
    },
    /// Scroll stopped
    StopScroll,
}

/// Mock transport for tests
#[derive(Debug, Default)]
pub struct MockTransport {
    transfers: Vec<Transfer>,
    attempts: usize,
    fail_remaining: usize,
    panel: Option<DisplayConfig>,
}

impl MockTransport {
    /// Create a mock that accepts every transfer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that reports `config` as its panel geometry
    pub fn with_panel(config: DisplayConfig) -> Self {
        Self {
            panel: Some(config),
            ..Self::default()
        }
    }

    /// Make the next `count` calls fail with [`MockError::Injected`]
    pub fn fail_next(&mut self, count: usize) {
        self.fail_remaining = count;
    }

    /// Transfers that succeeded, oldest first
    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    /// Most recent successful transfer
    pub fn last(&self) -> Option<&Transfer> {
        self.transfers.last()
    }

    /// Number of calls made, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Forget recorded transfers and the attempt counter
    pub fn reset(&mut self) {
        self.transfers.clear();
        self.attempts = 0;
    }

    fn record(&mut self, transfer: Transfer) -> Result<(), MockError> {
        self.attempts += 1;
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            return Err(MockError::Injected);
        }
        self.transfers.push(transfer);
        Ok(())
    }
}

impl Transport for MockTransport {
    type Error = MockError;

    fn send_window(&mut self, window: Window, payload: &[u8]) -> Result<(), Self::Error> {
        self.record(Transfer::Window {
            window,
            payload: payload.to_vec(),
        })
    }

    fn send_full_frame(&mut self, window: Window, payload: &[u8]) -> Result<(), Self::Error> {
        self.record(Transfer::FullFrame {
            window,
            payload: payload.to_vec(),
        })
    }

    fn panel_config(&self) -> Option<&DisplayConfig> {
        self.panel.as_ref()
    }
}

impl DisplayControl for MockTransport {
    fn set_contrast(&mut self, contrast: u8) -> Result<(), Self::Error> {
        self.record(Transfer::Contrast(contrast))
    }

    fn set_inverted(&mut self, inverted: bool) -> Result<(), Self::Error> {
        self.record(Transfer::Inverted(inverted))
    }

    fn set_display_on(&mut self, on: bool) -> Result<(), Self::Error> {
        self.record(Transfer::DisplayOn(on))
    }

    fn scroll_horizontal(
        &mut self,
        start_row: u8,
        end_row: u8,
        speed: ScrollSpeed,
        direction: ScrollDirection,
    ) -> Result<(), Self::Error> {
        self.record(Transfer::Scroll {
            start_row,
            end_row,
            speed,
            direction,
        })
    }

    fn stop_scroll(&mut self) -> Result<(), Self::Error> {
        self.record(Transfer::StopScroll)
    }
}
