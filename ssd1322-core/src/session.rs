//! Display session
//!
//! A [`DeviceSession`] owns one display's transport, the last frame the
//! transport acknowledged (the committed frame) and the halted flag.
//!
//! # Commit semantics
//!
//! - Validation happens before any transport call.
//! - The committed frame is replaced only after the transport succeeds.
//! - A failed commit leaves the session exactly as it was, so retrying the
//!   same candidate recomputes the same update.
//!
//! ```text
//!            commit_frame / commit_full_frame
//!              ┌──────────────┐
//!              ▼              │
//!          ┌────────┐ ────────┘        ┌────────┐
//!   new ──►│ Active │ ── halt() ─────► │ Halted │ ◄── halt()
//!          └────────┘                  └────────┘
//! ```

use alloc::vec::Vec;

use crate::config::DisplayConfig;
use crate::diff::{find_changed_rect, Rect};
use crate::error::{ConfigError, SessionError};
use crate::framebuffer::PixelStore;
use crate::region::{compute_addressing, extract_payload_into, Window};
use crate::traits::{DisplayControl, ScrollDirection, ScrollSpeed, Transport};

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Accepting frames and commands
    Active,
    /// Halted; every further operation fails
    Halted,
}

type SessionResult<T, E> = Result<T, SessionError<E>>;

/// Differential-update session for one display
pub struct DeviceSession<T> {
    transport: T,
    config: DisplayConfig,
    /// Pixel offset centering the frame in display RAM
    centering_offset: u16,
    /// RAM window covering the whole frame
    full_window: Window,
    /// Last frame acknowledged by the transport
    committed: PixelStore,
    /// Reused between commits to avoid reallocating the payload
    scratch: Vec<u8>,
    state: SessionState,
}

impl<T: Transport> DeviceSession<T> {
    /// Create a session for the display described by `config`
    ///
    /// The committed frame starts all black, matching a freshly cleared
    /// display RAM. A transport that reports its own panel geometry must
    /// agree with `config`.
    pub fn new(transport: T, config: DisplayConfig) -> SessionResult<Self, T::Error> {
        config.validate()?;
        if let Some(panel) = transport.panel_config() {
            if !panel.same_geometry(&config) {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "session: {}x{} frame, transport set up for {}x{}",
                    config.width,
                    config.height,
                    panel.width,
                    panel.height
                );
                return Err(ConfigError::GeometryMismatch.into());
            }
        }

        #[cfg(feature = "defmt")]
        if !config.is_column_aligned() {
            defmt::warn!(
                "session: odd centering offset {}, frame is shifted by one pixel",
                config.centering_offset()
            );
        }

        let committed = PixelStore::new(config.width, config.height)?;
        let centering_offset = config.centering_offset();
        let full_window = compute_addressing(
            &Rect::full(config.width, config.height),
            centering_offset,
        );

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "session: {}x{} frame, centering offset {}",
            config.width,
            config.height,
            config.centering_offset()
        );

        Ok(Self {
            transport,
            centering_offset,
            full_window,
            config,
            committed,
            scratch: Vec::new(),
            state: SessionState::Active,
        })
    }

    /// Create a session for a `width` x `height` frame on the 480-column RAM
    pub fn with_dimensions(
        transport: T,
        width: u16,
        height: u16,
    ) -> SessionResult<Self, T::Error> {
        Self::new(transport, DisplayConfig::new(width, height))
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session was halted
    pub fn is_halted(&self) -> bool {
        self.state == SessionState::Halted
    }

    /// Display configuration
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Frame width in pixels
    pub fn width(&self) -> u16 {
        self.config.width
    }

    /// Frame height in pixels
    pub fn height(&self) -> u16 {
        self.config.height
    }

    /// Pixel offset centering the frame in display RAM
    pub fn centering_offset(&self) -> u16 {
        self.centering_offset
    }

    /// RAM window used by [`commit_full_frame`](Self::commit_full_frame)
    pub fn full_window(&self) -> Window {
        self.full_window
    }

    /// Last frame the transport acknowledged
    pub fn committed(&self) -> &PixelStore {
        &self.committed
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the session and return the transport
    pub fn release(self) -> T {
        self.transport
    }

    fn ensure_active(&self) -> SessionResult<(), T::Error> {
        match self.state {
            SessionState::Active => Ok(()),
            SessionState::Halted => Err(SessionError::Halted),
        }
    }

    /// Send a complete frame, bypassing the diff
    ///
    /// `frame` must hold exactly `width * height / 2` packed bytes.
    pub fn commit_full_frame(&mut self, frame: &[u8]) -> SessionResult<(), T::Error> {
        self.ensure_active()?;
        if frame.len() != self.committed.byte_len() {
            return Err(SessionError::SizeMismatch);
        }

        self.transport
            .send_full_frame(self.full_window, frame)
            .map_err(SessionError::Transport)?;

        self.committed.replace(frame)?;

        #[cfg(feature = "defmt")]
        defmt::trace!("session: full frame committed ({} bytes)", frame.len());

        Ok(())
    }

    /// Send only what changed between the committed frame and `candidate`
    ///
    /// Returns the rectangle that was written, or `None` when nothing
    /// changed and the transport was not called.
    pub fn commit_frame(&mut self, candidate: &PixelStore) -> SessionResult<Option<Rect>, T::Error> {
        self.ensure_active()?;
        if !self.committed.same_dimensions(candidate) {
            return Err(SessionError::DimensionMismatch);
        }

        let Some(rect) = find_changed_rect(&self.committed, candidate) else {
            return Ok(None);
        };

        extract_payload_into(candidate, &rect, &mut self.scratch)?;
        let window = compute_addressing(&rect, self.centering_offset);

        if let Err(e) = self.transport.send_window(window, &self.scratch) {
            #[cfg(feature = "defmt")]
            defmt::warn!("session: transport failed, committed frame kept");
            return Err(SessionError::Transport(e));
        }

        self.committed.copy_from(candidate)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "session: committed {}x{} region ({} bytes)",
            rect.width(),
            rect.height(),
            self.scratch.len()
        );

        Ok(Some(rect))
    }

    /// Halt the session
    ///
    /// Every later commit or control call fails with
    /// [`SessionError::Halted`]. Halting twice is allowed.
    pub fn halt(&mut self) {
        #[cfg(feature = "defmt")]
        if self.state == SessionState::Active {
            defmt::debug!("session: halted");
        }
        self.state = SessionState::Halted;
    }
}

impl<T: DisplayControl> DeviceSession<T> {
    /// Halt the session and switch the panel off
    ///
    /// The session is halted even if the display-off command fails.
    pub fn power_off(&mut self) -> SessionResult<(), T::Error> {
        self.halt();
        self.transport
            .set_display_on(false)
            .map_err(SessionError::Transport)
    }

    /// Set panel contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> SessionResult<(), T::Error> {
        self.ensure_active()?;
        self.transport
            .set_contrast(contrast)
            .map_err(SessionError::Transport)
    }

    /// Swap black and white on the panel
    pub fn set_inverted(&mut self, inverted: bool) -> SessionResult<(), T::Error> {
        self.ensure_active()?;
        self.transport
            .set_inverted(inverted)
            .map_err(SessionError::Transport)
    }

    /// Scroll rows `start_row..=end_row` horizontally
    pub fn scroll_horizontal(
        &mut self,
        start_row: u8,
        end_row: u8,
        speed: ScrollSpeed,
        direction: ScrollDirection,
    ) -> SessionResult<(), T::Error> {
        self.ensure_active()?;
        let height = self.config.height;
        if u16::from(start_row) >= height || u16::from(end_row) >= height {
            return Err(SessionError::InvalidScrollRange);
        }
        self.transport
            .scroll_horizontal(start_row, end_row, speed, direction)
            .map_err(SessionError::Transport)
    }

    /// Stop scrolling
    pub fn stop_scroll(&mut self) -> SessionResult<(), T::Error> {
        self.ensure_active()?;
        self.transport.stop_scroll().map_err(SessionError::Transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::mock::{MockError, MockTransport, Transfer};
    use crate::region::Window;

    fn session(width: u16, height: u16) -> DeviceSession<MockTransport> {
        DeviceSession::with_dimensions(MockTransport::new(), width, height).unwrap()
    }

    #[test]
    fn test_initialize() {
        let s = session(256, 64);
        assert_eq!(s.state(), SessionState::Active);
        assert_eq!(s.centering_offset(), 112);
        assert_eq!(s.committed().byte_len(), 8192);
        assert!(s.committed().as_bytes().iter().all(|&b| b == 0));
        assert_eq!(s.transport().attempts(), 0);
    }

    #[test]
    fn test_initialize_invalid() {
        let err = DeviceSession::with_dimensions(MockTransport::new(), 255, 64).err();
        assert_eq!(
            err,
            Some(SessionError::InvalidConfiguration(ConfigError::InvalidWidth))
        );

        let err = DeviceSession::with_dimensions(MockTransport::new(), 256, 129).err();
        assert_eq!(
            err,
            Some(SessionError::InvalidConfiguration(ConfigError::InvalidHeight))
        );

        let config = DisplayConfig::new(256, 64).with_ram_columns(128);
        let err = DeviceSession::new(MockTransport::new(), config).err();
        assert_eq!(
            err,
            Some(SessionError::InvalidConfiguration(ConfigError::InvalidWidth))
        );
    }

    #[test]
    fn test_commit_frame_sends_changed_region() {
        let mut s = session(256, 64);
        let mut candidate = PixelStore::new(256, 64).unwrap();
        candidate.set(0, 0, 0xA);
        candidate.set(255, 63, 0x5);

        let rect = s.commit_frame(&candidate).unwrap();
        assert_eq!(rect, Some(Rect::new(0, 255, 0, 63)));

        match s.transport().last() {
            Some(Transfer::Window { window, payload }) => {
                assert_eq!(
                    *window,
                    Window {
                        column_start: 56,
                        column_end: 183,
                        row_start: 0,
                        row_end: 63,
                    }
                );
                assert_eq!(payload.as_slice(), candidate.as_bytes());
            }
            other => panic!("unexpected transfer: {:?}", other),
        }
        assert_eq!(s.committed(), &candidate);
    }

    #[test]
    fn test_commit_frame_small_region() {
        let mut s = session(8, 4);
        let mut candidate = PixelStore::new(8, 4).unwrap();
        candidate.set(3, 2, 0xF);

        let rect = s.commit_frame(&candidate).unwrap().unwrap();
        assert_eq!(rect, Rect::new(2, 3, 2, 2));

        // (480 - 8) / 2 = 236
        assert_eq!(
            s.transport().last(),
            Some(&Transfer::Window {
                window: Window {
                    column_start: 119,
                    column_end: 119,
                    row_start: 2,
                    row_end: 2,
                },
                payload: Vec::from([0x0F]),
            })
        );
    }

    #[test]
    fn test_unchanged_candidate_is_noop() {
        let mut s = session(16, 4);
        let mut candidate = PixelStore::new(16, 4).unwrap();
        candidate.set(5, 1, 7);

        assert!(s.commit_frame(&candidate).unwrap().is_some());
        assert_eq!(s.transport().attempts(), 1);

        assert_eq!(s.commit_frame(&candidate).unwrap(), None);
        assert_eq!(s.transport().attempts(), 1);
    }

    #[test]
    fn test_failed_commit_then_retry() {
        let mut s = session(16, 4);
        let before = s.committed().clone();

        let mut candidate = PixelStore::new(16, 4).unwrap();
        candidate.set(9, 3, 0xC);

        s.transport_mut().fail_next(1);
        assert_eq!(
            s.commit_frame(&candidate),
            Err(SessionError::Transport(MockError::Injected))
        );
        assert_eq!(s.committed(), &before);
        assert_eq!(s.state(), SessionState::Active);

        let rect = s.commit_frame(&candidate).unwrap();
        assert_eq!(rect, Some(Rect::new(8, 9, 3, 3)));
        assert_eq!(s.committed(), &candidate);
        assert_eq!(s.transport().attempts(), 2);
        assert_eq!(s.transport().transfers().len(), 1);
    }

    #[test]
    fn test_candidate_reusable_after_commit() {
        let mut s = session(4, 1);
        let mut candidate = PixelStore::new(4, 1).unwrap();
        candidate.set(0, 0, 1);
        s.commit_frame(&candidate).unwrap();

        candidate.set(0, 0, 2);
        assert_eq!(s.committed().get(0, 0), 1);
    }

    #[test]
    fn test_commit_frame_dimension_mismatch() {
        let mut s = session(16, 4);
        let candidate = PixelStore::new(16, 5).unwrap();
        assert_eq!(
            s.commit_frame(&candidate),
            Err(SessionError::DimensionMismatch)
        );
        assert_eq!(s.transport().attempts(), 0);
    }

    #[test]
    fn test_commit_full_frame() {
        let mut s = session(4, 2);
        let frame = [0x12, 0x34, 0x56, 0x78];

        s.commit_full_frame(&frame).unwrap();
        assert_eq!(s.committed().as_bytes(), &frame);
        assert_eq!(
            s.transport().last(),
            Some(&Transfer::FullFrame {
                // (480 - 4) / 2 = 238
                window: Window {
                    column_start: 119,
                    column_end: 120,
                    row_start: 0,
                    row_end: 1,
                },
                payload: Vec::from(frame)
            })
        );

        // Unchanged content is sent again; the diff is bypassed
        s.commit_full_frame(&frame).unwrap();
        assert_eq!(s.transport().attempts(), 2);
    }

    #[test]
    fn test_full_frame_uses_session_geometry() {
        let mut s = session(128, 64);
        assert_eq!(
            s.full_window(),
            Window {
                column_start: 88,
                column_end: 151,
                row_start: 0,
                row_end: 63,
            }
        );

        s.commit_full_frame(&[0x11; 4096]).unwrap();
        let mut candidate = s.committed().clone();
        candidate.set(0, 0, 0x2);
        candidate.set(127, 63, 0x2);
        s.commit_frame(&candidate).unwrap();

        // Full and differential writes agree on the centering
        match s.transport().transfers() {
            [Transfer::FullFrame { window: full, payload }, Transfer::Window { window, .. }] => {
                let columns = usize::from(full.column_end - full.column_start) + 1;
                let rows = usize::from(full.row_end - full.row_start) + 1;
                assert_eq!(columns * rows, payload.len());
                assert_eq!(window, full);
            }
            other => panic!("unexpected transfers: {:?}", other),
        }
    }

    #[test]
    fn test_transport_geometry_mismatch() {
        let transport = MockTransport::with_panel(DisplayConfig::new(256, 64));
        let err = DeviceSession::new(transport, DisplayConfig::new(128, 64)).err();
        assert_eq!(
            err,
            Some(SessionError::InvalidConfiguration(
                ConfigError::GeometryMismatch
            ))
        );

        // Wiring flags may differ
        let transport = MockTransport::with_panel(DisplayConfig::new(256, 64).rotated(true));
        let s = DeviceSession::new(transport, DisplayConfig::new(256, 64)).unwrap();
        assert_eq!(s.transport().attempts(), 0);
    }

    #[test]
    fn test_commit_full_frame_size_mismatch() {
        let mut s = session(4, 2);
        assert_eq!(
            s.commit_full_frame(&[0; 3]),
            Err(SessionError::SizeMismatch)
        );
        assert_eq!(s.transport().attempts(), 0);
        assert!(s.committed().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_commit_full_frame_failure_keeps_state() {
        let mut s = session(4, 2);
        s.transport_mut().fail_next(1);
        assert_eq!(
            s.commit_full_frame(&[0xFF; 4]),
            Err(SessionError::Transport(MockError::Injected))
        );
        assert!(s.committed().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_halted_session_rejects_everything() {
        let mut s = session(16, 4);
        s.halt();
        s.halt();
        assert!(s.is_halted());

        let candidate = PixelStore::new(16, 4).unwrap();
        assert_eq!(s.commit_frame(&candidate), Err(SessionError::Halted));
        assert_eq!(s.commit_full_frame(&[0; 32]), Err(SessionError::Halted));
        assert_eq!(s.commit_full_frame(&[0; 1]), Err(SessionError::Halted));
        assert_eq!(s.set_contrast(10), Err(SessionError::Halted));
        assert_eq!(s.set_inverted(true), Err(SessionError::Halted));
        assert_eq!(
            s.scroll_horizontal(0, 3, ScrollSpeed::Frames10, ScrollDirection::Left),
            Err(SessionError::Halted)
        );
        assert_eq!(s.stop_scroll(), Err(SessionError::Halted));
        assert_eq!(s.transport().attempts(), 0);
    }

    #[test]
    fn test_power_off() {
        let mut s = session(16, 4);
        s.transport_mut().fail_next(1);
        assert_eq!(
            s.power_off(),
            Err(SessionError::Transport(MockError::Injected))
        );
        assert!(s.is_halted());

        s.power_off().unwrap();
        assert_eq!(s.transport().last(), Some(&Transfer::DisplayOn(false)));
    }

    #[test]
    fn test_control_commands() {
        let mut s = session(16, 4);
        s.set_contrast(0x40).unwrap();
        s.set_inverted(true).unwrap();
        s.scroll_horizontal(1, 3, ScrollSpeed::Frames100, ScrollDirection::Right)
            .unwrap();
        s.stop_scroll().unwrap();

        assert_eq!(
            s.transport().transfers(),
            &[
                Transfer::Contrast(0x40),
                Transfer::Inverted(true),
                Transfer::Scroll {
                    start_row: 1,
                    end_row: 3,
                    speed: ScrollSpeed::Frames100,
                    direction: ScrollDirection::Right,
                },
                Transfer::StopScroll,
            ]
        );
    }

    #[test]
    fn test_scroll_range_checked() {
        let mut s = session(16, 4);
        assert_eq!(
            s.scroll_horizontal(0, 4, ScrollSpeed::Frames6, ScrollDirection::Left),
            Err(SessionError::InvalidScrollRange)
        );
        assert_eq!(s.transport().attempts(), 0);
    }

    #[test]
    fn test_release_returns_transport() {
        let mut s = session(4, 1);
        s.commit_full_frame(&[0, 0]).unwrap();
        let transport = s.release();
        assert_eq!(transport.attempts(), 1);
    }
}
