//! Board-agnostic framebuffer logic for SSD1322 grayscale OLEDs
//!
//! This crate contains everything that does not depend on a specific bus:
//!
//! - Packed 4-bit framebuffer ([`PixelStore`])
//! - Differential update: minimal changed rectangle between two frames
//! - Region payload extraction and device column/row addressing
//! - Display session state (committed frame, halted flag)
//! - Transport traits plus an in-memory mock transport
//! - Display configuration types
//!
//! # Data flow
//!
//! ```text
//! candidate PixelStore
//!         │
//!         ▼
//! DeviceSession::commit_frame ──► diff::find_changed_rect
//!         │                               │
//!         │◄──────────── Rect ────────────┘
//!         ▼
//! region::extract_payload + region::compute_addressing
//!         │
//!         ▼
//! Transport::send_window ──► committed frame replaced on success
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod diff;
pub mod error;
pub mod framebuffer;
pub mod graphics;
pub mod mock;
pub mod region;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience
pub use config::{DisplayConfig, DEVICE_RAM_COLUMNS, MAX_HEIGHT};
pub use diff::{find_changed_rect, Rect};
pub use error::{ConfigError, FrameError, SessionError};
pub use framebuffer::PixelStore;
pub use mock::{MockError, MockTransport, Transfer};
pub use region::{compute_addressing, extract_payload, Window};
pub use session::{DeviceSession, SessionState};
pub use traits::{DisplayControl, ScrollDirection, ScrollSpeed, Transport};
