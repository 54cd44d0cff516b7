//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the transport traits
//! defined in ssd1322-core:
//!
//! - SSD1322 command set and initialization sequence
//! - 4-wire SPI interface (embedded-hal 1.0 `SpiDevice` + D/C pin)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod spi;

pub use command::{init_sequence, Command};
pub use spi::{InterfaceError, SpiInterface};
