//! Transport abstraction traits
//!
//! These traits define the interface between the session logic and the
//! bus that carries commands and pixel data to the controller.

pub mod transport;

pub use transport::{DisplayControl, ScrollDirection, ScrollSpeed, Transport};
