//! Error types
//!
//! Validation errors are always reported before any state is touched or
//! any byte reaches the transport.

/// Framebuffer and region errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Width is zero or odd, or height is zero
    InvalidDimensions,
    /// Byte buffer length does not equal `stride * height`
    SizeMismatch,
    /// Rectangle is empty or extends past the framebuffer
    OutOfRange,
}

/// Display configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width is zero, odd, or wider than the RAM
    InvalidWidth,
    /// Height is zero or exceeds the controller's row count
    InvalidHeight,
    /// RAM column count is zero or exceeds the controller's RAM
    InvalidRamColumns,
    /// Session and transport were set up for different panel geometry
    GeometryMismatch,
    /// Encoding the configuration failed (buffer too small)
    Serialize,
    /// Stored configuration could not be decoded
    Deserialize,
}

/// Errors returned by [`DeviceSession`](crate::DeviceSession)
///
/// `E` is the error type of the underlying transport and is passed
/// through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError<E> {
    /// Frame geometry rejected at session creation
    InvalidConfiguration(ConfigError),
    /// Raw frame length does not match `width * height / 2`
    SizeMismatch,
    /// Candidate frame has different dimensions than the session
    DimensionMismatch,
    /// Scroll rows outside the frame
    InvalidScrollRange,
    /// Session was halted; create a new session to continue
    Halted,
    /// Framebuffer operation failed inside the session
    ///
    /// Session checks run first, so this signals a broken internal
    /// invariant rather than bad input.
    Frame(FrameError),
    /// Transport failed; committed state is unchanged
    Transport(E),
}

impl<E> From<ConfigError> for SessionError<E> {
    fn from(e: ConfigError) -> Self {
        SessionError::InvalidConfiguration(e)
    }
}

impl<E> From<FrameError> for SessionError<E> {
    fn from(e: FrameError) -> Self {
        SessionError::Frame(e)
    }
}
