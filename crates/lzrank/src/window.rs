//! Sliding-window size configuration.
//!
//! The window is described by its base-2 logarithm. Distances are always
//! strictly smaller than the window, and the distance and length rank tables
//! hold one symbol per window position.

use core::fmt;
use core::str::FromStr;

use crate::error::CodecError;

/// Base-2 logarithm of the sliding-window size, validated to `10..=20`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u64"))]
pub struct WindowBits(u8);

impl WindowBits {
    /// Smallest accepted value (1 KiB window).
    pub const MIN: Self = Self(10);
    /// Largest accepted value (1 MiB window).
    pub const MAX: Self = Self(20);
    /// Value used when callers do not choose one (4 KiB window).
    pub const DEFAULT: Self = Self(12);

    /// Validates `bits` against the supported range.
    pub const fn new(bits: u8) -> Result<Self, CodecError> {
        if bits >= Self::MIN.0 && bits <= Self::MAX.0 {
            Ok(Self(bits))
        } else {
            Err(CodecError::InvalidWindowBits(bits as u64))
        }
    }

    /// Returns the logarithm.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Window size in bytes.
    #[must_use]
    pub const fn window_size(self) -> usize {
        1usize << self.0
    }
}

impl Default for WindowBits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u64> for WindowBits {
    type Error = CodecError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| CodecError::InvalidWindowBits(value))
            .and_then(Self::new)
    }
}

impl TryFrom<u8> for WindowBits {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WindowBits> for u64 {
    fn from(bits: WindowBits) -> Self {
        Self::from(bits.0)
    }
}

impl fmt::Display for WindowBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WindowBits {
    type Err = WindowBitsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(|bits| Self::new(bits).ok())
            .ok_or_else(|| WindowBitsParseError::new(s))
    }
}

/// Error returned when a string does not name a supported window size.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid window bits {input:?}: expected an integer in 10-20")]
pub struct WindowBitsParseError {
    input: String,
}

impl WindowBitsParseError {
    /// Creates a parse error capturing the original input.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}
