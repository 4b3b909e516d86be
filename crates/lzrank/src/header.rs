//! Stream header: two raw words ahead of the bit-packed body.
//!
//! ```text
//! word 0: decompressed length in bytes
//! word 1: window bits (10..=20)
//! ```
//!
//! Both words go straight to the transport. Writing the header before
//! compressing, and reading it before decompressing, is up to the caller.

use crate::error::Result;
use crate::transport::WordTransport;
use crate::window::WindowBits;

/// Envelope describing a compressed stream.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    /// Number of bytes the body decompresses to.
    pub length: u64,
    /// Window used by the compressor.
    pub window_bits: WindowBits,
}

impl Header {
    /// Creates a header.
    #[must_use]
    pub const fn new(length: u64, window_bits: WindowBits) -> Self {
        Self {
            length,
            window_bits,
        }
    }

    /// Writes the header words.
    pub fn write_to<T: WordTransport + ?Sized>(&self, transport: &mut T) -> Result<()> {
        transport.write_word(self.length)?;
        transport.write_word(u64::from(self.window_bits))?;
        Ok(())
    }

    /// Reads and validates the header words.
    pub fn read_from<T: WordTransport + ?Sized>(transport: &mut T) -> Result<Self> {
        let length = transport.read_word()?;
        let window_bits = WindowBits::try_from(transport.read_word()?)?;
        Ok(Self {
            length,
            window_bits,
        })
    }
}
