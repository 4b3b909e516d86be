//! Bit channel packing single bits into 64-bit transport words.
//!
//! Bits are placed least-significant first. The writer holds at most one
//! partially filled word and hands it to the transport only when a 65th bit
//! arrives or when [`BitWriter::flush`] runs, so a stream whose bit count is an
//! exact multiple of 64 never produces an empty trailing word. The reader pulls
//! a fresh word whenever its cursor wraps back to zero.

use std::io;

use crate::transport::{WORD_BYTES, WordTransport};

const WORD_BITS: u32 = u64::BITS;

/// Accumulates bits and emits full words through a [`WordTransport`].
#[derive(Debug)]
pub struct BitWriter<'t, T: WordTransport + ?Sized> {
    transport: &'t mut T,
    word: u64,
    filled: u32,
    written: u64,
}

impl<'t, T: WordTransport + ?Sized> BitWriter<'t, T> {
    /// Creates a writer with an empty accumulator.
    pub fn new(transport: &'t mut T) -> Self {
        Self {
            transport,
            word: 0,
            filled: 0,
            written: 0,
        }
    }

    /// Appends one bit, emitting the accumulator first if it already holds 64 bits.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if self.filled == WORD_BITS {
            self.emit()?;
        }
        self.word |= u64::from(bit) << self.filled;
        self.filled += 1;
        Ok(())
    }

    /// Appends the `count` low-order bits of `value`, lowest first.
    pub fn write_bits(&mut self, value: u64, count: u32) -> io::Result<()> {
        debug_assert!(count <= WORD_BITS);
        let mut value = value;
        for _ in 0..count {
            self.write_bit(value & 1 == 1)?;
            value >>= 1;
        }
        Ok(())
    }

    /// Emits the partially filled accumulator, zero padded, if it holds any bits.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.filled > 0 {
            self.emit()?;
        }
        Ok(())
    }

    /// Number of bytes handed to the transport so far.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Number of bits buffered in the accumulator and not yet emitted.
    #[must_use]
    pub const fn pending_bits(&self) -> u32 {
        self.filled
    }

    fn emit(&mut self) -> io::Result<()> {
        self.transport.write_word(self.word)?;
        self.word = 0;
        self.filled = 0;
        self.written += WORD_BYTES as u64;
        Ok(())
    }
}

/// Extracts bits from words pulled through a [`WordTransport`].
#[derive(Debug)]
pub struct BitReader<'t, T: WordTransport + ?Sized> {
    transport: &'t mut T,
    word: u64,
    cursor: u32,
}

impl<'t, T: WordTransport + ?Sized> BitReader<'t, T> {
    /// Creates a reader that fetches its first word on the first read.
    pub fn new(transport: &'t mut T) -> Self {
        Self {
            transport,
            word: 0,
            cursor: 0,
        }
    }

    /// Returns the next bit, pulling a new word when the cursor sits at zero.
    #[inline]
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.cursor == 0 {
            self.word = self.transport.read_word()?;
        }
        let bit = (self.word >> self.cursor) & 1 == 1;
        self.cursor = (self.cursor + 1) % WORD_BITS;
        Ok(bit)
    }

    /// Reads `count` bits and assembles them lowest first.
    pub fn read_bits(&mut self, count: u32) -> io::Result<u64> {
        debug_assert!(count <= WORD_BITS);
        let mut value = 0u64;
        for shift in 0..count {
            value |= u64::from(self.read_bit()?) << shift;
        }
        Ok(value)
    }
}
