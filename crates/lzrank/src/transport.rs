//! # Overview
//!
//! The codec never touches files, sockets or buffers directly. All compressed
//! output leaves through, and all compressed input arrives from, a
//! [`WordTransport`]: a pair of operations that move exactly one 64-bit word at
//! a time. Callers pick whichever adapter suits their environment.
//!
//! # Design
//!
//! Two adapters ship with the crate:
//!
//! - [`WordBuffer`] keeps the words in memory and serves them back in order,
//!   which is what the round-trip helpers and most tests use.
//! - [`IoTransport`] wraps any [`Read`]/[`Write`] implementor and serializes
//!   each word as eight little-endian bytes.
//!
//! A transport signals failure by returning an [`io::Error`]. The session turns
//! that into its sticky error; the codec never retries.
//!
//! # Examples
//!
//! ```
//! use lzrank::transport::{WordBuffer, WordTransport};
//!
//! let mut buffer = WordBuffer::new();
//! buffer.write_word(0x0123_4567_89ab_cdef).unwrap();
//! assert_eq!(buffer.read_word().unwrap(), 0x0123_4567_89ab_cdef);
//! assert!(buffer.read_word().is_err());
//! ```

use std::io::{self, Read, Write};

/// Number of bytes occupied by one serialized word.
pub const WORD_BYTES: usize = 8;

/// Moves 64-bit words between the codec and the outside world.
pub trait WordTransport {
    /// Reads the next word of compressed input.
    fn read_word(&mut self) -> io::Result<u64>;

    /// Writes one word of compressed output.
    fn write_word(&mut self, word: u64) -> io::Result<()>;
}

impl<T: WordTransport + ?Sized> WordTransport for &mut T {
    fn read_word(&mut self) -> io::Result<u64> {
        (**self).read_word()
    }

    fn write_word(&mut self, word: u64) -> io::Result<()> {
        (**self).write_word(word)
    }
}

impl<T: WordTransport + ?Sized> WordTransport for Box<T> {
    fn read_word(&mut self) -> io::Result<u64> {
        (**self).read_word()
    }

    fn write_word(&mut self, word: u64) -> io::Result<()> {
        (**self).write_word(word)
    }
}

/// In-memory transport that appends written words and replays them in order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WordBuffer {
    words: Vec<u64>,
    cursor: usize,
}

impl WordBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer that will replay `words` from the beginning.
    #[must_use]
    pub fn from_words(words: Vec<u64>) -> Self {
        Self { words, cursor: 0 }
    }

    /// Reassembles a buffer from its little-endian byte serialization.
    ///
    /// The input length must be a multiple of [`WORD_BYTES`].
    pub fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() % WORD_BYTES != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "encoded length {} is not a multiple of {WORD_BYTES} bytes",
                    bytes.len()
                ),
            ));
        }
        let words = bytes
            .chunks_exact(WORD_BYTES)
            .map(|chunk| {
                let mut word = [0u8; WORD_BYTES];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect();
        Ok(Self::from_words(words))
    }

    /// Returns every word written so far, regardless of the read cursor.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Returns the number of words not yet consumed by [`WordTransport::read_word`].
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.words.len() - self.cursor
    }

    /// Rewinds the read cursor so the buffer can be replayed.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Serializes the words as little-endian bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|word| word.to_le_bytes()).collect()
    }

    /// Consumes the buffer and returns the stored words.
    #[must_use]
    pub fn into_words(self) -> Vec<u64> {
        self.words
    }
}

impl WordTransport for WordBuffer {
    fn read_word(&mut self) -> io::Result<u64> {
        let word = self.words.get(self.cursor).copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "word buffer exhausted")
        })?;
        self.cursor += 1;
        Ok(word)
    }

    fn write_word(&mut self, word: u64) -> io::Result<()> {
        self.words.push(word);
        Ok(())
    }
}

/// Adapter that carries words over any byte stream, eight little-endian bytes each.
#[derive(Debug)]
pub struct IoTransport<T> {
    inner: T,
}

impl<T> IoTransport<T> {
    /// Wraps `inner`.
    #[must_use]
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns a shared reference to the wrapped stream.
    #[must_use]
    pub const fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Write> WordTransport for IoTransport<T> {
    fn read_word(&mut self) -> io::Result<u64> {
        let mut word = [0u8; WORD_BYTES];
        self.inner.read_exact(&mut word)?;
        Ok(u64::from_le_bytes(word))
    }

    fn write_word(&mut self, word: u64) -> io::Result<()> {
        self.inner.write_all(&word.to_le_bytes())
    }
}
