//! # Overview
//!
//! A [`Session`] owns everything one compressed stream needs: the caller's
//! transport, the three rank tables, the body byte counter and a sticky error
//! field. Its four operations are the public surface of the codec:
//!
//! - [`Session::write_header`] then [`Session::compress`] on the producing side;
//! - [`Session::read_header`] then [`Session::decompress`] on the consuming side.
//!
//! [`Session::decompress_into_vec`] is the growable alternative to
//! [`Session::decompress`] for callers that do not trust the header's length.
//!
//! # Invariants
//!
//! - The first failing operation records an [`ErrorCode`]. Every later
//!   operation returns [`CodecError::Poisoned`] immediately, without touching
//!   the transport or the tables, until [`Session::reset`] is called.
//! - Every compress and decompress pass starts from freshly initialized rank
//!   tables, so frequency state never leaks from one stream into the next.
//! - [`Session::bytes_written`] counts body words accepted by the transport.
//!   Header words bypass the bit channel and are not counted.
//!
//! # Examples
//!
//! ```
//! use lzrank::{Session, transport::WordBuffer};
//!
//! # fn main() -> lzrank::Result<()> {
//! let data = b"Hello World Hello.World Hello World";
//!
//! let mut writer = Session::new(WordBuffer::new());
//! writer.write_header(data.len() as u64, 10)?;
//! writer.compress(data, 10)?;
//! assert!(writer.bytes_written() < data.len() as u64);
//!
//! let mut reader = Session::new(writer.into_transport());
//! let header = reader.read_header()?;
//! let mut output = vec![0u8; header.length as usize];
//! reader.decompress(&mut output, header.window_bits.get())?;
//! assert_eq!(output, data);
//! # Ok(())
//! # }
//! ```

use crate::debug_codec;
use crate::decoder::{self, SliceOutput};
use crate::encoder;
use crate::error::{CodecError, ErrorCode, Result};
use crate::header::Header;
use crate::heap::RankTables;
use crate::matcher::MatchStrategy;
use crate::transport::{WordBuffer, WordTransport};
use crate::window::WindowBits;

/// Upper bound on the capacity reserved before any body word has been read.
const MAX_INITIAL_RESERVE: usize = 1 << 20;

/// Tunables that do not affect the compressed format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodecOptions {
    /// Match finder used by [`Session::compress`].
    pub strategy: MatchStrategy,
}

impl CodecOptions {
    /// Returns options using `strategy`.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: MatchStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// State for compressing or decompressing one stream over a word transport.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    options: CodecOptions,
    error: Option<ErrorCode>,
    written: u64,
    tables: RankTables,
}

impl<T: WordTransport> Session<T> {
    /// Creates a session with default options.
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, CodecOptions::default())
    }

    /// Creates a session with explicit options.
    pub fn with_options(transport: T, options: CodecOptions) -> Self {
        Self {
            transport,
            options,
            error: None,
            written: 0,
            tables: RankTables::default(),
        }
    }

    /// Writes the stream header: decompressed length and window bits.
    pub fn write_header(&mut self, length: u64, window_bits: u8) -> Result<()> {
        self.guard("write_header", |session| {
            let window_bits = WindowBits::new(window_bits)?;
            Header::new(length, window_bits).write_to(&mut session.transport)
        })
    }

    /// Compresses `data` into the body of the stream.
    ///
    /// `window_bits` is validated before any output is produced.
    pub fn compress(&mut self, data: &[u8], window_bits: u8) -> Result<()> {
        self.guard("compress", |session| {
            let window_bits = WindowBits::new(window_bits)?;
            encoder::encode(
                &mut session.transport,
                &mut session.tables,
                data,
                window_bits,
                session.options.strategy,
                &mut session.written,
            )
        })
    }

    /// Reads and validates the stream header.
    pub fn read_header(&mut self) -> Result<Header> {
        self.guard("read_header", |session| {
            Header::read_from(&mut session.transport)
        })
    }

    /// Decompresses the body into `output`, which must be exactly as long as the
    /// length announced by the header.
    ///
    /// On failure the contents of `output` are unspecified.
    pub fn decompress(&mut self, output: &mut [u8], window_bits: u8) -> Result<()> {
        self.guard("decompress", |session| {
            let window_bits = WindowBits::new(window_bits)?;
            let length = output.len();
            decoder::decode(
                &mut session.transport,
                &mut session.tables,
                &mut SliceOutput::new(output),
                length,
                window_bits,
            )
        })
    }

    /// Decompresses a body of `length` bytes, appending it to `output`.
    ///
    /// The vector grows as bytes are decoded, so a stream announcing more
    /// output than its body carries fails before the memory is committed.
    pub fn decompress_into_vec(
        &mut self,
        output: &mut Vec<u8>,
        length: usize,
        window_bits: u8,
    ) -> Result<()> {
        self.guard("decompress", |session| {
            let window_bits = WindowBits::new(window_bits)?;
            let mut decoded = Vec::<u8>::new();
            decoded
                .try_reserve(length.min(MAX_INITIAL_RESERVE))
                .map_err(|_| CodecError::StreamTooLarge(length as u64))?;
            decoder::decode(
                &mut session.transport,
                &mut session.tables,
                &mut decoded,
                length,
                window_bits,
            )?;
            output.append(&mut decoded);
            Ok(())
        })
    }

    /// Runs `operation` unless the session is poisoned, poisoning it on failure.
    fn guard<R>(
        &mut self,
        name: &'static str,
        operation: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        if let Some(code) = self.error {
            return Err(CodecError::Poisoned(code));
        }
        operation(self).inspect_err(|err| {
            debug_codec::trace_poisoned(name, err);
            self.error = Some(err.code());
        })
    }
}

impl<T> Session<T> {
    /// Returns the sticky error, if an operation has failed.
    #[must_use]
    pub const fn error(&self) -> Option<ErrorCode> {
        self.error
    }

    /// Returns `true` once an operation has failed.
    #[must_use]
    pub const fn is_poisoned(&self) -> bool {
        self.error.is_some()
    }

    /// Bytes of compressed body emitted through the bit channel.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Rank tables left by the most recent compress or decompress pass.
    #[must_use]
    pub const fn rank_tables(&self) -> &RankTables {
        &self.tables
    }

    /// Options the session was created with.
    #[must_use]
    pub const fn options(&self) -> CodecOptions {
        self.options
    }

    /// Clears the sticky error, the byte counter and all rank-table state so the
    /// session can carry an unrelated stream.
    pub fn reset(&mut self) {
        self.error = None;
        self.written = 0;
        self.tables = RankTables::default();
    }

    /// Returns a shared reference to the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns a mutable reference to the transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the session and returns the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Compresses `data` into header and body, serialized as little-endian words.
///
/// # Examples
///
/// ```
/// use lzrank::{compress_to_vec, decompress_to_vec};
///
/// let data = vec![0u8; 4096];
/// let encoded = compress_to_vec(&data, 12).unwrap();
/// assert!(encoded.len() < 64);
/// assert_eq!(decompress_to_vec(&encoded).unwrap(), data);
/// ```
pub fn compress_to_vec(data: &[u8], window_bits: u8) -> Result<Vec<u8>> {
    let mut session = Session::new(WordBuffer::new());
    session.write_header(data.len() as u64, window_bits)?;
    session.compress(data, window_bits)?;
    Ok(session.into_transport().to_bytes())
}

/// Decompresses a buffer produced by [`compress_to_vec`].
///
/// The header's length is not trusted for allocation: output grows with the
/// decoded body, so truncated or hostile input fails without reserving the
/// announced size up front.
pub fn decompress_to_vec(encoded: &[u8]) -> Result<Vec<u8>> {
    let mut session = Session::new(WordBuffer::from_bytes(encoded)?);
    let header = session.read_header()?;
    let length = usize::try_from(header.length)
        .map_err(|_| CodecError::StreamTooLarge(header.length))?;
    let mut output = Vec::new();
    session.decompress_into_vec(&mut output, length, header.window_bits.get())?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Transport that accepts a fixed number of writes, then fails.
    struct LimitedTransport {
        inner: WordBuffer,
        writes_left: usize,
        attempts: usize,
    }

    impl WordTransport for LimitedTransport {
        fn read_word(&mut self) -> io::Result<u64> {
            self.attempts += 1;
            self.inner.read_word()
        }

        fn write_word(&mut self, word: u64) -> io::Result<()> {
            self.attempts += 1;
            if self.writes_left == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "sink full"));
            }
            self.writes_left -= 1;
            self.inner.write_word(word)
        }
    }

    #[test]
    fn invalid_window_is_rejected_before_any_output() {
        let mut session = Session::new(WordBuffer::new());
        assert!(matches!(
            session.compress(b"abc", 9),
            Err(CodecError::InvalidWindowBits(9))
        ));
        assert_eq!(session.error(), Some(ErrorCode::InvalidArgument));
        assert!(session.transport().words().is_empty());
    }

    #[test]
    fn sticky_error_blocks_later_operations() {
        let mut session = Session::new(WordBuffer::new());
        assert!(session.write_header(3, 21).is_err());
        assert!(session.transport().words().is_empty());

        assert!(matches!(
            session.write_header(3, 10),
            Err(CodecError::Poisoned(ErrorCode::InvalidArgument))
        ));
        assert!(matches!(
            session.compress(b"abc", 10),
            Err(CodecError::Poisoned(ErrorCode::InvalidArgument))
        ));
        assert!(session.transport().words().is_empty());

        session.reset();
        assert!(!session.is_poisoned());
        session.write_header(3, 10).unwrap();
        assert_eq!(session.transport().words(), &[3, 10]);
    }

    #[test]
    fn transport_failure_poisons_without_retry() {
        let transport = LimitedTransport {
            inner: WordBuffer::new(),
            writes_left: 2,
            attempts: 0,
        };
        let mut session = Session::new(transport);
        let data: Vec<u8> = (0..=255u8).cycle().take(2048).collect();
        session.write_header(data.len() as u64, 10).unwrap();
        let err = session.compress(&data, 10).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Transport(io::ErrorKind::WriteZero));
        assert_eq!(session.bytes_written(), 0);

        let attempts = session.transport().attempts;
        assert!(session.compress(&data, 10).is_err());
        assert!(session.read_header().is_err());
        assert_eq!(session.transport().attempts, attempts);
    }

    #[test]
    fn header_words_are_not_counted() {
        let mut session = Session::new(WordBuffer::new());
        session.write_header(1, 10).unwrap();
        assert_eq!(session.bytes_written(), 0);
        session.compress(b"a", 10).unwrap();
        assert_eq!(session.bytes_written(), 8);
        assert_eq!(session.transport().words().len(), 3);
    }

    #[test]
    fn session_is_reusable_across_streams() {
        let first = b"abcabcabcabc".as_slice();
        let second = b"zzzz".as_slice();

        let mut session = Session::new(WordBuffer::new());
        session.compress(first, 10).unwrap();
        let after_first = session.transport().words().len();
        session.compress(second, 10).unwrap();

        let mut fresh = Session::new(WordBuffer::new());
        fresh.compress(second, 10).unwrap();
        assert_eq!(
            &session.transport().words()[after_first..],
            fresh.transport().words()
        );
    }

    #[test]
    fn options_select_strategy_without_changing_output() {
        let data = b"the cat sat on the mat with the hat";
        let mut chained = Session::new(WordBuffer::new());
        chained.compress(data, 10).unwrap();

        let options = CodecOptions::default().with_strategy(MatchStrategy::Exhaustive);
        let mut exhaustive = Session::with_options(WordBuffer::new(), options);
        assert_eq!(exhaustive.options().strategy, MatchStrategy::Exhaustive);
        exhaustive.compress(data, 10).unwrap();

        assert_eq!(chained.transport().words(), exhaustive.transport().words());
    }

    #[test]
    fn helpers_round_trip() {
        let data = b"Hello World Hello.World Hello World";
        let encoded = compress_to_vec(data, 10).unwrap();
        assert_eq!(encoded.len() % 8, 0);
        assert_eq!(decompress_to_vec(&encoded).unwrap(), data);
    }

    #[test]
    fn oversized_header_fails_on_missing_body() {
        let mut buffer = WordBuffer::new();
        buffer.write_word(u64::from(u32::MAX)).unwrap();
        buffer.write_word(10).unwrap();
        let encoded = buffer.to_bytes();
        assert_eq!(encoded.len(), 16);
        assert!(matches!(
            decompress_to_vec(&encoded),
            Err(CodecError::Transport(ref err)) if err.kind() == io::ErrorKind::UnexpectedEof
        ));
    }

    #[test]
    fn decompress_into_vec_appends() {
        let data = b"abcabcabcabc";
        let mut writer = Session::new(WordBuffer::new());
        writer.compress(data, 10).unwrap();

        let mut reader = Session::new(writer.into_transport());
        let mut output = b"prefix:".to_vec();
        reader
            .decompress_into_vec(&mut output, data.len(), 10)
            .unwrap();
        assert_eq!(output, b"prefix:abcabcabcabc");
        assert_eq!(reader.rank_tables().literals.frequency(usize::from(b'a')), 1);
    }

    #[test]
    fn helpers_reject_malformed_input() {
        assert!(matches!(
            decompress_to_vec(&[0u8; 12]),
            Err(CodecError::Transport(_))
        ));
        assert!(matches!(
            compress_to_vec(b"abc", 21),
            Err(CodecError::InvalidWindowBits(21))
        ));
    }
}
