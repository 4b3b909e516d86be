//! Error types surfaced by the codec.
//!
//! Every failure funnels through [`CodecError`]. A [`Session`](crate::Session)
//! additionally remembers the first failure as an [`ErrorCode`] so that later
//! operations on the same stream short-circuit with [`CodecError::Poisoned`].

use std::fmt;
use std::io;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors reported by header framing, compression and decompression.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The requested `window_bits` lies outside `10..=20`.
    #[error("window bits {0} outside the supported range 10-20")]
    InvalidWindowBits(u64),

    /// A decoded back-reference points outside the window or before the start of output.
    #[error("invalid back-reference distance {distance} at offset {position} (window {window})")]
    InvalidDistance {
        /// Decoded distance.
        distance: u64,
        /// Window size in bytes.
        window: usize,
        /// Output offset at which the back-reference was decoded.
        position: usize,
    },

    /// A decoded back-reference length is zero or overruns the output buffer.
    #[error("invalid back-reference length {length} with {remaining} bytes remaining")]
    InvalidLength {
        /// Decoded length.
        length: u64,
        /// Bytes left to produce in the output buffer.
        remaining: usize,
    },

    /// A decoded rank does not name a slot of the corresponding heap.
    #[error("rank {rank} outside alphabet of {alphabet} symbols")]
    RankOutOfRange {
        /// Decoded rank.
        rank: u64,
        /// Number of symbols tracked by the heap.
        alphabet: usize,
    },

    /// The header announces more output than this platform can buffer.
    #[error("decompressed length {0} cannot be buffered in memory")]
    StreamTooLarge(u64),

    /// A variable-length number carried more than 64 significant bits.
    #[error("variable-length number exceeds 64 bits")]
    NumberOverflow,

    /// The word transport reported a failure.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// An earlier operation on the session failed; the stream is no longer usable.
    #[error("session poisoned by earlier failure ({0})")]
    Poisoned(ErrorCode),
}

impl CodecError {
    /// Classifies the error for the session's sticky error field.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidWindowBits(_) => ErrorCode::InvalidArgument,
            Self::InvalidDistance { .. }
            | Self::InvalidLength { .. }
            | Self::RankOutOfRange { .. }
            | Self::StreamTooLarge(_)
            | Self::NumberOverflow => ErrorCode::InvalidData,
            Self::Transport(err) => ErrorCode::Transport(err.kind()),
            Self::Poisoned(code) => *code,
        }
    }
}

impl From<CodecError> for io::Error {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Transport(io_err) => io_err,
            other => {
                let kind = match other.code() {
                    ErrorCode::InvalidArgument => io::ErrorKind::InvalidInput,
                    ErrorCode::InvalidData => io::ErrorKind::InvalidData,
                    ErrorCode::Transport(kind) => kind,
                };
                io::Error::new(kind, other)
            }
        }
    }
}

/// Copyable classification of a failure, stored as a session's sticky error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCode {
    /// A caller-supplied argument was rejected before any work began.
    InvalidArgument,
    /// The compressed stream is malformed.
    InvalidData,
    /// The transport failed with the given kind.
    Transport(io::ErrorKind),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => f.write_str("invalid argument"),
            Self::InvalidData => f.write_str("invalid data"),
            Self::Transport(kind) => write!(f, "transport: {kind}"),
        }
    }
}
