#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `lzrank` is a lossless byte-stream codec that pairs LZ77 sliding-window
//! matching with adaptive, frequency-ranked symbol remapping. Literal bytes,
//! back-reference distances and back-reference lengths are each translated to
//! a *rank* in a self-organizing max-heap before being written as
//! variable-length numbers, so the symbols a stream uses most end up with the
//! shortest codes.
//!
//! The crate is a library meant for embedding. Callers provide raw bytes and a
//! [`WordTransport`] that moves 64-bit words; the codec provides header framing,
//! compression and decompression.
//!
//! # Design
//!
//! - [`transport`] defines the word transport and ships in-memory and
//!   [`std::io`] adapters.
//! - [`bits`] packs bits into words, least-significant bit first.
//! - [`varint`] writes unbounded numbers as fixed-width chunks with
//!   continuation bits.
//! - [`heap`] holds the [`FrequencyHeap`] rank tables.
//! - [`matcher`] finds the longest match in the window.
//! - [`Session`] ties them together and carries the sticky error.
//!
//! # Invariants
//!
//! - Encoder and decoder bump the same heap for the same symbol at the same
//!   stream offset. Neither side ever consults a symbol that has not yet been
//!   transmitted, so both derive identical rank tables.
//! - Back-references are expanded one byte at a time in increasing order,
//!   which makes self-overlapping copies (`distance < length`) well defined.
//! - The selected match depends only on the input: every [`MatchStrategy`]
//!   yields the same stream.
//!
//! # Errors
//!
//! All operations return [`Result`]. The first failure on a [`Session`] is
//! recorded as its sticky [`ErrorCode`]; later operations on that session fail
//! with [`CodecError::Poisoned`] until [`Session::reset`] is called.
//!
//! # Examples
//!
//! ```
//! use lzrank::{compress_to_vec, decompress_to_vec};
//!
//! # fn main() -> lzrank::Result<()> {
//! let data = b"Hello World Hello.World Hello World";
//! let encoded = compress_to_vec(data, 10)?;
//! assert_eq!(decompress_to_vec(&encoded)?, data);
//! # Ok(())
//! # }
//! ```
//!
//! # See also
//!
//! - [`Session`] for streaming over a caller-supplied transport.
//! - [`transport::IoTransport`] for carrying words over files and sockets.

pub mod bits;
mod debug_codec;
mod decoder;
mod encoder;
pub mod error;
pub mod header;
pub mod heap;
pub mod matcher;
mod session;
pub mod transport;
pub mod varint;
pub mod window;

pub use error::{CodecError, ErrorCode, Result};
pub use header::Header;
pub use heap::{FrequencyHeap, RankTables};
pub use matcher::{MatchStrategy, MatchStrategyParseError};
pub use session::{CodecOptions, Session, compress_to_vec, decompress_to_vec};
pub use transport::{WordBuffer, WordTransport};
pub use window::{WindowBits, WindowBitsParseError};
