//! Shared helpers for the integration tests of the workspace.
//!
//! - [`FaultyTransport`] wraps an in-memory buffer and fails on demand.
//! - [`data`] generates deterministic inputs with different compressibility.
//! - [`file_transport`] backs a transport with an anonymous temporary file.
//! - [`init_tracing`] installs a test subscriber honouring `RUST_LOG`.

use std::fs::File;
use std::io;
use std::sync::Once;

use lzrank::transport::{IoTransport, WordBuffer, WordTransport};

/// In-memory transport that starts failing after a configurable number of words.
#[derive(Debug)]
pub struct FaultyTransport {
    inner: WordBuffer,
    reads_left: Option<usize>,
    writes_left: Option<usize>,
    kind: io::ErrorKind,
    calls: usize,
}

impl FaultyTransport {
    /// Wraps `inner` without any fault armed.
    #[must_use]
    pub fn new(inner: WordBuffer) -> Self {
        Self {
            inner,
            reads_left: None,
            writes_left: None,
            kind: io::ErrorKind::Other,
            calls: 0,
        }
    }

    /// Fails every read after `words` successful ones.
    #[must_use]
    pub const fn fail_reads_after(mut self, words: usize) -> Self {
        self.reads_left = Some(words);
        self
    }

    /// Fails every write after `words` successful ones.
    #[must_use]
    pub const fn fail_writes_after(mut self, words: usize) -> Self {
        self.writes_left = Some(words);
        self
    }

    /// Sets the error kind reported by injected failures.
    #[must_use]
    pub const fn with_kind(mut self, kind: io::ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Number of read and write calls received, failed ones included.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }

    /// Returns the wrapped buffer.
    #[must_use]
    pub fn into_inner(self) -> WordBuffer {
        self.inner
    }

    fn take(budget: &mut Option<usize>, kind: io::ErrorKind) -> io::Result<()> {
        match budget {
            Some(0) => Err(io::Error::new(kind, "injected transport failure")),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl WordTransport for FaultyTransport {
    fn read_word(&mut self) -> io::Result<u64> {
        self.calls += 1;
        Self::take(&mut self.reads_left, self.kind)?;
        self.inner.read_word()
    }

    fn write_word(&mut self, word: u64) -> io::Result<()> {
        self.calls += 1;
        Self::take(&mut self.writes_left, self.kind)?;
        self.inner.write_word(word)
    }
}

/// Creates a transport over an anonymous temporary file.
pub fn file_transport() -> io::Result<IoTransport<File>> {
    tempfile::tempfile().map(IoTransport::new)
}

/// Installs a global tracing subscriber once; later calls are no-ops.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Deterministic input generators.
pub mod data {
    /// Highly compressible repetitive text.
    #[must_use]
    pub fn repetitive_text(size: usize) -> Vec<u8> {
        let pattern = b"The quick brown fox jumps over the lazy dog. ";
        pattern.iter().cycle().take(size).copied().collect()
    }

    /// Moderately compressible English-like text.
    #[must_use]
    pub fn english_text(size: usize) -> Vec<u8> {
        let text = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
            Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
            Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris \
            nisi ut aliquip ex ea commodo consequat. ";
        text.iter().cycle().take(size).copied().collect()
    }

    /// Text dominated by bytes at or above `0x80` (UTF-8 Cyrillic).
    #[must_use]
    pub fn high_bit_text(size: usize) -> Vec<u8> {
        let text = "Съешь же ещё этих мягких французских булок, да выпей чаю. ".as_bytes();
        text.iter().cycle().take(size).copied().collect()
    }

    /// Structured binary records.
    #[must_use]
    pub fn structured_binary(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut counter: u32 = 0;
        while data.len() < size {
            let record_type = (counter % 5) as u8;
            let record_len = 16 + (counter % 32) as usize;
            data.extend_from_slice(&(record_len as u32).to_le_bytes());
            data.push(record_type);
            for i in 0..record_len.min(size.saturating_sub(data.len())) {
                data.push((i as u8).wrapping_add(record_type));
            }
            counter += 1;
        }
        data.truncate(size);
        data
    }

    /// Pseudo-random bytes from a linear congruential generator.
    #[must_use]
    pub fn random_data(size: usize, seed: u64) -> Vec<u8> {
        let mut state = seed;
        let mut data = Vec::with_capacity(size);
        for _ in 0..size {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            data.push((state >> 56) as u8);
        }
        data
    }

    /// Short data runs separated by long runs of zeros.
    #[must_use]
    pub fn sparse_data(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        let mut i = 0;
        while data.len() < size {
            let data_len = 10 + (i % 20);
            let zero_len = 50 + (i % 100);
            for j in 0..data_len.min(size - data.len()) {
                data.push((j + i) as u8);
            }
            let zeros = zero_len.min(size - data.len());
            data.resize(data.len() + zeros, 0);
            i += 1;
        }
        data
    }
}
