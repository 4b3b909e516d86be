//! Codec tracing hooks.
//!
//! Each hook compiles to nothing unless the `tracing` feature is enabled.

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

use crate::error::CodecError;

/// Trace the start of a compress or decompress pass.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_stream_start(operation: &'static str, length: usize, window_bits: u8) {
    debug!(
        target: "lzrank::codec",
        operation,
        length,
        window_bits,
        "{} {} bytes with window 2^{}",
        operation,
        length,
        window_bits
    );
}

/// Trace the start of a pass - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_stream_start(_operation: &'static str, _length: usize, _window_bits: u8) {}

/// Trace the end of a compress pass with its body size.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_compressed(input: usize, written: u64) {
    let ratio = if input == 0 {
        0.0
    } else {
        written as f64 * 100.0 / input as f64
    };
    debug!(
        target: "lzrank::codec",
        input,
        written,
        "compressed {} -> {} bytes ({:.1}%)",
        input,
        written,
        ratio
    );
}

/// Trace the end of a compress pass - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_compressed(_input: usize, _written: u64) {}

/// Trace one literal token.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_literal(position: usize, byte: u8, rank: usize) {
    trace!(
        target: "lzrank::token",
        position,
        byte,
        rank,
        "literal {:#04x} rank {} at {}",
        byte,
        rank,
        position
    );
}

/// Trace one literal token - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_literal(_position: usize, _byte: u8, _rank: usize) {}

/// Trace one back-reference token.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_reference(position: usize, distance: usize, length: usize) {
    trace!(
        target: "lzrank::token",
        position,
        distance,
        length,
        "reference distance {} length {} at {}",
        distance,
        length,
        position
    );
}

/// Trace one back-reference token - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_reference(_position: usize, _distance: usize, _length: usize) {}

/// Trace the failure that poisons a session.
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_poisoned(operation: &'static str, error: &CodecError) {
    warn!(
        target: "lzrank::error",
        operation,
        code = %error.code(),
        "{} failed: {}",
        operation,
        error
    );
}

/// Trace the failure that poisons a session - no-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_poisoned(_operation: &'static str, _error: &CodecError) {}
