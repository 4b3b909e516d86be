//! # Overview
//!
//! Ranks travel through the bit channel as variable-length numbers: the value
//! is split into fixed-width chunks, lowest chunk first, and every chunk is
//! followed by a continuation bit that is set when more significant bits
//! remain. Zero is a single all-zero chunk with a clear continuation bit.
//!
//! # Design
//!
//! The chunk width is chosen per field and must agree between encoder and
//! decoder. Literal ranks are small and skewed toward zero once the heap has
//! adapted, so they use [`LITERAL_CHUNK_BITS`]; distance and length ranks span
//! a whole window and use [`REFERENCE_CHUNK_BITS`].
//!
//! | value | chunk width 2 | chunk width 4 |
//! |-------|---------------|---------------|
//! | 0     | `00 0`        | `0000 0`      |
//! | 3     | `11 0`        | `0011 0`      |
//! | 4     | `00 1 01 0`   | `0100 0`      |
//!
//! (chunk bits shown most-significant first, continuation bit after each chunk)
//!
//! # Errors
//!
//! [`read_number`] rejects encodings that would not fit in a `u64` with
//! [`CodecError::NumberOverflow`] and propagates transport failures.

use crate::bits::{BitReader, BitWriter};
use crate::error::{CodecError, Result};
use crate::transport::WordTransport;

/// Chunk width used for literal ranks.
pub const LITERAL_CHUNK_BITS: u32 = 2;

/// Chunk width used for distance ranks, length ranks and raw long lengths.
pub const REFERENCE_CHUNK_BITS: u32 = 4;

/// Writes `value` as `chunk_bits`-wide chunks, each followed by a continuation bit.
pub fn write_number<T: WordTransport + ?Sized>(
    writer: &mut BitWriter<'_, T>,
    value: u64,
    chunk_bits: u32,
) -> Result<()> {
    debug_assert!((1..u64::BITS).contains(&chunk_bits));
    let mut value = value;
    loop {
        writer.write_bits(value, chunk_bits)?;
        value >>= chunk_bits;
        writer.write_bit(value != 0)?;
        if value == 0 {
            return Ok(());
        }
    }
}

/// Reads a number written by [`write_number`] with the same `chunk_bits`.
pub fn read_number<T: WordTransport + ?Sized>(
    reader: &mut BitReader<'_, T>,
    chunk_bits: u32,
) -> Result<u64> {
    debug_assert!((1..u64::BITS).contains(&chunk_bits));
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        if shift >= u64::BITS {
            return Err(CodecError::NumberOverflow);
        }
        let chunk = reader.read_bits(chunk_bits)?;
        let shifted = chunk << shift;
        if shifted >> shift != chunk {
            return Err(CodecError::NumberOverflow);
        }
        value |= shifted;
        shift += chunk_bits;
        if !reader.read_bit()? {
            return Ok(value);
        }
    }
}

/// Number of bits [`write_number`] spends on `value`.
#[must_use]
pub const fn encoded_bits(value: u64, chunk_bits: u32) -> u32 {
    let significant = u64::BITS - value.leading_zeros();
    let chunks = if significant == 0 {
        1
    } else {
        significant.div_ceil(chunk_bits)
    };
    chunks * (chunk_bits + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::WordBuffer;
    use proptest::prelude::*;

    fn encode(values: &[u64], chunk_bits: u32) -> WordBuffer {
        let mut buffer = WordBuffer::new();
        let mut writer = BitWriter::new(&mut buffer);
        for &value in values {
            write_number(&mut writer, value, chunk_bits).unwrap();
        }
        writer.flush().unwrap();
        buffer
    }

    #[test]
    fn zero_is_one_empty_chunk() {
        let buffer = encode(&[0], LITERAL_CHUNK_BITS);
        assert_eq!(buffer.words(), &[0]);
        assert_eq!(encoded_bits(0, LITERAL_CHUNK_BITS), 3);
    }

    #[test]
    fn matches_known_bit_layouts() {
        // 4 in 2-bit chunks: chunk 00, continue 1, chunk 01, stop 0
        let buffer = encode(&[4], LITERAL_CHUNK_BITS);
        assert_eq!(buffer.words(), &[0b0_01_1_00]);

        // 4 in 4-bit chunks fits a single chunk
        let buffer = encode(&[4], REFERENCE_CHUNK_BITS);
        assert_eq!(buffer.words(), &[0b0_0100]);

        // 0x1f in 4-bit chunks: chunk 1111, continue 1, chunk 0001, stop 0
        let buffer = encode(&[0x1f], REFERENCE_CHUNK_BITS);
        assert_eq!(buffer.words(), &[0b0_0001_1_1111]);
    }

    #[test]
    fn encoded_bits_counts_chunks_and_continuations() {
        assert_eq!(encoded_bits(3, LITERAL_CHUNK_BITS), 3);
        assert_eq!(encoded_bits(4, LITERAL_CHUNK_BITS), 6);
        assert_eq!(encoded_bits(127, LITERAL_CHUNK_BITS), 12);
        assert_eq!(encoded_bits(15, REFERENCE_CHUNK_BITS), 5);
        assert_eq!(encoded_bits(16, REFERENCE_CHUNK_BITS), 10);
        assert_eq!(encoded_bits(u64::MAX, REFERENCE_CHUNK_BITS), 80);
    }

    #[test]
    fn extreme_values_round_trip() {
        for chunk_bits in [LITERAL_CHUNK_BITS, 3, REFERENCE_CHUNK_BITS] {
            let values = [0, 1, u64::MAX, u64::MAX - 1, 1 << 63];
            let mut buffer = encode(&values, chunk_bits);
            let mut reader = BitReader::new(&mut buffer);
            for &expected in &values {
                assert_eq!(read_number(&mut reader, chunk_bits).unwrap(), expected);
            }
        }
    }

    #[test]
    fn overlong_encoding_is_rejected() {
        // seventeen 4-bit chunks of all ones, every continuation bit set
        let mut buffer = WordBuffer::from_words(vec![u64::MAX, u64::MAX]);
        let mut reader = BitReader::new(&mut buffer);
        assert!(matches!(
            read_number(&mut reader, REFERENCE_CHUNK_BITS),
            Err(CodecError::NumberOverflow)
        ));
    }

    #[test]
    fn truncated_stream_surfaces_transport_error() {
        let mut buffer = WordBuffer::new();
        let mut reader = BitReader::new(&mut buffer);
        assert!(matches!(
            read_number(&mut reader, LITERAL_CHUNK_BITS),
            Err(CodecError::Transport(_))
        ));
    }

    proptest! {
        #[test]
        fn numbers_round_trip(
            values in prop::collection::vec(any::<u64>(), 1..64),
            chunk_bits in 1u32..=8,
        ) {
            let mut buffer = encode(&values, chunk_bits);
            let mut reader = BitReader::new(&mut buffer);
            for &expected in &values {
                prop_assert_eq!(read_number(&mut reader, chunk_bits).unwrap(), expected);
            }
        }

        #[test]
        fn encoded_bits_matches_stream_length(value in any::<u64>(), chunk_bits in 1u32..=8) {
            let mut buffer = WordBuffer::new();
            let mut writer = BitWriter::new(&mut buffer);
            write_number(&mut writer, value, chunk_bits).unwrap();
            let total = writer.bytes_written() * 8 + u64::from(writer.pending_bits());
            prop_assert_eq!(total, u64::from(encoded_bits(value, chunk_bits)));
        }
    }
}
