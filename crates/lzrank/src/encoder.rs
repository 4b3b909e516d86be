//! Compress engine.
//!
//! Each step emits one token:
//!
//! ```text
//! 0   rank(byte)                       literal below 0x80, 2-bit chunks
//! 1 0 rank(byte & 0x7f)                literal at or above 0x80, 2-bit chunks
//! 1 1 rank(distance) 0 rank(length)    back-reference, 4-bit chunks
//! 1 1 rank(distance) 1 length          back-reference with length >= window
//! ```
//!
//! The rank of a symbol is read before the symbol's heap is bumped; the
//! decoder reproduces the same bumps in the same order.

use crate::bits::BitWriter;
use crate::debug_codec;
use crate::error::Result;
use crate::heap::RankTables;
use crate::matcher::{Match, MatchStrategy};
use crate::transport::WordTransport;
use crate::varint::{LITERAL_CHUNK_BITS, REFERENCE_CHUNK_BITS, write_number};
use crate::window::WindowBits;

/// Compresses `data` into the bit-packed body, resetting `tables` first.
///
/// `written` is advanced by every word the transport accepts, including words
/// emitted before a failure.
pub(crate) fn encode<T: WordTransport + ?Sized>(
    transport: &mut T,
    tables: &mut RankTables,
    data: &[u8],
    window_bits: WindowBits,
    strategy: MatchStrategy,
    written: &mut u64,
) -> Result<()> {
    let window_size = window_bits.window_size();
    debug_codec::trace_stream_start("compress", data.len(), window_bits.get());
    tables.reset(window_size);

    let mut writer = BitWriter::new(transport);
    let result = encode_tokens(&mut writer, tables, data, window_size, strategy)
        .and_then(|()| writer.flush().map_err(Into::into));
    *written += writer.bytes_written();
    result?;

    debug_codec::trace_compressed(data.len(), writer.bytes_written());
    Ok(())
}

fn encode_tokens<T: WordTransport + ?Sized>(
    writer: &mut BitWriter<'_, T>,
    tables: &mut RankTables,
    data: &[u8],
    window_size: usize,
    strategy: MatchStrategy,
) -> Result<()> {
    let mut finder = strategy.finder(window_size);
    let mut position = 0;
    while position < data.len() {
        if let Some(found) = finder.longest_match(data, position) {
            debug_codec::trace_reference(position, found.distance, found.length);
            write_reference(writer, tables, found, window_size)?;
            position += found.length;
        } else {
            write_literal(writer, tables, position, data[position])?;
            position += 1;
        }
    }
    Ok(())
}

fn write_literal<T: WordTransport + ?Sized>(
    writer: &mut BitWriter<'_, T>,
    tables: &mut RankTables,
    position: usize,
    byte: u8,
) -> Result<()> {
    if byte < 0x80 {
        writer.write_bit(false)?;
    } else {
        writer.write_bit(true)?;
        writer.write_bit(false)?;
    }
    let symbol = usize::from(byte & 0x7f);
    let rank = tables.literals.rank_of(symbol);
    debug_codec::trace_literal(position, byte, rank);
    write_number(writer, rank as u64, LITERAL_CHUNK_BITS)?;
    tables.literals.bump(symbol);
    Ok(())
}

fn write_reference<T: WordTransport + ?Sized>(
    writer: &mut BitWriter<'_, T>,
    tables: &mut RankTables,
    found: Match,
    window_size: usize,
) -> Result<()> {
    debug_assert!(0 < found.distance && found.distance < window_size);
    writer.write_bits(0b11, 2)?;

    let rank = tables.distances.rank_of(found.distance);
    write_number(writer, rank as u64, REFERENCE_CHUNK_BITS)?;
    tables.distances.bump(found.distance);

    let long = found.length >= window_size;
    writer.write_bit(long)?;
    if long {
        write_number(writer, found.length as u64, REFERENCE_CHUNK_BITS)?;
    } else {
        let rank = tables.lengths.rank_of(found.length);
        write_number(writer, rank as u64, REFERENCE_CHUNK_BITS)?;
        tables.lengths.bump(found.length);
    }
    Ok(())
}
