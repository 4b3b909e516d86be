//! Decompress engine.
//!
//! Reads tokens in the layout written by the compress engine, maps each
//! received rank back to a symbol and bumps the same heap the encoder bumped,
//! at the same point in the stream. Back-references are copied one byte at a
//! time in increasing order: a distance smaller than the length refers to bytes
//! the copy itself is producing.

use crate::bits::BitReader;
use crate::debug_codec;
use crate::error::{CodecError, Result};
use crate::heap::{FrequencyHeap, RankTables};
use crate::transport::WordTransport;
use crate::varint::{LITERAL_CHUNK_BITS, REFERENCE_CHUNK_BITS, read_number};
use crate::window::WindowBits;

/// Destination of decoded bytes.
///
/// Bytes are only ever appended; back-references read bytes already produced.
pub(crate) trait DecodeOutput {
    /// Number of bytes produced so far.
    fn produced(&self) -> usize;

    /// Appends one byte.
    fn push(&mut self, byte: u8);

    /// Appends `count` bytes copied forward from `distance` bytes back.
    ///
    /// Callers guarantee `0 < distance <= produced()`.
    fn repeat(&mut self, distance: usize, count: usize);
}

/// Caller-provided buffer of the final size, filled front to back.
pub(crate) struct SliceOutput<'a> {
    buffer: &'a mut [u8],
    filled: usize,
}

impl<'a> SliceOutput<'a> {
    pub(crate) fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, filled: 0 }
    }
}

impl DecodeOutput for SliceOutput<'_> {
    fn produced(&self) -> usize {
        self.filled
    }

    fn push(&mut self, byte: u8) {
        self.buffer[self.filled] = byte;
        self.filled += 1;
    }

    fn repeat(&mut self, distance: usize, count: usize) {
        let source = self.filled - distance;
        // forward byte-wise copy; the source may overlap bytes written by this loop
        for offset in 0..count {
            self.buffer[self.filled + offset] = self.buffer[source + offset];
        }
        self.filled += count;
    }
}

impl DecodeOutput for Vec<u8> {
    fn produced(&self) -> usize {
        self.len()
    }

    fn push(&mut self, byte: u8) {
        Vec::push(self, byte);
    }

    fn repeat(&mut self, distance: usize, count: usize) {
        let source = self.len() - distance;
        for offset in 0..count {
            let byte = self[source + offset];
            Vec::push(self, byte);
        }
    }
}

/// Produces `length` bytes into `output` from the bit-packed body, resetting
/// `tables` first.
pub(crate) fn decode<T, O>(
    transport: &mut T,
    tables: &mut RankTables,
    output: &mut O,
    length: usize,
    window_bits: WindowBits,
) -> Result<()>
where
    T: WordTransport + ?Sized,
    O: DecodeOutput + ?Sized,
{
    let window_size = window_bits.window_size();
    debug_codec::trace_stream_start("decompress", length, window_bits.get());
    tables.reset(window_size);

    let mut reader = BitReader::new(transport);
    while output.produced() < length {
        let position = output.produced();
        if !reader.read_bit()? {
            let byte = read_literal(&mut reader, tables, position, 0x00)?;
            output.push(byte);
        } else if !reader.read_bit()? {
            let byte = read_literal(&mut reader, tables, position, 0x80)?;
            output.push(byte);
        } else {
            let (distance, _) =
                read_symbol(&mut reader, &mut tables.distances, REFERENCE_CHUNK_BITS)?;
            let count = if reader.read_bit()? {
                read_number(&mut reader, REFERENCE_CHUNK_BITS)?
            } else {
                read_symbol(&mut reader, &mut tables.lengths, REFERENCE_CHUNK_BITS)?.0
            };
            debug_codec::trace_reference(position, distance as usize, count as usize);
            copy_reference(output, length, distance, count, window_size)?;
        }
    }
    Ok(())
}

fn read_literal<T: WordTransport + ?Sized>(
    reader: &mut BitReader<'_, T>,
    tables: &mut RankTables,
    position: usize,
    high_bit: u8,
) -> Result<u8> {
    let (symbol, rank) = read_symbol(reader, &mut tables.literals, LITERAL_CHUNK_BITS)?;
    let byte = high_bit | symbol as u8;
    debug_codec::trace_literal(position, byte, rank);
    Ok(byte)
}

/// Reads a rank, resolves it against `heap` and records the occurrence.
///
/// Returns the symbol together with the rank it was transmitted as.
fn read_symbol<T: WordTransport + ?Sized>(
    reader: &mut BitReader<'_, T>,
    heap: &mut FrequencyHeap,
    chunk_bits: u32,
) -> Result<(u64, usize)> {
    let rank = read_number(reader, chunk_bits)?;
    let (rank, symbol) = usize::try_from(rank)
        .ok()
        .and_then(|index| heap.symbol_at(index).map(|symbol| (index, symbol)))
        .ok_or(CodecError::RankOutOfRange {
            rank,
            alphabet: heap.len(),
        })?;
    heap.bump(symbol);
    Ok((symbol as u64, rank))
}

/// Appends a back-reference to `output`, which must end up `total` bytes long.
///
/// Validates `0 < distance < window_size`, `distance <= produced` and
/// `0 < length <= total - produced` before touching the output.
pub(crate) fn copy_reference<O: DecodeOutput + ?Sized>(
    output: &mut O,
    total: usize,
    distance: u64,
    length: u64,
    window_size: usize,
) -> Result<()> {
    let position = output.produced();
    let remaining = total - position;
    let distance = usize::try_from(distance)
        .ok()
        .filter(|&distance| 0 < distance && distance < window_size && distance <= position)
        .ok_or(CodecError::InvalidDistance {
            distance,
            window: window_size,
            position,
        })?;
    let count = usize::try_from(length)
        .ok()
        .filter(|&length| 0 < length && length <= remaining)
        .ok_or(CodecError::InvalidLength { length, remaining })?;
    output.repeat(distance, count);
    Ok(())
}
