/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! Positional reads from [ByteSource]s.
use tapewave_core::source::ByteSource;

use crate::error::{TapeError, TapeResult};

/// Returns a byte at `index` or [TapeError::Truncated] if `index` is out of bounds.
#[inline]
pub fn read_byte<S: ByteSource + ?Sized>(source: &S, index: usize) -> TapeResult<u8> {
    source.byte_at(index).ok_or(TapeError::Truncated { offset: index, needed: index + 1 })
}

/// Returns a 16-bit little-endian word from bytes at `index` (LSB) and `index + 1` (MSB).
#[inline]
pub fn read_word<S: ByteSource + ?Sized>(source: &S, index: usize) -> TapeResult<u16> {
    let lo = read_byte(source, index)?;
    let hi = read_byte(source, index + 1)?;
    Ok(u16::from_le_bytes([lo, hi]))
}

/// Calculates bit toggle checksum of `length` bytes starting at `offset`.
pub fn checksum<S: ByteSource + ?Sized>(source: &S, offset: usize, length: usize) -> TapeResult<u8> {
    (offset..offset + length).try_fold(0, |acc, index| {
        read_byte(source, index).map(|x| acc ^ x)
    })
}

/// Ensures `length` bytes starting at `offset` are available in the source.
///
/// The error reports the block at `block_offset`.
pub(crate) fn ensure_len<S: ByteSource + ?Sized>(
        source: &S,
        block_offset: usize,
        offset: usize,
        length: usize
    ) -> TapeResult<()>
{
    let needed = offset + length;
    if needed > source.len() {
        Err(TapeError::Truncated { offset: block_offset, needed })
    }
    else {
        Ok(())
    }
}
