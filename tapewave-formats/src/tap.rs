/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
/*! **TAP** file format utilities.

# TAP format

A **TAP** file consists of blocks of data each prepended by a 2 byte (LSB) block length indicator.
Those blocks will be referenced here as *TAP chunks*.

The first byte of each block is the `flag` byte: `0x00` for header blocks and `0xff` for data blocks.
After the flag byte the actual data follows, then a checksum byte calculated such that XORing all
the bytes of the block together (including the flag byte) produces `0`.

The header block is 19 bytes long:

| offset | size | description                      |
|--------|------|----------------------------------|
|    0   |    1 | flag `0x00`                      |
|    1   |    1 | type (0,1,2,3)                   |
|    2   |   10 | filename (padded with space)     |
|   12   |    2 | length of data block (LSB first) |
|   14   |    2 | parameter 1 (LSB first)          |
|   16   |    2 | parameter 2 (LSB first)          |
|   18   |    1 | checksum                         |

For example, SAVE "ROM" CODE 0,2 produces:

```text
      |-------------- TAP chunk -------------|       |TAP chunk|
13 00 00 03 52 4f 4d 7x20 02 00 00 00 00 80 f1 04 00 ff f3 af a3
```

*TAP* files carry no pause information, each chunk is followed by a pause of [TAP_PAUSE_MS].
*/
use tapewave_core::audio::AudioSink;
use tapewave_core::machine::MachineProfile;
use tapewave_core::source::ByteSource;

use crate::block::DataBlockInfo;
use crate::convert::Encoder;
use crate::cursor::{ensure_len, read_word};
use crate::error::TapeResult;

/// The pause after each *TAP* chunk in milliseconds.
pub const TAP_PAUSE_MS: u16 = 1000;

impl<'a, M, S, A> Encoder<'a, M, S, A>
    where M: MachineProfile + ?Sized,
          S: ByteSource + ?Sized,
          A: AudioSink + ?Sized
{
    /// Decodes and renders the *TAP* chunk starting with its length at `offset`.
    ///
    /// Returns the chunk meta-data and the offset of the next chunk.
    pub(crate) fn tap_chunk(&mut self, offset: usize) -> TapeResult<(DataBlockInfo, usize)> {
        ensure_len(self.source, offset, offset, 2)?;
        let length = read_word(self.source, offset)?;
        let region = offset + 2;
        let info = self.data_block(offset, region, length, TAP_PAUSE_MS)?;
        Ok((info, region + length as usize))
    }
}
