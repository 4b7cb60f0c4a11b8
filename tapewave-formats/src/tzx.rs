/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! **TZX** file format utilities.
//!
//! A *TZX* file starts with a 10 byte header followed by blocks, each prefixed by the block ID byte.
//!
//! | offset | size | description                      |
//! |--------|------|----------------------------------|
//! |    0   |    7 | signature `"ZXTape!"`            |
//! |    7   |    1 | end of text marker `0x1A`        |
//! |    8   |    1 | major version                    |
//! |    9   |    1 | minor version                    |
//!
//! Only the [standard speed data][TzxId::StandardSpeed] and [text description][TzxId::Text]
//! blocks can be converted.
//!
//! The standard speed data block (ID `0x10`):
//!
//! | offset | size | description                                 |
//! |--------|------|---------------------------------------------|
//! |    0   |    2 | pause after this block in ms (LSB first)    |
//! |    2   |    2 | length of data (LSB first)                  |
//! |    4   |    N | data as in *TAP* chunks, flag and checksum  |
//!
//! The text description block (ID `0x30`):
//!
//! | offset | size | description        |
//! |--------|------|--------------------|
//! |    0   |    1 | length of the text |
//! |    1   |    N | text               |
use core::convert::TryFrom;
use core::fmt;

use arrayvec::ArrayVec;
use nom::bytes::complete::take;
use nom::number::complete::le_u8;
use nom::sequence::tuple;
use nom::IResult;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use tapewave_core::audio::AudioSink;
use tapewave_core::machine::MachineProfile;
use tapewave_core::source::ByteSource;

use crate::block::DataBlockInfo;
use crate::convert::Encoder;
use crate::cursor::{ensure_len, read_byte, read_word};
use crate::error::{FormatError, TapeResult};

/// The signature of *TZX* files.
pub const TZX_SIGNATURE: &[u8;7] = b"ZXTape!";
/// The byte following the signature.
pub const TZX_END_MARKER: u8 = 0x1A;
/// The size of the *TZX* file header.
pub const TZX_HEADER_SIZE: usize = 10;

type NomResult<'a, O> = IResult<&'a [u8], O, nom::error::Error<&'a [u8]>>;

macro_rules! tzx_id {
    ($($id:ident = $n:literal),*) => {
        /// *TZX* block IDs.
        ///
        /// Only [TzxId::StandardSpeed] and [TzxId::Text] blocks are decoded, the rest is listed
        /// for diagnostics.
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum TzxId {
            $($id = $n),*
        }

        /// Returns back the byte if it's not a known block ID.
        impl TryFrom<u8> for TzxId {
            type Error = u8;
            fn try_from(id: u8) -> Result<Self, u8> {
                match id {
                    $($n => Ok(TzxId::$id),)*
                    id => Err(id)
                }
            }
        }
    };
}

tzx_id! {
    StandardSpeed    = 0x10,
    TurboSpeed       = 0x11,
    PureTone         = 0x12,
    SeqOfPulses      = 0x13,
    PureData         = 0x14,
    DirectRec        = 0x15,
    CswRecording     = 0x18,
    Generalized      = 0x19,
    Pause            = 0x20,
    GroupStart       = 0x21,
    GroupEnd         = 0x22,
    Jump             = 0x23,
    LoopStart        = 0x24,
    LoopEnd          = 0x25,
    CallSeq          = 0x26,
    Return           = 0x27,
    Select           = 0x28,
    StopIn48k        = 0x2A,
    SetLevel         = 0x2B,
    Text             = 0x30,
    Message          = 0x31,
    Archive          = 0x32,
    Hardware         = 0x33,
    Custom           = 0x35,
    Glue             = 0x5A
}

impl From<TzxId> for u8 {
    fn from(id: TzxId) -> u8 {
        id as u8
    }
}

/// The *TZX* file format version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major, self.minor)
    }
}

/// Validates the *TZX* header.
///
/// On success returns the file version and the offset of the first block.
pub fn read_header<S: ByteSource + ?Sized>(source: &S) -> Result<(Version, usize), FormatError> {
    let header: ArrayVec<u8, TZX_HEADER_SIZE> = (0..TZX_HEADER_SIZE)
                                                .map_while(|index| source.byte_at(index))
                                                .collect();
    parse_header(&header).map(|version| (version, TZX_HEADER_SIZE))
}

fn parse_header(input: &[u8]) -> Result<Version, FormatError> {
    let res: NomResult<&[u8]> = take(TZX_SIGNATURE.len())(input);
    let (input, signature) = res.map_err(|_| FormatError::TooShort { len: input.len() })?;
    if signature != &TZX_SIGNATURE[..] {
        let mut sig = [0u8;7];
        sig.copy_from_slice(signature);
        return Err(FormatError::Signature(sig))
    }
    let res: NomResult<u8> = le_u8(input);
    let (input, marker) = res.map_err(|_| FormatError::Truncated)?;
    if marker != TZX_END_MARKER {
        return Err(FormatError::EndMarker(marker))
    }
    let res: NomResult<(u8, u8)> = tuple((le_u8, le_u8))(input);
    let (_, (major, minor)) = res.map_err(|_| FormatError::Truncated)?;
    Ok(Version { major, minor })
}

impl<'a, M, S, A> Encoder<'a, M, S, A>
    where M: MachineProfile + ?Sized,
          S: ByteSource + ?Sized,
          A: AudioSink + ?Sized
{
    /// Decodes and renders the standard speed data block with the ID byte at `offset`.
    ///
    /// Returns the block meta-data and the offset of the last byte of the block.
    pub(crate) fn standard_speed_block(&mut self, offset: usize) -> TapeResult<(DataBlockInfo, usize)> {
        ensure_len(self.source, offset, offset, 5)?;
        let pause_ms = read_word(self.source, offset + 1)?;
        let length = read_word(self.source, offset + 3)?;
        let data_start = offset + 4;
        let info = self.data_block(offset, data_start + 1, length, pause_ms)?;
        Ok((info, data_start + length as usize))
    }
    /// Decodes the text description block with the ID byte at `offset`.
    ///
    /// Returns the description and the offset of the last byte of the block.
    pub(crate) fn text_block(&mut self, offset: usize) -> TapeResult<(String, usize)> {
        ensure_len(self.source, offset, offset, 2)?;
        let length = read_byte(self.source, offset + 1)? as usize;
        let text_start = offset + 2;
        ensure_len(self.source, offset, text_start, length)?;
        let text = (text_start..text_start + length)
                   .map(|index| read_byte(self.source, index))
                   .collect::<TapeResult<ArrayVec<u8, 255>>>()?;
        let description = text.iter().copied().map(char::from).collect();
        Ok((description, offset + length + 1))
    }
}
