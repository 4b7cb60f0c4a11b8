/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use crate::tzx::{TzxId, Version};

/// The meta-data of a decoded data block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataBlockInfo {
    /// The pause after this block in milliseconds.
    pub pause_ms: u16,
    /// The length of the block including the flag and the checksum byte.
    pub length: u16,
    /// The block flag byte.
    pub flag: u8,
    /// The byte following the flag.
    pub program_type: u8,
    /// The last byte of the block.
    pub checksum: u8,
    /// `true` if XOR of all the bytes of the block before the checksum byte equals the checksum.
    pub valid_checksum: bool,
    /// The header description provided by the machine profile.
    pub header_text: String,
}

/// The kind of the decoded block with its meta-data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlockKind {
    /// The *TZX* standard speed data block.
    StandardSpeed(DataBlockInfo),
    /// The *TZX* text description block.
    Text {
        description: String
    },
    /// The *TAP* chunk.
    Raw(DataBlockInfo),
}

/// The meta-data of a block decoded from a tape image.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockInfo {
    /// The offset of the block in the tape image.
    pub offset: usize,
    pub kind: BlockKind,
}

/// The result of a tape conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TapeInfo {
    /// The version of the *TZX* file. `None` for *TAP* files.
    pub version: Option<Version>,
    /// The decoded blocks in the order of appearance.
    pub blocks: Vec<BlockInfo>,
}

impl BlockInfo {
    /// Returns the *TZX* block ID. *TAP* chunks have none.
    pub fn id(&self) -> Option<TzxId> {
        match self.kind {
            BlockKind::StandardSpeed(..) => Some(TzxId::StandardSpeed),
            BlockKind::Text {..} => Some(TzxId::Text),
            BlockKind::Raw(..) => None
        }
    }
    /// Returns a reference to the data block meta-data if this is a data block.
    pub fn data(&self) -> Option<&DataBlockInfo> {
        match self.kind {
            BlockKind::StandardSpeed(ref info)|BlockKind::Raw(ref info) => Some(info),
            BlockKind::Text {..} => None
        }
    }
    /// Returns the text description if this is a text block.
    pub fn description(&self) -> Option<&str> {
        match self.kind {
            BlockKind::Text { ref description } => Some(description),
            _ => None
        }
    }
}

impl TapeInfo {
    /// Returns an iterator over the meta-data of the data blocks.
    pub fn data_blocks(&self) -> impl Iterator<Item=&DataBlockInfo> {
        self.blocks.iter().filter_map(BlockInfo::data)
    }
}

impl fmt::Display for DataBlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\", flag 0x{:02x}, {} bytes, pause {} ms",
            self.header_text, self.flag, self.length, self.pause_ms)?;
        if !self.valid_checksum {
            write!(f, ", bad checksum")?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BlockKind::StandardSpeed(ref info) => {
                write!(f, "standard speed data at {}: {}", self.offset, info)
            }
            BlockKind::Text { ref description } => {
                write!(f, "text description at {}: \"{}\"", self.offset, description)
            }
            BlockKind::Raw(ref info) => {
                write!(f, "tap chunk at {}: {}", self.offset, info)
            }
        }
    }
}
