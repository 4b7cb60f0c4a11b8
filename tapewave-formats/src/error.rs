/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;
use core::convert::TryFrom;
use std::error;
use std::io;

use crate::tzx::TzxId;

pub type TapeResult<T> = Result<T, TapeError>;

/// The reason the *TZX* file header has been rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The source is shorter than the signature.
    TooShort {
        /// The length of the source.
        len: usize
    },
    /// The signature is not `"ZXTape!"`.
    Signature([u8;7]),
    /// The byte following the signature is not the end of text marker.
    EndMarker(u8),
    /// The source ends before the version.
    Truncated,
}

/// The error returned by tape conversions.
///
/// Any error aborts the whole conversion.
#[derive(Debug)]
pub enum TapeError {
    /// Not a proper *TZX* file.
    Format(FormatError),
    /// The block flag byte is neither a header nor a data flag.
    InvalidFlag {
        /// The offset of the block in the source.
        offset: usize,
        flag: u8
    },
    /// A *TZX* block of this type can't be converted.
    UnsupportedBlock {
        /// The offset of the block in the source.
        offset: usize,
        /// The block type.
        id: u8
    },
    /// The block does not fit in the source.
    Truncated {
        /// The offset of the block in the source.
        offset: usize,
        /// The length of the source needed to read the whole block.
        needed: usize
    },
    /// The data block has zero length.
    EmptyBlock {
        /// The offset of the block in the source.
        offset: usize
    },
    /// An error reported by an audio sink.
    Io(io::Error)
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::TooShort { len } => {
                write!(f, "input is not a valid TZX file: too short ({} bytes)", len)
            }
            FormatError::Signature(sig) => {
                write!(f, "input is not a valid TZX file as the signature is wrong, got: {:?}",
                    String::from_utf8_lossy(sig))
            }
            FormatError::EndMarker(byte) => {
                write!(f, "input is not a valid TZX file as the EOF byte is wrong, got: 0x{:02x}", byte)
            }
            FormatError::Truncated => {
                write!(f, "input is not a valid TZX file: truncated header")
            }
        }
    }
}

impl error::Error for FormatError {}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeError::Format(error) => error.fmt(f),
            TapeError::InvalidFlag { offset, flag } => {
                write!(f, "invalid flag byte value: 0x{:02x} in a block at {}", flag, offset)
            }
            TapeError::UnsupportedBlock { offset, id } => {
                write!(f, "unsupported block: 0x{:02x}", id)?;
                if let Ok(tzx_id) = TzxId::try_from(*id) {
                    write!(f, " ({:?})", tzx_id)?;
                }
                write!(f, " at {}", offset)
            }
            TapeError::Truncated { offset, needed } => {
                write!(f, "a block at {} is truncated, {} bytes needed", offset, needed)
            }
            TapeError::EmptyBlock { offset } => {
                write!(f, "an empty data block at {}", offset)
            }
            TapeError::Io(error) => error.fmt(f)
        }
    }
}

impl error::Error for TapeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            TapeError::Format(error) => Some(error),
            TapeError::Io(error) => Some(error),
            _ => None
        }
    }
}

impl From<FormatError> for TapeError {
    fn from(error: FormatError) -> Self {
        TapeError::Format(error)
    }
}

impl From<io::Error> for TapeError {
    fn from(error: io::Error) -> Self {
        TapeError::Io(error)
    }
}

impl From<TapeError> for io::Error {
    fn from(error: TapeError) -> Self {
        match error {
            TapeError::Io(error) => error,
            TapeError::Truncated {..} => io::Error::new(io::ErrorKind::UnexpectedEof, error),
            error => io::Error::new(io::ErrorKind::InvalidData, error)
        }
    }
}
