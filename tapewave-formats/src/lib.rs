/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    TAPEWAVE is free software: you can redistribute it and/or modify it under
    the terms of the GNU Lesser General Public License (LGPL) as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    TAPEWAVE is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Lesser General Public License for more details.

    You should have received a copy of the GNU Lesser General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.

    Author contact information: see Cargo.toml file, section [package.authors].
*/
//! ZX Spectrum tape image decoders and the analog tape signal synthesizer.
//!
//! [TapeConverter] renders [tzx] and [tap] images as 8-bit unsigned audio samples appended
//! to an [AudioSink][tapewave_core::audio::AudioSink].
//!
//! ```
//! use tapewave_core::audio::SampleBuffer;
//! use tapewave_formats::convert_tap;
//!
//! let tap = [0x04u8, 0x00, 0xff, 0xf3, 0xaf, 0xa3];
//! let mut sink = SampleBuffer::new(44100);
//! let info = convert_tap(&tap[..], &mut sink).unwrap();
//! assert_eq!(1, info.blocks.len());
//! assert!(info.blocks[0].data().unwrap().valid_checksum);
//! ```
// http://www.worldofspectrum.org/faq/reference/formats.htm
// http://www.worldofspectrum.org/TZXformat.html
pub mod block;
pub mod convert;
pub mod cursor;
pub mod error;
pub mod synth;
pub mod tap;
pub mod tzx;

pub use block::*;
pub use convert::{convert_tap, convert_tzx, PulseWidthMode, TapeConverter};
pub use error::{FormatError, TapeError, TapeResult};
