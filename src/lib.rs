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
/*! # TAPEWAVE

TAPEWAVE renders ZX Spectrum **TZX** and **TAP** tape images as the analog signal a cassette
recorder would play, one unsigned 8-bit sample at a time.

The library is split into crates:

* `tapewave-core` provides the [AudioSink][audio::AudioSink] and [ByteSource][source::ByteSource]
  traits, a few sinks and the [machine] tape timings.
* `tapewave-formats` (feature `formats`, enabled by default) decodes tape images and synthesizes
  the signal.

Features:

* `formats`: re-exports `tapewave-formats` as the [formats] module.
* `wav`: implements [AudioSink][audio::AudioSink] for `hound::WavWriter`.
* `serde`: derives serialization of timings and conversion results.

```
# #[cfg(feature = "formats")]
# {
use tapewave::audio::SampleCounter;
use tapewave::formats::convert_tzx;

let tzx = b"ZXTape!\x1a\x01\x14\x30\x06Side A";
let mut sink = SampleCounter::new(44100);
let info = convert_tzx(&tzx[..], &mut sink).unwrap();
assert_eq!(Some("Side A"), info.blocks[0].description());
# }
```
*/
pub use tapewave_core::{audio, machine, source};

#[cfg(feature = "formats")]
pub use tapewave_formats as formats;
