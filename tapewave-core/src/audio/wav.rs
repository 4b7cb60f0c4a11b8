/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
use std::io::{self, Seek, Write};

use log::debug;

use super::AudioSink;

/// Returns a [hound::WavSpec] of the unsigned 8-bit mono WAV stream with the given sample frequency.
pub fn wav_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int
    }
}

/// Creates a WAV writer suitable for receiving the rendered tape samples.
pub fn wav_writer<W: Write + Seek>(wr: W, sample_rate: u32) -> io::Result<hound::WavWriter<W>> {
    let spec = wav_spec(sample_rate);
    debug!("WAV output: {:?}", spec);
    hound::WavWriter::new(wr, spec).map_err(hound_to_io_error)
}

/// Writes samples to an 8-bit mono WAV stream.
///
/// Hound expects 8-bit samples as signed values and stores them with the `0x80` offset,
/// so the unsigned sample is converted back before writing.
impl<W: Write + Seek> AudioSink for hound::WavWriter<W> {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.spec().sample_rate
    }

    fn add_sample(&mut self, sample: u8) -> io::Result<()> {
        let sample = (sample ^ 0x80) as i8;
        self.write_sample(sample).map_err(hound_to_io_error)
    }
}

fn hound_to_io_error(error: hound::Error) -> io::Error {
    match error {
        hound::Error::IoError(error) => error,
        error => io::Error::new(io::ErrorKind::InvalidInput, error)
    }
}
