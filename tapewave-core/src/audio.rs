/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! # Audio API.
//!
//! The tape signal is rendered as a stream of unsigned 8-bit mono samples, where [SILENCE] (`0x80`)
//! is the zero amplitude level. Rendered samples are appended one by one to an [AudioSink].
use std::io;

#[cfg(feature = "wav")]
mod wav;
#[cfg(feature = "wav")]
pub use wav::*;

/// The sample value of the zero amplitude.
pub const SILENCE: u8 = 0x80;

/// A destination of the rendered audio samples.
pub trait AudioSink {
    /// Returns the declared sample frequency in Hz.
    fn sample_rate(&self) -> u32;
    /// Appends a single unsigned 8-bit sample.
    fn add_sample(&mut self, sample: u8) -> io::Result<()>;
}

/// An in-memory [AudioSink] collecting samples in a `Vec<u8>`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleBuffer {
    sample_rate: u32,
    samples: Vec<u8>
}

/// An [AudioSink] that only counts the samples appended to it.
///
/// Useful for calculating the duration of the rendered tape without keeping the audio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SampleCounter {
    sample_rate: u32,
    count: u64
}

impl<A: AudioSink + ?Sized> AudioSink for &mut A {
    #[inline]
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
    #[inline]
    fn add_sample(&mut self, sample: u8) -> io::Result<()> {
        (**self).add_sample(sample)
    }
}

impl SampleBuffer {
    /// Creates an empty buffer declaring the given sample frequency.
    pub fn new(sample_rate: u32) -> Self {
        SampleBuffer { sample_rate, samples: Vec::new() }
    }
    /// Creates an empty buffer with space for at least `capacity` samples.
    pub fn with_capacity(sample_rate: u32, capacity: usize) -> Self {
        SampleBuffer { sample_rate, samples: Vec::with_capacity(capacity) }
    }
    /// Returns the collected samples.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
    /// Returns the number of the collected samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    /// Returns `true` if no samples were collected.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    /// Removes all the collected samples.
    pub fn clear(&mut self) {
        self.samples.clear()
    }
    /// Returns the collected samples, consuming `self`.
    pub fn into_inner(self) -> Vec<u8> {
        self.samples
    }
}

impl AsRef<[u8]> for SampleBuffer {
    #[inline(always)]
    fn as_ref(&self) -> &[u8] {
        &self.samples
    }
}

impl AudioSink for SampleBuffer {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    #[inline]
    fn add_sample(&mut self, sample: u8) -> io::Result<()> {
        self.samples.push(sample);
        Ok(())
    }
}

impl SampleCounter {
    pub fn new(sample_rate: u32) -> Self {
        SampleCounter { sample_rate, count: 0 }
    }
    /// Returns the number of samples appended so far.
    pub fn count(&self) -> u64 {
        self.count
    }
    /// Returns the duration of the counted samples in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.count as f64 / self.sample_rate as f64
    }
}

impl AudioSink for SampleCounter {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    #[inline]
    fn add_sample(&mut self, _sample: u8) -> io::Result<()> {
        self.count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed<A: AudioSink>(mut sink: A, samples: &[u8]) -> io::Result<()> {
        for &sample in samples {
            sink.add_sample(sample)?;
        }
        Ok(())
    }

    #[test]
    fn sample_buffer_works() -> io::Result<()> {
        let mut buf = SampleBuffer::new(22050);
        assert_eq!(22050, buf.sample_rate());
        assert!(buf.is_empty());
        feed(&mut buf, &[SILENCE, 0, 255])?;
        assert_eq!(3, buf.len());
        assert_eq!(&[0x80, 0, 255][..], buf.samples());
        assert_eq!(vec![0x80, 0, 255], buf.clone().into_inner());
        buf.clear();
        assert!(buf.is_empty());
        Ok(())
    }

    #[test]
    fn sample_counter_works() -> io::Result<()> {
        let mut counter = SampleCounter::new(1000);
        feed(&mut counter, &[1u8; 1500])?;
        assert_eq!(1500, counter.count());
        assert_eq!(1.5, counter.duration_secs());
        Ok(())
    }
}
