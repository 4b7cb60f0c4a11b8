/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! The analog *TAPE* signal synthesizer.
//!
//! The digital signal produced by the Spectrum's SAVE routines is a square wave. What was recorded on
//! a real cassette though was a wave with rounded edges, shaped by the tape head and the capacitor
//! coupled input. [PulseSynth] renders pulses as cubic lobes approximating that shape.
//!
//! A *pulse* is a half of the wave period. A *wave pair* consists of a pulse below the zero level
//! followed by a pulse above it, or the other way around, depending on the sign of the amplitude.
//!
//! All pulse widths are given in samples and may be fractional. The fractional remainder of each pulse
//! is carried over to the next one as a `phase` offset.
use tapewave_core::audio::{AudioSink, SILENCE};
use tapewave_core::source::ByteSource;

use crate::cursor::read_byte;
use crate::error::TapeResult;

/// The amplitude of the synthesized pulses at the start of a conversion.
pub const INITIAL_AMPLITUDE: f64 = 115.0;
/// The width in samples of the pulses rendered during a pause, after the first wave pair.
pub const PAUSE_PULSE_WIDTH: f64 = 250.0;
/// The width in samples of the end tone pulses.
pub const END_TONE_PULSE_WIDTH: f64 = 12.0;
/// The number of wave pairs of the end tone.
pub const END_TONE_WAVE_PAIRS: u32 = 1000;

/// The stateful analog wave generator.
///
/// The state must persist through the whole conversion. Resetting it between blocks would break
/// the shape of the pulses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseSynth {
    phase: f64,
    db: f64,
}

/// Appends a signed `level` to the `sink` as an unsigned 8-bit sample, wrapping around on overflow.
#[inline]
pub fn emit_sample<A: AudioSink + ?Sized>(level: i32, sink: &mut A) -> TapeResult<()> {
    sink.add_sample(level.wrapping_add(SILENCE as i32) as u8)?;
    Ok(())
}

#[inline(always)]
fn leading_lobe(x: f64, pulse: f64) -> f64 {
    x * (x - pulse) * (x - 2.0 * pulse)
}

#[inline(always)]
fn trailing_lobe(x: f64, pulse: f64) -> f64 {
    x * (x + pulse) * (x - pulse)
}

impl Default for PulseSynth {
    fn default() -> Self {
        PulseSynth::new()
    }
}

impl PulseSynth {
    pub fn new() -> Self {
        PulseSynth { phase: 0.0, db: INITIAL_AMPLITUDE }
    }
    /// Restores the initial state.
    pub fn reset(&mut self) {
        *self = PulseSynth::new()
    }
    /// Returns the sample offset carried over to the next pulse, in the range `[0, 1)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }
    /// Returns the current signed amplitude.
    pub fn amplitude(&self) -> f64 {
        self.db
    }
    /// Renders a pair of pulses of `pulse1` and `pulse2` widths.
    pub fn wave_pair<A: AudioSink + ?Sized>(
            &mut self,
            pulse1: f64,
            pulse2: f64,
            sink: &mut A
        ) -> TapeResult<()>
    {
        let t1 = self.lobe(pulse1, leading_lobe, sink)?;
        self.phase = t1 as f64 + self.phase - pulse1;
        let t2 = self.lobe(pulse2, trailing_lobe, sink)?;
        self.phase = t2 as f64 + self.phase - pulse2;
        Ok(())
    }
    /// Renders a single pulse of `pulse` width, flipping the sign of the amplitude afterwards.
    pub fn single_pulse<A: AudioSink + ?Sized>(&mut self, pulse: f64, sink: &mut A) -> TapeResult<()> {
        let t = self.lobe(pulse, leading_lobe, sink)?;
        self.phase = t as f64 + self.phase - pulse;
        self.db = -self.db;
        Ok(())
    }
    /// Renders `count` pilot pulses of `pulse` width.
    ///
    /// An odd pulse is rendered first as a single pulse, the rest as wave pairs.
    pub fn pilot_tone<A: AudioSink + ?Sized>(
            &mut self,
            pulse: f64,
            count: u16,
            sink: &mut A
        ) -> TapeResult<()>
    {
        if count & 1 == 1 {
            self.single_pulse(pulse, sink)?;
        }
        for _ in 0..count / 2 {
            self.wave_pair(pulse, pulse, sink)?;
        }
        Ok(())
    }
    /// Renders bits of `length` bytes from the `source` starting at `offset`, the most significant bit
    /// first. Each bit is a wave pair of either `zero` or `one` pulse width.
    ///
    /// Only `last_bits` most significant bits of the last byte are rendered.
    pub fn data_bits<S, A>(
            &mut self,
            zero: f64,
            one: f64,
            source: &S,
            offset: usize,
            length: usize,
            last_bits: u8,
            sink: &mut A
        ) -> TapeResult<()>
        where S: ByteSource + ?Sized,
              A: AudioSink + ?Sized
    {
        let last = match (offset + length).checked_sub(1) {
            Some(last) if length != 0 => last,
            _ => return Ok(())
        };
        for index in offset..last {
            let byte = read_byte(source, index)?;
            self.byte_bits(zero, one, byte, 8, sink)?;
        }
        let byte = read_byte(source, last)?;
        self.byte_bits(zero, one, byte, last_bits.min(8), sink)
    }
    /// Renders a pause of `duration_ms` milliseconds.
    ///
    /// The pause starts with a wave pair of `pulse` width after normalizing the sign of the amplitude.
    /// Then wave pairs of [PAUSE_PULSE_WIDTH] follow with the amplitude decaying to simulate
    /// the motor of the tape recorder stopping.
    pub fn pause<A: AudioSink + ?Sized>(
            &mut self,
            pulse: f64,
            duration_ms: u16,
            sink: &mut A
        ) -> TapeResult<()>
    {
        if duration_ms == 0 {
            return Ok(())
        }
        if self.db < 0.0 {
            self.single_pulse(pulse, sink)?;
        }
        self.wave_pair(pulse, pulse, sink)?;
        let db = self.db;
        let limit = sink.sample_rate() as f64 * duration_ms as f64 / (PAUSE_PULSE_WIDTH * 2000.0);
        let mut i = 1u32;
        while (i as f64) < limit {
            self.db = 200.0 * self.db / (200.0 + i as f64);
            if self.db < 1.0 {
                self.db = 1.0;
            }
            self.wave_pair(PAUSE_PULSE_WIDTH, PAUSE_PULSE_WIDTH, sink)?;
            i += 1;
        }
        self.db = db;
        Ok(())
    }
    /// Renders the tone marking the end of the tape.
    pub fn end_tone<A: AudioSink + ?Sized>(&mut self, sink: &mut A) -> TapeResult<()> {
        for _ in 0..END_TONE_WAVE_PAIRS {
            self.wave_pair(END_TONE_PULSE_WIDTH, END_TONE_PULSE_WIDTH, sink)?;
        }
        Ok(())
    }

    fn byte_bits<A: AudioSink + ?Sized>(
            &mut self,
            zero: f64,
            one: f64,
            mut current: u8,
            bits: u8,
            sink: &mut A
        ) -> TapeResult<()>
    {
        for _ in 0..bits {
            let pulse = if current & 0x80 != 0 { one } else { zero };
            self.wave_pair(pulse, pulse, sink)?;
            current <<= 1;
        }
        Ok(())
    }
    /// Renders samples of a lobe starting from the current phase, returns the number of samples.
    fn lobe<A: AudioSink + ?Sized>(
            &self,
            pulse: f64,
            shape: fn(f64, f64) -> f64,
            sink: &mut A
        ) -> TapeResult<u32>
    {
        let amp = (self.db * 20.0) / (8.0 * pulse * pulse * pulse);
        let mut t = 0;
        let mut x = self.phase;
        while x < pulse {
            emit_sample((0.5 - amp * shape(x, pulse)).floor() as i32, sink)?;
            t += 1;
            x += 1.0;
        }
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapewave_core::audio::{SampleBuffer, SampleCounter};

    fn render<F>(sample_rate: u32, f: F) -> Vec<u8>
        where F: FnOnce(&mut PulseSynth, &mut SampleBuffer) -> TapeResult<()>
    {
        let mut synth = PulseSynth::new();
        let mut buf = SampleBuffer::new(sample_rate);
        f(&mut synth, &mut buf).unwrap();
        buf.into_inner()
    }

    #[test]
    fn emit_sample_works() {
        let mut buf = SampleBuffer::new(44100);
        for &level in &[0, -110, 110, 127, -128, 128, -129] {
            emit_sample(level, &mut buf).unwrap();
        }
        assert_eq!(&[0x80, 18, 238, 255, 0, 0, 255][..], buf.samples());
    }

    #[test]
    fn wave_pair_works() {
        let samples = render(44100, |synth, buf| synth.wave_pair(4.0, 4.0, buf));
        assert_eq!(vec![128, 34, 20, 61, 128, 195, 236, 222], samples);
        let mut synth = PulseSynth::new();
        synth.wave_pair(4.0, 4.0, &mut SampleCounter::new(44100)).unwrap();
        assert_eq!(PulseSynth::new(), synth);
    }

    #[test]
    fn single_pulse_flips_amplitude() {
        let mut synth = PulseSynth::new();
        let mut buf = SampleBuffer::new(44100);
        synth.single_pulse(6.0, &mut buf).unwrap();
        assert_eq!(&[128, 55, 22, 20, 43, 81][..], buf.samples());
        assert_eq!(-INITIAL_AMPLITUDE, synth.amplitude());
        assert_eq!(0.0, synth.phase());
        buf.clear();
        synth.wave_pair(4.0, 4.0, &mut buf).unwrap();
        assert_eq!(&[128, 222, 236, 195, 128, 61, 20, 34][..], buf.samples());
    }

    #[test]
    fn pilot_tone_pairs_pulses() {
        let pairs = render(44100, |synth, buf| {
            synth.wave_pair(5.0, 5.0, buf)?;
            synth.wave_pair(5.0, 5.0, buf)
        });
        let pilot = render(44100, |synth, buf| synth.pilot_tone(5.0, 4, buf));
        assert_eq!(20, pilot.len());
        assert_eq!(pairs, pilot);
        let pair = render(44100, |synth, buf| synth.wave_pair(5.0, 5.0, buf));
        assert_eq!(pair, render(44100, |synth, buf| synth.pilot_tone(5.0, 2, buf)));
        let odd = render(44100, |synth, buf| {
            synth.pilot_tone(4.0, 3, buf)?;
            assert_eq!(-INITIAL_AMPLITUDE, synth.amplitude());
            Ok(())
        });
        assert_eq!(vec![128, 34, 20, 61, 128, 222, 236, 195, 128, 61, 20, 34], odd);
        assert!(render(44100, |synth, buf| synth.pilot_tone(4.0, 0, buf)).is_empty());
    }

    #[test]
    fn fractional_pulses_carry_phase() {
        let mut synth = PulseSynth::new();
        let mut counter = SampleCounter::new(44100);
        synth.wave_pair(2.5, 2.5, &mut counter).unwrap();
        // 3 samples of the first lobe from phase 0, then 2 from phase 0.5
        assert_eq!(5, counter.count());
        assert_eq!(0.0, synth.phase());
        synth.single_pulse(2.25, &mut counter).unwrap();
        assert_eq!(8, counter.count());
        assert_eq!(0.75, synth.phase());
        synth.single_pulse(2.25, &mut counter).unwrap();
        assert_eq!(10, counter.count());
        assert_eq!(0.5, synth.phase());
    }

    #[test]
    fn data_bits_works() {
        let data = [0b1010_0000u8, 0b0110_0000];
        let one = render(44100, |synth, buf| synth.wave_pair(2.0, 2.0, buf));
        let zero = render(44100, |synth, buf| synth.wave_pair(1.0, 1.0, buf));
        let samples = render(44100, |synth, buf| synth.data_bits(1.0, 2.0, &data, 0, 2, 3, buf));
        let expected: Vec<u8> = [true, false, true, false, false, false, false, false,
                                 false, true, true]
            .iter()
            .flat_map(|&bit| if bit { one.clone() } else { zero.clone() })
            .collect();
        assert_eq!(expected, samples);
        assert!(render(44100, |synth, buf| synth.data_bits(1.0, 2.0, &data, 1, 0, 8, buf))
                .is_empty());
        let mut synth = PulseSynth::new();
        let mut counter = SampleCounter::new(44100);
        assert!(synth.data_bits(1.0, 2.0, &data, 1, 2, 8, &mut counter).is_err());
    }

    #[test]
    fn pause_works() {
        // 2000 Hz * 1000 ms / 500000 = 4, so 3 decaying wave pairs follow
        let mut synth = PulseSynth::new();
        let mut counter = SampleCounter::new(2000);
        synth.pause(4.0, 1000, &mut counter).unwrap();
        assert_eq!(8 + 3 * 500, counter.count());
        assert_eq!(INITIAL_AMPLITUDE, synth.amplitude());

        let mut counter = SampleCounter::new(44100);
        synth.pause(22.0, 1000, &mut counter).unwrap();
        assert_eq!(44 + 88 * 500, counter.count());

        synth.single_pulse(4.0, &mut counter).unwrap();
        let mut counter = SampleCounter::new(2000);
        synth.pause(4.0, 1000, &mut counter).unwrap();
        assert_eq!(4 + 8 + 3 * 500, counter.count());
        assert_eq!(INITIAL_AMPLITUDE, synth.amplitude());

        synth.pause(4.0, 0, &mut counter).unwrap();
        assert_eq!(4 + 8 + 3 * 500, counter.count());
    }

    #[test]
    fn pause_amplitude_decays() {
        let samples = render(2000, |synth, buf| synth.pause(4.0, 1000, buf));
        let peak = |lobe: &[u8]| lobe.iter().map(|&s| (s as i32 - 0x80).abs()).max().unwrap();
        let peaks: Vec<i32> = samples[8..].chunks(250).map(peak).collect();
        assert_eq!(6, peaks.len());
        assert!(peaks[0] > 100);
        assert!(peaks.windows(4).step_by(2).all(|w| w[0] > w[2]));
    }

    #[test]
    fn end_tone_works() {
        let samples = render(8000, |synth, buf| synth.end_tone(buf));
        assert_eq!(24000, samples.len());
        assert_eq!(&[128, 86, 55, 34, 22, 17, 20, 29, 43, 61, 81, 104,
                     128, 152, 175, 195, 213, 227, 236, 239, 234, 222, 201, 170][..],
                   &samples[..24]);
        assert_eq!(&samples[..24], &samples[24000 - 24..]);
    }
}
