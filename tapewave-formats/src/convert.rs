/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! Tape image to audio conversion.
use core::convert::TryFrom;

use log::{debug, warn, trace};

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

use tapewave_core::audio::AudioSink;
use tapewave_core::machine::{
    BlockHead, MachineProfile, TapeTiming, ZxSpectrum48,
    HEAD_BLOCK_FLAG, DATA_BLOCK_FLAG
};
use tapewave_core::source::ByteSource;

use crate::block::{BlockInfo, BlockKind, DataBlockInfo, TapeInfo};
use crate::cursor::{checksum, ensure_len, read_byte};
use crate::error::{TapeError, TapeResult};
use crate::synth::PulseSynth;
use crate::tzx::{read_header, TzxId};

/// The pause rendered after the last *TZX* block in milliseconds.
pub const TZX_TAIL_PAUSE_MS: u16 = 1000;

/// Determines how pulse lengths are converted to sample widths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PulseWidthMode {
    /// Widths are rounded to the nearest whole number of samples.
    Rounded,
    /// Widths keep their fractional part, which is carried over between pulses by the synthesizer.
    Fractional,
}

impl Default for PulseWidthMode {
    fn default() -> Self {
        PulseWidthMode::Rounded
    }
}

impl PulseWidthMode {
    /// Converts the biased sample width as returned by [TapeTiming::pulse_samples].
    #[inline]
    pub fn apply(self, biased: f64) -> f64 {
        match self {
            PulseWidthMode::Rounded => biased.trunc(),
            PulseWidthMode::Fractional => biased
        }
    }
}

/// Pulse widths in samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseWidths {
    pub lead: f64,
    pub sync1: f64,
    pub sync2: f64,
    pub zero: f64,
    pub one: f64,
}

impl PulseWidths {
    /// Calculates pulse widths from the `timing` at the given `sample_rate`.
    pub fn new(timing: &TapeTiming, sample_rate: u32, mode: PulseWidthMode) -> Self {
        let width = |tstates| mode.apply(timing.pulse_samples(tstates, sample_rate));
        PulseWidths {
            lead: width(timing.lead_pulse),
            sync1: width(timing.sync_pulse1),
            sync2: width(timing.sync_pulse2),
            zero: width(timing.zero_pulse),
            one: width(timing.one_pulse),
        }
    }
}

/// Renders blocks of a single conversion.
///
/// Block decoders are implemented in the [tzx][crate::tzx] and [tap][crate::tap] modules.
pub(crate) struct Encoder<'a, M: ?Sized, S: ?Sized, A: ?Sized> {
    pub(crate) machine: &'a M,
    pub(crate) source: &'a S,
    pub(crate) sink: &'a mut A,
    pub(crate) synth: PulseSynth,
    pub(crate) widths: PulseWidths,
}

impl<'a, M, S, A> Encoder<'a, M, S, A>
    where M: MachineProfile + ?Sized,
          S: ByteSource + ?Sized,
          A: AudioSink + ?Sized
{
    pub(crate) fn new(machine: &'a M, source: &'a S, sink: &'a mut A, mode: PulseWidthMode) -> Self {
        let widths = PulseWidths::new(machine.timing(), sink.sample_rate(), mode);
        trace!("pulse widths: {:?}", widths);
        Encoder { machine, source, sink, synth: PulseSynth::new(), widths }
    }
    /// Decodes and renders the data block of the block at `offset`.
    ///
    /// The data `region` of `length` bytes starts with the flag and ends with the checksum byte.
    /// Nothing is rendered unless the whole region is available and the flag is valid.
    pub(crate) fn data_block(
            &mut self,
            offset: usize,
            region: usize,
            length: u16,
            pause_ms: u16
        ) -> TapeResult<DataBlockInfo>
    {
        if length == 0 {
            return Err(TapeError::EmptyBlock { offset })
        }
        let len = length as usize;
        ensure_len(self.source, offset, region, len)?;
        let flag = read_byte(self.source, region)?;
        let program_type = if len >= 2 { read_byte(self.source, region + 1)? } else { 0 };
        let last = read_byte(self.source, region + len - 1)?;
        let valid_checksum = checksum(self.source, region, len - 1)? == last;
        let name = if len >= 12 {
            let mut name = [0u8;10];
            for (index, byte) in (region + 2..).zip(name.iter_mut()) {
                *byte = read_byte(self.source, index)?;
            }
            Some(name)
        }
        else {
            None
        };
        let header_text = self.machine.header_text(&BlockHead { flag, program_type, length, name });
        let timing = self.machine.timing();
        let lead_count = match flag {
            HEAD_BLOCK_FLAG => timing.lead_pulses_head,
            DATA_BLOCK_FLAG => timing.lead_pulses_data,
            flag => return Err(TapeError::InvalidFlag { offset, flag })
        };
        if !valid_checksum {
            warn!("block at {}: bad checksum 0x{:02x}", offset, last);
        }
        let PulseWidths { lead, sync1, sync2, zero, one } = self.widths;
        self.synth.pilot_tone(lead, lead_count, self.sink)?;
        self.synth.wave_pair(sync1, sync2, self.sink)?;
        self.synth.data_bits(zero, one, self.source, region, len, 8, self.sink)?;
        self.synth.pause(one, pause_ms, self.sink)?;
        Ok(DataBlockInfo {
            pause_ms, length, flag, program_type,
            checksum: last,
            valid_checksum,
            header_text
        })
    }
    /// Renders the tail of the *TZX* stream.
    fn tzx_tail(&mut self) -> TapeResult<()> {
        trace!("tail pause and end tone");
        self.synth.pause(self.widths.one, TZX_TAIL_PAUSE_MS, self.sink)?;
        self.synth.end_tone(self.sink)
    }
    /// Renders the tail of the *TAP* stream.
    fn tap_tail(&mut self) -> TapeResult<()> {
        trace!("end tone");
        self.synth.end_tone(self.sink)
    }
}

/// Converts tape images to audio samples using the signal timings and header interpretation
/// of a [MachineProfile].
///
/// Each conversion starts with a fresh synthesizer state.
#[derive(Clone, Copy, Debug)]
pub struct TapeConverter<'m, M: ?Sized> {
    machine: &'m M,
    width_mode: PulseWidthMode,
}

impl<'m, M: MachineProfile + ?Sized> TapeConverter<'m, M> {
    pub fn new(machine: &'m M) -> Self {
        TapeConverter { machine, width_mode: PulseWidthMode::default() }
    }
    /// Sets the pulse width conversion mode.
    pub fn with_width_mode(mut self, width_mode: PulseWidthMode) -> Self {
        self.width_mode = width_mode;
        self
    }

    pub fn width_mode(&self) -> PulseWidthMode {
        self.width_mode
    }
    /// Converts the *TZX* image from the `source`, appending samples to the `sink`.
    ///
    /// The header is validated first. Then blocks are rendered in order of appearance,
    /// followed by a pause of [TZX_TAIL_PAUSE_MS] and the end tone.
    ///
    /// Any error aborts the conversion. Samples already appended to the `sink` are left there.
    pub fn convert_tzx<S, A>(&self, source: &S, sink: &mut A) -> TapeResult<TapeInfo>
        where S: ByteSource + ?Sized,
              A: AudioSink + ?Sized
    {
        let (version, mut offset) = read_header(source)?;
        debug!("TZX version: {}", version);
        let mut encoder = Encoder::new(self.machine, source, sink, self.width_mode);
        let mut blocks = Vec::new();
        while offset < source.len() {
            let id = read_byte(source, offset)?;
            let (kind, last) = match TzxId::try_from(id) {
                Ok(TzxId::StandardSpeed) => {
                    let (info, last) = encoder.standard_speed_block(offset)?;
                    (BlockKind::StandardSpeed(info), last)
                }
                Ok(TzxId::Text) => {
                    let (description, last) = encoder.text_block(offset)?;
                    (BlockKind::Text { description }, last)
                }
                _ => return Err(TapeError::UnsupportedBlock { offset, id })
            };
            let block = BlockInfo { offset, kind };
            debug!("{}", block);
            blocks.push(block);
            offset = last + 1;
        }
        encoder.tzx_tail()?;
        Ok(TapeInfo { version: Some(version), blocks })
    }
    /// Converts the *TAP* image from the `source`, appending samples to the `sink`.
    ///
    /// Chunks are rendered in order of appearance, each followed by a pause of
    /// [TAP_PAUSE_MS][crate::tap::TAP_PAUSE_MS], then the end tone.
    ///
    /// Any error aborts the conversion. Samples already appended to the `sink` are left there.
    pub fn convert_tap<S, A>(&self, source: &S, sink: &mut A) -> TapeResult<TapeInfo>
        where S: ByteSource + ?Sized,
              A: AudioSink + ?Sized
    {
        let mut encoder = Encoder::new(self.machine, source, sink, self.width_mode);
        let mut blocks = Vec::new();
        let mut offset = 0;
        while offset < source.len() {
            let (info, next) = encoder.tap_chunk(offset)?;
            let block = BlockInfo { offset, kind: BlockKind::Raw(info) };
            debug!("{}", block);
            blocks.push(block);
            offset = next;
        }
        encoder.tap_tail()?;
        Ok(TapeInfo { version: None, blocks })
    }
}

/// Converts the *TZX* image from the `source` using the [ZxSpectrum48] profile.
///
/// See [TapeConverter::convert_tzx].
pub fn convert_tzx<S, A>(source: &S, sink: &mut A) -> TapeResult<TapeInfo>
    where S: ByteSource + ?Sized,
          A: AudioSink + ?Sized
{
    TapeConverter::new(&ZxSpectrum48::default()).convert_tzx(source, sink)
}

/// Converts the *TAP* image from the `source` using the [ZxSpectrum48] profile.
///
/// See [TapeConverter::convert_tap].
pub fn convert_tap<S, A>(source: &S, sink: &mut A) -> TapeResult<TapeInfo>
    where S: ByteSource + ?Sized,
          A: AudioSink + ?Sized
{
    TapeConverter::new(&ZxSpectrum48::default()).convert_tap(source, sink)
}
