/*
    Copyright (C) 2020-2023  Rafal Michalski

    This file is part of TAPEWAVE, a Rust library for rendering tape images as audio.

    For the full copyright notice, see the lib.rs file.
*/
//! Machine specific *TAPE* signal timings and header interpretation.
use core::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

pub mod consts {
    use core::num::NonZeroU32;
    /// The ZX Spectrum 48k CPU clock frequency in Hz.
    pub const CPU_HZ: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(3_500_000) };
    /// Length of the lead pulse in T-states.
    pub const LEAD_PULSE_LENGTH : NonZeroU32 = unsafe { NonZeroU32::new_unchecked(2168) };
    /// Length of the 1st sync pulse in T-states.
    pub const SYNC_PULSE1_LENGTH: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(667)  };
    /// Length of the 2nd sync pulse in T-states.
    pub const SYNC_PULSE2_LENGTH: NonZeroU32 = unsafe { NonZeroU32::new_unchecked(735)  };
    /// Length of the bit value 0 pulse in T-states.
    pub const ZERO_PULSE_LENGTH : NonZeroU32 = unsafe { NonZeroU32::new_unchecked(855)  };
    /// Length of the bit value 1 pulse in T-states.
    pub const ONE_PULSE_LENGTH  : NonZeroU32 = unsafe { NonZeroU32::new_unchecked(1710) };

    /// The number of LEAD pulses for the header block.
    pub const LEAD_PULSES_HEAD: u16 = 8064;
    /// The number of LEAD pulses for the data block.
    pub const LEAD_PULSES_DATA: u16 = 3220;
}

use consts::*;

/// The flag byte of the header blocks.
pub const HEAD_BLOCK_FLAG: u8 = 0x00;
/// The flag byte of the data blocks.
pub const DATA_BLOCK_FLAG: u8 = 0xFF;
/// The header text of blocks which are not headers.
pub const NO_HEADER: &str = "No header";

/// The *TAPE* signal timings of a machine.
///
/// Pulse lengths are expressed in T-states (CPU clock cycles) of a machine running at `clock_hz`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TapeTiming {
    /// The CPU clock frequency in Hz.
    pub clock_hz: NonZeroU32,
    /// Length of the lead (pilot) pulse.
    pub lead_pulse: NonZeroU32,
    /// Length of the 1st sync pulse.
    pub sync_pulse1: NonZeroU32,
    /// Length of the 2nd sync pulse.
    pub sync_pulse2: NonZeroU32,
    /// Length of the bit value 0 pulse.
    pub zero_pulse: NonZeroU32,
    /// Length of the bit value 1 pulse.
    pub one_pulse: NonZeroU32,
    /// The number of lead pulses preceding header blocks.
    pub lead_pulses_head: u16,
    /// The number of lead pulses preceding data blocks.
    pub lead_pulses_data: u16,
}

/// The leading fields of a data block used to derive the block's header text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHead {
    /// The block flag byte.
    pub flag: u8,
    /// The byte following the flag. In header blocks it's the type of the file.
    pub program_type: u8,
    /// The length of the whole block including the flag and the checksum byte.
    pub length: u16,
    /// Ten bytes following the program type, if the block is long enough.
    pub name: Option<[u8;10]>,
}

/// A machine whose tapes are being rendered.
///
/// Provides the signal timings and the way headers are interpreted.
pub trait MachineProfile {
    /// Returns the signal timings.
    fn timing(&self) -> &TapeTiming;
    /// Returns a human readable header description of the data block.
    fn header_text(&self, head: &BlockHead) -> String;
}

/// The ZX Spectrum 48k with the standard ROM loading routines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZxSpectrum48 {
    timing: TapeTiming
}

impl TapeTiming {
    /// Timings of the ZX Spectrum ROM tape routines.
    pub const ZX_SPECTRUM_48: TapeTiming = TapeTiming {
        clock_hz: CPU_HZ,
        lead_pulse: LEAD_PULSE_LENGTH,
        sync_pulse1: SYNC_PULSE1_LENGTH,
        sync_pulse2: SYNC_PULSE2_LENGTH,
        zero_pulse: ZERO_PULSE_LENGTH,
        one_pulse: ONE_PULSE_LENGTH,
        lead_pulses_head: LEAD_PULSES_HEAD,
        lead_pulses_data: LEAD_PULSES_DATA,
    };

    /// Returns the length of a pulse of `tstates` duration in samples at the given `sample_rate`,
    /// biased by half a sample, so truncating the result rounds it to the nearest sample.
    #[inline]
    pub fn pulse_samples(&self, tstates: NonZeroU32, sample_rate: u32) -> f64 {
        0.5 + (sample_rate as f64 / self.clock_hz.get() as f64) * tstates.get() as f64
    }
}

impl Default for TapeTiming {
    fn default() -> Self {
        TapeTiming::ZX_SPECTRUM_48
    }
}

impl BlockHead {
    /// Returns the name bytes decoded as characters, one per byte.
    pub fn name_str(&self) -> Option<String> {
        self.name.map(|name| name.iter().copied().map(char::from).collect())
    }
}

impl ZxSpectrum48 {
    /// Creates the machine with custom signal timings.
    pub fn with_timing(timing: TapeTiming) -> Self {
        ZxSpectrum48 { timing }
    }
}

impl MachineProfile for ZxSpectrum48 {
    #[inline]
    fn timing(&self) -> &TapeTiming {
        &self.timing
    }
    /// Returns the trimmed file name of the standard ROM header block or [NO_HEADER].
    fn header_text(&self, head: &BlockHead) -> String {
        match head {
            BlockHead { flag: HEAD_BLOCK_FLAG, length: 19|20, program_type: 0..=3, .. } => {
                head.name_str().map(|name| name.trim().to_string())
            }
            _ => None
        }.unwrap_or_else(|| NO_HEADER.to_string())
    }
}
