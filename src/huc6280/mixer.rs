//! PSG Output Mixer
//!
//! Per-channel balance scaling for wavetable and direct-audio voices, the
//! noise volume derivation, and the global-volume accumulation of all six
//! channels into the host buffer.
//!
//! Accumulation into the 16-bit host buffer wraps; nothing is clamped.

use super::constants::{
    BALANCE_DIVISOR, BALANCE_RATIO, NOISE_VOLUME_FLOOR, SAMPLE_MASK, VOLUME_TABLE,
};
use crate::config::SampleRepresentation;

/// Left/right balance of a channel, each in 0..=511
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    /// Left level
    pub left: i32,
    /// Right level
    pub right: i32,
}

impl Balance {
    /// Derive balance from the balance register and the voice volume.
    ///
    /// Each 4-bit nibble is stretched by 1.1 (0..16.5) and multiplied by the
    /// 5-bit voice volume, giving 0..511. Mono output averages both sides.
    pub fn from_registers(balance: u8, voice_volume: u8, stereo: bool) -> Self {
        let volume = f64::from(voice_volume & SAMPLE_MASK);
        let left = (f64::from(balance >> 4) * BALANCE_RATIO * volume) as i32;
        let right = (f64::from(balance & 0x0F) * BALANCE_RATIO * volume) as i32;

        if stereo {
            Self { left, right }
        } else {
            let mono = (left + right) / 2;
            Self {
                left: mono,
                right: mono,
            }
        }
    }

    /// Scale a centered sample (-16..=16) by a level (0..=511) into -127..=127.
    #[inline]
    pub fn scale(sample: i32, level: i32) -> i8 {
        (sample * level / BALANCE_DIVISOR) as i8
    }

    /// Write one output frame: one slot in mono, left then right in stereo.
    #[inline]
    pub fn write_frame(&self, sample: i32, frame: &mut [i8]) {
        frame[0] = Self::scale(sample, self.left);
        if let Some(right) = frame.get_mut(1) {
            *right = Self::scale(sample, self.right);
        }
    }
}

/// Larger of the two 5-bit derivations of a nibble pair.
#[inline]
fn nibble_level(value: u8) -> u8 {
    ((value >> 3) & 0x1E).max((value << 1) & 0x1E)
}

/// Table volume for a noise voice.
///
/// Combines global volume, voice volume and channel balance, drops the
/// bottom [`NOISE_VOLUME_FLOOR`] steps and looks the rest up in
/// [`VOLUME_TABLE`].
pub fn noise_volume(global_volume: u8, voice_volume: u8, balance: u8) -> i32 {
    let combined =
        nibble_level(global_volume) + (voice_volume & SAMPLE_MASK) + nibble_level(balance);
    VOLUME_TABLE[combined.saturating_sub(NOISE_VOLUME_FLOOR) as usize]
}

/// Scratch buffer and accumulation stage shared by all channels
#[derive(Debug, Clone)]
pub struct Mixer {
    scratch: Vec<i8>,
    representation: SampleRepresentation,
}

impl Mixer {
    /// Create a mixer with room for `slots` interleaved samples per channel.
    pub fn new(slots: usize, representation: SampleRepresentation) -> Self {
        Self {
            scratch: vec![0; slots],
            representation,
        }
    }

    /// Sample representation used when widening channel output.
    pub fn representation(&self) -> SampleRepresentation {
        self.representation
    }

    /// Scratch slice of `len` slots for the next channel render.
    #[inline]
    pub fn scratch_mut(&mut self, len: usize) -> &mut [i8] {
        if self.scratch.len() < len {
            self.scratch.resize(len, 0);
        }
        &mut self.scratch[..len]
    }

    /// Add the scratch contents to `out`, weighted by the global volume.
    ///
    /// Even slots take the left (high) nibble, odd slots the right (low)
    /// nibble. This pairing holds in mono too.
    pub fn accumulate(&self, out: &mut [i16], global_volume: u8) {
        let left = i16::from(global_volume >> 4);
        let right = i16::from(global_volume & 0x0F);

        for (slot, (dst, &src)) in out.iter_mut().zip(&self.scratch).enumerate() {
            let nibble = if slot % 2 == 0 { left } else { right };
            let weighted = self.representation.widen(src).wrapping_mul(nibble);
            *dst = dst.wrapping_add(weighted);
        }
    }
}
