//! Sound generators for the HuC6280 PSG
//!
//! This module contains the per-channel generator components:
//! - Phase accumulator (16.16 fixed point, explicit wrap width)
//! - Wavetable generator (32-entry table)
//! - Noise generator (channels 4 and 5)
//!
//! The direct-audio player lives in [`super::direct_audio`].

use super::constants::{
    DIRECT_PHASE_BITS, NOISE_BASE_STEP, NOISE_FEEDBACK, NOISE_LEVEL, NOISE_RATE_STEP, NOISE_SEED,
    NOISE_TAP_BIT, NOISE_VOLUME_DIVISOR, PHASE_FRAC_BITS, PSG_CLOCK_HZ, SAMPLE_MASK,
    WAVE_PHASE_BITS, WAVE_TABLE_LEN,
};
use super::mixer::Balance;
use super::registers::RegisterBank;

/// Center a 5-bit amplitude around zero.
///
/// `raw - 16` gives -16..=15; non-negative results are bumped by one so that
/// both halves of the wave reach the same magnitude (-16..=-1, 1..=16).
#[inline]
pub fn center_sample(raw: u8) -> i32 {
    let sample = (raw & SAMPLE_MASK) as i32 - 16;
    if sample >= 0 {
        sample + 1
    } else {
        sample
    }
}

/// Fixed-point phase accumulator with a fixed wrap width
///
/// The value always stays below `1 << width`; the bits above the 16
/// fractional bits select a table or queue slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseAccumulator {
    value: u32,
    mask: u32,
}

impl PhaseAccumulator {
    /// Create an accumulator wrapping at `width_bits` bits.
    pub const fn new(width_bits: u32) -> Self {
        Self {
            value: 0,
            mask: (1 << width_bits) - 1,
        }
    }

    /// 21-bit accumulator stepping through the 32-entry waveform.
    pub const fn wave() -> Self {
        Self::new(WAVE_PHASE_BITS)
    }

    /// 26-bit accumulator stepping through the 1024-slot direct-audio queue.
    pub const fn direct_audio() -> Self {
        Self::new(DIRECT_PHASE_BITS)
    }

    /// Per-sample increment for a period counted at the PSG clock.
    ///
    /// Computes `((PSG_CLOCK_HZ / sample_rate) << 16) / period` in 32-bit
    /// unsigned arithmetic. Returns `None` for a zero period (no periodic
    /// signal) or a zero sample rate.
    #[inline]
    pub fn increment(sample_rate: u32, period: u32) -> Option<u32> {
        if period == 0 || sample_rate == 0 {
            return None;
        }
        Some(((PSG_CLOCK_HZ / sample_rate) << PHASE_FRAC_BITS) / period)
    }

    /// Advance by `inc`, wrap, and return the new slot index.
    #[inline]
    pub fn advance(&mut self, inc: u32) -> usize {
        self.value = self.value.wrapping_add(inc) & self.mask;
        self.index()
    }

    /// Slot selected by the integer part of the phase.
    #[inline]
    pub fn index(&self) -> usize {
        (self.value >> PHASE_FRAC_BITS) as usize
    }

    /// Raw accumulator value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Wrap mask of this accumulator.
    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Return the phase to zero.
    pub fn reset(&mut self) {
        self.value = 0;
    }
}

/// Wavetable generator for a single channel
#[derive(Clone, Debug)]
pub struct WaveGenerator {
    phase: PhaseAccumulator,
}

impl WaveGenerator {
    /// Create a new wave generator
    pub fn new() -> Self {
        Self {
            phase: PhaseAccumulator::wave(),
        }
    }

    /// Render whole frames of `width` slots into `out`.
    ///
    /// Reads the table at the index register, then advances the phase and
    /// writes the new index back so the register follows playback.
    /// Returns the number of slots written.
    pub fn render(
        &mut self,
        table: &[u8; WAVE_TABLE_LEN],
        registers: &mut RegisterBank,
        inc: u32,
        balance: Balance,
        width: usize,
        out: &mut [i8],
    ) -> usize {
        let mut written = 0;
        for frame in out.chunks_exact_mut(width) {
            let sample = center_sample(table[registers.wave_index()]);
            balance.write_frame(sample, frame);

            let index = self.phase.advance(inc);
            registers.set_wave_index(index as u8);
            written += width;
        }
        written
    }

    /// Current phase accumulator
    pub fn phase(&self) -> &PhaseAccumulator {
        &self.phase
    }

    /// Reset to initial state
    pub fn reset(&mut self) {
        self.phase.reset();
    }
}

impl Default for WaveGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Noise generator for channels 4 and 5
///
/// A noise-clock accumulator gains `3000 + rate * 512` per output sample;
/// each time it covers a whole sample period the shift register steps once
/// and the output flips to the level selected by bit 19.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoiseGenerator {
    lfsr: u32,
    ticks: u32,
    level: i32,
}

impl NoiseGenerator {
    /// Create the generator for `channel` with its power-on seed.
    pub fn new(channel: usize) -> Self {
        Self {
            lfsr: NOISE_SEED << channel,
            ticks: 0,
            level: channel as i32,
        }
    }

    /// Step the shift register once.
    #[inline]
    pub fn step(&mut self) {
        if self.lfsr & NOISE_TAP_BIT != 0 {
            self.lfsr = ((self.lfsr ^ NOISE_FEEDBACK) << 1) | 1;
            self.level = -NOISE_LEVEL;
        } else {
            self.lfsr <<= 1;
            self.level = NOISE_LEVEL;
        }
    }

    /// Advance the noise clock by one output sample and return the level.
    #[inline]
    pub fn clock(&mut self, rate: u8, sample_rate: u32) -> i32 {
        self.ticks = self
            .ticks
            .wrapping_add(NOISE_BASE_STEP + u32::from(rate & SAMPLE_MASK) * NOISE_RATE_STEP);

        let elapsed = self.ticks / sample_rate;
        if elapsed >= 1 {
            self.step();
            self.ticks -= sample_rate * elapsed;
        }
        self.level
    }

    /// Fill every slot of `out` with scaled noise.
    ///
    /// Noise ignores balance and advances once per slot, so the two slots of
    /// a stereo frame carry successive noise samples.
    pub fn render(&mut self, rate: u8, sample_rate: u32, volume: i32, out: &mut [i8]) -> usize {
        for slot in out.iter_mut() {
            let level = self.clock(rate, sample_rate);
            *slot = (level * volume / NOISE_VOLUME_DIVISOR) as i8;
        }
        out.len()
    }

    /// Shift register state
    pub fn lfsr(&self) -> u32 {
        self.lfsr
    }

    /// Last emitted level
    pub fn level(&self) -> i32 {
        self.level
    }

    /// Reset to the power-on seed for `channel`.
    pub fn reset(&mut self, channel: usize) {
        *self = Self::new(channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huc6280::constants::{DIRECT_PHASE_MASK, WAVE_PHASE_MASK};

    #[test]
    fn test_center_sample_symmetry() {
        assert_eq!(center_sample(0), -16);
        assert_eq!(center_sample(15), -1);
        assert_eq!(center_sample(16), 1);
        assert_eq!(center_sample(31), 16);
        // Upper bits are ignored
        assert_eq!(center_sample(0xF0), 1);
    }

    #[test]
    fn test_increment() {
        // 3_579_545 / 44_100 = 81
        assert_eq!(PhaseAccumulator::increment(44_100, 1), Some(81 << 16));
        assert_eq!(PhaseAccumulator::increment(44_100, 81), Some(1 << 16));
        assert_eq!(PhaseAccumulator::increment(44_100, 0), None);
    }

    #[test]
    fn test_wave_phase_wraps_at_21_bits() {
        let mut phase = PhaseAccumulator::wave();
        assert_eq!(phase.mask(), WAVE_PHASE_MASK);

        // 31 whole steps reach the last slot, the 32nd wraps to exactly zero
        for expected in 1..32 {
            assert_eq!(phase.advance(1 << 16), expected);
        }
        assert_eq!(phase.advance(1 << 16), 0);
        assert_eq!(phase.value(), 0);

        // Fractional leftovers survive the wrap, nothing leaks above bit 20
        phase.advance(WAVE_PHASE_MASK);
        phase.advance(3);
        assert_eq!(phase.value(), 2);
    }

    #[test]
    fn test_direct_phase_wraps_at_26_bits() {
        let mut phase = PhaseAccumulator::direct_audio();
        phase.advance(DIRECT_PHASE_MASK);
        assert_eq!(phase.index(), 1023);
        phase.advance(1);
        assert_eq!(phase.value(), 0);
    }

    #[test]
    fn test_advance_with_large_increment_stays_masked() {
        let mut phase = PhaseAccumulator::wave();
        for _ in 0..1000 {
            phase.advance(u32::MAX - 7);
            assert!(phase.value() <= WAVE_PHASE_MASK);
        }
    }

    #[test]
    fn test_noise_seeds_per_channel() {
        assert_eq!(NoiseGenerator::new(0).lfsr(), NOISE_SEED);
        assert_eq!(NoiseGenerator::new(5).lfsr(), NOISE_SEED << 5);
        assert_eq!(NoiseGenerator::new(4).level(), 4);
    }

    #[test]
    fn test_noise_step_feedback() {
        let mut noise = NoiseGenerator::new(0);
        noise.lfsr = NOISE_TAP_BIT;
        noise.step();
        assert_eq!(noise.lfsr(), ((NOISE_TAP_BIT ^ NOISE_FEEDBACK) << 1) | 1);
        assert_eq!(noise.level(), -NOISE_LEVEL);

        noise.lfsr = 1;
        noise.step();
        assert_eq!(noise.lfsr(), 2);
        assert_eq!(noise.level(), NOISE_LEVEL);
    }

    #[test]
    fn test_noise_clock_rate_zero() {
        // 3000 per sample at 44.1 kHz steps on samples 15, 30, 45, 59, ...
        let mut noise = NoiseGenerator::new(5);
        let mut steps = Vec::new();
        let mut previous = noise.lfsr();
        for sample in 1..=60 {
            noise.clock(0, 44_100);
            if noise.lfsr() != previous {
                steps.push(sample);
                previous = noise.lfsr();
            }
        }
        assert_eq!(steps, vec![15, 30, 45, 59]);
    }

    #[test]
    fn test_wave_render_moves_index_register() {
        let mut wave = WaveGenerator::new();
        let mut registers = RegisterBank::new();
        let mut table = [16u8; WAVE_TABLE_LEN];
        table[1] = 31;
        let balance = Balance { left: 64, right: 64 };

        let mut out = [0i8; 4];
        let written = wave.render(&table, &mut registers, 1 << 16, balance, 1, &mut out);

        assert_eq!(written, 4);
        assert_eq!(out, [1, 16, 1, 1]);
        assert_eq!(registers.wave_index(), 4);
    }
}
