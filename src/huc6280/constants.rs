//! HuC6280 PSG Hardware Constants
//!
//! Clock, fixed-point widths, noise parameters and the logarithmic volume
//! table shared across the PSG components.

/// Number of PSG voices.
pub const CHANNEL_COUNT: usize = 6;

/// First channel able to switch to noise output (channels 4 and 5 only).
pub const FIRST_NOISE_CHANNEL: usize = 4;

/// Entries in a channel waveform table.
pub const WAVE_TABLE_LEN: usize = 32;

/// Mask applied to every 5-bit amplitude sample.
pub const SAMPLE_MASK: u8 = 0x1F;

/// Rate at which the chip decrements its 12-bit frequency counters (3.58 MHz).
pub const PSG_CLOCK_HZ: u32 = 3_579_545;

/// Fractional bits of every phase accumulator (16.16 fixed point).
pub const PHASE_FRAC_BITS: u32 = 16;

/// Width of the wave phase accumulator: 5 index bits over 16 fractional bits.
pub const WAVE_PHASE_BITS: u32 = 21;

/// `(31 << 16) | 0xFFFF`
pub const WAVE_PHASE_MASK: u32 = (1 << WAVE_PHASE_BITS) - 1;

/// Width of the direct-audio phase accumulator: 10 index bits over 16 fractional bits.
pub const DIRECT_PHASE_BITS: u32 = 26;

/// `(1023 << 16) | 0xFFFF`
pub const DIRECT_PHASE_MASK: u32 = (1 << DIRECT_PHASE_BITS) - 1;

/// Slots in a direct-audio queue, one per value the direct phase index can take.
pub const DIRECT_QUEUE_LEN: usize = 1 << (DIRECT_PHASE_BITS - PHASE_FRAC_BITS);

/// Period divisor used for direct audio.
///
/// Direct playback has no frequency register; this fixes it near 7 kHz.
pub const DIRECT_AUDIO_PERIOD: u32 = 0x1FF;

/// Magnitude of the bipolar noise output before volume scaling.
pub const NOISE_LEVEL: i32 = 10 * 702;

/// Noise-clock units added per output sample regardless of rate.
pub const NOISE_BASE_STEP: u32 = 3000;

/// Noise-clock units added per output sample for each step of the 5-bit rate.
pub const NOISE_RATE_STEP: u32 = 512;

/// LFSR bit tested on every noise step.
pub const NOISE_TAP_BIT: u32 = 1 << 19;

/// Feedback pattern XORed into the LFSR when the tap bit is set.
pub const NOISE_FEEDBACK: u32 = 0x0004;

/// Base LFSR seed; channel `n` starts from `NOISE_SEED << n`.
pub const NOISE_SEED: u32 = 0x051F_6310;

/// Combined noise volume below which the output is at the table floor.
pub const NOISE_VOLUME_FLOOR: u8 = 60;

/// Divisor applied after multiplying a noise level by its table volume.
pub const NOISE_VOLUME_DIVISOR: i32 = 4096;

/// Factor stretching a 4-bit balance nibble to roughly 0..16.5.
pub const BALANCE_RATIO: f64 = 1.1;

/// Divisor bringing `sample * balance` into 8-bit range.
pub const BALANCE_DIVISOR: i32 = 64;

/// Default host sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default upper bound on samples rendered per tick (one 60 Hz frame at 48 kHz).
pub const DEFAULT_MAX_SAMPLES_PER_TICK: usize = 48_000 / 60;

/// Geometric volume curve, roughly 1 dB per step, in 1/256 units.
const VOLUME_CURVE: [u16; 32] = [
    100, 451, 508, 573, 646, 728, 821, 925, 1043, 1175, 1325, 1493, 1683, 1898, 2139, 2411, 2718,
    3064, 3454, 3893, 4388, 4947, 5576, 6285, 7085, 7986, 9002, 10148, 11439, 12894, 14535, 16384,
];

const fn build_volume_table() -> [i32; 32] {
    let mut table = [0i32; 32];
    let mut i = 0;
    while i < table.len() {
        table[i] = (VOLUME_CURVE[i] >> 8) as i32;
        i += 1;
    }
    table
}

/// Noise volume table: [`VOLUME_CURVE`] truncated to whole units.
pub const VOLUME_TABLE: [i32; 32] = build_volume_table();
