//! PSG channel: register bank, waveform, generators and voice selection
//!
//! At any sample exactly one generator drives a channel. The precedence is
//! made explicit by [`Channel::select_voice`]:
//!
//! 1. key off: silent, wave phase rewound
//! 2. direct audio, when direct access is set or samples are pending
//! 3. noise, on channels 4 and 5 with noise enabled
//! 4. wavetable tone, when the period is non-zero
//! 5. silence
//!
//! Direct audio that was only triggered by pending samples hands the rest of
//! the tick to the next voice in line once its queue drains.

use serde::Serialize;

use super::constants::{FIRST_NOISE_CHANNEL, SAMPLE_MASK, WAVE_TABLE_LEN};
use super::direct_audio::DirectAudioPlayer;
use super::generators::{NoiseGenerator, PhaseAccumulator, WaveGenerator};
use super::mixer::{noise_volume, Balance};
use super::registers::{ControlFlags, NoiseFlags, RegisterBank};

/// Generator selected for a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Voice {
    /// Key-on bit clear
    Off,
    /// Direct-audio playback; `hold` keeps the voice (padding silence) after the queue drains
    DirectAudio {
        /// Direct access flag set in the control register
        hold: bool,
    },
    /// LFSR noise at the given 5-bit rate
    Noise {
        /// Noise rate register value
        rate: u8,
    },
    /// Wavetable tone at the given 12-bit period
    Tone {
        /// Frequency period register value
        period: u16,
    },
    /// Keyed on but nothing to play
    Silent,
}

/// Per-tick values every channel needs from the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    /// Host sample rate in Hz
    pub sample_rate: u32,
    /// Stereo frames (two slots) instead of mono
    pub stereo: bool,
    /// Global volume register
    pub global_volume: u8,
}

impl RenderContext {
    /// Slots per frame
    #[inline]
    pub fn width(&self) -> usize {
        if self.stereo {
            2
        } else {
            1
        }
    }
}

/// One of the six PSG voices
#[derive(Clone, Debug)]
pub struct Channel {
    index: usize,
    registers: RegisterBank,
    waveform: [u8; WAVE_TABLE_LEN],
    wave: WaveGenerator,
    direct: DirectAudioPlayer,
    noise: NoiseGenerator,
}

impl Channel {
    /// Create channel `index` in its power-on state
    pub fn new(index: usize) -> Self {
        Self {
            index,
            registers: RegisterBank::new(),
            waveform: [0; WAVE_TABLE_LEN],
            wave: WaveGenerator::new(),
            direct: DirectAudioPlayer::new(),
            noise: NoiseGenerator::new(index),
        }
    }

    /// Return registers, waveform, queue, phases and noise seed to power-on values
    pub fn reset(&mut self) {
        *self = Self::new(self.index);
    }

    /// Channel number (0-5)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this channel can switch to noise
    #[inline]
    pub fn supports_noise(&self) -> bool {
        self.index >= FIRST_NOISE_CHANNEL
    }

    /// Register bank
    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    /// Mutable register bank
    pub fn registers_mut(&mut self) -> &mut RegisterBank {
        &mut self.registers
    }

    /// Waveform table
    pub fn waveform(&self) -> &[u8; WAVE_TABLE_LEN] {
        &self.waveform
    }

    /// Store a 5-bit sample in the waveform table (index wraps at 32)
    pub fn write_waveform(&mut self, index: usize, value: u8) {
        self.waveform[index % WAVE_TABLE_LEN] = value & SAMPLE_MASK;
    }

    /// Wave generator state
    pub fn wave(&self) -> &WaveGenerator {
        &self.wave
    }

    /// Direct-audio player
    pub fn direct(&self) -> &DirectAudioPlayer {
        &self.direct
    }

    /// Mutable direct-audio player
    pub fn direct_mut(&mut self) -> &mut DirectAudioPlayer {
        &mut self.direct
    }

    /// Noise generator state
    pub fn noise(&self) -> &NoiseGenerator {
        &self.noise
    }

    /// Decide which generator drives this channel right now.
    pub fn select_voice(&self) -> Voice {
        let control = self.registers.control();
        if !control.contains(ControlFlags::KEY_ON) {
            return Voice::Off;
        }

        let hold = control.contains(ControlFlags::DIRECT_ACCESS);
        if hold || !self.direct.queue().is_empty() {
            return Voice::DirectAudio { hold };
        }

        self.select_periodic_voice()
    }

    fn select_periodic_voice(&self) -> Voice {
        if self.supports_noise() && self.registers.noise().contains(NoiseFlags::ENABLE) {
            return Voice::Noise {
                rate: self.registers.noise_rate(),
            };
        }

        match self.registers.period() {
            0 => Voice::Silent,
            period => Voice::Tone { period },
        }
    }

    /// Render one tick of this channel into `out`.
    ///
    /// `out` holds every slot of the tick (`frames * ctx.width()`); whatever
    /// the active voice leaves unwritten is padded with silence.
    pub fn render(&mut self, ctx: &RenderContext, out: &mut [i8]) {
        let mut voice = self.select_voice();
        if voice == Voice::Off {
            self.wave.reset();
            out.fill(0);
            return;
        }

        let width = ctx.width();
        let balance = Balance::from_registers(
            self.registers.balance(),
            self.registers.voice_volume(),
            ctx.stereo,
        );

        let mut written = 0;
        if let Voice::DirectAudio { hold } = voice {
            if let Some(inc) = DirectAudioPlayer::increment(ctx.sample_rate) {
                written = self.direct.render(inc, balance, width, out);
            }
            if hold {
                out[written..].fill(0);
                return;
            }
            voice = self.select_periodic_voice();
        }

        let rest = &mut out[written..];
        written += match voice {
            Voice::Noise { rate } => {
                let volume = noise_volume(
                    ctx.global_volume,
                    self.registers.voice_volume(),
                    self.registers.balance(),
                );
                self.noise.render(rate, ctx.sample_rate, volume, rest)
            }
            Voice::Tone { period } => {
                match PhaseAccumulator::increment(ctx.sample_rate, u32::from(period)) {
                    Some(inc) => self.wave.render(
                        &self.waveform,
                        &mut self.registers,
                        inc,
                        balance,
                        width,
                        rest,
                    ),
                    None => 0,
                }
            }
            _ => 0,
        };

        out[written..].fill(0);
    }
}
