//! Channel state snapshot for debuggers and visualizers.
//!
//! # Example
//!
//! ```
//! use huc6280_psg::{ChannelStates, Psg, PsgConfig};
//!
//! let psg = Psg::new(PsgConfig::default()).unwrap();
//! let states = ChannelStates::capture(&psg);
//!
//! for ch in &states.channels {
//!     println!("Channel {}: {:?} {:?}Hz", ch.index, ch.voice, ch.frequency_hz);
//! }
//! ```

use serde::Serialize;

use crate::huc6280::constants::{PSG_CLOCK_HZ, WAVE_TABLE_LEN};
use crate::huc6280::{Channel, Psg, Voice};

/// State of a single PSG channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelState {
    /// Channel number (0-5)
    pub index: usize,
    /// Generator driving the channel
    pub voice: Voice,
    /// Frequency period (12-bit)
    pub period: u16,
    /// Tone frequency in Hz, `None` if the period is 0.
    pub frequency_hz: Option<f32>,
    /// Voice volume (0-31)
    pub volume: u8,
    /// Left balance nibble (0-15)
    pub balance_left: u8,
    /// Right balance nibble (0-15)
    pub balance_right: u8,
    /// Waveform index register
    pub wave_index: usize,
    /// Direct-audio samples waiting to be played
    pub pending_direct: u32,
}

impl ChannelState {
    fn from_channel(channel: &Channel) -> Self {
        let registers = channel.registers();
        let period = registers.period();
        let balance = registers.balance();

        Self {
            index: channel.index(),
            voice: channel.select_voice(),
            period,
            frequency_hz: tone_frequency(period),
            volume: registers.voice_volume(),
            balance_left: balance >> 4,
            balance_right: balance & 0x0F,
            wave_index: registers.wave_index(),
            pending_direct: channel.direct().queue().pending(),
        }
    }
}

/// Frequency of a full 32-step waveform cycle at `period`.
pub fn tone_frequency(period: u16) -> Option<f32> {
    (period > 0).then(|| PSG_CLOCK_HZ as f32 / (WAVE_TABLE_LEN as f32 * f32::from(period)))
}

/// Snapshot of the whole chip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStates {
    /// Global volume, left nibble
    pub global_left: u8,
    /// Global volume, right nibble
    pub global_right: u8,
    /// Selected channel register
    pub selected: u8,
    /// Per-channel state
    pub channels: Vec<ChannelState>,
}

impl ChannelStates {
    /// Capture the current state of every channel.
    pub fn capture(psg: &Psg) -> Self {
        let global = psg.global_volume();
        Self {
            global_left: global >> 4,
            global_right: global & 0x0F,
            selected: psg.selected_channel(),
            channels: psg.channels().iter().map(ChannelState::from_channel).collect(),
        }
    }

    /// Channels currently producing output
    pub fn active(&self) -> impl Iterator<Item = &ChannelState> {
        self.channels
            .iter()
            .filter(|ch| !matches!(ch.voice, Voice::Off | Voice::Silent))
    }
}
