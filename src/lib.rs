//! HuC6280 PSG Emulator
//!
//! An emulator of the six-channel Programmable Sound Generator built into
//! the HuC6280 CPU (PC Engine / TurboGrafx-16). Each channel plays a 32-entry
//! 5-bit wavetable, a stream of directly written samples (DDA), or, on
//! channels 4 and 5, LFSR noise. All six are mixed through per-channel
//! balance and a global volume into 16-bit host samples.
//!
//! # Features
//! - Wavetable tone with 12-bit period and 21-bit phase wrap
//! - Direct-audio playback from a 1024-sample queue per channel
//! - Noise on channels 4 and 5 with deterministic per-channel seeds
//! - Mono or interleaved stereo output at any host sample rate
//! - CPU-side port interface (channel select + banked registers)
//! - Thread-safe handle for split CPU/audio threads
//!
//! # Crate feature flags
//! - `export-wav` (default): WAV file sink and the `psg-render` binary (enables `hound`)
//!
//! # Quick start
//! ```no_run
//! use huc6280_psg::{Psg, PsgConfig, Register};
//! let mut psg = Psg::new(PsgConfig::stereo(44_100)).unwrap();
//! psg.set_global_volume(0xFF);
//! psg.write_register(0, Register::FreqLo, 0x80).unwrap();
//! psg.write_register(0, Register::Balance, 0xFF).unwrap();
//! psg.write_register(0, Register::Control, 0x9F).unwrap(); // key on, full volume
//! for i in 0..32 {
//!     psg.write_waveform(0, i, if i < 16 { 31 } else { 0 }).unwrap();
//! }
//! let mut buffer = vec![0i16; 2 * 735];
//! psg.render(&mut buffer, 735).unwrap();
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod channel_state;
pub mod config;
#[cfg(feature = "export-wav")]
pub mod export;
pub mod huc6280; // PSG emulation (core)
pub mod sync;
pub mod system;

/// Error types for PSG operations
#[derive(thiserror::Error, Debug)]
pub enum PsgError {
    /// Channel index outside 0..=5
    #[error("Invalid channel: {0}")]
    InvalidChannel(usize),

    /// Output buffer shorter than the tick needs
    #[error("Buffer too small: need {required} samples, got {actual}")]
    BufferTooSmall {
        /// Slots the tick writes
        required: usize,
        /// Slots the caller provided
        actual: usize,
    },

    /// Tick longer than the configured maximum
    #[error("Tick too large: {requested} samples requested, maximum is {max}")]
    TickTooLarge {
        /// Frames requested
        requested: usize,
        /// Configured limit
        max: usize,
    },

    /// Direct-audio queue has no free slot
    #[error("Direct-audio queue full on channel {channel}")]
    DirectAudioOverflow {
        /// Channel whose queue is full
        channel: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Audio sink failure
    #[error("Audio sink error: {0}")]
    AudioSinkError(String),

    /// IO error from filesystem or device
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for PsgError {
    /// Converts a String into `PsgError::Other`.
    ///
    /// Prefer the specific variants (`ConfigError`, `AudioSinkError`) when
    /// the failure has a known category.
    fn from(msg: String) -> Self {
        PsgError::Other(msg)
    }
}

impl From<&str> for PsgError {
    /// Converts a string slice into `PsgError::Other`.
    fn from(msg: &str) -> Self {
        PsgError::Other(msg.to_string())
    }
}

/// Result type for PSG operations
pub type Result<T> = std::result::Result<T, PsgError>;

// Public API exports
pub use backend::{AudioSink, MemorySink, NullSink};
pub use channel_state::{ChannelState, ChannelStates};
pub use config::{OutputMode, PsgConfig, SampleRepresentation};
#[cfg(feature = "export-wav")]
pub use export::{export_to_wav, WavSink};
pub use huc6280::{Psg, Register, Voice};
pub use sync::SharedPsg;
pub use system::SoundSystem;
