//! Audio sink abstraction
//!
//! The PSG only fills buffers; where those buffers go is up to the host.
//! [`AudioSink`] is the seam between [`crate::SoundSystem`] and whatever
//! consumes the audio: a sound device, a file, or a test buffer.

use crate::config::PsgConfig;
use crate::Result;

/// Consumer of rendered PSG audio
///
/// Lifecycle: [`initialize`](AudioSink::initialize) once with the chip
/// configuration, any number of [`submit`](AudioSink::submit) calls, then
/// [`shutdown`](AudioSink::shutdown).
///
/// # Example
///
/// ```
/// use huc6280_psg::{AudioSink, Result};
///
/// struct Peak(i16);
///
/// impl AudioSink for Peak {
///     fn submit(&mut self, samples: &[i16]) -> Result<()> {
///         self.0 = samples.iter().copied().fold(self.0, i16::max);
///         Ok(())
///     }
/// }
/// ```
pub trait AudioSink: Send {
    /// Prepare for audio in the given layout.
    ///
    /// Default implementation accepts any configuration.
    fn initialize(&mut self, _config: &PsgConfig) -> Result<()> {
        Ok(())
    }

    /// Consume one tick of interleaved samples.
    fn submit(&mut self, samples: &[i16]) -> Result<()>;

    /// Flush and release resources. Default implementation is a no-op.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn submit(&mut self, _samples: &[i16]) -> Result<()> {
        Ok(())
    }
}

/// Sink that keeps every submitted sample in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    samples: Vec<i16>,
    channels: usize,
    initialized: bool,
    shut_down: bool,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples submitted so far
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Take the collected samples, leaving the sink empty
    pub fn take_samples(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.samples)
    }

    /// Interleaved channel count from the last `initialize`
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Whether `initialize` has been called
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether `shutdown` has been called
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl AudioSink for MemorySink {
    fn initialize(&mut self, config: &PsgConfig) -> Result<()> {
        self.channels = config.channels();
        self.initialized = true;
        self.shut_down = false;
        Ok(())
    }

    fn submit(&mut self, samples: &[i16]) -> Result<()> {
        self.samples.extend_from_slice(samples);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.shut_down = true;
        Ok(())
    }
}
