//! PSG output configuration
//!
//! Host sample rate, mono/stereo layout, how 8-bit channel output is widened
//! before mixing, and the largest tick the chip accepts. Configurations can
//! be built in code or loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::huc6280::constants::{DEFAULT_MAX_SAMPLES_PER_TICK, DEFAULT_SAMPLE_RATE};
use crate::{PsgError, Result};

/// Output channel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// One slot per frame, left and right balance averaged
    Mono,
    /// Two interleaved slots per frame (left, right)
    Stereo,
}

impl OutputMode {
    /// Slots per output frame
    #[inline]
    pub fn channels(self) -> usize {
        match self {
            OutputMode::Mono => 1,
            OutputMode::Stereo => 2,
        }
    }

    /// Whether frames carry separate left and right slots
    #[inline]
    pub fn is_stereo(self) -> bool {
        self == OutputMode::Stereo
    }
}

/// How an 8-bit channel sample is widened before global volume is applied
///
/// `UnsignedBiased` reads the channel byte as unsigned, so a sample of `-1`
/// contributes `255 * volume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleRepresentation {
    /// Reinterpret the signed byte as unsigned (0..=255)
    #[default]
    UnsignedBiased,
    /// Sign-extend the byte (-128..=127)
    Signed,
}

impl SampleRepresentation {
    /// Widen one channel sample.
    #[inline]
    pub fn widen(self, sample: i8) -> i16 {
        match self {
            SampleRepresentation::UnsignedBiased => i16::from(sample as u8),
            SampleRepresentation::Signed => i16::from(sample),
        }
    }
}

/// PSG configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsgConfig {
    /// Host sample rate in Hz
    pub sample_rate: u32,
    /// Mono or stereo output
    pub output: OutputMode,
    /// Channel sample widening
    pub representation: SampleRepresentation,
    /// Largest number of frames a single tick may request
    pub max_samples_per_tick: usize,
}

impl PsgConfig {
    /// Mono output at `sample_rate`
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            output: OutputMode::Mono,
            ..Self::default()
        }
    }

    /// Stereo output at `sample_rate`
    pub fn stereo(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            output: OutputMode::Stereo,
            ..Self::default()
        }
    }

    /// Replace the sample representation
    pub fn with_representation(mut self, representation: SampleRepresentation) -> Self {
        self.representation = representation;
        self
    }

    /// Replace the per-tick frame limit
    pub fn with_max_samples_per_tick(mut self, max_samples: usize) -> Self {
        self.max_samples_per_tick = max_samples;
        self
    }

    /// Slots per output frame
    #[inline]
    pub fn channels(&self) -> usize {
        self.output.channels()
    }

    /// Whether output is stereo
    #[inline]
    pub fn is_stereo(&self) -> bool {
        self.output.is_stereo()
    }

    /// Check the configuration before a chip is built from it.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(PsgError::ConfigError("sample rate must be non-zero".into()));
        }
        if self.max_samples_per_tick == 0 {
            return Err(PsgError::ConfigError(
                "max samples per tick must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PsgConfig = serde_json::from_str(json)
            .map_err(|e| PsgError::ConfigError(format!("invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for PsgConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            output: OutputMode::Stereo,
            representation: SampleRepresentation::UnsignedBiased,
            max_samples_per_tick: DEFAULT_MAX_SAMPLES_PER_TICK,
        }
    }
}
