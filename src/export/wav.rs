//! WAV file export functionality

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::backend::AudioSink;
use crate::config::PsgConfig;
use crate::huc6280::Psg;
use crate::{PsgError, Result};

type Writer = hound::WavWriter<BufWriter<File>>;

fn sink_error(what: &str, e: hound::Error) -> PsgError {
    match e {
        hound::Error::IoError(io) => PsgError::Io(io),
        other => PsgError::AudioSinkError(format!("{what}: {other}")),
    }
}

/// 16-bit PCM WAV writer
///
/// The file is created on [`initialize`](AudioSink::initialize), using the
/// chip's sample rate and channel count, and finalized on
/// [`shutdown`](AudioSink::shutdown).
pub struct WavSink {
    path: PathBuf,
    writer: Option<Writer>,
    samples_written: u64,
}

impl WavSink {
    /// Sink that will write to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            writer: None,
            samples_written: 0,
        }
    }

    /// Destination path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Interleaved samples written so far
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }
}

impl std::fmt::Debug for WavSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WavSink")
            .field("path", &self.path)
            .field("open", &self.writer.is_some())
            .field("samples_written", &self.samples_written)
            .finish()
    }
}

impl AudioSink for WavSink {
    fn initialize(&mut self, config: &PsgConfig) -> Result<()> {
        let spec = hound::WavSpec {
            channels: config.channels() as u16,
            sample_rate: config.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(&self.path, spec)
            .map_err(|e| sink_error("failed to create WAV file", e))?;

        debug!(path = %self.path.display(), channels = spec.channels, "WAV sink opened");
        self.writer = Some(writer);
        self.samples_written = 0;
        Ok(())
    }

    fn submit(&mut self, samples: &[i16]) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| PsgError::AudioSinkError("WAV sink not initialized".into()))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| sink_error("failed to write sample", e))?;
        }
        self.samples_written += samples.len() as u64;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| sink_error("failed to finalize WAV file", e))?;
            info!(
                path = %self.path.display(),
                samples = self.samples_written,
                "WAV export complete"
            );
        }
        Ok(())
    }
}

/// Render `frames` frames from `psg` into a WAV file.
///
/// The chip is advanced in ticks of at most `max_samples_per_tick` frames,
/// starting from its current state.
///
/// # Examples
///
/// ```no_run
/// use huc6280_psg::{export_to_wav, Psg, PsgConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut psg = Psg::new(PsgConfig::stereo(44_100))?;
/// // ... program registers ...
/// export_to_wav(&mut psg, "output.wav", 44_100)?;
/// # Ok(())
/// # }
/// ```
pub fn export_to_wav<P: AsRef<Path>>(psg: &mut Psg, output_path: P, frames: usize) -> Result<()> {
    let config = *psg.config();
    let mut sink = WavSink::new(output_path);
    sink.initialize(&config)?;

    let tick = config.max_samples_per_tick;
    let mut buffer = vec![0i16; psg.buffer_len(tick)];
    let mut remaining = frames;
    while remaining > 0 {
        let n = remaining.min(tick);
        psg.render(&mut buffer, n)?;
        sink.submit(&buffer[..psg.buffer_len(n)])?;
        remaining -= n;
    }

    sink.shutdown()
}
