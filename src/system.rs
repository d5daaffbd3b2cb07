//! Sound system lifecycle
//!
//! Couples a [`Psg`] with an [`AudioSink`]: `init` once, `update` every tick
//! with the number of frames the host wants, `shutdown` at the end.

use tracing::{debug, info};

use crate::backend::AudioSink;
use crate::config::PsgConfig;
use crate::huc6280::Psg;
use crate::Result;

/// PSG plus output sink, driven tick by tick
#[derive(Debug)]
pub struct SoundSystem<S: AudioSink> {
    psg: Psg,
    sink: S,
    buffer: Vec<i16>,
    frames_rendered: u64,
}

impl<S: AudioSink> SoundSystem<S> {
    /// Build the chip, reset it and initialize the sink.
    pub fn init(config: PsgConfig, mut sink: S) -> Result<Self> {
        let mut psg = Psg::new(config)?;
        psg.reset();
        sink.initialize(psg.config())?;

        info!(
            sample_rate = config.sample_rate,
            channels = config.channels(),
            "sound system initialized"
        );

        Ok(Self {
            buffer: vec![0; psg.buffer_len(config.max_samples_per_tick)],
            psg,
            sink,
            frames_rendered: 0,
        })
    }

    /// Render `samples` frames and hand them to the sink.
    pub fn update(&mut self, samples: usize) -> Result<()> {
        let len = self.psg.buffer_len(samples);
        if self.buffer.len() < len {
            self.buffer.resize(len, 0);
        }

        self.psg.render(&mut self.buffer, samples)?;
        self.sink.submit(&self.buffer[..len])?;
        self.frames_rendered += samples as u64;
        Ok(())
    }

    /// Shut the sink down and hand it back.
    pub fn shutdown(mut self) -> Result<S> {
        self.sink.shutdown()?;
        debug!(frames = self.frames_rendered, "sound system shut down");
        Ok(self.sink)
    }

    /// The chip, for register and waveform writes
    pub fn psg(&self) -> &Psg {
        &self.psg
    }

    /// Mutable access to the chip
    pub fn psg_mut(&mut self) -> &mut Psg {
        &mut self.psg
    }

    /// The output sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Frames rendered since `init`
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemorySink;
    use crate::huc6280::Register;
    use crate::PsgError;

    #[test]
    fn test_init_update_shutdown() {
        let mut system = SoundSystem::init(PsgConfig::stereo(44_100), MemorySink::new()).unwrap();
        assert!(system.sink().is_initialized());

        system.update(100).unwrap();
        system.update(50).unwrap();
        assert_eq!(system.frames_rendered(), 150);

        let sink = system.shutdown().unwrap();
        assert!(sink.is_shut_down());
        assert_eq!(sink.samples().len(), 300);
        assert!(sink.samples().iter().all(|&s| s == 0));
    }

    #[test]
    fn test_update_rejects_oversized_tick() {
        let config = PsgConfig::mono(44_100).with_max_samples_per_tick(10);
        let mut system = SoundSystem::init(config, MemorySink::new()).unwrap();
        assert!(matches!(
            system.update(11),
            Err(PsgError::TickTooLarge { .. })
        ));
        assert!(system.sink().samples().is_empty());
    }

    #[test]
    fn test_update_reflects_register_writes() {
        let mut system = SoundSystem::init(PsgConfig::mono(44_100), MemorySink::new()).unwrap();
        {
            let psg = system.psg_mut();
            psg.set_global_volume(0xFF);
            psg.write_register(0, Register::FreqLo, 0x51).unwrap();
            psg.write_register(0, Register::Balance, 0xFF).unwrap();
            psg.write_register(0, Register::Control, 0x9F).unwrap();
            psg.load_waveform(0, &[31; 32]).unwrap();
        }
        system.update(16).unwrap();
        let sink = system.shutdown().unwrap();
        // 127 * 15 on both nibbles
        assert!(sink.samples().iter().all(|&s| s == 1905));
    }
}
