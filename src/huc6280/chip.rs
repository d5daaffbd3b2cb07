//! HuC6280 PSG chip state
//!
//! Owns the six channels, the global volume and the configuration. The CPU
//! side writes through [`Psg::write_port`] (the chip's I/O window) or the
//! channel-addressed helpers; the audio side calls [`Psg::render`] once per
//! tick. Nothing here locks: callers that split those two paths across
//! threads serialize them, e.g. with [`crate::SharedPsg`].

use tracing::{debug, trace, warn};

use super::channel::{Channel, RenderContext, Voice};
use super::constants::{CHANNEL_COUNT, WAVE_TABLE_LEN};
use super::mixer::Mixer;
use super::registers::{ControlFlags, Register};
use crate::config::PsgConfig;
use crate::{PsgError, Result};

/// Six-channel PSG
#[derive(Clone)]
pub struct Psg {
    config: PsgConfig,
    global_volume: u8,
    selected: u8,
    channels: [Channel; CHANNEL_COUNT],
    mixer: Mixer,
}

impl Psg {
    /// Create a chip in its power-on state.
    ///
    /// Fails only if the configuration does not validate.
    pub fn new(config: PsgConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            sample_rate = config.sample_rate,
            stereo = config.is_stereo(),
            representation = ?config.representation,
            "creating PSG"
        );

        Ok(Self {
            config,
            global_volume: 0,
            selected: 0,
            channels: std::array::from_fn(Channel::new),
            mixer: Mixer::new(
                config.max_samples_per_tick * config.channels(),
                config.representation,
            ),
        })
    }

    /// Reset registers, waveforms, queues, phases and noise seeds.
    pub fn reset(&mut self) {
        self.global_volume = 0;
        self.selected = 0;
        for channel in &mut self.channels {
            channel.reset();
        }
        debug!("PSG reset");
    }

    /// Active configuration
    pub fn config(&self) -> &PsgConfig {
        &self.config
    }

    /// Write to the chip's I/O window (`addr` 0-7 as on the CPU bus).
    ///
    /// Channel-local writes go to the selected channel; selecting 6 or 7
    /// makes them no-ops. Addresses from 8 up (LFO, timer) are ignored.
    pub fn write_port(&mut self, addr: u8, value: u8) {
        trace!(addr, value, "PSG port write");

        if addr > Register::Noise.addr() {
            warn!(addr, value, "ignoring write to unsupported PSG register");
            return;
        }

        let reg = Register::from_addr(addr);
        if !reg.is_channel_local() {
            match reg {
                Register::ChannelSelect => self.selected = value & 0x07,
                _ => self.global_volume = value,
            }
            return;
        }

        let ch = self.selected as usize;
        let Some(channel) = self.channels.get_mut(ch) else {
            trace!(ch, %reg, "write with no channel selected");
            return;
        };
        match reg {
            Register::Control => {
                let before = channel.registers().control();
                channel.registers_mut().write(reg, value);
                let after = channel.registers().control();
                if before.contains(ControlFlags::DIRECT_ACCESS)
                    && !after.contains(ControlFlags::DIRECT_ACCESS)
                {
                    channel.registers_mut().set_wave_index(0);
                }
            }
            Register::WaveData => {
                if channel.registers().control().contains(ControlFlags::DIRECT_ACCESS) {
                    if !channel.direct_mut().queue_mut().push(value) {
                        warn!(ch, "direct-audio queue full, sample dropped");
                    }
                } else {
                    let index = channel.registers().wave_index();
                    channel.write_waveform(index, value);
                    channel.registers_mut().set_wave_index(index as u8 + 1);
                }
            }
            _ => channel.registers_mut().write(reg, value),
        }
    }

    /// Currently selected channel (0-7; 6 and 7 select nothing)
    pub fn selected_channel(&self) -> u8 {
        self.selected
    }

    /// Store a raw byte in a channel register, with no side effects.
    pub fn write_register(&mut self, channel: usize, reg: Register, value: u8) -> Result<()> {
        self.channel_mut(channel)?.registers_mut().write(reg, value);
        Ok(())
    }

    /// Read a raw channel register
    pub fn read_register(&self, channel: usize, reg: Register) -> Result<u8> {
        Ok(self.channel(channel)?.registers().read(reg))
    }

    /// Global volume register (left nibble high, right nibble low)
    pub fn global_volume(&self) -> u8 {
        self.global_volume
    }

    /// Set the global volume register
    pub fn set_global_volume(&mut self, value: u8) {
        self.global_volume = value;
    }

    /// Store a 5-bit sample at `index` (0-31) of a channel's waveform.
    pub fn write_waveform(&mut self, channel: usize, index: usize, value: u8) -> Result<()> {
        self.channel_mut(channel)?.write_waveform(index, value);
        Ok(())
    }

    /// Load a full 32-entry waveform
    pub fn load_waveform(&mut self, channel: usize, samples: &[u8; WAVE_TABLE_LEN]) -> Result<()> {
        let channel = self.channel_mut(channel)?;
        for (index, &value) in samples.iter().enumerate() {
            channel.write_waveform(index, value);
        }
        Ok(())
    }

    /// A channel's waveform table
    pub fn waveform(&self, channel: usize) -> Result<&[u8; WAVE_TABLE_LEN]> {
        Ok(self.channel(channel)?.waveform())
    }

    /// Queue a 5-bit direct-audio sample.
    pub fn push_direct_sample(&mut self, channel: usize, value: u8) -> Result<()> {
        if self.channel_mut(channel)?.direct_mut().queue_mut().push(value) {
            Ok(())
        } else {
            Err(PsgError::DirectAudioOverflow { channel })
        }
    }

    /// Direct-audio samples still waiting to be played
    pub fn pending_direct_samples(&self, channel: usize) -> Result<u32> {
        Ok(self.channel(channel)?.direct().queue().pending())
    }

    /// Generator that would drive `channel` on the next sample
    pub fn voice(&self, channel: usize) -> Result<Voice> {
        Ok(self.channel(channel)?.select_voice())
    }

    /// Borrow a channel
    pub fn channel(&self, channel: usize) -> Result<&Channel> {
        self.channels
            .get(channel)
            .ok_or(PsgError::InvalidChannel(channel))
    }

    fn channel_mut(&mut self, channel: usize) -> Result<&mut Channel> {
        self.channels
            .get_mut(channel)
            .ok_or(PsgError::InvalidChannel(channel))
    }

    /// All channels
    pub fn channels(&self) -> &[Channel; CHANNEL_COUNT] {
        &self.channels
    }

    /// Interleaved slots needed for `samples` frames
    #[inline]
    pub fn buffer_len(&self, samples: usize) -> usize {
        samples * self.config.channels()
    }

    fn render_context(&self) -> RenderContext {
        RenderContext {
            sample_rate: self.config.sample_rate,
            stereo: self.config.is_stereo(),
            global_volume: self.global_volume,
        }
    }

    fn check_tick(&self, samples: usize, available: usize) -> Result<usize> {
        if samples > self.config.max_samples_per_tick {
            return Err(PsgError::TickTooLarge {
                requested: samples,
                max: self.config.max_samples_per_tick,
            });
        }
        let required = self.buffer_len(samples);
        if available < required {
            return Err(PsgError::BufferTooSmall {
                required,
                actual: available,
            });
        }
        Ok(required)
    }

    /// Render one tick of `samples` frames into `out`.
    ///
    /// Writes `samples` slots in mono or `2 * samples` interleaved slots in
    /// stereo; anything after that in `out` is left untouched. The sum of
    /// all channels wraps on overflow.
    pub fn render(&mut self, out: &mut [i16], samples: usize) -> Result<()> {
        let len = self.check_tick(samples, out.len())?;
        let ctx = self.render_context();
        let out = &mut out[..len];
        out.fill(0);

        for channel in &mut self.channels {
            channel.render(&ctx, self.mixer.scratch_mut(len));
            self.mixer.accumulate(out, ctx.global_volume);
        }
        Ok(())
    }

    /// Render a single channel's 8-bit output for `samples` frames.
    ///
    /// Advances that channel exactly as [`Psg::render`] would, without mixing.
    pub fn render_channel(&mut self, channel: usize, out: &mut [i8], samples: usize) -> Result<()> {
        let len = self.check_tick(samples, out.len())?;
        let ctx = self.render_context();
        self.channel_mut(channel)?.render(&ctx, &mut out[..len]);
        Ok(())
    }
}

impl std::fmt::Debug for Psg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Psg")
            .field("config", &self.config)
            .field("global_volume", &self.global_volume)
            .field("selected", &self.selected)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SampleRepresentation;

    fn mono_chip() -> Psg {
        Psg::new(PsgConfig::mono(44_100)).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        assert!(Psg::new(PsgConfig::mono(0)).is_err());
    }

    #[test]
    fn test_invalid_channel() {
        let mut psg = mono_chip();
        assert!(matches!(
            psg.write_register(6, Register::Control, 0x80),
            Err(PsgError::InvalidChannel(6))
        ));
        assert!(psg.push_direct_sample(9, 0).is_err());
        assert!(psg.voice(6).is_err());
    }

    #[test]
    fn test_buffer_too_small() {
        let mut psg = Psg::new(PsgConfig::stereo(44_100)).unwrap();
        let mut out = [0i16; 199];
        let err = psg.render(&mut out, 100).unwrap_err();
        assert!(matches!(
            err,
            PsgError::BufferTooSmall {
                required: 200,
                actual: 199
            }
        ));
    }

    #[test]
    fn test_tick_too_large() {
        let mut psg = Psg::new(PsgConfig::mono(44_100).with_max_samples_per_tick(64)).unwrap();
        let mut out = vec![0i16; 128];
        assert!(matches!(
            psg.render(&mut out, 65),
            Err(PsgError::TickTooLarge { requested: 65, max: 64 })
        ));
        assert!(psg.render(&mut out, 64).is_ok());
    }

    #[test]
    fn test_render_leaves_tail_untouched() {
        let mut psg = mono_chip();
        let mut out = [42i16; 10];
        psg.render(&mut out, 4).unwrap();
        assert_eq!(out, [0, 0, 0, 0, 42, 42, 42, 42, 42, 42]);
    }

    #[test]
    fn test_port_select_and_channel_registers() {
        let mut psg = mono_chip();
        psg.write_port(0, 2);
        psg.write_port(2, 0x34);
        psg.write_port(3, 0x01);
        psg.write_port(5, 0xA5);
        psg.write_port(1, 0xEE);

        assert_eq!(psg.selected_channel(), 2);
        assert_eq!(psg.global_volume(), 0xEE);
        assert_eq!(psg.channel(2).unwrap().registers().period(), 0x134);
        assert_eq!(psg.read_register(2, Register::Balance).unwrap(), 0xA5);
        assert_eq!(psg.read_register(0, Register::Balance).unwrap(), 0);
    }

    #[test]
    fn test_port_select_out_of_range_ignores_writes() {
        let mut psg = mono_chip();
        psg.write_port(0, 7);
        psg.write_port(2, 0xFF);
        psg.write_port(6, 0x1F);
        for ch in 0..CHANNEL_COUNT {
            assert_eq!(psg.read_register(ch, Register::FreqLo).unwrap(), 0);
        }
    }

    #[test]
    fn test_port_wave_data_fills_waveform() {
        let mut psg = mono_chip();
        psg.write_port(0, 1);
        psg.write_port(4, 0x00);
        for i in 0..33u8 {
            psg.write_port(6, i);
        }
        let waveform = psg.waveform(1).unwrap();
        // 33rd write wrapped onto slot 0
        assert_eq!(waveform[0], 32 & 0x1F);
        assert_eq!(waveform[31], 31);
        assert_eq!(psg.channel(1).unwrap().registers().wave_index(), 1);
    }

    #[test]
    fn test_port_wave_data_in_direct_mode_queues() {
        let mut psg = mono_chip();
        psg.write_port(0, 3);
        psg.write_port(4, 0xC0);
        psg.write_port(6, 0x1F);
        psg.write_port(6, 0x00);
        assert_eq!(psg.pending_direct_samples(3).unwrap(), 2);
        assert_eq!(psg.waveform(3).unwrap(), &[0; WAVE_TABLE_LEN]);
    }

    #[test]
    fn test_port_clearing_direct_access_resets_wave_index() {
        let mut psg = mono_chip();
        psg.write_port(0, 0);
        psg.write_port(6, 5);
        psg.write_port(6, 6);
        assert_eq!(psg.channel(0).unwrap().registers().wave_index(), 2);

        psg.write_port(4, 0x40);
        psg.write_port(4, 0x00);
        assert_eq!(psg.channel(0).unwrap().registers().wave_index(), 0);
    }

    #[test]
    fn test_port_ignores_lfo_and_timer() {
        let mut psg = mono_chip();
        psg.write_port(8, 0xFF);
        psg.write_port(9, 0xFF);
        assert_eq!(psg.global_volume(), 0);
        assert_eq!(psg.selected_channel(), 0);
    }

    #[test]
    fn test_push_direct_overflow() {
        let mut psg = mono_chip();
        for _ in 0..1024 {
            psg.push_direct_sample(0, 1).unwrap();
        }
        assert!(matches!(
            psg.push_direct_sample(0, 1),
            Err(PsgError::DirectAudioOverflow { channel: 0 })
        ));
    }

    #[test]
    fn test_reset_restores_power_on_state() {
        let mut psg = mono_chip();
        psg.set_global_volume(0xFF);
        psg.write_register(4, Register::Control, 0x9F).unwrap();
        psg.push_direct_sample(4, 3).unwrap();
        psg.write_waveform(4, 0, 31).unwrap();

        psg.reset();
        assert_eq!(psg.global_volume(), 0);
        assert_eq!(psg.read_register(4, Register::Control).unwrap(), 0);
        assert_eq!(psg.pending_direct_samples(4).unwrap(), 0);
        assert_eq!(psg.waveform(4).unwrap()[0], 0);
        assert_eq!(psg.channel(4).unwrap().noise().level(), 4);
    }

    #[test]
    fn test_signed_representation_changes_mix() {
        let build = |representation| {
            let config = PsgConfig::mono(44_100).with_representation(representation);
            let mut psg = Psg::new(config).unwrap();
            psg.set_global_volume(0x11);
            psg.write_register(0, Register::Control, 0x9F).unwrap();
            psg.write_register(0, Register::Balance, 0xFF).unwrap();
            psg.write_register(0, Register::FreqLo, 0x51).unwrap();
            psg
        };

        let mut biased = build(SampleRepresentation::UnsignedBiased);
        let mut signed = build(SampleRepresentation::Signed);
        let mut a = [0i16; 8];
        let mut b = [0i16; 8];
        biased.render(&mut a, 8).unwrap();
        signed.render(&mut b, 8).unwrap();

        // All-zero waveform -> -127 per slot
        assert!(a.iter().all(|&s| s == 129));
        assert!(b.iter().all(|&s| s == -127));
    }
}
