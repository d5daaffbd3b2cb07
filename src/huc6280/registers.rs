//! HuC6280 PSG Register Definitions
//!
//! The CPU reaches the PSG through an eight-byte I/O window. Addresses 0 and 1
//! are chip-global (channel select, global volume); 2-7 are banked per
//! channel and land in that channel's [`RegisterBank`].

use std::fmt;

use bitflags::bitflags;

/// Number of bytes in a channel register bank.
pub const REGISTERS_PER_CHANNEL: usize = 8;

/// PSG register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    /// Channel select - R0
    ChannelSelect = 0x00,
    /// Global volume (left nibble high, right nibble low) - R1
    GlobalVolume = 0x01,
    /// Frequency period (low byte) - R2
    FreqLo = 0x02,
    /// Frequency period (high nibble) - R3
    FreqHi = 0x03,
    /// Channel control: key-on, direct access, voice volume - R4
    Control = 0x04,
    /// Channel balance (left nibble high, right nibble low) - R5
    Balance = 0x05,
    /// Waveform index / wave data port - R6
    WaveData = 0x06,
    /// Noise control: enable and rate - R7
    Noise = 0x07,
}

impl Register {
    /// Convert a raw address to a register; only the low three bits are decoded.
    pub fn from_addr(addr: u8) -> Self {
        match addr & 0x07 {
            0x00 => Register::ChannelSelect,
            0x01 => Register::GlobalVolume,
            0x02 => Register::FreqLo,
            0x03 => Register::FreqHi,
            0x04 => Register::Control,
            0x05 => Register::Balance,
            0x06 => Register::WaveData,
            _ => Register::Noise,
        }
    }

    /// Get the register address value
    pub fn addr(&self) -> u8 {
        *self as u8
    }

    /// Whether writes to this address go to the selected channel's bank.
    pub fn is_channel_local(&self) -> bool {
        !matches!(self, Register::ChannelSelect | Register::GlobalVolume)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::ChannelSelect => write!(f, "R0 (Channel Select)"),
            Register::GlobalVolume => write!(f, "R1 (Global Volume)"),
            Register::FreqLo => write!(f, "R2 (Frequency Low)"),
            Register::FreqHi => write!(f, "R3 (Frequency High)"),
            Register::Control => write!(f, "R4 (Channel Control)"),
            Register::Balance => write!(f, "R5 (Channel Balance)"),
            Register::WaveData => write!(f, "R6 (Wave Data)"),
            Register::Noise => write!(f, "R7 (Noise Control)"),
        }
    }
}

bitflags! {
    /// Channel control register (R4) bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u8 {
        /// Channel produces output
        const KEY_ON = 0x80;
        /// Direct access: wave data writes feed the direct-audio queue
        const DIRECT_ACCESS = 0x40;
        /// Voice volume (5 bits)
        const VOICE_VOLUME = 0x1F;
    }
}

bitflags! {
    /// Noise control register (R7) bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NoiseFlags: u8 {
        /// Noise replaces the wavetable voice (channels 4 and 5 only)
        const ENABLE = 0x80;
        /// Noise rate (5 bits)
        const RATE = 0x1F;
    }
}

/// Raw register bank of one channel (8 bytes, indexed by address)
///
/// Accepts any byte in any slot; interpretation happens on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterBank {
    /// Register values R0-R7
    pub registers: [u8; REGISTERS_PER_CHANNEL],
}

impl RegisterBank {
    /// Create a new register bank with all values set to 0
    pub fn new() -> Self {
        RegisterBank {
            registers: [0; REGISTERS_PER_CHANNEL],
        }
    }

    /// Read a register value
    pub fn read(&self, reg: Register) -> u8 {
        self.registers[reg as usize]
    }

    /// Write a register value
    pub fn write(&mut self, reg: Register, value: u8) {
        self.registers[reg as usize] = value;
    }

    /// 12-bit tone period from R2/R3.
    #[inline]
    pub fn period(&self) -> u16 {
        let lo = self.read(Register::FreqLo) as u16;
        let hi = (self.read(Register::FreqHi) & 0x0F) as u16;
        (hi << 8) | lo
    }

    /// Decoded control register.
    #[inline]
    pub fn control(&self) -> ControlFlags {
        ControlFlags::from_bits_retain(self.read(Register::Control))
    }

    /// Voice volume (0-31) from the control register.
    #[inline]
    pub fn voice_volume(&self) -> u8 {
        self.read(Register::Control) & ControlFlags::VOICE_VOLUME.bits()
    }

    /// Raw balance byte.
    #[inline]
    pub fn balance(&self) -> u8 {
        self.read(Register::Balance)
    }

    /// Current waveform index (0-31).
    #[inline]
    pub fn wave_index(&self) -> usize {
        (self.read(Register::WaveData) & 0x1F) as usize
    }

    /// Move the waveform index; only the low five bits are kept.
    #[inline]
    pub fn set_wave_index(&mut self, index: u8) {
        self.write(Register::WaveData, index & 0x1F);
    }

    /// Decoded noise register.
    #[inline]
    pub fn noise(&self) -> NoiseFlags {
        NoiseFlags::from_bits_retain(self.read(Register::Noise))
    }

    /// Noise rate (0-31).
    #[inline]
    pub fn noise_rate(&self) -> u8 {
        self.read(Register::Noise) & NoiseFlags::RATE.bits()
    }

    /// Get all registers as a slice
    pub fn as_slice(&self) -> &[u8; REGISTERS_PER_CHANNEL] {
        &self.registers
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}
