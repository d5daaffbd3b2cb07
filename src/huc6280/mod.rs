//! HuC6280 PSG emulation (core)
//!
//! Bottom-up layout:
//! - [`constants`]: clock, table sizes, phase widths, volume table
//! - [`registers`]: register addresses and the per-channel bank
//! - [`generators`]: phase accumulator, wavetable and noise generators
//! - [`direct_audio`]: DDA sample queue and player
//! - [`mixer`]: balance, noise volume, global-volume accumulation
//! - [`channel`]: voice selection and per-channel rendering
//! - [`chip`]: the six-channel [`Psg`]

pub mod channel;
pub mod chip;
pub mod constants;
pub mod direct_audio;
pub mod generators;
pub mod mixer;
pub mod registers;

pub use channel::{Channel, RenderContext, Voice};
pub use chip::Psg;
pub use registers::{ControlFlags, NoiseFlags, Register, RegisterBank};
