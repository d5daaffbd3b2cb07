//! Audio export
//!
//! WAV output through `hound`, either as an [`AudioSink`](crate::AudioSink)
//! fed tick by tick or as a one-shot render of a configured chip.

mod wav;

pub use wav::{export_to_wav, WavSink};
