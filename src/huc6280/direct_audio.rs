//! Direct-audio (DDA) playback
//!
//! Samples pushed by the CPU land in a 1024-slot circular queue. Playback
//! walks the queue with its own 26-bit phase accumulator at a fixed rate and
//! retires one pending sample each time the phase index moves.

use super::constants::{DIRECT_AUDIO_PERIOD, DIRECT_QUEUE_LEN, SAMPLE_MASK};
use super::generators::{center_sample, PhaseAccumulator};
use super::mixer::Balance;

/// Circular queue of pushed 5-bit samples
#[derive(Clone)]
pub struct DirectAudioQueue {
    samples: Box<[u8; DIRECT_QUEUE_LEN]>,
    write_pos: usize,
    pending: u32,
}

impl DirectAudioQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            samples: Box::new([0; DIRECT_QUEUE_LEN]),
            write_pos: 0,
            pending: 0,
        }
    }

    /// Store a sample at the write position.
    ///
    /// Returns `false` and drops the sample when every slot is still pending.
    pub fn push(&mut self, value: u8) -> bool {
        if self.pending as usize >= DIRECT_QUEUE_LEN {
            return false;
        }
        self.samples[self.write_pos] = value & SAMPLE_MASK;
        self.write_pos = (self.write_pos + 1) % DIRECT_QUEUE_LEN;
        self.pending += 1;
        true
    }

    /// Samples pushed but not yet played
    #[inline]
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Whether nothing is waiting to be played
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Sample stored in `slot` (wrapped to the queue length)
    #[inline]
    pub fn sample(&self, slot: usize) -> u8 {
        self.samples[slot % DIRECT_QUEUE_LEN]
    }

    /// Drop all pending samples and rewind the write position
    pub fn clear(&mut self) {
        self.samples.fill(0);
        self.write_pos = 0;
        self.pending = 0;
    }
}

impl Default for DirectAudioQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DirectAudioQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectAudioQueue")
            .field("write_pos", &self.write_pos)
            .field("pending", &self.pending)
            .finish()
    }
}

/// Queue consumer for one channel
#[derive(Clone, Debug)]
pub struct DirectAudioPlayer {
    queue: DirectAudioQueue,
    phase: PhaseAccumulator,
}

impl DirectAudioPlayer {
    /// Create an idle player
    pub fn new() -> Self {
        Self {
            queue: DirectAudioQueue::new(),
            phase: PhaseAccumulator::direct_audio(),
        }
    }

    /// Fixed playback increment for `sample_rate`.
    #[inline]
    pub fn increment(sample_rate: u32) -> Option<u32> {
        PhaseAccumulator::increment(sample_rate, DIRECT_AUDIO_PERIOD)
    }

    /// Play pending samples into whole frames of `out`.
    ///
    /// Stops at the end of `out` or once the queue drains, whichever comes
    /// first, and returns the number of slots written.
    pub fn render(&mut self, inc: u32, balance: Balance, width: usize, out: &mut [i8]) -> usize {
        let mut index = self.phase.index();
        let mut written = 0;

        for frame in out.chunks_exact_mut(width) {
            if self.queue.is_empty() {
                break;
            }
            let sample = center_sample(self.queue.sample(index));
            balance.write_frame(sample, frame);
            written += width;

            let next = self.phase.advance(inc);
            if next != index {
                index = next;
                self.queue.pending -= 1;
            }
        }
        written
    }

    /// The sample queue
    pub fn queue(&self) -> &DirectAudioQueue {
        &self.queue
    }

    /// Mutable access to the sample queue
    pub fn queue_mut(&mut self) -> &mut DirectAudioQueue {
        &mut self.queue
    }

    /// Playback phase
    pub fn phase(&self) -> &PhaseAccumulator {
        &self.phase
    }

    /// Reset queue and phase
    pub fn reset(&mut self) {
        self.queue.clear();
        self.phase.reset();
    }
}

impl Default for DirectAudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: Balance = Balance { left: 64, right: 64 };

    #[test]
    fn test_push_masks_and_counts() {
        let mut queue = DirectAudioQueue::new();
        assert!(queue.push(0xFF));
        assert_eq!(queue.sample(0), 0x1F);
        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn test_push_rejects_when_full() {
        let mut queue = DirectAudioQueue::new();
        for i in 0..DIRECT_QUEUE_LEN {
            assert!(queue.push(i as u8));
        }
        assert!(!queue.push(0));
        assert_eq!(queue.pending() as usize, DIRECT_QUEUE_LEN);
    }

    #[test]
    fn test_increment_at_44100() {
        assert_eq!(DirectAudioPlayer::increment(44_100), Some((81 << 16) / 0x1FF));
    }

    #[test]
    fn test_render_drains_exactly() {
        let mut player = DirectAudioPlayer::new();
        for value in [31u8, 0, 16] {
            player.queue_mut().push(value);
        }

        // One slot per sample: every frame moves the index
        let mut out = [99i8; 8];
        let written = player.render(1 << 16, FLAT, 1, &mut out);

        assert_eq!(written, 3);
        assert_eq!(&out[..3], &[16, -16, 1]);
        assert_eq!(&out[3..], &[99; 5]);
        assert!(player.queue().is_empty());
    }

    #[test]
    fn test_render_holds_slot_between_index_changes() {
        let mut player = DirectAudioPlayer::new();
        player.queue_mut().push(31);
        player.queue_mut().push(0);

        // Half a slot per sample: each queued sample plays twice
        let mut out = [0i8; 6];
        let written = player.render(1 << 15, FLAT, 1, &mut out);

        assert_eq!(written, 4);
        assert_eq!(&out[..4], &[16, 16, -16, -16]);
    }

    #[test]
    fn test_render_stereo_frames() {
        let mut player = DirectAudioPlayer::new();
        player.queue_mut().push(31);
        let balance = Balance { left: 64, right: 32 };

        let mut out = [0i8; 4];
        let written = player.render(1 << 16, balance, 2, &mut out);

        assert_eq!(written, 2);
        assert_eq!(&out[..2], &[16, 8]);
    }
}
