//! Shared PSG handle for split CPU/audio threads

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::PsgConfig;
use crate::huc6280::Psg;
use crate::Result;

/// Cloneable, lock-protected handle to one [`Psg`]
///
/// Register writes from the emulated CPU and render calls from the audio
/// callback each take the lock, so a tick never sees half a register update.
#[derive(Clone, Debug)]
pub struct SharedPsg {
    inner: Arc<Mutex<Psg>>,
}

impl SharedPsg {
    /// Build a new chip behind a shared lock
    pub fn new(config: PsgConfig) -> Result<Self> {
        Ok(Self::from_psg(Psg::new(config)?))
    }

    /// Wrap an existing chip
    pub fn from_psg(psg: Psg) -> Self {
        Self {
            inner: Arc::new(Mutex::new(psg)),
        }
    }

    /// Lock the chip for a batch of operations
    pub fn lock(&self) -> MutexGuard<'_, Psg> {
        self.inner.lock()
    }

    /// Port write under the lock
    pub fn write_port(&self, addr: u8, value: u8) {
        self.inner.lock().write_port(addr, value);
    }

    /// Render one tick under the lock
    pub fn render(&self, out: &mut [i16], samples: usize) -> Result<()> {
        self.inner.lock().render(out, samples)
    }
}
