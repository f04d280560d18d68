// Process gate - Keeps the audio thread out of the project graph during edits
//
// The control thread holds the gate for the whole duration of a structural
// edit. The audio callback only ever try-locks it and skips the cycle when the
// gate is held, so it never blocks and never sees a half-updated graph.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Guard returned to whoever holds the gate; dropping it reopens the gate
pub type GateGuard<'a> = MutexGuard<'a, ()>;

#[derive(Debug, Clone, Default)]
pub struct ProcessGate {
    lock: Arc<Mutex<()>>,
}

impl ProcessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control thread: wait for the current audio cycle to finish and keep
    /// the audio thread paused until the guard is dropped.
    pub fn pause(&self) -> GateGuard<'_> {
        // A panic while paused must not wedge the engine forever
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Audio thread: enter a processing cycle if no edit is in flight.
    pub fn try_enter_cycle(&self) -> Option<GateGuard<'_>> {
        match self.lock.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    /// True while the control thread holds the gate
    pub fn is_paused(&self) -> bool {
        matches!(self.lock.try_lock(), Err(TryLockError::WouldBlock))
    }
}
