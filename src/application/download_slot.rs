use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;

use crate::domain::{AppError, DownloadPhase};

enum SlotState {
    Idle,
    Preparing,
    Running { kill: oneshot::Sender<()> },
    Finishing,
}

impl SlotState {
    fn phase(&self) -> DownloadPhase {
        match self {
            SlotState::Idle => DownloadPhase::Idle,
            SlotState::Preparing => DownloadPhase::Preparing,
            SlotState::Running { .. } => DownloadPhase::Running,
            SlotState::Finishing => DownloadPhase::Finishing,
        }
    }
}

/// The single download slot.
///
/// At most one [`SlotLease`] exists at a time. The kill handle is present
/// only while the phase is `Running`.
#[derive(Clone)]
pub struct DownloadSlot {
    state: Arc<Mutex<SlotState>>,
}

impl Default for DownloadSlot {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState::Idle)),
        }
    }
}

impl DownloadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reserve the slot, or fail with `AlreadyRunning` if it is taken.
    pub fn try_acquire(&self) -> Result<SlotLease, AppError> {
        let mut state = self.state();
        match *state {
            SlotState::Idle => {
                *state = SlotState::Preparing;
                Ok(SlotLease { slot: self.clone() })
            }
            _ => Err(AppError::AlreadyRunning),
        }
    }

    pub fn phase(&self) -> DownloadPhase {
        self.state().phase()
    }

    pub fn is_downloading(&self) -> bool {
        matches!(
            self.phase(),
            DownloadPhase::Running | DownloadPhase::Finishing
        )
    }

    /// Fire the kill handle of a running download.
    ///
    /// The lease stays held until the process actually exits.
    pub fn cancel(&self) -> bool {
        let mut state = self.state();
        match std::mem::replace(&mut *state, SlotState::Finishing) {
            SlotState::Running { kill } => {
                // The supervisor may have exited between the lock and here.
                let _ = kill.send(());
                true
            }
            other => {
                *state = other;
                false
            }
        }
    }
}

/// Proof of ownership of the slot. Dropping it returns the slot to idle.
pub struct SlotLease {
    slot: DownloadSlot,
}

impl SlotLease {
    /// Preparing -> Running. The receiver fires when the download is cancelled.
    pub fn mark_running(&self) -> oneshot::Receiver<()> {
        let (kill, rx) = oneshot::channel();
        *self.slot.state() = SlotState::Running { kill };
        rx
    }

    /// The process has exited; no kill handle remains.
    pub fn mark_finishing(&self) {
        *self.slot.state() = SlotState::Finishing;
    }

    pub fn release(self) {}
}

impl Drop for SlotLease {
    fn drop(&mut self) {
        *self.slot.state() = SlotState::Idle;
    }
}
