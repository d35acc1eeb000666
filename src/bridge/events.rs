use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::domain::DownloadEvent;

#[derive(Default)]
struct Listeners {
    log: Vec<UnboundedSender<String>>,
    progress: Vec<UnboundedSender<f64>>,
    finished: Vec<UnboundedSender<()>>,
    error: Vec<UnboundedSender<String>>,
}

/// Fan-out of controller events to any number of subscribers.
///
/// Each subscription is its own unbounded channel, so events keep their
/// order within one stream. Closed receivers are pruned on the next emit.
#[derive(Default)]
pub struct EventHub {
    listeners: Mutex<Listeners>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn on_log(&self) -> UnboundedReceiver<String> {
        let (tx, rx) = unbounded_channel();
        self.listeners().log.push(tx);
        rx
    }

    pub fn on_progress(&self) -> UnboundedReceiver<f64> {
        let (tx, rx) = unbounded_channel();
        self.listeners().progress.push(tx);
        rx
    }

    pub fn on_finished(&self) -> UnboundedReceiver<()> {
        let (tx, rx) = unbounded_channel();
        self.listeners().finished.push(tx);
        rx
    }

    pub fn on_error(&self) -> UnboundedReceiver<String> {
        let (tx, rx) = unbounded_channel();
        self.listeners().error.push(tx);
        rx
    }

    pub fn emit(&self, event: DownloadEvent) {
        let mut listeners = self.listeners();
        match event {
            DownloadEvent::Log(text) => broadcast(&mut listeners.log, text),
            DownloadEvent::Progress(value) => broadcast(&mut listeners.progress, value),
            DownloadEvent::Finished => broadcast(&mut listeners.finished, ()),
            DownloadEvent::Error(text) => broadcast(&mut listeners.error, text),
        }
    }

    /// Detach every subscription. Receivers see their stream end.
    pub fn remove_all_listeners(&self) {
        *self.listeners() = Listeners::default();
    }

    pub fn listener_count(&self) -> usize {
        let listeners = self.listeners();
        listeners.log.len()
            + listeners.progress.len()
            + listeners.finished.len()
            + listeners.error.len()
    }
}

fn broadcast<T: Clone>(senders: &mut Vec<UnboundedSender<T>>, value: T) {
    senders.retain(|tx| tx.send(value.clone()).is_ok());
}
