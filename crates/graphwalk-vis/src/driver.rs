//! Tokio task that turns scheduled advances into real time.

use std::sync::Arc;

use tokio::sync::{Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::playback::{Playback, PlaybackListener, ScheduledAdvance};

/// Anything holding a playback timer slot.
pub trait Timed {
    fn scheduled(&self) -> Option<ScheduledAdvance>;
    fn fire(&mut self, generation: u64);
}

impl<L: PlaybackListener> Timed for Playback<L> {
    fn scheduled(&self) -> Option<ScheduledAdvance> {
        Playback::scheduled(self)
    }

    fn fire(&mut self, generation: u64) {
        Playback::fire(self, generation)
    }
}

/// Background task firing the pending advance of a shared target.
///
/// Call [`PlaybackDriver::wake`] after any command that may have changed the
/// pending slot. A wake that arrives while the task is busy is kept, so it
/// is never lost between reading the slot and waiting. Waking with the same
/// generation still pending does not restart its delay.
pub struct PlaybackDriver {
    wake: Arc<Notify>,
    handle: JoinHandle<()>,
}

impl PlaybackDriver {
    /// Spawn on the current runtime. `wake` may be shared with command
    /// handlers that notify it directly.
    pub fn spawn<T>(target: Arc<RwLock<T>>, wake: Arc<Notify>) -> Self
    where
        T: Timed + Send + Sync + 'static,
    {
        let handle = tokio::spawn(drive(target, Arc::clone(&wake)));
        Self { wake, handle }
    }

    pub fn wake(&self) {
        self.wake.notify_one();
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn drive<T: Timed>(target: Arc<RwLock<T>>, wake: Arc<Notify>) {
    // Deadline of the advance being waited on, kept across wake-ups that
    // leave the same generation pending
    let mut armed: Option<(u64, Instant)> = None;

    loop {
        let pending = target.read().await.scheduled();

        let Some(advance) = pending else {
            armed = None;
            wake.notified().await;
            continue;
        };

        let deadline = match armed {
            Some((generation, deadline)) if generation == advance.generation => deadline,
            _ => Instant::now() + advance.delay,
        };
        armed = Some((advance.generation, deadline));

        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => {
                target.write().await.fire(advance.generation);
            }
            _ = wake.notified() => {}
        }
    }
}
