// Dedicated callback thread
//
// One named OS thread drives a current-thread tokio runtime. Every
// scheduled callback is a task on that runtime, so callbacks run serially
// on the same thread in deadline order. Cancelling aborts the task.

use super::{Callback, CallbackScheduler, QueueError, TimerHandle};
use crate::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

/// Name of the callback thread, visible in debuggers and panic messages
pub const QUEUE_THREAD_NAME: &str = "volkey-callbacks";

type PendingMap = Arc<Mutex<HashMap<u64, AbortHandle>>>;

/// Handle to the serial callback thread
///
/// This handle is Send + Sync and can be shared across threads.
/// When dropped, the thread is shut down and pending callbacks are dropped
/// without running.
pub struct SerialQueue {
    runtime: Handle,
    pending: PendingMap,
    next_id: AtomicU64,
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    thread: Option<JoinHandle<()>>,
}

impl SerialQueue {
    /// Spawn the callback thread
    pub fn spawn() -> Result<Self, QueueError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| QueueError::StartFailed(e.to_string()))?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = thread::Builder::new()
            .name(QUEUE_THREAD_NAME.to_string())
            .spawn(move || {
                debug!("Callback thread started");
                // Resolves on explicit shutdown or when the sender is dropped
                runtime.block_on(async {
                    let _ = shutdown_rx.await;
                });
                debug!("Callback thread exiting");
            })
            .map_err(|e| QueueError::StartFailed(e.to_string()))?;

        info!("Callback queue running on thread '{}'", QUEUE_THREAD_NAME);

        Ok(Self {
            runtime: handle,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            thread: Some(thread),
        })
    }

    /// Number of callbacks scheduled but not yet run or cancelled
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    /// Stop the queue thread. Pending callbacks are dropped.
    pub fn shutdown(&self) {
        if let Some(tx) = self.shutdown_tx.lock().take() {
            let _ = tx.send(());
        }
        self.pending.lock().clear();
    }

    fn is_shut_down(&self) -> bool {
        self.shutdown_tx.lock().is_none()
    }
}

impl CallbackScheduler for SerialQueue {
    fn schedule(&self, delay: Duration, callback: Callback) -> Result<TimerHandle, QueueError> {
        if self.is_shut_down() {
            return Err(QueueError::ShutDown);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let pending = self.pending.clone();

        // Hold the map lock until the abort handle is stored so a zero-delay
        // task cannot look itself up before it is registered.
        let mut guard = self.pending.lock();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let still_scheduled = pending.lock().remove(&id).is_some();
            if still_scheduled {
                callback();
            }
        });
        guard.insert(id, task.abort_handle());

        Ok(TimerHandle::new(id))
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.pending.lock().remove(&handle.id()) {
            task.abort();
        }
    }
}

impl Drop for SerialQueue {
    /// Shut down the callback thread and wait for it to exit.
    ///
    /// If the last handle is dropped from a callback running on the queue
    /// thread itself, the join is skipped.
    fn drop(&mut self) {
        self.shutdown();

        if let Some(thread) = self.thread.take() {
            if thread.thread().id() == thread::current().id() {
                warn!("SerialQueue dropped on its own thread; not joining");
                return;
            }
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
#[path = "thread_test.rs"]
mod tests;
