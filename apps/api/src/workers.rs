//! Bounded background work queues.
//!
//! Each queue is a bounded mpsc channel drained by a fixed set of worker
//! tasks sharing one receiver. Submissions reserve a slot up front so callers
//! can reject a burst before creating any tracking record.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError, Permit};
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::debug;

use crate::errors::AppError;

/// Worker pool sizing shared by the extraction and tailoring queues.
#[derive(Debug, Clone, Copy)]
pub struct QueueConfig {
    pub workers: usize,
    pub capacity: usize,
}

/// Shared receiver for multiple workers pulling from one channel.
struct SharedReceiver<T> {
    rx: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> SharedReceiver<T> {
    fn new(rx: mpsc::Receiver<T>) -> Self {
        Self {
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    async fn recv(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }
}

impl<T> Clone for SharedReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

pub struct WorkQueue<T> {
    name: &'static str,
    tx: mpsc::Sender<T>,
}

impl<T: Send + 'static> WorkQueue<T> {
    /// Spawns `config.workers` workers that feed every queued item to `handler`.
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(name: &'static str, config: QueueConfig, handler: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.capacity.max(1));
        let rx = SharedReceiver::new(rx);
        let handler = Arc::new(handler);

        for worker in 0..config.workers.max(1) {
            let rx = rx.clone();
            let handler = handler.clone();
            tokio::spawn(async move {
                debug!(queue = name, worker, "Worker started");
                while let Some(item) = rx.recv().await {
                    handler(item).await;
                }
                debug!(queue = name, worker, "Worker stopped");
            });
        }

        Self { name, tx }
    }

    /// Reserves a queue slot. Fails with `QueueFull` when the queue is at capacity.
    pub fn try_reserve(&self) -> Result<Permit<'_, T>, AppError> {
        self.tx.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => AppError::QueueFull(format!(
                "The {} queue is at capacity, try again later",
                self.name
            )),
            TrySendError::Closed(()) => {
                AppError::Internal(anyhow::anyhow!("The {} queue is closed", self.name))
            }
        })
    }
}

/// Text of a failed background task: the panic payload when it is a string,
/// otherwise `fallback`.
pub fn join_failure_message(err: JoinError, fallback: &str) -> String {
    if !err.is_panic() {
        return fallback.to_string();
    }
    let payload = err.into_panic();
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        text.to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        fallback.to_string()
    }
}
