//! Bounded job queue of farm ids waiting to be fetched
//!
//! The queue is the pipeline's only backpressure: when it is full, every
//! producer (spider walks, the console, the recents poller) waits for a
//! worker to take an id off.

use crate::farm_id::FarmId;
use crate::FarmError;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Multi-producer, multi-consumer bounded queue of farm ids
///
/// Clones share the same underlying channel. Consumers take turns on the
/// receiver, so delivery order across workers is not guaranteed.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<FarmId>,
    rx: Arc<Mutex<mpsc::Receiver<FarmId>>>,
}

impl JobQueue {
    /// Creates a queue holding at most `capacity` ids
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Adds a farm id, waiting while the queue is full
    pub async fn enqueue(&self, farm_id: FarmId) -> Result<(), FarmError> {
        self.tx
            .send(farm_id)
            .await
            .map_err(|_| FarmError::QueueClosed)
    }

    /// Takes the next farm id, waiting while the queue is empty
    ///
    /// Returns None only once the channel is closed, which cannot happen
    /// while any clone of this queue is alive.
    pub async fn dequeue(&self) -> Option<FarmId> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Current number of queued ids
    ///
    /// Advisory only: the value may be stale by the time it is read.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }
}
