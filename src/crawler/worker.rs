//! Worker pool that turns queued farm ids into statistics records
//!
//! Each worker repeatedly:
//! 1. Takes a farm id off the job queue
//! 2. Skips it if the result store already has a record
//! 3. Fetches and parses the farm page
//! 4. Sends the assembled record to the aggregator, which stores it
//!
//! The check in step 2 and the store write in step 4 are not atomic, so two
//! workers holding the same id can both fetch it. The later record simply
//! replaces the earlier one.

use crate::crawler::fetcher::DocumentFetcher;
use crate::crawler::parser::extract_attributes;
use crate::crawler::queue::JobQueue;
use crate::farm_id::FarmId;
use crate::state::{FarmStats, Villager, MAX_SCORE};
use crate::storage::ResultStore;
use crate::url::SourceEndpoints;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Shared collaborators every worker needs
#[derive(Clone)]
pub struct WorkerContext {
    pub store: Arc<ResultStore>,
    pub fetcher: Arc<dyn DocumentFetcher>,
    pub endpoints: Arc<SourceEndpoints>,
}

/// Builds a record from extracted name/score pairs
///
/// Unknown villager names and scores outside 0..=10 drop only their own pair.
pub fn assemble_stats(farm_id: FarmId, pairs: &[(String, String)]) -> FarmStats {
    let mut stats = FarmStats::new(farm_id);

    for (name, score_text) in pairs {
        let score = match score_text.parse::<u8>() {
            Ok(score) if score <= MAX_SCORE => score,
            _ => {
                tracing::debug!(
                    "cannot parse {}'s score for {}: {}/10",
                    name,
                    stats.farm_id(),
                    score_text
                );
                continue;
            }
        };

        match Villager::from_name(name) {
            Some(villager) => stats.set_score(villager, score),
            None => tracing::warn!("unknown villager {} on farm {}", name, stats.farm_id()),
        }
    }

    stats
}

/// Fetches and parses one farm, unless a record already exists
///
/// Returns None when the farm is already stored, the fetch fails, or the page
/// has no scores. Failures are logged and not retried.
pub async fn process_farm_id(farm_id: &FarmId, ctx: &WorkerContext) -> Option<FarmStats> {
    tracing::debug!("processing farm id {}", farm_id);

    if ctx.store.contains(farm_id) {
        tracing::debug!("skipping {} - already processed", farm_id);
        return None;
    }

    let url = ctx.endpoints.farm_url(farm_id);
    let page = match ctx.fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("dropping farm {}: {}", farm_id, e);
            return None;
        }
    };

    let pairs = match extract_attributes(&page.body) {
        Ok(pairs) => pairs,
        Err(e) => {
            tracing::warn!("dropping farm {}: {}", farm_id, e);
            return None;
        }
    };

    Some(assemble_stats(farm_id.clone(), &pairs))
}

/// A fixed set of workers plus the aggregator that stores their output
pub struct WorkerPool {
    workers: Vec<JoinHandle<()>>,
    aggregator: JoinHandle<()>,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Spawns `size` workers reading from `queue`
    ///
    /// Workers stop taking new ids once `shutdown` is cancelled; a fetch
    /// already in flight is allowed to finish and its record is stored.
    pub fn spawn(
        size: usize,
        queue: JobQueue,
        ctx: WorkerContext,
        shutdown: CancellationToken,
    ) -> Self {
        let size = size.max(1);
        let (results_tx, results_rx) = mpsc::channel(queue.capacity());

        let aggregator = tokio::spawn(aggregate(results_rx, Arc::clone(&ctx.store)));

        let workers = (0..size)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    queue.clone(),
                    ctx.clone(),
                    results_tx.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();

        tracing::info!("started {} workers", size);

        Self {
            workers,
            aggregator,
            shutdown,
        }
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Stops the workers and waits until every produced record is stored
    pub async fn shutdown(self) {
        self.shutdown.cancel();

        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!("worker task failed: {}", e);
            }
        }

        // All result senders are gone now, so the aggregator drains and exits
        if let Err(e) = self.aggregator.await {
            tracing::error!("aggregator task failed: {}", e);
        }

        tracing::info!("worker pool stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    queue: JobQueue,
    ctx: WorkerContext,
    results: mpsc::Sender<FarmStats>,
    shutdown: CancellationToken,
) {
    tracing::debug!("worker {} waiting for farm ids", worker_id);

    loop {
        let farm_id = tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            next = queue.dequeue() => match next {
                Some(farm_id) => farm_id,
                None => break,
            },
        };

        if let Some(stats) = process_farm_id(&farm_id, &ctx).await {
            if results.send(stats).await.is_err() {
                break;
            }
        }
    }

    tracing::debug!("worker {} stopped", worker_id);
}

async fn aggregate(mut results: mpsc::Receiver<FarmStats>, store: Arc<ResultStore>) {
    while let Some(stats) = results.recv().await {
        let farm_id = stats.farm_id().clone();
        store.upsert(stats);
        tracing::info!("stored stats for {} ({} farms)", farm_id, store.len());
    }
}
