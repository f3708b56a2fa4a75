//! Pipeline coordinator
//!
//! This module wires the pipeline together and owns its lifecycle:
//! - Building the queue, result store, spider, and worker pool
//! - Binding the console and HTTP listeners
//! - Polling the recents feed at startup
//! - Shutting everything down in order

use crate::api;
use crate::config::Config;
use crate::console;
use crate::crawler::fetcher::{DocumentFetcher, HttpFetcher};
use crate::crawler::queue::JobQueue;
use crate::crawler::spider::SpiderController;
use crate::crawler::worker::{WorkerContext, WorkerPool};
use crate::farm_id::FarmId;
use crate::storage::{open_dedup_gate, DedupGate, ResultStore};
use crate::url::SourceEndpoints;
use crate::Result;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Everything the console and HTTP surfaces may touch
///
/// Clones share the same queue, store, and spider.
#[derive(Clone)]
pub struct PipelineHandle {
    pub store: Arc<ResultStore>,
    pub queue: JobQueue,
    pub spider: SpiderController,
    pub required_prefix: char,
}

/// Point-in-time view of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStatus {
    pub queue_depth: usize,
    pub queue_capacity: usize,
    pub spiders_running: usize,
    pub stop_requested: bool,
    pub farms: usize,
}

impl PipelineHandle {
    /// Validates an externally supplied id and enqueues it
    ///
    /// Waits while the job queue is full.
    ///
    /// # Errors
    ///
    /// * `FarmError::InvalidIdentifier` - the entry is not a usable farm id
    /// * `FarmError::QueueClosed` - the job queue is gone
    pub async fn submit(&self, entry: &str) -> Result<FarmId> {
        let farm_id = FarmId::from_entry(entry.trim(), self.required_prefix)?;
        self.queue.enqueue(farm_id.clone()).await?;
        tracing::debug!("queued farm id {}", farm_id);
        Ok(farm_id)
    }

    pub fn status(&self) -> PipelineStatus {
        let spider = self.spider.status();
        PipelineStatus {
            queue_depth: self.queue.len(),
            queue_capacity: self.queue.capacity(),
            spiders_running: spider.running,
            stop_requested: spider.stop_requested,
            farms: self.store.len(),
        }
    }
}

/// Addresses the surfaces actually bound to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundAddrs {
    pub console: Option<SocketAddr>,
    pub http: Option<SocketAddr>,
}

/// A running pipeline
pub struct Pipeline {
    config: Arc<Config>,
    handle: PipelineHandle,
    workers: WorkerPool,
    shutdown: CancellationToken,
    surfaces: TaskTracker,
}

impl Pipeline {
    /// Builds the pipeline and starts its workers
    ///
    /// Surfaces are not started until [`Pipeline::serve`].
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `fetcher` - Document fetcher shared by workers and spider
    /// * `dedup` - Optional cross-run dedup store for the spider
    pub fn new(
        config: Config,
        fetcher: Arc<dyn DocumentFetcher>,
        dedup: Option<Arc<dyn DedupGate>>,
    ) -> Result<Self> {
        let endpoints = Arc::new(SourceEndpoints::new(&config.source)?);
        let store = Arc::new(ResultStore::new());
        let queue = JobQueue::new(config.pipeline.queue_capacity);

        let spider = SpiderController::new(
            queue.clone(),
            Arc::clone(&fetcher),
            Arc::clone(&endpoints),
            dedup,
            config.source.required_prefix,
        );

        let workers = WorkerPool::spawn(
            config.pipeline.workers,
            queue.clone(),
            WorkerContext {
                store: Arc::clone(&store),
                fetcher,
                endpoints,
            },
            CancellationToken::new(),
        );

        let handle = PipelineHandle {
            store,
            queue,
            spider,
            required_prefix: config.source.required_prefix,
        };

        Ok(Self {
            config: Arc::new(config),
            handle,
            workers,
            shutdown: CancellationToken::new(),
            surfaces: TaskTracker::new(),
        })
    }

    /// Builds the pipeline with an HTTP fetcher and the configured dedup store
    pub fn from_config(config: Config) -> Result<Self> {
        let fetcher = HttpFetcher::from_user_agent(&config.user_agent)?;
        let dedup = open_dedup_gate(config.spider.dedup_database_path.as_deref().map(Path::new));

        if dedup.is_none() {
            tracing::info!("cross-run dedup disabled");
        }

        Self::new(config, Arc::new(fetcher), dedup)
    }

    pub fn handle(&self) -> PipelineHandle {
        self.handle.clone()
    }

    /// Binds the configured listeners and starts the recents poller
    ///
    /// # Errors
    ///
    /// * `FarmError::Io` - a listener could not be bound
    pub async fn serve(&self) -> Result<BoundAddrs> {
        let mut bound = BoundAddrs::default();

        if let Some(addr) = &self.config.console.listen {
            let listener = TcpListener::bind(addr.as_str()).await?;
            let local = listener.local_addr()?;
            tracing::info!("console listening on {}", local);
            bound.console = Some(local);

            self.surfaces.spawn(console::serve(
                listener,
                self.handle(),
                self.shutdown.clone(),
            ));
        }

        if let Some(addr) = &self.config.http.listen {
            let listener = TcpListener::bind(addr.as_str()).await?;
            let local = listener.local_addr()?;
            tracing::info!("http api listening on {}", local);
            bound.http = Some(local);

            self.surfaces
                .spawn(api::serve(listener, self.handle(), self.shutdown.clone()));
        }

        self.surfaces.spawn(poll_recents(
            self.handle.spider.clone(),
            self.config.spider.recents_poll_count,
            Duration::from_secs(self.config.spider.recents_poll_interval_secs),
            self.shutdown.clone(),
        ));

        Ok(bound)
    }

    /// Stops the pipeline
    ///
    /// Surfaces stop first, then running walks, then the workers. Records
    /// already fetched are stored before this returns.
    pub async fn shutdown(self) {
        tracing::info!("shutting down");

        self.shutdown.cancel();
        self.surfaces.close();
        self.surfaces.wait().await;

        // Workers keep draining the queue so a walk blocked on enqueue can exit
        self.handle.spider.shutdown().await;
        self.workers.shutdown().await;

        tracing::info!("pipeline stopped with {} farms", self.handle.store.len());
    }
}

/// Fetches the recents feed `count` times, `interval` apart
async fn poll_recents(
    spider: SpiderController,
    count: u32,
    interval: Duration,
    shutdown: CancellationToken,
) {
    for round in 0..count {
        if round > 0 {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        tokio::select! {
            _ = shutdown.cancelled() => return,
            result = spider.fetch_recents() => match result {
                Ok(queued) => tracing::info!("recents poll {}: {} farms queued", round + 1, queued),
                Err(e) => tracing::warn!("recents poll {} failed: {}", round + 1, e),
            },
        }
    }
}

/// Runs the pipeline until Ctrl-C
pub async fn run_pipeline(config: Config) -> Result<()> {
    let pipeline = Pipeline::from_config(config)?;
    pipeline.serve().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("interrupt received");

    pipeline.shutdown().await;
    Ok(())
}
