//! Listing spider
//!
//! A walk visits listing pages from a starting page down to page 0, newest
//! last, and enqueues every farm id it finds. Walks run as independent tasks
//! and share one stop flag through [`SpiderRunState`].

use crate::crawler::fetcher::DocumentFetcher;
use crate::crawler::parser::{extract_listing_ids, extract_recent_ids, ExtractError};
use crate::crawler::queue::JobQueue;
use crate::farm_id::FarmId;
use crate::state::{SpiderRunState, SpiderStatus};
use crate::storage::DedupGate;
use crate::url::SourceEndpoints;
use crate::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;

/// What one listing page produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub page: u32,

    /// Ids extracted from the page
    pub found: usize,

    /// Ids the dedup store had not seen before
    pub fresh: usize,

    /// Ids pushed onto the job queue
    pub queued: usize,
}

/// Totals for a finished walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub pages_visited: usize,
    pub farms_queued: usize,

    /// True if the walk ended on a stop request rather than reaching page 0
    pub stopped: bool,
}

struct SpiderInner {
    queue: JobQueue,
    fetcher: Arc<dyn DocumentFetcher>,
    endpoints: Arc<SourceEndpoints>,
    dedup: Option<Arc<dyn DedupGate>>,
    state: Arc<SpiderRunState>,
    tracker: TaskTracker,
    required_prefix: char,
}

/// Starts, stops, and reports on listing walks
///
/// Cheap to clone; every clone drives the same walks.
#[derive(Clone)]
pub struct SpiderController {
    inner: Arc<SpiderInner>,
}

impl SpiderController {
    pub fn new(
        queue: JobQueue,
        fetcher: Arc<dyn DocumentFetcher>,
        endpoints: Arc<SourceEndpoints>,
        dedup: Option<Arc<dyn DedupGate>>,
        required_prefix: char,
    ) -> Self {
        Self {
            inner: Arc::new(SpiderInner {
                queue,
                fetcher,
                endpoints,
                dedup,
                state: Arc::new(SpiderRunState::new()),
                tracker: TaskTracker::new(),
                required_prefix,
            }),
        }
    }

    /// Spawns a walk over pages `from, from - 1, ..., 0`
    ///
    /// The walk counts as running as soon as this returns.
    pub fn start_range(&self, from: u32) -> JoinHandle<WalkSummary> {
        let guard = self.inner.state.enter();
        let spider = self.clone();

        tracing::info!("starting walk from page {}", from);

        self.inner.tracker.spawn(async move {
            let _guard = guard;
            spider.walk(from).await
        })
    }

    /// Spawns a walk over the latest listing page only
    pub fn start_latest(&self) -> JoinHandle<WalkSummary> {
        self.start_range(0)
    }

    async fn walk(&self, from: u32) -> WalkSummary {
        let mut summary = WalkSummary::default();

        for page in (0..=from).rev() {
            if self.inner.state.stop_requested() {
                tracing::info!("walk stopped before page {}", page);
                summary.stopped = true;
                break;
            }

            summary.pages_visited += 1;
            match self.fetch_page(page).await {
                Ok(outcome) => summary.farms_queued += outcome.queued,
                Err(e) => tracing::warn!("skipping listing page {}: {}", page, e),
            }
        }

        tracing::info!(
            "walk from page {} finished: {} pages, {} farms queued",
            from,
            summary.pages_visited,
            summary.farms_queued
        );

        summary
    }

    /// Fetches one listing page, records its ids, and enqueues them
    ///
    /// Every extracted id is enqueued whether or not the dedup store already
    /// knew it. A page without ids is an empty outcome.
    ///
    /// # Errors
    ///
    /// * `FarmError::Fetch` - the listing page could not be fetched
    /// * `FarmError::QueueClosed` - the job queue is gone
    pub async fn fetch_page(&self, page: u32) -> Result<PageOutcome> {
        let url = self.inner.endpoints.listing_url(page);
        let fetched = self.inner.fetcher.fetch(&url).await?;

        let mut outcome = PageOutcome {
            page,
            ..PageOutcome::default()
        };

        let farm_ids = match extract_listing_ids(&fetched.body) {
            Ok(farm_ids) => farm_ids,
            Err(ExtractError::NoIdentifiersFound) => {
                tracing::info!("no farm ids on listing page {}", page);
                return Ok(outcome);
            }
            Err(e) => return Err(e.into()),
        };

        outcome.found = farm_ids.len();
        outcome.fresh = self.record_seen(page, &farm_ids);

        for farm_id in farm_ids {
            self.inner.queue.enqueue(farm_id).await?;
            outcome.queued += 1;
        }

        tracing::debug!(
            "listing page {}: {} found, {} new",
            page,
            outcome.found,
            outcome.fresh
        );

        Ok(outcome)
    }

    /// Adds ids to the dedup store, returning how many were new
    ///
    /// A store error ends dedup for the rest of the page.
    fn record_seen(&self, page: u32, farm_ids: &[FarmId]) -> usize {
        let Some(gate) = &self.inner.dedup else {
            return 0;
        };

        let mut fresh = 0;
        for farm_id in farm_ids {
            let score = match farm_id.score() {
                Ok(score) => score,
                Err(e) => {
                    tracing::debug!("cannot score {}: {}", farm_id, e);
                    continue;
                }
            };

            match gate.add_if_absent(farm_id, score) {
                Ok(added) => fresh += added as usize,
                Err(e) => {
                    tracing::warn!("dedup store failed on listing page {}: {}", page, e);
                    break;
                }
            }
        }

        fresh
    }

    /// Fetches the recents feed and enqueues the ids it names
    ///
    /// Entries that are too short or carry the wrong prefix are skipped.
    ///
    /// # Returns
    ///
    /// The number of ids enqueued
    pub async fn fetch_recents(&self) -> Result<usize> {
        let url = self.inner.endpoints.recents_url();
        let fetched = self.inner.fetcher.fetch(&url).await?;
        let farm_ids = extract_recent_ids(&fetched.body, self.inner.required_prefix)?;

        let count = farm_ids.len();
        for farm_id in farm_ids {
            self.inner.queue.enqueue(farm_id).await?;
        }

        tracing::info!("queued {} recent farms", count);
        Ok(count)
    }

    /// Asks every running walk to stop before its next page
    ///
    /// Returns false if no walk was running.
    pub fn request_stop(&self) -> bool {
        let requested = self.inner.state.request_stop();
        if requested {
            tracing::info!("stop requested for {} walks", self.inner.state.running());
        }
        requested
    }

    pub fn status(&self) -> SpiderStatus {
        self.inner.state.status()
    }

    /// Stops all walks and waits for them to exit
    pub async fn shutdown(&self) {
        self.request_stop();
        self.inner.tracker.close();
        self.inner.tracker.wait().await;
    }
}
