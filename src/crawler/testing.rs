//! Test doubles shared by the surface tests

use crate::config::SourceConfig;
use crate::crawler::coordinator::PipelineHandle;
use crate::crawler::fetcher::{DocumentFetcher, FetchError, FetchedPage};
use crate::crawler::queue::JobQueue;
use crate::crawler::spider::SpiderController;
use crate::storage::ResultStore;
use crate::url::SourceEndpoints;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

/// Serves canned bodies by URL path; unknown paths are a 404
#[derive(Default)]
pub(crate) struct StubFetcher {
    bodies: HashMap<String, String>,
}

impl StubFetcher {
    pub(crate) fn with(mut self, path: &str, body: &str) -> Self {
        self.bodies.insert(path.to_string(), body.to_string());
        self
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        match self.bodies.get(url.path()) {
            Some(body) => Ok(FetchedPage {
                final_url: url.to_string(),
                status_code: 200,
                body: body.clone(),
            }),
            None => Err(FetchError::NonSuccessStatus {
                url: url.to_string(),
                status_code: 404,
            }),
        }
    }
}

/// Builds a handle with no workers attached, so queued ids stay queued
pub(crate) fn idle_handle(fetcher: Arc<StubFetcher>, capacity: usize) -> PipelineHandle {
    let endpoints = SourceEndpoints::new(&SourceConfig {
        base_url: "https://upload.farm".to_string(),
        listing_path: "all".to_string(),
        recents_path: "_mini_recents".to_string(),
        required_prefix: '1',
    })
    .unwrap();

    let queue = JobQueue::new(capacity);
    let spider = SpiderController::new(queue.clone(), fetcher, Arc::new(endpoints), None, '1');

    PipelineHandle {
        store: Arc::new(ResultStore::new()),
        queue,
        spider,
        required_prefix: '1',
    }
}
