//! Ingestion pipeline
//!
//! This module contains the moving parts of the pipeline:
//! - Document fetching behind the `DocumentFetcher` trait
//! - Extraction of scores and farm ids from fetched documents
//! - The bounded job queue feeding the worker pool
//! - Listing walks driven by the spider controller
//! - Wiring and lifecycle in the coordinator

mod coordinator;
mod fetcher;
mod parser;
mod queue;
mod spider;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{run_pipeline, BoundAddrs, Pipeline, PipelineHandle, PipelineStatus};
pub use fetcher::{build_http_client, DocumentFetcher, FetchError, FetchedPage, HttpFetcher};
pub use parser::{extract_attributes, extract_listing_ids, extract_recent_ids, ExtractError};
pub use queue::JobQueue;
pub use spider::{PageOutcome, SpiderController, WalkSummary};
pub use worker::{assemble_stats, process_farm_id, WorkerContext, WorkerPool};
