//! HTTP JSON API
//!
//! Read access to stored farm records plus the same controls the console
//! offers: submitting ids and starting or stopping listing walks.

use crate::crawler::{PipelineHandle, PipelineStatus};
use crate::farm_id::FarmId;
use crate::state::FarmStats;
use crate::FarmError;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// JSON shape of one farm record
#[derive(Debug, Serialize)]
pub struct FarmRecord {
    pub farm_id: FarmId,
    pub fetched_at: DateTime<Utc>,
    pub scores: BTreeMap<&'static str, u8>,
}

impl From<&FarmStats> for FarmRecord {
    fn from(stats: &FarmStats) -> Self {
        Self {
            farm_id: stats.farm_id().clone(),
            fetched_at: stats.fetched_at(),
            scores: stats.scores_by_name(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Queued {
    queued: FarmId,
}

#[derive(Debug, Serialize)]
struct WalkStarted {
    from: u32,
}

#[derive(Debug, Serialize)]
struct StopRequested {
    stop_requested: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Errors a handler can answer with
#[derive(Debug)]
enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<FarmError> for ApiError {
    fn from(err: FarmError) -> Self {
        match err {
            FarmError::InvalidIdentifier(e) => Self::BadRequest(e.to_string()),
            other => Self::Unavailable(other.to_string()),
        }
    }
}

/// Builds the API router over a pipeline handle
pub fn router(handle: PipelineHandle) -> Router {
    Router::new()
        .route("/farms", get(list_farms))
        .route("/farms/:id", get(get_farm).post(submit_farm))
        .route("/status", get(status))
        .route("/spider/latest", post(spider_latest))
        .route("/spider/stop", post(spider_stop))
        .route("/spider/:from", post(spider_range))
        .with_state(handle)
}

/// Serves the API until `shutdown` is cancelled
pub async fn serve(listener: TcpListener, handle: PipelineHandle, shutdown: CancellationToken) {
    let result = axum::serve(listener, router(handle))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    match result {
        Ok(()) => tracing::info!("http api stopped"),
        Err(e) => tracing::error!("http api failed: {}", e),
    }
}

async fn list_farms(State(handle): State<PipelineHandle>) -> Json<Vec<FarmRecord>> {
    let mut records: Vec<FarmRecord> = handle
        .store
        .snapshot()
        .values()
        .map(FarmRecord::from)
        .collect();
    records.sort_by(|a, b| a.farm_id.cmp(&b.farm_id));
    Json(records)
}

async fn get_farm(
    State(handle): State<PipelineHandle>,
    Path(id): Path<String>,
) -> Result<Json<FarmRecord>, ApiError> {
    handle
        .store
        .get(&FarmId::new(id.as_str()))
        .map(|stats| Json(FarmRecord::from(&stats)))
        .ok_or_else(|| ApiError::NotFound(format!("no record for farm {}", id)))
}

async fn submit_farm(
    State(handle): State<PipelineHandle>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Queued>), ApiError> {
    let farm_id = handle.submit(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(Queued { queued: farm_id })))
}

async fn status(State(handle): State<PipelineHandle>) -> Json<PipelineStatus> {
    Json(handle.status())
}

async fn spider_latest(State(handle): State<PipelineHandle>) -> (StatusCode, Json<WalkStarted>) {
    let _ = handle.spider.start_latest();
    (StatusCode::ACCEPTED, Json(WalkStarted { from: 0 }))
}

async fn spider_range(
    State(handle): State<PipelineHandle>,
    Path(from): Path<String>,
) -> Result<(StatusCode, Json<WalkStarted>), ApiError> {
    let from: u32 = from
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid page number [{}]", from)))?;

    let _ = handle.spider.start_range(from);
    Ok((StatusCode::ACCEPTED, Json(WalkStarted { from })))
}

async fn spider_stop(State(handle): State<PipelineHandle>) -> Json<StopRequested> {
    Json(StopRequested {
        stop_requested: handle.spider.request_stop(),
    })
}
