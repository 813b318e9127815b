//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::error;

use crate::db;
use crate::errors::IndexerError;
use crate::events::{BuyerSummary, EventRecord};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<i64>,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        error!("API request failed: {self}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, IndexerError>;

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns every indexed presale event.
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> ApiResult<EventsResponse> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(EventsResponse {
        account: None,
        phase: None,
        count: events.len(),
        events,
    }))
}

/// `GET /buyers/:address/events`
pub async fn get_buyer_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> ApiResult<EventsResponse> {
    let events = db::get_events_for_account(&state.pool, &address).await?;
    Ok(Json(EventsResponse {
        account: Some(address),
        phase: None,
        count: events.len(),
        events,
    }))
}

/// `GET /buyers/:address/summary`
///
/// Purchased, claimed and still-outstanding totals for one buyer.
pub async fn get_buyer_summary(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> ApiResult<BuyerSummary> {
    let events = db::get_events_for_account(&state.pool, &address).await?;
    Ok(Json(BuyerSummary::from_events(&address, &events)))
}

/// `GET /phases/:index/events`
pub async fn get_phase_events(
    State(state): State<Arc<ApiState>>,
    Path(index): Path<i64>,
) -> ApiResult<EventsResponse> {
    let events = db::get_events_for_phase(&state.pool, index).await?;
    Ok(Json(EventsResponse {
        account: None,
        phase: Some(index),
        count: events.len(),
        events,
    }))
}
