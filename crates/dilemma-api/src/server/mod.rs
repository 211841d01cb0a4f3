use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{
    AdvanceOutcome, AnalysisReport, ApiError, DecisionOutcome, ErrorCode, ScenarioSet,
    ScenarioView, SessionStatus, Side, SCHEMA_VERSION_V1,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

use crate::DilemmaApi;

include!("error.rs");
include!("state.rs");
include!("routes/session.rs");

pub async fn serve(addr: SocketAddr, api: DilemmaApi) -> Result<(), ServerError> {
    let app = router(api);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "serving dilemma session api");
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(api: DilemmaApi) -> Router {
    let state = AppState::new(api);
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/session/status", get(get_status))
        .route("/api/v1/session/start", post(start_session))
        .route("/api/v1/session/current", get(get_current))
        .route("/api/v1/session/elapsed", get(get_elapsed))
        .route("/api/v1/session/decide", post(decide))
        .route("/api/v1/session/advance", post(advance))
        .route("/api/v1/session/analysis", get(get_analysis))
        .route("/api/v1/session/reset", post(reset_session))
        .with_state(state)
}

#[cfg(test)]
mod tests;
