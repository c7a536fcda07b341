//! Liveness endpoint, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use claimtrack_core::types::Date;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    /// `ok` when the database answers, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    /// The database's current date, which every case status is evaluated
    /// against. `None` when the database is unreachable.
    pub status_date: Option<Date>,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<Health> {
    let status_date = match claimtrack_db::current_date(&state.pool).await {
        Ok(date) => Some(date),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            None
        }
    };

    Json(Health {
        status: if status_date.is_some() { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        status_date,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
