//! Dashboard rollup: fleet utilization, monthly collections and the lessees that need a
//! follow-up.

mod summary;
pub mod views;

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::workflows::fleet::{FleetRepository, RepositoryError};

pub use summary::{DashboardReport, ATTENTION_LIMIT};
pub use views::{AttentionEntry, CollectionRating, DashboardSummary};

/// Load every record from the store and summarize it as of `today`.
pub fn dashboard_summary<R>(repository: &R, today: NaiveDate) -> Result<DashboardSummary, RepositoryError>
where
    R: FleetRepository + ?Sized,
{
    let vehicles = repository.vehicles()?;
    let lessees = repository.lessees()?;
    let payments = repository.payments()?;
    Ok(DashboardReport::build(&vehicles, &lessees, &payments, today).summary())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    #[serde(default)]
    today: Option<NaiveDate>,
}

pub fn dashboard_router<R>(repository: Arc<R>) -> Router
where
    R: FleetRepository + 'static,
{
    Router::new()
        .route("/api/v1/dashboard", get(dashboard_handler::<R>))
        .with_state(repository)
}

pub(crate) async fn dashboard_handler<R>(
    State(repository): State<Arc<R>>,
    Query(query): Query<DashboardQuery>,
) -> Response
where
    R: FleetRepository + 'static,
{
    let today = query.today.unwrap_or_else(|| Local::now().date_naive());
    match dashboard_summary(repository.as_ref(), today) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(error) => {
            tracing::error!(%error, "dashboard summary failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
