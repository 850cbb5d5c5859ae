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

use super::queries::{self, LeaseStats, LesseeStats, VehicleStats};
use super::repository::{FleetRepository, RepositoryError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    today: Option<NaiveDate>,
}

impl ListingQuery {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Read-only listing endpoints for the vehicle, lessee and lease screens.
pub fn fleet_router<R>(repository: Arc<R>) -> Router
where
    R: FleetRepository + 'static,
{
    Router::new()
        .route("/api/v1/vehicles", get(vehicles_handler::<R>))
        .route("/api/v1/lessees", get(lessees_handler::<R>))
        .route("/api/v1/leases", get(leases_handler::<R>))
        .with_state(repository)
}

fn unavailable(error: RepositoryError) -> Response {
    tracing::error!(%error, "fleet listing failed");
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

pub(crate) async fn vehicles_handler<R>(
    State(repository): State<Arc<R>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: FleetRepository + 'static,
{
    let vehicles = match repository.vehicles() {
        Ok(vehicles) => vehicles,
        Err(error) => return unavailable(error),
    };

    let payload = json!({
        "stats": VehicleStats::from_vehicles(&vehicles),
        "vehicles": queries::search_vehicles(&vehicles, &query.search),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn lessees_handler<R>(
    State(repository): State<Arc<R>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: FleetRepository + 'static,
{
    let loaded = repository
        .lessees()
        .and_then(|lessees| Ok((lessees, repository.payments()?)));
    let (lessees, payments) = match loaded {
        Ok(loaded) => loaded,
        Err(error) => return unavailable(error),
    };

    let payload = json!({
        "stats": LesseeStats::from_lessees(&lessees),
        "lessees": queries::search_lessees(&lessees, &payments, &query.search, query.today()),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn leases_handler<R>(
    State(repository): State<Arc<R>>,
    Query(query): Query<ListingQuery>,
) -> Response
where
    R: FleetRepository + 'static,
{
    let loaded = repository.leases().and_then(|leases| {
        Ok((leases, repository.lessees()?, repository.vehicles()?))
    });
    let (leases, lessees, vehicles) = match loaded {
        Ok(loaded) => loaded,
        Err(error) => return unavailable(error),
    };

    let rows = queries::search_leases(&leases, &lessees, &vehicles, &query.search, query.today());
    let payload = json!({
        "stats": LeaseStats::from_leases(&leases),
        "leases": rows,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
