use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use super::export;
use super::gateway::PaymentGateway;
use super::ledger::{self, PaymentStats, StatusFilter};
use super::service::{PaymentService, PaymentServiceError};
use crate::workflows::fleet::{FleetRepository, LesseeId, Payment, PaymentId, RepositoryError};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LedgerQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProcessBody {
    method: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CollectBody {
    lessee_id: LesseeId,
    amount: Decimal,
    method: String,
}

fn today(explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| Local::now().date_naive())
}

/// Router exposing the payment ledger and the process/retry/collect commands.
pub fn payment_router<R, G>(service: Arc<PaymentService<R, G>>) -> Router
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    Router::new()
        .route("/api/v1/payments", get(ledger_handler::<R, G>))
        .route("/api/v1/payments/export", get(export_handler::<R, G>))
        .route("/api/v1/payments/collect", post(collect_handler::<R, G>))
        .route(
            "/api/v1/payments/:payment_id/process",
            post(process_handler::<R, G>),
        )
        .route(
            "/api/v1/payments/:payment_id/retry",
            post(retry_handler::<R, G>),
        )
        .with_state(service)
}

fn error_response(error: PaymentServiceError) -> Response {
    let status = match &error {
        PaymentServiceError::NotFound(_) | PaymentServiceError::UnknownLessee(_) => {
            StatusCode::NOT_FOUND
        }
        PaymentServiceError::AlreadyPaid(_) | PaymentServiceError::AlreadyInFlight(_) => {
            StatusCode::CONFLICT
        }
        PaymentServiceError::MissingVehicle(_)
        | PaymentServiceError::MissingMethod
        | PaymentServiceError::InvalidAmount => StatusCode::UNPROCESSABLE_ENTITY,
        PaymentServiceError::Repository(_) => {
            tracing::error!(%error, "payment store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

fn outcome_response(payment: Payment) -> Response {
    let payload = json!({
        "outcome": payment.status,
        "payment": payment,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

/// Filtered ledger rows plus stats, or the response explaining why they could not be built.
fn load_rows<R>(
    repository: &R,
    query: &LedgerQuery,
) -> Result<(PaymentStats, Vec<ledger::PaymentRow>), Response>
where
    R: FleetRepository,
{
    let filter = query.status.parse::<StatusFilter>().map_err(|error| {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    })?;
    let today = today(query.today);
    let loaded: Result<_, RepositoryError> =
        repository.payments().and_then(|payments| Ok((payments, repository.lessees()?)));
    let (payments, lessees) = loaded.map_err(|error| error_response(error.into()))?;

    let stats = PaymentStats::from_payments(&payments, today);
    let rows = ledger::search_payments(&payments, &lessees, &query.search, filter, today);
    Ok((stats, rows))
}

pub(crate) async fn ledger_handler<R, G>(
    State(service): State<Arc<PaymentService<R, G>>>,
    Query(query): Query<LedgerQuery>,
) -> Response
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    match load_rows(service.repository().as_ref(), &query) {
        Ok((stats, rows)) => {
            let payload = json!({
                "stats": stats,
                "collection_rate_display": ledger::format_rate(stats.collection_rate),
                "payments": rows,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(rejection) => rejection,
    }
}

pub(crate) async fn export_handler<R, G>(
    State(service): State<Arc<PaymentService<R, G>>>,
    Query(query): Query<LedgerQuery>,
) -> Response
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    let rows = match load_rows(service.repository().as_ref(), &query) {
        Ok((_, rows)) => rows,
        Err(rejection) => return rejection,
    };

    match export::ledger_csv(&rows) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"payments.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, "ledger export failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn process_handler<R, G>(
    State(service): State<Arc<PaymentService<R, G>>>,
    Path(payment_id): Path<String>,
    Json(body): Json<ProcessBody>,
) -> Response
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    match service.process(&PaymentId(payment_id), &body.method).await {
        Ok(payment) => outcome_response(payment),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn retry_handler<R, G>(
    State(service): State<Arc<PaymentService<R, G>>>,
    Path(payment_id): Path<String>,
) -> Response
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    match service.retry(&PaymentId(payment_id)).await {
        Ok(payment) => outcome_response(payment),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn collect_handler<R, G>(
    State(service): State<Arc<PaymentService<R, G>>>,
    Json(body): Json<CollectBody>,
) -> Response
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    let due_date = today(None);
    match service
        .collect(&body.lessee_id, body.amount, &body.method, due_date)
        .await
    {
        Ok(payment) => outcome_response(payment),
        Err(error) => error_response(error),
    }
}
