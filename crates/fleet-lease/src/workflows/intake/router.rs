use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::Local;
use serde_json::json;

use super::forms::{LeaseDraft, LesseeForm, MILEAGE_OPTIONS};
use super::service::{IntakeError, IntakeService};
use crate::workflows::fleet::{FleetRepository, RepositoryError, VehicleId};
use crate::workflows::validation::Validate;

/// Router for the lessee registration and lease creation forms.
pub fn intake_router<R>(service: Arc<IntakeService<R>>) -> Router
where
    R: FleetRepository + 'static,
{
    Router::new()
        .route("/api/v1/intake/lessees", post(register_lessee_handler::<R>))
        .route("/api/v1/intake/leases", post(create_lease_handler::<R>))
        .route("/api/v1/intake/leases/preview", post(preview_lease_handler::<R>))
        .with_state(service)
}

fn error_response(error: IntakeError) -> Response {
    match error {
        IntakeError::Invalid(errors) => {
            let payload = json!({ "errors": errors });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        IntakeError::SubmissionFailed(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
        IntakeError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "record already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        IntakeError::Repository(other) => {
            tracing::error!(error = %other, "intake store failure");
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn register_lessee_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Json(form): Json<LesseeForm>,
) -> Response
where
    R: FleetRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.register_lessee(&form, today).await {
        Ok(lessee) => (StatusCode::CREATED, Json(json!({ "lessee": lessee }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_lease_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Json(draft): Json<LeaseDraft>,
) -> Response
where
    R: FleetRepository + 'static,
{
    match service.create_lease(&draft).await {
        Ok(lease) => (StatusCode::CREATED, Json(json!({ "lease": lease }))).into_response(),
        Err(error) => error_response(error),
    }
}

/// Apply the draft's auto-fill rules and report the live summary with current field errors.
pub(crate) async fn preview_lease_handler<R>(
    State(service): State<Arc<IntakeService<R>>>,
    Json(draft): Json<LeaseDraft>,
) -> Response
where
    R: FleetRepository + 'static,
{
    let mut draft = draft.normalized();
    if draft.monthly_payment.trim().is_empty() && !draft.vehicle_id.trim().is_empty() {
        let vehicle_id = draft.vehicle_id.clone();
        match service.repository().vehicle(&VehicleId::from(vehicle_id.as_str())) {
            Ok(vehicle) => draft.select_vehicle(&vehicle_id, vehicle.as_ref()),
            Err(error) => return error_response(error.into()),
        }
    }
    let start_date = draft.start_date;
    draft.set_start_date(start_date);

    let payload = json!({
        "quote": draft.quote(),
        "errors": draft.validate(),
        "mileage_options": MILEAGE_OPTIONS,
        "draft": draft,
    });
    (StatusCode::OK, Json(payload)).into_response()
}
