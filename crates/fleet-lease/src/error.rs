use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::fleet::RepositoryError;
use crate::workflows::intake::IntakeError;
use crate::workflows::payments::{ExportError, PaymentServiceError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Repository(RepositoryError),
    Payments(PaymentServiceError),
    Intake(IntakeError),
    Export(ExportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Repository(err) => write!(f, "store error: {err}"),
            AppError::Payments(err) => write!(f, "payment error: {err}"),
            AppError::Intake(err) => write!(f, "intake error: {err}"),
            AppError::Export(err) => write!(f, "export error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Repository(err) => Some(err),
            AppError::Payments(err) => Some(err),
            AppError::Intake(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Payments(
                PaymentServiceError::NotFound(_) | PaymentServiceError::UnknownLessee(_),
            )
            | AppError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Payments(
                PaymentServiceError::AlreadyPaid(_) | PaymentServiceError::AlreadyInFlight(_),
            )
            | AppError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            AppError::Payments(
                PaymentServiceError::MissingVehicle(_)
                | PaymentServiceError::MissingMethod
                | PaymentServiceError::InvalidAmount,
            )
            | AppError::Intake(IntakeError::Invalid(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Intake(IntakeError::SubmissionFailed(_)) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Repository(_)
            | AppError::Payments(PaymentServiceError::Repository(_))
            | AppError::Intake(IntakeError::Repository(_))
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Intake(IntakeError::Invalid(errors)) => Json(json!({ "errors": errors })),
            _ => Json(json!({ "error": self.to_string() })),
        };
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Repository(value)
    }
}

impl From<PaymentServiceError> for AppError {
    fn from(value: PaymentServiceError) -> Self {
        Self::Payments(value)
    }
}

impl From<IntakeError> for AppError {
    fn from(value: IntakeError) -> Self {
        Self::Intake(value)
    }
}

impl From<ExportError> for AppError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
