pub mod dashboard;
pub mod fleet;
pub mod intake;
pub mod leases;
pub mod payments;
pub mod simulation;
pub mod validation;

use std::sync::Arc;

use axum::Router;

use fleet::FleetRepository;
use intake::IntakeService;
use payments::{PaymentGateway, PaymentService};

/// Merge every workflow router into a single API surface sharing one store.
pub fn api_router<R, G>(
    repository: Arc<R>,
    payments: Arc<PaymentService<R, G>>,
    intake: Arc<IntakeService<R>>,
) -> Router
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    fleet::fleet_router(repository.clone())
        .merge(dashboard::dashboard_router(repository))
        .merge(payments::payment_router(payments))
        .merge(intake::intake_router(intake))
}
