use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::gateway::{ChargeKind, ChargeRequest, PaymentGateway};
use super::lifecycle::{self, RETRY_METHOD};
use crate::config::SimulationConfig;
use crate::workflows::fleet::{
    FleetRepository, LesseeId, Payment, PaymentId, PaymentStatus, RepositoryError,
};
use crate::workflows::simulation::simulate_latency;

/// Largest single amount `collect` will accept.
pub const MAX_PAYMENT_AMOUNT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

static PAYMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_payment_id() -> PaymentId {
    let id = PAYMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PaymentId(format!("PAY-{id:06}"))
}

/// Drives payments through the gateway and records each outcome in the store.
pub struct PaymentService<R, G> {
    repository: Arc<R>,
    gateway: Arc<G>,
    latency: Duration,
    in_flight: Mutex<HashSet<PaymentId>>,
}

/// Marks a payment busy until dropped.
struct InFlightClaim<'a> {
    registry: &'a Mutex<HashSet<PaymentId>>,
    payment_id: PaymentId,
}

impl Drop for InFlightClaim<'_> {
    fn drop(&mut self) {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.payment_id);
    }
}

impl<R, G> PaymentService<R, G>
where
    R: FleetRepository + 'static,
    G: PaymentGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>, latency: Duration) -> Self {
        Self {
            repository,
            gateway,
            latency,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn from_config(repository: Arc<R>, gateway: Arc<G>, config: &SimulationConfig) -> Self {
        Self::new(repository, gateway, config.latency)
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn claim(&self, payment_id: &PaymentId) -> Result<InFlightClaim<'_>, PaymentServiceError> {
        let mut busy = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !busy.insert(payment_id.clone()) {
            return Err(PaymentServiceError::AlreadyInFlight(payment_id.clone()));
        }
        Ok(InFlightClaim {
            registry: &self.in_flight,
            payment_id: payment_id.clone(),
        })
    }

    fn unpaid(&self, payment_id: &PaymentId) -> Result<Payment, PaymentServiceError> {
        let payment = self
            .repository
            .payment(payment_id)?
            .ok_or_else(|| PaymentServiceError::NotFound(payment_id.clone()))?;
        if payment.status == PaymentStatus::Paid {
            return Err(PaymentServiceError::AlreadyPaid(payment_id.clone()));
        }
        Ok(payment)
    }

    /// Charge a payment with the given method. A declined charge is returned as a
    /// `failed` payment, not as an error.
    pub async fn process(
        &self,
        payment_id: &PaymentId,
        method: &str,
    ) -> Result<Payment, PaymentServiceError> {
        self.charge_unpaid(payment_id, method, ChargeKind::Initial)
            .await
    }

    async fn charge_unpaid(
        &self,
        payment_id: &PaymentId,
        method: &str,
        kind: ChargeKind,
    ) -> Result<Payment, PaymentServiceError> {
        let method = method.trim();
        if method.is_empty() {
            return Err(PaymentServiceError::MissingMethod);
        }

        let _claim = self.claim(payment_id)?;
        let payment = self.unpaid(payment_id)?;

        simulate_latency(self.latency).await;

        let outcome = self.gateway.charge(&ChargeRequest {
            payment_id: payment.id.clone(),
            lessee_id: payment.lessee_id.clone(),
            amount: payment.amount,
            method: method.to_string(),
            kind,
        });
        let next = lifecycle::apply_process(&payment, method, &outcome);
        self.repository.update_payment(next.clone())?;

        tracing::info!(
            payment_id = %next.id,
            status = %next.status,
            attempts = next.attempts(),
            ?kind,
            "payment processed"
        );
        Ok(next)
    }

    /// Re-run a charge automatically. Every retry counts as an attempt.
    pub async fn retry(&self, payment_id: &PaymentId) -> Result<Payment, PaymentServiceError> {
        let _claim = self.claim(payment_id)?;
        let payment = self.unpaid(payment_id)?;

        simulate_latency(self.latency).await;

        let outcome = self.gateway.charge(&ChargeRequest {
            payment_id: payment.id.clone(),
            lessee_id: payment.lessee_id.clone(),
            amount: payment.amount,
            method: RETRY_METHOD.to_string(),
            kind: ChargeKind::Retry,
        });
        let next = lifecycle::apply_retry(&payment, &outcome);
        self.repository.update_payment(next.clone())?;

        tracing::info!(
            payment_id = %next.id,
            status = %next.status,
            attempts = next.attempts(),
            "payment retried"
        );
        Ok(next)
    }

    /// Take an ad-hoc payment from a lessee: record a pending charge due on `due_date`
    /// against their vehicle, then charge it at the collection odds. Amounts must lie in
    /// `(0, MAX_PAYMENT_AMOUNT]`.
    pub async fn collect(
        &self,
        lessee_id: &LesseeId,
        amount: Decimal,
        method: &str,
        due_date: NaiveDate,
    ) -> Result<Payment, PaymentServiceError> {
        if method.trim().is_empty() {
            return Err(PaymentServiceError::MissingMethod);
        }
        if amount <= Decimal::ZERO || amount > MAX_PAYMENT_AMOUNT {
            return Err(PaymentServiceError::InvalidAmount);
        }

        let lessee = self
            .repository
            .lessee(lessee_id)?
            .ok_or_else(|| PaymentServiceError::UnknownLessee(lessee_id.clone()))?;
        let vehicle_id = lessee
            .vehicle_id
            .ok_or_else(|| PaymentServiceError::MissingVehicle(lessee_id.clone()))?;

        let pending = self.repository.insert_payment(Payment::pending(
            next_payment_id(),
            lessee.id,
            vehicle_id,
            amount,
            due_date,
        ))?;
        tracing::debug!(payment_id = %pending.id, "payment recorded for collection");

        self.charge_unpaid(&pending.id, method, ChargeKind::Collect)
            .await
    }
}

/// Error raised by the payment service.
#[derive(Debug, thiserror::Error)]
pub enum PaymentServiceError {
    #[error("payment {0} not found")]
    NotFound(PaymentId),
    #[error("payment {0} is already paid")]
    AlreadyPaid(PaymentId),
    #[error("payment {0} is already being processed")]
    AlreadyInFlight(PaymentId),
    #[error("lessee {0} not found")]
    UnknownLessee(LesseeId),
    #[error("lessee {0} has no vehicle assigned")]
    MissingVehicle(LesseeId),
    #[error("payment method is required")]
    MissingMethod,
    #[error("payment amount must be greater than zero and at most {}", MAX_PAYMENT_AMOUNT)]
    InvalidAmount,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
