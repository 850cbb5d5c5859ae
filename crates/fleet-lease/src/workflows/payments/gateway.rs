use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::workflows::fleet::{LesseeId, PaymentId, TransactionId};
use crate::workflows::simulation::OutcomeSampler;

/// What prompted a charge: a manual process, an automatic retry of a failed payment, or
/// an ad-hoc collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeKind {
    Initial,
    Retry,
    Collect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeRequest {
    pub payment_id: PaymentId,
    pub lessee_id: LesseeId,
    pub amount: Decimal,
    pub method: String,
    pub kind: ChargeKind,
}

/// Proof of a settled charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub transaction_id: TransactionId,
    pub settled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChargeFailure {
    #[error("charge declined")]
    Declined,
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Capability to move money for a payment. A declined charge is an ordinary outcome,
/// not a fault of the caller.
pub trait PaymentGateway: Send + Sync {
    fn charge(&self, request: &ChargeRequest) -> Result<Receipt, ChargeFailure>;
}

/// Gateway that approves charges at random and numbers its own transactions.
#[derive(Debug)]
pub struct SimulatedGateway {
    sampler: Arc<OutcomeSampler>,
    initial_success_rate: f64,
    retry_success_rate: f64,
    collect_success_rate: f64,
    sequence: AtomicU64,
}

impl SimulatedGateway {
    pub fn new(config: &SimulationConfig, sampler: Arc<OutcomeSampler>) -> Self {
        Self {
            sampler,
            initial_success_rate: config.payment_success_rate,
            retry_success_rate: config.retry_success_rate,
            collect_success_rate: config.collect_success_rate,
            sequence: AtomicU64::new(1),
        }
    }

    fn next_transaction_id(&self) -> TransactionId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        TransactionId(format!("TXN{id:09}"))
    }
}

impl PaymentGateway for SimulatedGateway {
    fn charge(&self, request: &ChargeRequest) -> Result<Receipt, ChargeFailure> {
        let odds = match request.kind {
            ChargeKind::Initial => self.initial_success_rate,
            ChargeKind::Retry => self.retry_success_rate,
            ChargeKind::Collect => self.collect_success_rate,
        };

        if !self.sampler.draw(odds) {
            return Err(ChargeFailure::Declined);
        }

        Ok(Receipt {
            transaction_id: self.next_transaction_id(),
            settled_at: Utc::now(),
        })
    }
}
