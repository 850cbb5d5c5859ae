use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use super::forms::{LeaseDraft, LeaseParty, LesseeForm};
use crate::config::SimulationConfig;
use crate::workflows::fleet::{
    FleetRepository, LeaseAgreement, LeaseId, LeaseStatus, Lessee, LesseeId, LesseeStatus,
    RepositoryError,
};
use crate::workflows::simulation::{simulate_latency, OutcomeSampler};
use crate::workflows::validation::FieldErrors;

static LESSEE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static LEASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lessee_id() -> LesseeId {
    let id = LESSEE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LesseeId(format!("LSE-{id:06}"))
}

fn next_lease_id() -> LeaseId {
    let id = LEASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeaseId(format!("LEASE-{id:06}"))
}

/// Turns validated intake forms into stored lessees and lease agreements.
pub struct IntakeService<R> {
    repository: Arc<R>,
    sampler: Arc<OutcomeSampler>,
    latency: Duration,
    lessee_success_rate: f64,
    lease_success_rate: f64,
}

impl<R> IntakeService<R>
where
    R: FleetRepository + 'static,
{
    pub fn new(repository: Arc<R>, sampler: Arc<OutcomeSampler>, config: &SimulationConfig) -> Self {
        Self {
            repository,
            sampler,
            latency: config.latency,
            lessee_success_rate: config.lessee_success_rate,
            lease_success_rate: config.lease_success_rate,
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    /// Register a lessee against an existing vehicle. New lessees start out `pending`
    /// with today as their lease start date.
    pub async fn register_lessee(
        &self,
        form: &LesseeForm,
        today: NaiveDate,
    ) -> Result<Lessee, IntakeError> {
        let form = form.clone().normalized();
        let details = form.validated().map_err(IntakeError::Invalid)?;

        if self.repository.vehicle(&details.vehicle_id)?.is_none() {
            return Err(IntakeError::rejected("vehicle_id", "Please select a vehicle"));
        }

        self.submit(SubmissionKind::Lessee, self.lessee_success_rate)
            .await?;

        let lessee = self.repository.insert_lessee(Lessee {
            id: next_lessee_id(),
            name: details.name,
            vehicle_id: Some(details.vehicle_id),
            email: details.email,
            phone: details.phone,
            status: LesseeStatus::Pending,
            lease_start_date: today,
            created_at: Utc::now(),
        })?;

        tracing::info!(lessee_id = %lessee.id, "lessee registered");
        Ok(lessee)
    }

    /// Create an active lease. In new-lessee mode the lessee is stored first and becomes
    /// `active` from the lease start date.
    pub async fn create_lease(&self, draft: &LeaseDraft) -> Result<LeaseAgreement, IntakeError> {
        let draft = draft.clone().normalized();
        let terms = draft.validated().map_err(IntakeError::Invalid)?;

        let mut rejected = FieldErrors::new();
        if self.repository.vehicle(&terms.vehicle_id)?.is_none() {
            rejected.insert("vehicle_id", "Please select a vehicle");
        }
        if let LeaseParty::Existing(lessee_id) = &terms.party {
            if self.repository.lessee(lessee_id)?.is_none() {
                rejected.insert("lessee_id", "Please select a lessee");
            }
        }
        if !rejected.is_empty() {
            return Err(IntakeError::Invalid(rejected));
        }

        self.submit(SubmissionKind::Lease, self.lease_success_rate)
            .await?;

        let lessee_id = match terms.party {
            LeaseParty::Existing(lessee_id) => lessee_id,
            LeaseParty::New(details) => {
                let lessee = self.repository.insert_lessee(Lessee {
                    id: next_lessee_id(),
                    name: details.name,
                    vehicle_id: Some(terms.vehicle_id.clone()),
                    email: details.email,
                    phone: details.phone,
                    status: LesseeStatus::Active,
                    lease_start_date: terms.start_date,
                    created_at: Utc::now(),
                })?;
                tracing::info!(lessee_id = %lessee.id, "lessee created with lease");
                lessee.id
            }
        };

        let lease = self.repository.insert_lease(LeaseAgreement {
            id: next_lease_id(),
            vehicle_id: terms.vehicle_id,
            lessee_id,
            start_date: terms.start_date,
            end_date: terms.end_date,
            monthly_payment: terms.monthly_payment,
            security_deposit: terms.security_deposit,
            mileage_limit: terms.mileage_limit,
            status: LeaseStatus::Active,
            terms: terms.terms,
            notes: terms.notes,
            created_at: Utc::now(),
        })?;

        tracing::info!(lease_id = %lease.id, lessee_id = %lease.lessee_id, "lease created");
        Ok(lease)
    }

    async fn submit(&self, kind: SubmissionKind, odds: f64) -> Result<(), IntakeError> {
        simulate_latency(self.latency).await;
        if self.sampler.draw(odds) {
            Ok(())
        } else {
            tracing::warn!(submission = kind.label(), "simulated submission failed");
            Err(IntakeError::SubmissionFailed(kind))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Lessee,
    Lease,
}

impl SubmissionKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Lessee => "lessee registration",
            Self::Lease => "lease creation",
        }
    }
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("form has invalid fields: {0}")]
    Invalid(FieldErrors),
    #[error("{} failed, please try again", .0.label())]
    SubmissionFailed(SubmissionKind),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntakeError {
    fn rejected(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message);
        Self::Invalid(errors)
    }
}
