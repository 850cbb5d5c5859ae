//! Payment lifecycle scenarios run against the simulated gateway with seeded outcomes, so
//! both the settled and the declined branches are exercised through the public service.

mod common {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use fleet_lease::config::SimulationConfig;
    use fleet_lease::workflows::fleet::{
        InMemoryFleetRepository, LesseeId, Payment, PaymentId, PaymentStatus, VehicleId,
    };
    use fleet_lease::workflows::payments::{PaymentService, SimulatedGateway};
    use fleet_lease::workflows::simulation::OutcomeSampler;

    pub(super) fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 10).expect("valid date")
    }

    pub(super) fn ledger(count: usize, status: PaymentStatus, attempts: Option<u32>) -> Vec<Payment> {
        (1..=count)
            .map(|n| Payment {
                status,
                attempt_count: attempts,
                ..Payment::pending(
                    PaymentId(format!("P{n:03}")),
                    LesseeId(format!("L{n:03}")),
                    VehicleId(format!("V{n:03}")),
                    Decimal::from(500),
                    due(),
                )
            })
            .collect()
    }

    pub(super) fn coin_flip_service(
        payments: Vec<Payment>,
        seed: u64,
    ) -> (
        Arc<InMemoryFleetRepository>,
        PaymentService<InMemoryFleetRepository, SimulatedGateway>,
    ) {
        let config = SimulationConfig {
            latency: Duration::ZERO,
            payment_success_rate: 0.5,
            retry_success_rate: 0.5,
            seed: Some(seed),
            ..SimulationConfig::default()
        };
        let repository = Arc::new(InMemoryFleetRepository::seeded(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            payments,
        ));
        let gateway = Arc::new(SimulatedGateway::new(
            &config,
            Arc::new(OutcomeSampler::new(config.seed)),
        ));
        let service = PaymentService::from_config(repository.clone(), gateway, &config);
        (repository, service)
    }
}

use std::collections::HashSet;

use common::*;
use fleet_lease::workflows::fleet::{FleetRepository, PaymentStatus};
use fleet_lease::workflows::payments::RETRY_METHOD;

#[tokio::test]
async fn processing_pending_payments_reaches_only_paid_or_failed() {
    let payments = ledger(40, PaymentStatus::Pending, Some(1));
    let (repository, service) = coin_flip_service(payments.clone(), 2024);

    let mut transaction_ids = HashSet::new();
    let mut outcomes = HashSet::new();
    for before in &payments {
        let after = service
            .process(&before.id, "Credit Card")
            .await
            .expect("processing runs");
        outcomes.insert(after.status);

        match after.status {
            PaymentStatus::Paid => {
                assert!(after.paid_at.is_some());
                assert_eq!(after.payment_method.as_deref(), Some("Credit Card"));
                assert_eq!(after.attempt_count, None, "settling clears earlier attempts");
                let id = after.transaction_id.clone().expect("transaction id");
                assert!(transaction_ids.insert(id), "transaction ids are unique");
            }
            PaymentStatus::Failed => {
                assert_eq!(after.attempt_count, Some(before.attempts() + 1));
                assert!(after.paid_at.is_none());
                assert!(after.transaction_id.is_none());
            }
            other => panic!("unexpected status after processing: {other}"),
        }
    }

    assert_eq!(outcomes.len(), 2, "seeded run covers both branches");
    let stored = repository.payments().expect("list");
    assert!(stored
        .iter()
        .all(|payment| matches!(payment.status, PaymentStatus::Paid | PaymentStatus::Failed)));
}

#[tokio::test]
async fn retries_increment_attempts_on_every_outcome() {
    let payments = ledger(30, PaymentStatus::Failed, Some(2));
    let (_, service) = coin_flip_service(payments.clone(), 7);

    let mut settled = 0;
    for before in &payments {
        let after = service.retry(&before.id).await.expect("retry runs");
        assert_eq!(after.attempt_count, Some(3));
        if after.status == PaymentStatus::Paid {
            settled += 1;
            assert_eq!(after.payment_method.as_deref(), Some(RETRY_METHOD));
        } else {
            assert_eq!(after.status, PaymentStatus::Failed);
        }
    }

    assert!(settled > 0 && settled < payments.len());
}

#[tokio::test]
async fn same_seed_replays_the_same_ledger() {
    let run = |seed| async move {
        let payments = ledger(12, PaymentStatus::Pending, None);
        let (_, service) = coin_flip_service(payments.clone(), seed);
        let mut statuses = Vec::new();
        for payment in &payments {
            let after = service.process(&payment.id, "Cash").await.expect("runs");
            statuses.push(after.status);
        }
        statuses
    };

    assert_eq!(run(99).await, run(99).await);
}
