use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::workflows::fleet::{
    FleetRepository, InMemoryFleetRepository, LeaseAgreement, LeaseId, Lessee, LesseeId,
    LesseeStatus, Payment, PaymentId, PaymentStatus, RepositoryError, TransactionId, Vehicle,
    VehicleId, VehicleStatus,
};
use crate::workflows::payments::{
    ChargeFailure, ChargeRequest, PaymentGateway, PaymentService, Receipt,
};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn vehicle(id: &str, status: VehicleStatus) -> Vehicle {
    Vehicle {
        id: VehicleId::from(id),
        make: "Chevrolet".to_string(),
        model: "Malibu".to_string(),
        year: 2022,
        vin: format!("1G1ZD5ST{id}"),
        license_plate: format!("{id}-LSE"),
        color: "Silver".to_string(),
        mileage: 24_000,
        status,
        monthly_rate: Decimal::from(500),
    }
}

pub(super) fn lessee(id: &str, name: &str, vehicle_id: Option<&str>) -> Lessee {
    Lessee {
        id: LesseeId::from(id),
        name: name.to_string(),
        vehicle_id: vehicle_id.map(VehicleId::from),
        email: format!("{}@email.com", name.to_lowercase().replace(' ', ".")),
        phone: "(555) 123-4567".to_string(),
        status: LesseeStatus::Active,
        lease_start_date: date(2023, 6, 1),
        created_at: Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub(super) fn payment(
    id: &str,
    lessee_id: &str,
    vehicle_id: &str,
    due: NaiveDate,
    status: PaymentStatus,
    attempts: Option<u32>,
) -> Payment {
    Payment {
        status,
        attempt_count: attempts,
        ..Payment::pending(
            PaymentId::from(id),
            LesseeId::from(lessee_id),
            VehicleId::from(vehicle_id),
            Decimal::from(500),
            due,
        )
    }
}

/// Ledger shaped like the payments screen: one of each status.
pub(super) fn seeded_repository() -> InMemoryFleetRepository {
    let mut settled = payment("P001", "L001", "V001", date(2024, 2, 15), PaymentStatus::Paid, None);
    settled.payment_method = Some("Credit Card".to_string());
    settled.transaction_id = Some(TransactionId::from("TXN001234"));

    InMemoryFleetRepository::seeded(
        vec![
            vehicle("V001", VehicleStatus::Leased),
            vehicle("V002", VehicleStatus::Leased),
            vehicle("V003", VehicleStatus::Leased),
        ],
        vec![
            lessee("L001", "John Smith", Some("V001")),
            lessee("L002", "Sarah Johnson", Some("V002")),
            lessee("L003", "Mike Davis", Some("V003")),
            lessee("L009", "Walk In", None),
        ],
        Vec::new(),
        vec![
            settled,
            payment("P002", "L002", "V002", date(2024, 1, 15), PaymentStatus::Overdue, Some(2)),
            payment("P003", "L003", "V003", date(2024, 2, 10), PaymentStatus::Pending, None),
            payment("P004", "L003", "V003", date(2024, 2, 5), PaymentStatus::Failed, Some(3)),
        ],
    )
}

/// Gateway with a fixed verdict that remembers every request it saw.
#[derive(Debug)]
pub(super) struct FixedGateway {
    approve: bool,
    sequence: AtomicU64,
    requests: Mutex<Vec<ChargeRequest>>,
}

impl FixedGateway {
    pub(super) fn approving() -> Self {
        Self::new(true)
    }

    pub(super) fn declining() -> Self {
        Self::new(false)
    }

    fn new(approve: bool) -> Self {
        Self {
            approve,
            sequence: AtomicU64::new(1),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<ChargeRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl PaymentGateway for FixedGateway {
    fn charge(&self, request: &ChargeRequest) -> Result<Receipt, ChargeFailure> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        if !self.approve {
            return Err(ChargeFailure::Declined);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(Receipt {
            transaction_id: TransactionId(format!("TXN-TEST-{id}")),
            settled_at: Utc::now(),
        })
    }
}

pub(super) fn service<G>(
    repository: Arc<InMemoryFleetRepository>,
    gateway: Arc<G>,
) -> PaymentService<InMemoryFleetRepository, G>
where
    G: PaymentGateway + 'static,
{
    PaymentService::new(repository, gateway, Duration::ZERO)
}

pub(super) struct UnavailableRepository;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("store offline".to_string()))
}

impl FleetRepository for UnavailableRepository {
    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        offline()
    }

    fn vehicle(&self, _id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        offline()
    }

    fn lessees(&self) -> Result<Vec<Lessee>, RepositoryError> {
        offline()
    }

    fn lessee(&self, _id: &LesseeId) -> Result<Option<Lessee>, RepositoryError> {
        offline()
    }

    fn insert_lessee(&self, _lessee: Lessee) -> Result<Lessee, RepositoryError> {
        offline()
    }

    fn leases(&self) -> Result<Vec<LeaseAgreement>, RepositoryError> {
        offline()
    }

    fn lease(&self, _id: &LeaseId) -> Result<Option<LeaseAgreement>, RepositoryError> {
        offline()
    }

    fn insert_lease(&self, _lease: LeaseAgreement) -> Result<LeaseAgreement, RepositoryError> {
        offline()
    }

    fn payments(&self) -> Result<Vec<Payment>, RepositoryError> {
        offline()
    }

    fn payment(&self, _id: &PaymentId) -> Result<Option<Payment>, RepositoryError> {
        offline()
    }

    fn insert_payment(&self, _payment: Payment) -> Result<Payment, RepositoryError> {
        offline()
    }

    fn update_payment(&self, _payment: Payment) -> Result<(), RepositoryError> {
        offline()
    }
}

pub(super) async fn read_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
