use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::config::SimulationConfig;
use crate::workflows::fleet::{
    InMemoryFleetRepository, Lessee, LesseeId, LesseeStatus, Vehicle, VehicleId, VehicleStatus,
};
use crate::workflows::intake::{IntakeService, LeaseDraft, LesseeForm, LesseeMode};
use crate::workflows::simulation::OutcomeSampler;

pub(super) const TERMS: &str =
    "Standard lease terms: vehicle returned in good condition, excess mileage billed per mile.";

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn malibu() -> Vehicle {
    Vehicle {
        id: VehicleId::from("V004"),
        make: "Chevrolet".to_string(),
        model: "Malibu".to_string(),
        year: 2022,
        vin: "1G1ZD5ST4NF123456".to_string(),
        license_plate: "GHI-789".to_string(),
        color: "White".to_string(),
        mileage: 18_000,
        status: VehicleStatus::Available,
        monthly_rate: Decimal::from(420),
    }
}

pub(super) fn repository() -> InMemoryFleetRepository {
    InMemoryFleetRepository::seeded(
        vec![malibu()],
        vec![Lessee {
            id: LesseeId::from("L001"),
            name: "John Smith".to_string(),
            vehicle_id: None,
            email: "john.smith@email.com".to_string(),
            phone: "(555) 123-4567".to_string(),
            status: LesseeStatus::Active,
            lease_start_date: date(2023, 6, 1),
            created_at: Utc.with_ymd_and_hms(2023, 6, 1, 9, 0, 0).unwrap(),
        }],
        Vec::new(),
        Vec::new(),
    )
}

/// Service whose simulated submissions succeed or fail with certainty.
pub(super) fn service(
    repository: Arc<InMemoryFleetRepository>,
    succeed: bool,
) -> IntakeService<InMemoryFleetRepository> {
    let odds = if succeed { 1.0 } else { 0.0 };
    let config = SimulationConfig {
        lessee_success_rate: odds,
        lease_success_rate: odds,
        ..SimulationConfig::deterministic()
    };
    IntakeService::new(repository, Arc::new(OutcomeSampler::new(Some(11))), &config)
}

pub(super) fn lessee_form() -> LesseeForm {
    LesseeForm {
        name: "Maria Garcia".to_string(),
        vehicle_id: "V004".to_string(),
        email: "maria.garcia@email.com".to_string(),
        phone: "(555) 222-3344".to_string(),
    }
}

/// Valid draft for the seeded Malibu and existing lessee L001.
pub(super) fn lease_draft() -> LeaseDraft {
    let mut draft = LeaseDraft {
        lessee_mode: LesseeMode::Existing,
        lessee_id: "L001".to_string(),
        terms: TERMS.to_string(),
        ..LeaseDraft::default()
    };
    draft.select_vehicle("V004", Some(&malibu()));
    draft.set_start_date(Some(date(2024, 1, 1)));
    draft
}
