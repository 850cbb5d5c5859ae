//! Dashboard rollups over small fleets, both as a library call and through the HTTP API.

mod common {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use fleet_lease::config::SimulationConfig;
    use fleet_lease::workflows::api_router;
    use fleet_lease::workflows::fleet::{
        InMemoryFleetRepository, Lessee, LesseeId, LesseeStatus, Payment, PaymentId,
        PaymentStatus, Vehicle, VehicleId, VehicleStatus,
    };
    use fleet_lease::workflows::intake::IntakeService;
    use fleet_lease::workflows::payments::{PaymentService, SimulatedGateway};
    use fleet_lease::workflows::simulation::OutcomeSampler;

    pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    pub(super) fn vehicle(id: &str, status: VehicleStatus, rate: u32) -> Vehicle {
        Vehicle {
            id: VehicleId::from(id),
            make: "Honda".to_string(),
            model: "Accord".to_string(),
            year: 2023,
            vin: format!("1HGCV1F3{id}"),
            license_plate: format!("{id}-ACC"),
            color: "Blue".to_string(),
            mileage: 9_000,
            status,
            monthly_rate: Decimal::from(rate),
        }
    }

    pub(super) fn lessee(id: &str, vehicle_id: &str) -> Lessee {
        Lessee {
            id: LesseeId::from(id),
            name: format!("Lessee {id}"),
            vehicle_id: Some(VehicleId::from(vehicle_id)),
            email: format!("{}@email.com", id.to_lowercase()),
            phone: "(555) 000-0000".to_string(),
            status: LesseeStatus::Active,
            lease_start_date: date(2023, 1, 1),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 8, 0, 0).unwrap(),
        }
    }

    pub(super) fn payment(id: &str, lessee: &Lessee, due: NaiveDate, status: PaymentStatus) -> Payment {
        Payment {
            status,
            ..Payment::pending(
                PaymentId::from(id),
                lessee.id.clone(),
                lessee.vehicle_id.clone().expect("lessee has a vehicle"),
                Decimal::from(500),
                due,
            )
        }
    }

    pub(super) fn router(repository: InMemoryFleetRepository) -> axum::Router {
        let repository = Arc::new(repository);
        let config = SimulationConfig::deterministic();
        let sampler = Arc::new(OutcomeSampler::new(config.seed));
        let gateway = Arc::new(SimulatedGateway::new(&config, sampler.clone()));
        let payments = Arc::new(PaymentService::from_config(
            repository.clone(),
            gateway,
            &config,
        ));
        let intake = Arc::new(IntakeService::new(repository.clone(), sampler, &config));
        api_router(repository, payments, intake)
    }
}

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use common::*;
use fleet_lease::workflows::dashboard::{dashboard_summary, CollectionRating, ATTENTION_LIMIT};
use fleet_lease::workflows::fleet::{InMemoryFleetRepository, PaymentStatus, VehicleStatus};

#[test]
fn empty_fleet_reports_undefined_rate() {
    let repository = InMemoryFleetRepository::new();
    let summary = dashboard_summary(&repository, date(2024, 3, 1)).expect("summary");

    assert_eq!(summary.collection_rate, None);
    assert_eq!(summary.collection_rate_display, "N/A");
    assert_eq!(summary.collection_rating, None);
    assert!(summary.attention.is_empty());
}

#[test]
fn partial_collection_is_rated_against_leased_rates() {
    let first = lessee("L001", "V001");
    let second = lessee("L002", "V002");
    let repository = InMemoryFleetRepository::seeded(
        vec![
            vehicle("V001", VehicleStatus::Leased, 500),
            vehicle("V002", VehicleStatus::Leased, 300),
            vehicle("V003", VehicleStatus::Available, 900),
        ],
        vec![first.clone(), second.clone()],
        Vec::new(),
        vec![
            payment("P001", &first, date(2024, 2, 15), PaymentStatus::Paid),
            payment("P002", &second, date(2024, 2, 1), PaymentStatus::Pending),
        ],
    );

    let summary = dashboard_summary(&repository, date(2024, 2, 20)).expect("summary");

    assert_eq!(summary.fleet.leased, 2);
    assert_eq!(summary.collection_rate_display, "62.5%");
    assert_eq!(summary.collection_rating, Some(CollectionRating::NeedsAttention));
    assert_eq!(summary.payment_issue_count, 1);
    assert_eq!(summary.attention.len(), 1);
    assert_eq!(summary.attention[0].lessee_id, second.id);
    assert_eq!(summary.attention[0].payment_status, PaymentStatus::Overdue);
}

#[test]
fn attention_panel_lists_issues_before_pending_and_is_capped() {
    let mut vehicles = Vec::new();
    let mut lessees = Vec::new();
    let mut payments = Vec::new();
    for n in 1..=8 {
        let vehicle_id = format!("V{n:03}");
        let holder = lessee(&format!("L{n:03}"), &vehicle_id);
        let (due, status) = if n <= 4 {
            (date(2024, 4, 1), PaymentStatus::Pending)
        } else {
            (date(2024, 2, 1), PaymentStatus::Failed)
        };
        payments.push(payment(&format!("P{n:03}"), &holder, due, status));
        vehicles.push(vehicle(&vehicle_id, VehicleStatus::Leased, 400));
        lessees.push(holder);
    }
    let repository = InMemoryFleetRepository::seeded(vehicles, lessees, Vec::new(), payments);

    let summary = dashboard_summary(&repository, date(2024, 3, 1)).expect("summary");

    assert_eq!(summary.payment_issue_count, 4);
    assert_eq!(summary.pending_count, 4);
    assert_eq!(summary.attention.len(), ATTENTION_LIMIT);
    assert!(summary.attention[..4]
        .iter()
        .all(|entry| entry.payment_status.needs_attention()));
    assert!(summary.attention[4..]
        .iter()
        .all(|entry| entry.payment_status == PaymentStatus::Pending));
    assert_eq!(summary.collection_rate_display, "0.0%");
}

#[tokio::test]
async fn dashboard_route_serves_the_summary() {
    let holder = lessee("L001", "V001");
    let repository = InMemoryFleetRepository::seeded(
        vec![vehicle("V001", VehicleStatus::Leased, 450)],
        vec![holder.clone()],
        Vec::new(),
        vec![payment("P001", &holder, date(2024, 2, 15), PaymentStatus::Paid)],
    );

    let response = router(repository)
        .oneshot(
            Request::get("/api/v1/dashboard?today=2024-02-20")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["as_of"], "2024-02-20");
    assert_eq!(payload["collection_rate_display"], "100.0%");
    assert_eq!(payload["collection_rating_label"], "Excellent");
    assert_eq!(payload["fleet"]["leased"], 1);
    assert!(payload["attention"].as_array().expect("attention list").is_empty());
}
