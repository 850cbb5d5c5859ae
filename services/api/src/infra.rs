use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use fleet_lease::config::SimulationConfig;
use fleet_lease::workflows::fleet::{
    InMemoryFleetRepository, LeaseAgreement, LeaseId, LeaseStatus, Lessee, LesseeId,
    LesseeStatus, Payment, PaymentId, PaymentStatus, TransactionId, Vehicle, VehicleId,
    VehicleStatus,
};
use fleet_lease::workflows::intake::IntakeService;
use fleet_lease::workflows::payments::{PaymentService, SimulatedGateway, StatusFilter};
use fleet_lease::workflows::simulation::OutcomeSampler;
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type Store = InMemoryFleetRepository;
pub(crate) type Payments = PaymentService<Store, SimulatedGateway>;
pub(crate) type Intake = IntakeService<Store>;

/// Everything a command needs, wired against one shared store and one outcome sampler.
pub(crate) struct Services {
    pub(crate) repository: Arc<Store>,
    pub(crate) payments: Arc<Payments>,
    pub(crate) intake: Arc<Intake>,
}

impl Services {
    pub(crate) fn new(repository: Store, config: &SimulationConfig) -> Self {
        let repository = Arc::new(repository);
        let sampler = Arc::new(OutcomeSampler::new(config.seed));
        let gateway = Arc::new(SimulatedGateway::new(config, sampler.clone()));
        let payments = Arc::new(PaymentService::from_config(
            repository.clone(),
            gateway,
            config,
        ));
        let intake = Arc::new(IntakeService::new(repository.clone(), sampler, config));
        Self {
            repository,
            payments,
            intake,
        }
    }
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

fn timestamp(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(9, 0, 0).expect("valid seed time"))
}

#[allow(clippy::too_many_arguments)]
fn vehicle(
    id: &str,
    year: u16,
    make: &str,
    model: &str,
    plate: &str,
    color: &str,
    mileage: u32,
    status: VehicleStatus,
    rate: u32,
) -> Vehicle {
    Vehicle {
        id: VehicleId::from(id),
        make: make.to_string(),
        model: model.to_string(),
        year,
        vin: format!("DEMO{year}{}", id.trim_start_matches('V')),
        license_plate: plate.to_string(),
        color: color.to_string(),
        mileage,
        status,
        monthly_rate: Decimal::from(rate),
    }
}

fn lessee(
    id: &str,
    name: &str,
    vehicle_id: Option<&str>,
    email: &str,
    phone: &str,
    status: LesseeStatus,
    since: NaiveDate,
) -> Lessee {
    Lessee {
        id: LesseeId::from(id),
        name: name.to_string(),
        vehicle_id: vehicle_id.map(VehicleId::from),
        email: email.to_string(),
        phone: phone.to_string(),
        status,
        lease_start_date: since,
        created_at: timestamp(since),
    }
}

fn lease(id: &str, vehicle_id: &str, lessee_id: &str, start: NaiveDate, terms: (u32, u32, u32)) -> LeaseAgreement {
    let (monthly, deposit, mileage_limit) = terms;
    LeaseAgreement {
        id: LeaseId::from(id),
        vehicle_id: VehicleId::from(vehicle_id),
        lessee_id: LesseeId::from(lessee_id),
        start_date: start,
        end_date: start
            .checked_add_months(chrono::Months::new(12))
            .unwrap_or(start),
        monthly_payment: Decimal::from(monthly),
        security_deposit: Decimal::from(deposit),
        mileage_limit,
        status: LeaseStatus::Active,
        terms: "Standard twelve month lease. Lessee maintains full coverage insurance and \
                returns the vehicle with normal wear only."
            .to_string(),
        notes: None,
        created_at: timestamp(start),
    }
}

fn payment(
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

/// Demo fleet: a handful of leased vehicles with a ledger showing one payment in each state,
/// plus the unassigned vehicles offered on the new-lease form.
pub(crate) fn seed_repository() -> InMemoryFleetRepository {
    use VehicleStatus::{Available, Leased, Maintenance};

    let vehicles = vec![
        vehicle("V001", 2023, "Toyota", "Camry", "ABC-123", "Silver", 15_000, Leased, 450),
        vehicle("V002", 2022, "Honda", "Civic", "XYZ-789", "Blue", 22_000, Leased, 380),
        vehicle("V003", 2023, "Ford", "Explorer", "DEF-456", "Black", 11_000, Leased, 520),
        vehicle("V004", 2022, "Chevrolet", "Malibu", "GHI-789", "White", 18_000, Available, 420),
        vehicle("V005", 2021, "Nissan", "Rogue", "KLM-234", "Gray", 41_000, Maintenance, 390),
        vehicle("V007", 2022, "Mercedes", "C-Class", "JKL-012", "Silver", 12_000, Available, 650),
        vehicle("V010", 2023, "Acura", "TLX", "MNO-345", "Black", 8_000, Available, 580),
        vehicle("V011", 2021, "Nissan", "Altima", "RST-567", "Red", 33_000, Leased, 400),
        vehicle("V012", 2023, "Cadillac", "XT5", "PQR-678", "Blue", 5_000, Available, 720),
        vehicle("V015", 2022, "Genesis", "G90", "STU-901", "Black", 15_000, Available, 800),
        vehicle("V016", 2022, "Hyundai", "Sonata", "VWX-890", "White", 27_000, Leased, 430),
    ];

    let lessees = vec![
        lessee("L001", "John Smith", Some("V001"), "john.smith@email.com", "(555) 123-4567", LesseeStatus::Active, day(2024, 1, 15)),
        lessee("L002", "Sarah Johnson", Some("V002"), "sarah.j@email.com", "(555) 987-6543", LesseeStatus::Active, day(2024, 1, 10)),
        lessee("L003", "Mike Davis", Some("V003"), "mike.davis@email.com", "(555) 456-7890", LesseeStatus::Active, day(2024, 1, 8)),
        lessee("L004", "Emily Wilson", None, "emily.w@email.com", "(555) 234-5678", LesseeStatus::Pending, day(2024, 2, 1)),
        lessee("L005", "David Brown", None, "david.brown@email.com", "(555) 345-6789", LesseeStatus::Inactive, day(2023, 3, 1)),
        lessee("L008", "Jennifer Lee", Some("V011"), "jennifer.lee@email.com", "(555) 678-9012", LesseeStatus::Active, day(2023, 11, 1)),
        lessee("L011", "Kevin Anderson", Some("V016"), "kevin.a@email.com", "(555) 890-1234", LesseeStatus::Active, day(2023, 12, 1)),
    ];

    let leases = vec![
        lease("LEASE-2401", "V001", "L001", day(2024, 1, 15), (450, 900, 12_000)),
        lease("LEASE-2402", "V002", "L002", day(2024, 1, 10), (380, 760, 15_000)),
        lease("LEASE-2403", "V003", "L003", day(2024, 1, 8), (520, 1_040, 10_000)),
    ];

    let mut settled = payment("P001", "L001", "V001", day(2024, 2, 15), PaymentStatus::Paid, None);
    settled.paid_at = Some(timestamp(day(2024, 2, 14)));
    settled.payment_method = Some("Credit Card".to_string());
    settled.transaction_id = Some(TransactionId::from("TXN001234"));

    let payments = vec![
        settled,
        payment("P002", "L002", "V002", day(2024, 1, 15), PaymentStatus::Overdue, Some(2)),
        payment("P003", "L003", "V003", day(2024, 2, 10), PaymentStatus::Pending, None),
        payment("P004", "L008", "V011", day(2024, 2, 5), PaymentStatus::Failed, Some(3)),
        payment("P005", "L011", "V016", day(2024, 1, 25), PaymentStatus::Overdue, Some(1)),
    ];

    InMemoryFleetRepository::seeded(vehicles, lessees, leases, payments)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_status_filter(raw: &str) -> Result<StatusFilter, String> {
    raw.parse::<StatusFilter>()
        .map_err(|err| format!("{err} (expected all, paid, pending, overdue or failed)"))
}
