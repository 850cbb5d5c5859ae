use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{
    LeaseAgreement, LeaseStatus, Lessee, LesseeStatus, Payment, PaymentStatus, Vehicle,
    VehicleStatus,
};
use crate::workflows::leases::financials;
use crate::workflows::payments::ledger;

fn matches_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Vehicles whose make, model or plate contains `search` (case-insensitive).
pub fn search_vehicles<'a>(vehicles: &'a [Vehicle], search: &str) -> Vec<&'a Vehicle> {
    let needle = search.trim().to_lowercase();
    vehicles
        .iter()
        .filter(|vehicle| {
            needle.is_empty()
                || matches_ci(&vehicle.make, &needle)
                || matches_ci(&vehicle.model, &needle)
                || matches_ci(&vehicle.license_plate, &needle)
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleStats {
    pub total: usize,
    pub available: usize,
    pub leased: usize,
    pub maintenance: usize,
}

impl VehicleStats {
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        vehicles
            .iter()
            .fold(Self::default(), |mut stats, vehicle| {
                stats.total += 1;
                match vehicle.status {
                    VehicleStatus::Available => stats.available += 1,
                    VehicleStatus::Leased => stats.leased += 1,
                    VehicleStatus::Maintenance => stats.maintenance += 1,
                }
                stats
            })
    }
}

/// Lessee listing row with its payment standing derived from the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LesseeRow {
    #[serde(flatten)]
    pub lessee: Lessee,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
}

/// Name, email and vehicle id match case-insensitively; phone matches as typed.
pub fn search_lessees(
    lessees: &[Lessee],
    payments: &[Payment],
    search: &str,
    today: NaiveDate,
) -> Vec<LesseeRow> {
    let raw = search.trim();
    let needle = raw.to_lowercase();
    lessees
        .iter()
        .filter(|lessee| {
            needle.is_empty()
                || matches_ci(&lessee.name, &needle)
                || matches_ci(&lessee.email, &needle)
                || lessee
                    .vehicle_id
                    .as_ref()
                    .is_some_and(|id| matches_ci(id.as_str(), &needle))
                || lessee.phone.contains(raw)
        })
        .map(|lessee| LesseeRow {
            lessee: lessee.clone(),
            payment_status: ledger::lessee_payment_status(payments, &lessee.id, today),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LesseeStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub inactive: usize,
}

impl LesseeStats {
    pub fn from_lessees(lessees: &[Lessee]) -> Self {
        lessees.iter().fold(Self::default(), |mut stats, lessee| {
            stats.total += 1;
            match lessee.status {
                LesseeStatus::Active => stats.active += 1,
                LesseeStatus::Pending => stats.pending += 1,
                LesseeStatus::Inactive => stats.inactive += 1,
            }
            stats
        })
    }
}

/// Lease listing row joined with the lessee and vehicle it references.
#[derive(Debug, Clone, Serialize)]
pub struct LeaseRow {
    #[serde(flatten)]
    pub lease: LeaseAgreement,
    pub lessee_name: Option<String>,
    pub vehicle_name: Option<String>,
    pub license_plate: Option<String>,
    pub duration_months: i64,
    pub days_remaining: i64,
    pub total_value: Decimal,
}

impl LeaseRow {
    fn join(
        lease: &LeaseAgreement,
        lessees: &[Lessee],
        vehicles: &[Vehicle],
        today: NaiveDate,
    ) -> Self {
        let lessee = lessees.iter().find(|l| l.id == lease.lessee_id);
        let vehicle = vehicles.iter().find(|v| v.id == lease.vehicle_id);
        let duration_months = financials::duration_months(lease.start_date, lease.end_date);

        Self {
            lease: lease.clone(),
            lessee_name: lessee.map(|l| l.name.clone()),
            vehicle_name: vehicle.map(Vehicle::display_name),
            license_plate: vehicle.map(|v| v.license_plate.clone()),
            duration_months,
            days_remaining: financials::days_remaining(lease.end_date, today),
            total_value: Decimal::from(duration_months).saturating_mul(lease.monthly_payment),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        [&self.lessee_name, &self.vehicle_name, &self.license_plate]
            .into_iter()
            .flatten()
            .any(|field| matches_ci(field, needle))
    }
}

/// Leases whose lessee name, vehicle name or plate contains `search`.
pub fn search_leases(
    leases: &[LeaseAgreement],
    lessees: &[Lessee],
    vehicles: &[Vehicle],
    search: &str,
    today: NaiveDate,
) -> Vec<LeaseRow> {
    let needle = search.trim().to_lowercase();
    leases
        .iter()
        .map(|lease| LeaseRow::join(lease, lessees, vehicles, today))
        .filter(|row| needle.is_empty() || row.matches(&needle))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeaseStats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub terminated: usize,
    pub active_monthly_revenue: Decimal,
}

impl LeaseStats {
    pub fn from_leases(leases: &[LeaseAgreement]) -> Self {
        leases.iter().fold(Self::default(), |mut stats, lease| {
            stats.total += 1;
            match lease.status {
                LeaseStatus::Active => {
                    stats.active += 1;
                    stats.active_monthly_revenue =
                        stats.active_monthly_revenue.saturating_add(lease.monthly_payment);
                }
                LeaseStatus::Completed => stats.completed += 1,
                LeaseStatus::Terminated => stats.terminated += 1,
            }
            stats
        })
    }
}
