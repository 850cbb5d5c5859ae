use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::views::{AttentionEntry, CollectionRating, DashboardSummary};
use crate::workflows::fleet::{
    Lessee, Payment, PaymentStatus, Vehicle, VehicleId, VehicleStats, VehicleStatus,
};
use crate::workflows::payments::ledger;

/// Number of lessees listed in the attention panel.
pub const ATTENTION_LIMIT: usize = 6;

/// Point-in-time rollup of fleet utilization and collections.
#[derive(Debug)]
pub struct DashboardReport {
    pub as_of: NaiveDate,
    pub fleet: VehicleStats,
    pub expected_monthly: Decimal,
    pub collected_this_month: Decimal,
    pub issues: Vec<AttentionEntry>,
    pub pending: Vec<AttentionEntry>,
    pub trend: Vec<ledger::MonthlyCollection>,
}

impl DashboardReport {
    /// Expected revenue is the sum of leased vehicles' rates. A lessee counts as collected
    /// when their latest payment is paid, at their vehicle's rate.
    pub fn build(
        vehicles: &[Vehicle],
        lessees: &[Lessee],
        payments: &[Payment],
        today: NaiveDate,
    ) -> Self {
        let rates: BTreeMap<&VehicleId, Decimal> = vehicles
            .iter()
            .map(|vehicle| (&vehicle.id, vehicle.monthly_rate))
            .collect();

        let expected_monthly = vehicles
            .iter()
            .filter(|vehicle| vehicle.status == VehicleStatus::Leased)
            .fold(Decimal::ZERO, |total, vehicle| {
                total.saturating_add(vehicle.monthly_rate)
            });

        let mut report = Self {
            as_of: today,
            fleet: VehicleStats::from_vehicles(vehicles),
            expected_monthly,
            collected_this_month: Decimal::ZERO,
            issues: Vec::new(),
            pending: Vec::new(),
            trend: ledger::monthly_collections(payments),
        };

        for lessee in lessees {
            let Some(status) = ledger::lessee_payment_status(payments, &lessee.id, today) else {
                continue;
            };
            let monthly_rate = lessee
                .vehicle_id
                .as_ref()
                .and_then(|id| rates.get(id).copied())
                .unwrap_or_default();

            if status == PaymentStatus::Paid {
                report.collected_this_month =
                    report.collected_this_month.saturating_add(monthly_rate);
                continue;
            }

            let next_due = payments
                .iter()
                .filter(|payment| payment.lessee_id == lessee.id)
                .map(|payment| payment.due_date)
                .max();
            let entry = AttentionEntry {
                lessee_id: lessee.id.clone(),
                name: lessee.name.clone(),
                vehicle_id: lessee.vehicle_id.clone(),
                monthly_rate,
                payment_status: status,
                status_label: status.label(),
                next_due,
            };

            if status.needs_attention() {
                report.issues.push(entry);
            } else {
                report.pending.push(entry);
            }
        }

        report
    }

    pub fn collection_rate(&self) -> Option<Decimal> {
        ledger::collection_rate(self.collected_this_month, self.expected_monthly)
    }

    pub fn summary(&self) -> DashboardSummary {
        let collection_rate = self.collection_rate();
        let collection_rating = collection_rate.map(CollectionRating::from_rate);

        let attention = self
            .issues
            .iter()
            .chain(self.pending.iter())
            .take(ATTENTION_LIMIT)
            .cloned()
            .collect();

        DashboardSummary {
            as_of: self.as_of,
            fleet: self.fleet.clone(),
            expected_monthly: self.expected_monthly,
            collected_this_month: self.collected_this_month,
            collection_rate,
            collection_rate_display: ledger::format_rate(collection_rate),
            collection_rating,
            collection_rating_label: collection_rating
                .map(CollectionRating::label)
                .unwrap_or("N/A"),
            payment_issue_count: self.issues.len(),
            pending_count: self.pending.len(),
            attention,
            collection_trend: self.trend.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::fleet::{LesseeId, LesseeStatus, PaymentId};
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn vehicle(id: &str, rate: i64, status: VehicleStatus) -> Vehicle {
        Vehicle {
            id: VehicleId::from(id),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2023,
            vin: format!("4T1B11HK{id}"),
            license_plate: format!("{id}-001"),
            color: "Blue".to_string(),
            mileage: 9_000,
            status,
            monthly_rate: Decimal::from(rate),
        }
    }

    fn lessee(id: &str, vehicle: &str) -> Lessee {
        Lessee {
            id: LesseeId::from(id),
            name: format!("Lessee {id}"),
            vehicle_id: Some(VehicleId::from(vehicle)),
            email: format!("{id}@email.com"),
            phone: "(555) 000-0000".to_string(),
            status: LesseeStatus::Active,
            lease_start_date: date(2023, 1, 1),
            created_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn payment(id: &str, lessee: &str, vehicle: &str, due: NaiveDate, status: PaymentStatus) -> Payment {
        Payment {
            status,
            ..Payment::pending(
                PaymentId::from(id),
                LesseeId::from(lessee),
                VehicleId::from(vehicle),
                Decimal::from(500),
                due,
            )
        }
    }

    #[test]
    fn no_leased_vehicles_means_undefined_rate() {
        let report = DashboardReport::build(
            &[vehicle("V001", 500, VehicleStatus::Available)],
            &[],
            &[],
            date(2024, 2, 1),
        );
        let summary = report.summary();

        assert_eq!(summary.expected_monthly, Decimal::ZERO);
        assert_eq!(summary.collection_rate, None);
        assert_eq!(summary.collection_rate_display, "N/A");
        assert_eq!(summary.collection_rating_label, "N/A");
    }

    #[test]
    fn collected_uses_vehicle_rate_of_paid_lessees() {
        let today = date(2024, 2, 12);
        let vehicles = [
            vehicle("V001", 400, VehicleStatus::Leased),
            vehicle("V002", 600, VehicleStatus::Leased),
            vehicle("V003", 300, VehicleStatus::Maintenance),
        ];
        let lessees = [lessee("L001", "V001"), lessee("L002", "V002")];
        let payments = [
            payment("P1", "L001", "V001", date(2024, 2, 15), PaymentStatus::Paid),
            payment("P2", "L002", "V002", date(2024, 2, 1), PaymentStatus::Pending),
        ];

        let summary = DashboardReport::build(&vehicles, &lessees, &payments, today).summary();

        assert_eq!(summary.fleet.leased, 2);
        assert_eq!(summary.fleet.total, 3);
        assert_eq!(summary.expected_monthly, Decimal::from(1_000));
        assert_eq!(summary.collected_this_month, Decimal::from(400));
        assert_eq!(summary.collection_rate, Some(Decimal::from(40)));
        assert_eq!(summary.collection_rating, Some(CollectionRating::NeedsAttention));
        assert_eq!(summary.payment_issue_count, 1, "stale pending reads as overdue");
        assert_eq!(summary.pending_count, 0);
        assert_eq!(summary.attention[0].status_label, "Overdue");
        assert_eq!(summary.attention[0].monthly_rate, Decimal::from(600));
    }

    #[test]
    fn rating_thresholds() {
        assert_eq!(CollectionRating::from_rate(Decimal::from(90)), CollectionRating::Excellent);
        assert_eq!(CollectionRating::from_rate(Decimal::new(8999, 2)), CollectionRating::Good);
        assert_eq!(CollectionRating::from_rate(Decimal::from(75)), CollectionRating::Good);
        assert_eq!(
            CollectionRating::from_rate(Decimal::new(7499, 2)),
            CollectionRating::NeedsAttention
        );
    }

    #[test]
    fn attention_panel_lists_issues_before_pending_and_caps_entries() {
        let today = date(2024, 2, 1);
        let vehicles: Vec<Vehicle> = (1..=8)
            .map(|n| vehicle(&format!("V{n:03}"), 500, VehicleStatus::Leased))
            .collect();
        let lessees: Vec<Lessee> = (1..=8)
            .map(|n| lessee(&format!("L{n:03}"), &format!("V{n:03}")))
            .collect();
        let payments: Vec<Payment> = (1..=8)
            .map(|n| {
                let status = if n % 2 == 0 {
                    PaymentStatus::Failed
                } else {
                    PaymentStatus::Pending
                };
                payment(
                    &format!("P{n:03}"),
                    &format!("L{n:03}"),
                    &format!("V{n:03}"),
                    date(2024, 2, 20),
                    status,
                )
            })
            .collect();

        let summary = DashboardReport::build(&vehicles, &lessees, &payments, today).summary();

        assert_eq!(summary.payment_issue_count, 4);
        assert_eq!(summary.pending_count, 4);
        assert_eq!(summary.attention.len(), ATTENTION_LIMIT);
        assert!(summary.attention[..4]
            .iter()
            .all(|entry| entry.payment_status == PaymentStatus::Failed));
        assert_eq!(summary.attention[4].payment_status, PaymentStatus::Pending);
        assert_eq!(summary.lines()[4], "Collection rate: 0.0% (Needs Attention)");
    }
}
