use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::workflows::fleet::{LesseeId, PaymentStatus, VehicleId, VehicleStats};
use crate::workflows::payments::MonthlyCollection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionRating {
    Excellent,
    Good,
    NeedsAttention,
}

impl CollectionRating {
    /// ≥ 90 % is excellent, ≥ 75 % good, anything lower needs attention.
    pub fn from_rate(rate: Decimal) -> Self {
        if rate >= Decimal::from(90) {
            Self::Excellent
        } else if rate >= Decimal::from(75) {
            Self::Good
        } else {
            Self::NeedsAttention
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::NeedsAttention => "Needs Attention",
        }
    }
}

/// Lessee surfaced in the "payment issues" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttentionEntry {
    pub lessee_id: LesseeId,
    pub name: String,
    pub vehicle_id: Option<VehicleId>,
    pub monthly_rate: Decimal,
    pub payment_status: PaymentStatus,
    pub status_label: &'static str,
    pub next_due: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub as_of: NaiveDate,
    pub fleet: VehicleStats,
    pub expected_monthly: Decimal,
    pub collected_this_month: Decimal,
    pub collection_rate: Option<Decimal>,
    pub collection_rate_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_rating: Option<CollectionRating>,
    pub collection_rating_label: &'static str,
    pub payment_issue_count: usize,
    pub pending_count: usize,
    pub attention: Vec<AttentionEntry>,
    pub collection_trend: Vec<MonthlyCollection>,
}

impl DashboardSummary {
    /// Plain-text rendering for terminals.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Dashboard as of {}", self.as_of),
            format!(
                "Fleet: {}/{} leased ({} available, {} in maintenance)",
                self.fleet.leased, self.fleet.total, self.fleet.available, self.fleet.maintenance
            ),
            format!("Expected monthly: {}", self.expected_monthly),
            format!("Collected this month: {}", self.collected_this_month),
            format!(
                "Collection rate: {} ({})",
                self.collection_rate_display, self.collection_rating_label
            ),
            format!(
                "Payment issues: {} overdue/failed, {} pending",
                self.payment_issue_count, self.pending_count
            ),
        ];

        for entry in &self.attention {
            let vehicle = entry
                .vehicle_id
                .as_ref()
                .map(|id| id.as_str())
                .unwrap_or("-");
            let due = entry
                .next_due
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "  {:<20} {:<6} due {:<10} {:>10} {}",
                entry.name, vehicle, due, entry.monthly_rate, entry.status_label
            ));
        }

        lines
    }
}
