//! Read-side rollups over the payment ledger. Everything here is computed from the
//! stored payments and a reference date; nothing is cached.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::workflows::fleet::{Lessee, LesseeId, Payment, PaymentStatus, UnknownStatus};

/// `collected / expected × 100`, or `None` when nothing is expected or the ratio does not
/// fit in a `Decimal`.
pub fn collection_rate(collected: Decimal, expected: Decimal) -> Option<Decimal> {
    if expected.is_zero() {
        return None;
    }
    collected
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(expected)
}

/// Add `amount` to a running total, pinning it at `Decimal::MAX` on overflow. Returns
/// whether the total is still exact.
fn accumulate(total: &mut Decimal, amount: Decimal) -> bool {
    match total.checked_add(amount) {
        Some(sum) => {
            *total = sum;
            true
        }
        None => {
            *total = Decimal::MAX;
            false
        }
    }
}

/// One-decimal percentage, or `N/A` for an undefined rate.
pub fn format_rate(rate: Option<Decimal>) -> String {
    match rate {
        Some(rate) => format!("{:.1}%", rate.round_dp(1)),
        None => "N/A".to_string(),
    }
}

/// Standing of a lessee, taken from their most recently due payment.
pub fn lessee_payment_status(
    payments: &[Payment],
    lessee_id: &LesseeId,
    today: NaiveDate,
) -> Option<PaymentStatus> {
    payments
        .iter()
        .filter(|payment| &payment.lessee_id == lessee_id)
        .max_by_key(|payment| payment.due_date)
        .map(|payment| payment.effective_status(today))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentStats {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
    pub overdue: usize,
    pub failed: usize,
    pub total_collected: Decimal,
    pub total_expected: Decimal,
    pub collection_rate: Option<Decimal>,
}

impl PaymentStats {
    /// Counts use the effective status, so stale pending payments count as overdue.
    /// Totals that overflow stay at `Decimal::MAX` and leave the rate undefined.
    pub fn from_payments(payments: &[Payment], today: NaiveDate) -> Self {
        let mut exact = true;
        let mut stats = payments.iter().fold(Self::default(), |mut stats, payment| {
            stats.total += 1;
            exact &= accumulate(&mut stats.total_expected, payment.amount);
            match payment.effective_status(today) {
                PaymentStatus::Paid => {
                    stats.paid += 1;
                    exact &= accumulate(&mut stats.total_collected, payment.amount);
                }
                PaymentStatus::Pending => stats.pending += 1,
                PaymentStatus::Overdue => stats.overdue += 1,
                PaymentStatus::Failed => stats.failed += 1,
            }
            stats
        });
        if exact {
            stats.collection_rate = collection_rate(stats.total_collected, stats.total_expected);
        }
        stats
    }

    pub fn needing_attention(&self) -> usize {
        self.overdue + self.failed
    }
}

/// `all` or a single payment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(PaymentStatus),
}

impl StatusFilter {
    pub fn admits(self, status: PaymentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

/// Ledger line as listed on the payments screen.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRow {
    #[serde(flatten)]
    pub payment: Payment,
    pub lessee_name: String,
    pub effective_status: PaymentStatus,
    pub days_overdue: i64,
}

/// Case-insensitive match on lessee name or vehicle id, narrowed by effective status.
pub fn search_payments(
    payments: &[Payment],
    lessees: &[Lessee],
    search: &str,
    filter: StatusFilter,
    today: NaiveDate,
) -> Vec<PaymentRow> {
    let names: BTreeMap<&LesseeId, &str> = lessees
        .iter()
        .map(|lessee| (&lessee.id, lessee.name.as_str()))
        .collect();
    let needle = search.trim().to_lowercase();

    payments
        .iter()
        .filter_map(|payment| {
            let lessee_name = names
                .get(&payment.lessee_id)
                .copied()
                .unwrap_or_default()
                .to_string();
            let effective_status = payment.effective_status(today);

            let matches_search = needle.is_empty()
                || lessee_name.to_lowercase().contains(&needle)
                || payment.vehicle_id.as_str().to_lowercase().contains(&needle);

            (matches_search && filter.admits(effective_status)).then(|| PaymentRow {
                payment: payment.clone(),
                lessee_name,
                effective_status,
                days_overdue: match effective_status {
                    PaymentStatus::Overdue | PaymentStatus::Failed => payment.days_overdue(today),
                    _ => 0,
                },
            })
        })
        .collect()
}

/// Expected versus collected amounts for one calendar month of due dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCollection {
    pub year: i32,
    pub month: u32,
    pub expected: Decimal,
    pub collected: Decimal,
    pub collection_rate: Option<Decimal>,
}

/// Collection trend grouped by due month, oldest first.
pub fn monthly_collections(payments: &[Payment]) -> Vec<MonthlyCollection> {
    let mut months: BTreeMap<(i32, u32), (Decimal, Decimal, bool)> = BTreeMap::new();
    for payment in payments {
        let (expected, collected, exact) = months
            .entry((payment.due_date.year(), payment.due_date.month()))
            .or_insert((Decimal::ZERO, Decimal::ZERO, true));
        *exact &= accumulate(expected, payment.amount);
        if payment.status == PaymentStatus::Paid {
            *exact &= accumulate(collected, payment.amount);
        }
    }

    months
        .into_iter()
        .map(|((year, month), (expected, collected, exact))| MonthlyCollection {
            year,
            month,
            expected,
            collected,
            collection_rate: exact
                .then(|| collection_rate(collected, expected))
                .flatten(),
        })
        .collect()
}
