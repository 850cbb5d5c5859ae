use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// Billing months are 30-day blocks; any partial block counts as a full month.
pub const DAYS_PER_BILLING_MONTH: i64 = 30;

/// Whole billing months between two dates, rounded up.
///
/// `2024-01-01 → 2025-01-01` is 366 days and therefore 13 months.
pub fn duration_months(start: NaiveDate, end: NaiveDate) -> i64 {
    let days = (end - start).num_days();
    -(-days).div_euclid(DAYS_PER_BILLING_MONTH)
}

pub fn optional_duration(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<i64> {
    Some(duration_months(start?, end?))
}

/// `months × monthly`, or `None` when either side is missing or zero or the product
/// overflows.
pub fn total_lease_value(months: Option<i64>, monthly: Option<Decimal>) -> Option<Decimal> {
    let months = months.filter(|months| *months != 0)?;
    let monthly = monthly.filter(|monthly| !monthly.is_zero())?;
    Decimal::from(months).checked_mul(monthly)
}

/// Same calendar day one year later. A 29 February start has no counterpart in the
/// following year and rolls forward to 1 March.
pub fn suggested_end_date(start: NaiveDate) -> Option<NaiveDate> {
    let year = start.year() + 1;
    start
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
}

/// Monthly payment and security deposit pre-filled from a vehicle's rate.
pub fn suggested_terms(monthly_rate: Decimal) -> (Decimal, Decimal) {
    (monthly_rate, monthly_rate.saturating_mul(Decimal::from(2)))
}

/// Days left until `end`; negative once the lease has run past its end date.
pub fn days_remaining(end: NaiveDate, today: NaiveDate) -> i64 {
    (end - today).num_days()
}

/// Live summary shown beside a lease draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaseQuote {
    pub duration_months: Option<i64>,
    pub monthly_payment: Option<Decimal>,
    pub total_value: Option<Decimal>,
}

impl LeaseQuote {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>, monthly: Option<Decimal>) -> Self {
        let duration_months = optional_duration(start, end);
        Self {
            duration_months,
            monthly_payment: monthly,
            total_value: total_lease_value(duration_months, monthly),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn duration_rounds_partial_months_up() {
        assert_eq!(duration_months(date(2024, 1, 1), date(2025, 1, 1)), 13);
        assert_eq!(duration_months(date(2024, 1, 1), date(2024, 1, 31)), 1);
        assert_eq!(duration_months(date(2024, 1, 1), date(2024, 2, 1)), 2);
        assert_eq!(duration_months(date(2024, 1, 1), date(2024, 1, 1)), 0);
        assert_eq!(duration_months(date(2023, 1, 1), date(2024, 1, 1)), 13);
    }

    #[test]
    fn missing_inputs_yield_no_value() {
        assert_eq!(optional_duration(None, Some(date(2025, 1, 1))), None);
        assert_eq!(total_lease_value(Some(12), None), None);
        assert_eq!(total_lease_value(None, Some(Decimal::from(450))), None);
        assert_eq!(total_lease_value(Some(0), Some(Decimal::from(450))), None);
        assert_eq!(total_lease_value(Some(12), Some(Decimal::ZERO)), None);
        assert_eq!(total_lease_value(Some(12), Some(Decimal::MAX)), None);
    }

    #[test]
    fn total_value_multiplies_months_by_payment() {
        let months = optional_duration(Some(date(2024, 1, 1)), Some(date(2025, 1, 1)));
        assert_eq!(
            total_lease_value(months, Some(Decimal::from(450))),
            Some(Decimal::from(5_850))
        );
    }

    #[test]
    fn suggested_end_date_adds_a_calendar_year() {
        assert_eq!(suggested_end_date(date(2024, 3, 15)), Some(date(2025, 3, 15)));
        assert_eq!(suggested_end_date(date(2024, 2, 29)), Some(date(2025, 3, 1)));
        assert_eq!(suggested_end_date(date(2023, 12, 31)), Some(date(2024, 12, 31)));
    }

    #[test]
    fn suggested_terms_double_the_deposit() {
        let (monthly, deposit) = suggested_terms(Decimal::new(42050, 2));
        assert_eq!(monthly, Decimal::new(42050, 2));
        assert_eq!(deposit, Decimal::new(84100, 2));
    }

    #[test]
    fn days_remaining_goes_negative_after_end() {
        assert_eq!(days_remaining(date(2025, 1, 15), date(2024, 12, 15)), 31);
        assert_eq!(days_remaining(date(2024, 1, 1), date(2024, 1, 11)), -10);
    }

    #[test]
    fn quote_combines_duration_and_value() {
        let quote = LeaseQuote::new(
            Some(date(2024, 1, 1)),
            Some(date(2025, 1, 1)),
            Some(Decimal::from(300)),
        );
        assert_eq!(quote.duration_months, Some(13));
        assert_eq!(quote.total_value, Some(Decimal::from(3_900)));
    }
}
