//! Individual field rules. Each returns the parsed value or the message to display.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_TERMS_CHARS: usize = 50;
pub const MIN_MONTHLY_PAYMENT: u32 = 100;
pub const MIN_MILEAGE_LIMIT: u32 = 5_000;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").expect("valid phone regex"))
}

/// `required_message` differs between the standalone lessee form and the lease sub-form.
pub fn person_name(value: &str, required_message: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(required_message.to_string());
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err("Name must be at least 2 characters".to_string());
    }
    Ok(trimmed.to_string())
}

pub fn email(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Email is required".to_string());
    }
    if !email_pattern().is_match(value) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(value.to_string())
}

/// Expects the already-formatted value produced by
/// [`format_phone_number`](super::format_phone_number).
pub fn phone(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Phone number is required".to_string());
    }
    if !phone_pattern().is_match(value) {
        return Err("Phone must be in format (555) 123-4567".to_string());
    }
    Ok(value.to_string())
}

pub fn selection<'a>(value: &'a str, message: &str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(message.to_string())
    } else {
        Ok(trimmed)
    }
}

pub fn start_date(value: Option<NaiveDate>) -> Result<NaiveDate, String> {
    value.ok_or_else(|| "Start date is required".to_string())
}

/// The end date is only compared when a start date is present.
pub fn end_date(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<NaiveDate, String> {
    let end = end.ok_or_else(|| "End date is required".to_string())?;
    match start {
        Some(start) if end <= start => Err("End date must be after start date".to_string()),
        _ => Ok(end),
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim()).ok()
}

pub fn monthly_payment(raw: &str) -> Result<Decimal, String> {
    if raw.trim().is_empty() {
        return Err("Monthly payment is required".to_string());
    }
    let amount = match parse_decimal(raw) {
        Some(amount) if amount > Decimal::ZERO => amount,
        _ => return Err("Please enter a valid payment amount".to_string()),
    };
    if amount < Decimal::from(MIN_MONTHLY_PAYMENT) {
        return Err("Monthly payment must be at least $100".to_string());
    }
    Ok(amount)
}

pub fn security_deposit(raw: &str) -> Result<Decimal, String> {
    if raw.trim().is_empty() {
        return Err("Security deposit is required".to_string());
    }
    match parse_decimal(raw) {
        Some(amount) if amount >= Decimal::ZERO => Ok(amount),
        _ => Err("Please enter a valid deposit amount".to_string()),
    }
}

pub fn mileage_limit(raw: &str) -> Result<u32, String> {
    if raw.trim().is_empty() {
        return Err("Mileage limit is required".to_string());
    }
    let limit = match raw.trim().parse::<u32>() {
        Ok(limit) if limit > 0 => limit,
        _ => return Err("Please enter a valid mileage limit".to_string()),
    };
    if limit < MIN_MILEAGE_LIMIT {
        return Err("Mileage limit must be at least 5,000 miles".to_string());
    }
    Ok(limit)
}

pub fn terms(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Lease terms and conditions are required".to_string());
    }
    if trimmed.chars().count() < MIN_TERMS_CHARS {
        return Err("Terms must be at least 50 characters".to_string());
    }
    Ok(trimmed.to_string())
}
