use std::io;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::ledger::PaymentRow;
use crate::workflows::fleet::PaymentStatus;

const LEDGER_COLUMNS: [&str; 12] = [
    "payment_id",
    "lessee_id",
    "lessee_name",
    "vehicle_id",
    "amount",
    "due_date",
    "status",
    "days_overdue",
    "paid_at",
    "payment_method",
    "transaction_id",
    "attempt_count",
];

/// Column layout of the exported ledger. Field order must match `LEDGER_COLUMNS`.
#[derive(Debug, Serialize)]
struct LedgerRecord<'a> {
    payment_id: &'a str,
    lessee_id: &'a str,
    lessee_name: &'a str,
    vehicle_id: &'a str,
    amount: Decimal,
    due_date: NaiveDate,
    status: PaymentStatus,
    days_overdue: i64,
    paid_at: Option<DateTime<Utc>>,
    payment_method: Option<&'a str>,
    transaction_id: Option<&'a str>,
    attempt_count: Option<u32>,
}

impl<'a> From<&'a PaymentRow> for LedgerRecord<'a> {
    fn from(row: &'a PaymentRow) -> Self {
        let payment = &row.payment;
        Self {
            payment_id: payment.id.as_str(),
            lessee_id: payment.lessee_id.as_str(),
            lessee_name: &row.lessee_name,
            vehicle_id: payment.vehicle_id.as_str(),
            amount: payment.amount,
            due_date: payment.due_date,
            status: row.effective_status,
            days_overdue: row.days_overdue,
            paid_at: payment.paid_at,
            payment_method: payment.payment_method.as_deref(),
            transaction_id: payment.transaction_id.as_ref().map(|id| id.as_str()),
            attempt_count: payment.attempt_count,
        }
    }
}

/// Write ledger rows as CSV with a header line. An empty ledger still gets the header.
pub fn write_ledger<W: io::Write>(rows: &[PaymentRow], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        csv.write_record(LEDGER_COLUMNS)?;
    }
    for row in rows {
        csv.serialize(LedgerRecord::from(row))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn ledger_csv(rows: &[PaymentRow]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_ledger(rows, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode ledger: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write ledger: {0}")]
    Io(#[from] io::Error),
    #[error("ledger is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
