//! Pure state transitions applied to a payment once its gateway outcome is known.
//!
//! ```text
//! pending/overdue/failed ──process ok──▶ paid (attempts cleared)
//! pending/overdue/failed ──process declined──▶ failed (attempts + 1)
//! failed/overdue ──retry ok──▶ paid (attempts + 1, method "Auto Retry")
//! failed/overdue ──retry declined──▶ failed (attempts + 1)
//! ```

use super::gateway::{ChargeFailure, Receipt};
use crate::workflows::fleet::{Payment, PaymentStatus};

/// Method recorded on payments settled by an automatic retry.
pub const RETRY_METHOD: &str = "Auto Retry";

/// Outcome of a manual charge. A decline adds an attempt; a settlement clears the count.
pub fn apply_process(
    payment: &Payment,
    method: &str,
    outcome: &Result<Receipt, ChargeFailure>,
) -> Payment {
    match outcome {
        Ok(receipt) => settle(payment, method, receipt),
        Err(_) => decline(payment),
    }
}

/// Outcome of an automatic retry. Every retry counts as an attempt.
pub fn apply_retry(payment: &Payment, outcome: &Result<Receipt, ChargeFailure>) -> Payment {
    let mut next = match outcome {
        Ok(receipt) => settle(payment, RETRY_METHOD, receipt),
        Err(_) => decline(payment),
    };
    next.attempt_count = Some(payment.attempts() + 1);
    next
}

fn settle(payment: &Payment, method: &str, receipt: &Receipt) -> Payment {
    Payment {
        status: PaymentStatus::Paid,
        paid_at: Some(receipt.settled_at),
        payment_method: Some(method.to_string()),
        transaction_id: Some(receipt.transaction_id.clone()),
        attempt_count: None,
        ..payment.clone()
    }
}

fn decline(payment: &Payment) -> Payment {
    Payment {
        status: PaymentStatus::Failed,
        paid_at: None,
        payment_method: None,
        transaction_id: None,
        attempt_count: Some(payment.attempts() + 1),
        ..payment.clone()
    }
}
