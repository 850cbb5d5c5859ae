//! Payment lifecycle: charging through a gateway, recording the outcome, and the ledger
//! rollups shown on the payments screen.

pub mod export;
pub mod gateway;
pub mod ledger;
pub mod lifecycle;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use export::{ledger_csv, write_ledger, ExportError};
pub use gateway::{
    ChargeFailure, ChargeKind, ChargeRequest, PaymentGateway, Receipt, SimulatedGateway,
};
pub use ledger::{MonthlyCollection, PaymentRow, PaymentStats, StatusFilter};
pub use lifecycle::RETRY_METHOD;
pub use router::payment_router;
pub use service::{PaymentService, PaymentServiceError, MAX_PAYMENT_AMOUNT};
