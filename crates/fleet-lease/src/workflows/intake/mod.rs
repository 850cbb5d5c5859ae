//! Lessee registration and lease creation: draft handling, validation, simulated
//! submission and persistence.

pub mod forms;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use forms::{
    LeaseDraft, LeaseParty, LeaseTerms, LesseeDetails, LesseeForm, LesseeMode, NewLesseeDetails,
    NewLesseeForm, DEFAULT_MILEAGE_LIMIT,
};
pub use router::intake_router;
pub use service::{IntakeError, IntakeService, SubmissionKind};
