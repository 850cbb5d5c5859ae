//! Fleet leasing operations: the vehicle, lessee, lease and payment records behind the
//! administration dashboard, with form validation, the payment lifecycle and the rollups
//! rendered on each screen.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
