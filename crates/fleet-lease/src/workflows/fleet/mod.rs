//! Fleet records (vehicles, lessees, lease agreements and payments), the store that owns
//! them, and the listing queries behind each management screen.

pub mod domain;
mod memory;
pub mod queries;
pub mod repository;
mod router;

pub use domain::{
    LeaseAgreement, LeaseId, LeaseStatus, Lessee, LesseeId, LesseeStatus, Payment, PaymentId,
    PaymentStatus, TransactionId, UnknownStatus, Vehicle, VehicleId, VehicleStatus,
};
pub use memory::InMemoryFleetRepository;
pub use queries::{LeaseRow, LeaseStats, LesseeRow, LesseeStats, VehicleStats};
pub use repository::{FleetRepository, RepositoryError};
pub use router::fleet_router;
