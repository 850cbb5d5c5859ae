use super::domain::{
    LeaseAgreement, LeaseId, Lessee, LesseeId, Payment, PaymentId, Vehicle, VehicleId,
};

/// Storage abstraction owning every fleet record. All reads, commands and aggregate
/// queries go through this seam so services can be exercised without a UI.
pub trait FleetRepository: Send + Sync {
    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError>;
    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError>;

    fn lessees(&self) -> Result<Vec<Lessee>, RepositoryError>;
    fn lessee(&self, id: &LesseeId) -> Result<Option<Lessee>, RepositoryError>;
    fn insert_lessee(&self, lessee: Lessee) -> Result<Lessee, RepositoryError>;

    fn leases(&self) -> Result<Vec<LeaseAgreement>, RepositoryError>;
    fn lease(&self, id: &LeaseId) -> Result<Option<LeaseAgreement>, RepositoryError>;
    fn insert_lease(&self, lease: LeaseAgreement) -> Result<LeaseAgreement, RepositoryError>;

    fn payments(&self) -> Result<Vec<Payment>, RepositoryError>;
    fn payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError>;
    fn insert_payment(&self, payment: Payment) -> Result<Payment, RepositoryError>;
    fn update_payment(&self, payment: Payment) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
