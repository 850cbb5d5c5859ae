use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::domain::{
    LeaseAgreement, LeaseId, Lessee, LesseeId, Payment, PaymentId, Vehicle, VehicleId,
};
use super::repository::{FleetRepository, RepositoryError};

#[derive(Debug, Default)]
struct FleetTables {
    vehicles: BTreeMap<VehicleId, Vehicle>,
    lessees: BTreeMap<LesseeId, Lessee>,
    leases: BTreeMap<LeaseId, LeaseAgreement>,
    payments: BTreeMap<PaymentId, Payment>,
}

/// Process-local store keyed by identifier. Contents live for the lifetime of the
/// process; nothing is written to disk.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFleetRepository {
    tables: Arc<Mutex<FleetTables>>,
}

impl InMemoryFleetRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with fixture records.
    pub fn seeded(
        vehicles: Vec<Vehicle>,
        lessees: Vec<Lessee>,
        leases: Vec<LeaseAgreement>,
        payments: Vec<Payment>,
    ) -> Self {
        let tables = FleetTables {
            vehicles: vehicles.into_iter().map(|v| (v.id.clone(), v)).collect(),
            lessees: lessees.into_iter().map(|l| (l.id.clone(), l)).collect(),
            leases: leases.into_iter().map(|l| (l.id.clone(), l)).collect(),
            payments: payments.into_iter().map(|p| (p.id.clone(), p)).collect(),
        };

        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, FleetTables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("fleet store lock poisoned".to_string()))
    }
}

impl FleetRepository for InMemoryFleetRepository {
    fn vehicles(&self) -> Result<Vec<Vehicle>, RepositoryError> {
        Ok(self.lock()?.vehicles.values().cloned().collect())
    }

    fn vehicle(&self, id: &VehicleId) -> Result<Option<Vehicle>, RepositoryError> {
        Ok(self.lock()?.vehicles.get(id).cloned())
    }

    fn lessees(&self) -> Result<Vec<Lessee>, RepositoryError> {
        Ok(self.lock()?.lessees.values().cloned().collect())
    }

    fn lessee(&self, id: &LesseeId) -> Result<Option<Lessee>, RepositoryError> {
        Ok(self.lock()?.lessees.get(id).cloned())
    }

    fn insert_lessee(&self, lessee: Lessee) -> Result<Lessee, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.lessees.contains_key(&lessee.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.lessees.insert(lessee.id.clone(), lessee.clone());
        Ok(lessee)
    }

    fn leases(&self) -> Result<Vec<LeaseAgreement>, RepositoryError> {
        Ok(self.lock()?.leases.values().cloned().collect())
    }

    fn lease(&self, id: &LeaseId) -> Result<Option<LeaseAgreement>, RepositoryError> {
        Ok(self.lock()?.leases.get(id).cloned())
    }

    fn insert_lease(&self, lease: LeaseAgreement) -> Result<LeaseAgreement, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.leases.contains_key(&lease.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.leases.insert(lease.id.clone(), lease.clone());
        Ok(lease)
    }

    fn payments(&self) -> Result<Vec<Payment>, RepositoryError> {
        Ok(self.lock()?.payments.values().cloned().collect())
    }

    fn payment(&self, id: &PaymentId) -> Result<Option<Payment>, RepositoryError> {
        Ok(self.lock()?.payments.get(id).cloned())
    }

    fn insert_payment(&self, payment: Payment) -> Result<Payment, RepositoryError> {
        let mut tables = self.lock()?;
        if tables.payments.contains_key(&payment.id) {
            return Err(RepositoryError::Conflict);
        }
        tables.payments.insert(payment.id.clone(), payment.clone());
        Ok(payment)
    }

    fn update_payment(&self, payment: Payment) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        match tables.payments.get_mut(&payment.id) {
            Some(existing) => {
                *existing = payment;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }
}
