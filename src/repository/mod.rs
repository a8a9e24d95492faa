use async_trait::async_trait;

use crate::models::{Appointment, Doctor, Patient};
use crate::validation::{AppointmentData, DoctorData, PatientData};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PgAppointmentRepository, PgDoctorRepository, PgPatientRepository};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),
    /// The row is still referenced by another table.
    #[error("{0} is still referenced")]
    InUse(&'static str),
    /// A foreign key on the written row points at nothing.
    #[error("referenced patient or doctor does not exist")]
    MissingReference,
    #[error("{0} with id {1} not found")]
    NotFound(&'static str, i64),
    #[error("storage error: {0}")]
    Backend(String),
}

// `save(None, ..)` inserts and assigns an id; `save(Some(id), ..)` replaces
// every column of an existing row.

#[async_trait]
pub trait PatientRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Patient>, StoreError>;

    async fn save(&self, id: Option<i64>, data: &PatientData) -> Result<Patient, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Doctor>, StoreError>;

    async fn save(&self, id: Option<i64>, data: &DoctorData) -> Result<Doctor, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, StoreError>;

    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError>;

    async fn save(
        &self,
        id: Option<i64>,
        data: &AppointmentData,
    ) -> Result<Appointment, StoreError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError>;
}
