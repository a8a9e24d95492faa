//! In-memory storage for tests and local development.
//!
//! All three collections share one lock so the foreign-key and uniqueness
//! rules can be checked the same way the database checks them.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::{AppointmentRepository, DoctorRepository, PatientRepository, StoreError};
use crate::models::{Appointment, Doctor, Patient};
use crate::validation::{AppointmentData, DoctorData, PatientData};

struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
struct Tables {
    patients: Table<Patient>,
    doctors: Table<Doctor>,
    appointments: Table<Appointment>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.patients.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Patient>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.patients.rows.values().cloned().collect())
    }

    async fn save(&self, id: Option<i64>, data: &PatientData) -> Result<Patient, StoreError> {
        let mut tables = self.tables.lock().await;

        let taken = tables
            .patients
            .rows
            .values()
            .any(|p| p.email == data.email() && Some(p.id) != id);
        if taken {
            return Err(StoreError::Duplicate("email"));
        }

        let id = match id {
            Some(id) if tables.patients.rows.contains_key(&id) => id,
            Some(id) => return Err(StoreError::NotFound("patient", id)),
            None => tables.patients.assign_id(),
        };

        let patient = Patient::from_data(id, data);
        tables.patients.rows.insert(id, patient.clone());
        debug!(id, "patient saved to memory");
        Ok(patient)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.appointments.rows.values().any(|a| a.patient_id == id) {
            return Err(StoreError::InUse("patient"));
        }
        tables
            .patients
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("patient", id))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.patients.rows.contains_key(&id))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.patients.rows.values().any(|p| p.email == email))
    }
}

#[async_trait]
impl DoctorRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.doctors.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Doctor>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.doctors.rows.values().cloned().collect())
    }

    async fn save(&self, id: Option<i64>, data: &DoctorData) -> Result<Doctor, StoreError> {
        let mut tables = self.tables.lock().await;

        let taken = tables
            .doctors
            .rows
            .values()
            .any(|d| d.email == data.email() && Some(d.id) != id);
        if taken {
            return Err(StoreError::Duplicate("email"));
        }

        let id = match id {
            Some(id) if tables.doctors.rows.contains_key(&id) => id,
            Some(id) => return Err(StoreError::NotFound("doctor", id)),
            None => tables.doctors.assign_id(),
        };

        let doctor = Doctor::from_data(id, data);
        tables.doctors.rows.insert(id, doctor.clone());
        debug!(id, "doctor saved to memory");
        Ok(doctor)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.appointments.rows.values().any(|a| a.doctor_id == id) {
            return Err(StoreError::InUse("doctor"));
        }
        tables
            .doctors
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("doctor", id))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.doctors.rows.contains_key(&id))
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.appointments.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.appointments.rows.values().cloned().collect())
    }

    async fn save(
        &self,
        id: Option<i64>,
        data: &AppointmentData,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.lock().await;

        if !tables.patients.rows.contains_key(&data.patient_id())
            || !tables.doctors.rows.contains_key(&data.doctor_id())
        {
            return Err(StoreError::MissingReference);
        }

        let id = match id {
            Some(id) if tables.appointments.rows.contains_key(&id) => id,
            Some(id) => return Err(StoreError::NotFound("appointment", id)),
            None => tables.appointments.assign_id(),
        };

        let appointment = Appointment::from_data(id, data);
        tables.appointments.rows.insert(id, appointment.clone());
        debug!(id, "appointment saved to memory");
        Ok(appointment)
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables.lock().await;
        tables
            .appointments
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("appointment", id))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.appointments.rows.contains_key(&id))
    }
}
