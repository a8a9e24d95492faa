// src/repository/postgres.rs

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AppointmentRepository, DoctorRepository, PatientRepository, StoreError};
use crate::models::{Appointment, Doctor, Patient};
use crate::validation::{AppointmentData, DoctorData, PatientData};

fn db_error(entity: &'static str, e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return StoreError::Duplicate("email");
        }
        if db.is_foreign_key_violation() {
            return StoreError::InUse(entity);
        }
    }
    StoreError::Backend(format!("db error: {e}"))
}

/* ============================================================
   Patients
   ============================================================ */

#[derive(Clone)]
pub struct PgPatientRepository {
    db: PgPool,
}

impl PgPatientRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientRepository for PgPatientRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, StoreError> {
        sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, first_name, last_name, email, phone, date_of_birth
            FROM patients
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| db_error("patient", e))
    }

    async fn find_all(&self) -> Result<Vec<Patient>, StoreError> {
        sqlx::query_as::<_, Patient>(
            r#"
            SELECT id, first_name, last_name, email, phone, date_of_birth
            FROM patients
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| db_error("patient", e))
    }

    async fn save(&self, id: Option<i64>, data: &PatientData) -> Result<Patient, StoreError> {
        let Some(id) = id else {
            return sqlx::query_as::<_, Patient>(
                r#"
                INSERT INTO patients (first_name, last_name, email, phone, date_of_birth)
                VALUES ($1,$2,$3,$4,$5)
                RETURNING id, first_name, last_name, email, phone, date_of_birth
                "#,
            )
            .bind(data.first_name())
            .bind(data.last_name())
            .bind(data.email())
            .bind(data.phone())
            .bind(data.date_of_birth())
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_error("patient", e));
        };

        sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients
            SET first_name = $1,
                last_name = $2,
                email = $3,
                phone = $4,
                date_of_birth = $5
            WHERE id = $6
            RETURNING id, first_name, last_name, email, phone, date_of_birth
            "#,
        )
        .bind(data.first_name())
        .bind(data.last_name())
        .bind(data.email())
        .bind(data.phone())
        .bind(data.date_of_birth())
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| db_error("patient", e))?
        .ok_or(StoreError::NotFound("patient", id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| db_error("patient", e))?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("patient", id));
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM patients WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_error("patient", e))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM patients WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_error("patient", e))
    }
}

/* ============================================================
   Doctors
   ============================================================ */

#[derive(Clone)]
pub struct PgDoctorRepository {
    db: PgPool,
}

impl PgDoctorRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DoctorRepository for PgDoctorRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        sqlx::query_as::<_, Doctor>(
            r#"
            SELECT id, first_name, last_name, email, phone, specialty
            FROM doctors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| db_error("doctor", e))
    }

    async fn find_all(&self) -> Result<Vec<Doctor>, StoreError> {
        sqlx::query_as::<_, Doctor>(
            r#"
            SELECT id, first_name, last_name, email, phone, specialty
            FROM doctors
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(|e| db_error("doctor", e))
    }

    async fn save(&self, id: Option<i64>, data: &DoctorData) -> Result<Doctor, StoreError> {
        let Some(id) = id else {
            return sqlx::query_as::<_, Doctor>(
                r#"
                INSERT INTO doctors (first_name, last_name, email, phone, specialty)
                VALUES ($1,$2,$3,$4,$5)
                RETURNING id, first_name, last_name, email, phone, specialty
                "#,
            )
            .bind(data.first_name())
            .bind(data.last_name())
            .bind(data.email())
            .bind(data.phone())
            .bind(data.specialty())
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_error("doctor", e));
        };

        sqlx::query_as::<_, Doctor>(
            r#"
            UPDATE doctors
            SET first_name = $1,
                last_name = $2,
                email = $3,
                phone = $4,
                specialty = $5
            WHERE id = $6
            RETURNING id, first_name, last_name, email, phone, specialty
            "#,
        )
        .bind(data.first_name())
        .bind(data.last_name())
        .bind(data.email())
        .bind(data.phone())
        .bind(data.specialty())
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| db_error("doctor", e))?
        .ok_or(StoreError::NotFound("doctor", id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM doctors WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| db_error("doctor", e))?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("doctor", id));
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM doctors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(|e| db_error("doctor", e))
    }
}

/* ============================================================
   Appointments
   ============================================================ */

#[derive(Clone)]
pub struct PgAppointmentRepository {
    db: PgPool,
}

impl PgAppointmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// On appointments a foreign key violation means the patient or doctor row
// vanished between lookup and write.
fn appointment_error(e: sqlx::Error) -> StoreError {
    match db_error("appointment", e) {
        StoreError::InUse(_) => StoreError::MissingReference,
        other => other,
    }
}

#[async_trait]
impl AppointmentRepository for PgAppointmentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Appointment>, StoreError> {
        sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, patient_id, doctor_id, appointment_date, reason
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(appointment_error)
    }

    async fn find_all(&self) -> Result<Vec<Appointment>, StoreError> {
        sqlx::query_as::<_, Appointment>(
            r#"
            SELECT id, patient_id, doctor_id, appointment_date, reason
            FROM appointments
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .map_err(appointment_error)
    }

    async fn save(
        &self,
        id: Option<i64>,
        data: &AppointmentData,
    ) -> Result<Appointment, StoreError> {
        let Some(id) = id else {
            return sqlx::query_as::<_, Appointment>(
                r#"
                INSERT INTO appointments (patient_id, doctor_id, appointment_date, reason)
                VALUES ($1,$2,$3,$4)
                RETURNING id, patient_id, doctor_id, appointment_date, reason
                "#,
            )
            .bind(data.patient_id())
            .bind(data.doctor_id())
            .bind(data.appointment_date())
            .bind(data.reason())
            .fetch_one(&self.db)
            .await
            .map_err(appointment_error);
        };

        sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET patient_id = $1,
                doctor_id = $2,
                appointment_date = $3,
                reason = $4
            WHERE id = $5
            RETURNING id, patient_id, doctor_id, appointment_date, reason
            "#,
        )
        .bind(data.patient_id())
        .bind(data.doctor_id())
        .bind(data.appointment_date())
        .bind(data.reason())
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(appointment_error)?
        .ok_or(StoreError::NotFound("appointment", id))
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        let res = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(appointment_error)?;

        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("appointment", id));
        }
        Ok(())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM appointments WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(appointment_error)
    }
}
