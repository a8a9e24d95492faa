use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::repository::{AppointmentRepository, DoctorRepository, PatientRepository};
use crate::validation::{AppointmentData, DoctorData, PatientData};
use crate::workflow::AppointmentWorkflow;

#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<dyn PatientRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
    pub appointments: Arc<dyn AppointmentRepository>,
    pub workflow: Arc<AppointmentWorkflow>,
}

/* -------------------------
   Persisted records
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: Option<NaiveDate>,
}

impl Patient {
    pub fn from_data(id: i64, data: &PatientData) -> Self {
        Self {
            id,
            first_name: data.first_name().to_string(),
            last_name: data.last_name().to_string(),
            email: data.email().to_string(),
            phone: data.phone().to_string(),
            date_of_birth: data.date_of_birth(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub specialty: String,
}

impl Doctor {
    pub fn from_data(id: i64, data: &DoctorData) -> Self {
        Self {
            id,
            first_name: data.first_name().to_string(),
            last_name: data.last_name().to_string(),
            email: data.email().to_string(),
            phone: data.phone().map(str::to_string),
            specialty: data.specialty().to_string(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Appointment row as stored: references are foreign keys, not embedded records.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_date: NaiveDateTime,
    pub reason: Option<String>,
}

impl Appointment {
    pub fn from_data(id: i64, data: &AppointmentData) -> Self {
        Self {
            id,
            patient_id: data.patient_id(),
            doctor_id: data.doctor_id(),
            appointment_date: data.appointment_date(),
            reason: data.reason().map(str::to_string),
        }
    }
}

/* -------------------------
   API DTOs
--------------------------*/

// Every field is optional on the way in so that a missing field becomes a
// validation message instead of a deserialization failure.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientDto {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl From<Patient> for PatientDto {
    fn from(p: Patient) -> Self {
        Self {
            id: Some(p.id),
            first_name: Some(p.first_name),
            last_name: Some(p.last_name),
            email: Some(p.email),
            phone: Some(p.phone),
            date_of_birth: p.date_of_birth,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorDto {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

impl From<Doctor> for DoctorDto {
    fn from(d: Doctor) -> Self {
        Self {
            id: Some(d.id),
            first_name: Some(d.first_name),
            last_name: Some(d.last_name),
            email: Some(d.email),
            phone: d.phone,
            specialty: Some(d.specialty),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentDto {
    pub id: Option<i64>,
    pub patient_id: Option<i64>,
    pub doctor_id: Option<i64>,
    pub appointment_date: Option<NaiveDateTime>,
    pub reason: Option<String>,
}

impl From<Appointment> for AppointmentDto {
    fn from(a: Appointment) -> Self {
        Self {
            id: Some(a.id),
            patient_id: Some(a.patient_id),
            doctor_id: Some(a.doctor_id),
            appointment_date: Some(a.appointment_date),
            reason: a.reason,
        }
    }
}

/// Single-message envelope used for 404s and delete confirmations.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
