// src/workflow.rs
//
// Appointment booking: validate -> resolve patient/doctor -> persist -> notify.
// Linear, no retries. Any early exit leaves storage untouched.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::models::{Appointment, AppointmentDto, Doctor, Patient};
use crate::notification::{
    AppointmentNotice, FailurePolicy, NotificationFactory, NotificationSender,
};
use crate::repository::{AppointmentRepository, DoctorRepository, PatientRepository};
use crate::validation::AppointmentData;

pub struct AppointmentWorkflow {
    patients: Arc<dyn PatientRepository>,
    doctors: Arc<dyn DoctorRepository>,
    appointments: Arc<dyn AppointmentRepository>,
    notifications: NotificationFactory,
    channel: String,
    failure_policy: FailurePolicy,
}

impl AppointmentWorkflow {
    pub fn new(
        patients: Arc<dyn PatientRepository>,
        doctors: Arc<dyn DoctorRepository>,
        appointments: Arc<dyn AppointmentRepository>,
        notifications: NotificationFactory,
        channel: impl Into<String>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            patients,
            doctors,
            appointments,
            notifications,
            channel: channel.into(),
            failure_policy,
        }
    }

    pub async fn create(
        &self,
        dto: &AppointmentDto,
        now: NaiveDateTime,
    ) -> Result<Appointment, ApiError> {
        let data = AppointmentData::validate(dto, now).map_err(ApiError::Validation)?;
        let (patient, doctor) = self.resolve(&data).await?;
        let channel = self.notifications.create_channel(&self.channel)?;

        let saved = self.appointments.save(None, &data).await?;
        info!(
            appointment_id = saved.id,
            patient_id = patient.id,
            doctor_id = doctor.id,
            "appointment registered"
        );

        self.notify(channel.as_ref(), AppointmentNotice::Registered, &patient, &doctor, &saved)
            .await?;
        Ok(saved)
    }

    /// Full replacement of an existing appointment. The date must still be in
    /// the future relative to `now`.
    pub async fn update(
        &self,
        id: i64,
        dto: &AppointmentDto,
        now: NaiveDateTime,
    ) -> Result<Appointment, ApiError> {
        let data = AppointmentData::validate(dto, now).map_err(ApiError::Validation)?;

        if !self.appointments.exists_by_id(id).await? {
            return Err(ApiError::not_found("Appointment", id));
        }

        let (patient, doctor) = self.resolve(&data).await?;
        let channel = self.notifications.create_channel(&self.channel)?;

        let saved = self.appointments.save(Some(id), &data).await?;
        info!(appointment_id = saved.id, "appointment updated");

        self.notify(channel.as_ref(), AppointmentNotice::Updated, &patient, &doctor, &saved)
            .await?;
        Ok(saved)
    }

    async fn resolve(&self, data: &AppointmentData) -> Result<(Patient, Doctor), ApiError> {
        let patient = self.patients.find_by_id(data.patient_id()).await?;
        let doctor = self.doctors.find_by_id(data.doctor_id()).await?;

        match (patient, doctor) {
            (Some(p), Some(d)) => Ok((p, d)),
            _ => {
                debug!(
                    patient_id = data.patient_id(),
                    doctor_id = data.doctor_id(),
                    "appointment references unknown patient or doctor"
                );
                Err(ApiError::NotFound("Patient or doctor does not exist".into()))
            }
        }
    }

    async fn notify(
        &self,
        channel: &dyn NotificationSender,
        notice: AppointmentNotice,
        patient: &Patient,
        doctor: &Doctor,
        appointment: &Appointment,
    ) -> Result<(), ApiError> {
        let body = notice.body(patient, doctor, appointment.appointment_date);

        match channel.send(&patient.email, notice.subject(), &body).await {
            Ok(()) => Ok(()),
            Err(e) => match self.failure_policy {
                FailurePolicy::Log => {
                    warn!(
                        appointment_id = appointment.id,
                        recipient = %patient.email,
                        error = %e,
                        "appointment saved but notification failed"
                    );
                    Ok(())
                }
                FailurePolicy::Fail => Err(e.into()),
            },
        }
    }
}
