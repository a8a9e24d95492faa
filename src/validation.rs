// src/validation.rs
//
// Field rules for incoming DTOs. Each `validate` either returns an immutable,
// fully-checked value or every violated-field message in declaration order.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::models::{AppointmentDto, DoctorDto, PatientDto};

pub const NAME_MAX: usize = 100;
pub const DOCTOR_EMAIL_MAX: usize = 100;
pub const PATIENT_EMAIL_MAX: usize = 255;
pub const PHONE_MAX: usize = 15;
pub const SPECIALTY_MAX: usize = 100;
pub const REASON_MAX: usize = 255;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

#[derive(Debug, Default)]
struct Violations(Vec<String>);

impl Violations {
    fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_messages(self) -> Vec<String> {
        self.0
    }

    /// Trimmed text that must be present and at most `max` characters.
    fn required_text(&mut self, value: Option<&str>, label: &str, max: usize) -> String {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            self.push(format!("{label} is required"));
        } else if value.chars().count() > max {
            self.push(format!("{label} must not exceed {max} characters"));
        }
        value.to_string()
    }

    /// Trimmed text that may be absent; blank collapses to `None`.
    fn optional_text(&mut self, value: Option<&str>, label: &str, max: usize) -> Option<String> {
        let value = value.map(str::trim).filter(|s| !s.is_empty())?;
        if value.chars().count() > max {
            self.push(format!("{label} must not exceed {max} characters"));
        }
        Some(value.to_string())
    }

    fn email(&mut self, value: Option<&str>, max: usize) -> String {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            self.push("Email is required");
        } else if !is_valid_email(value) {
            self.push("Email must be a valid address");
        } else if value.chars().count() > max {
            self.push(format!("Email must not exceed {max} characters"));
        }
        value.to_string()
    }
}

/* -------------------------
   Patient
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientData {
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    date_of_birth: Option<NaiveDate>,
}

impl PatientData {
    pub fn validate(dto: &PatientDto, today: NaiveDate) -> Result<Self, Vec<String>> {
        let mut v = Violations::default();

        let first_name = v.required_text(dto.first_name.as_deref(), "First name", NAME_MAX);
        let last_name = v.required_text(dto.last_name.as_deref(), "Last name", NAME_MAX);
        let email = v.email(dto.email.as_deref(), PATIENT_EMAIL_MAX);
        let phone = v.required_text(dto.phone.as_deref(), "Phone", PHONE_MAX);

        if let Some(dob) = dto.date_of_birth {
            if dob >= today {
                v.push("Date of birth must be in the past");
            }
        }

        if !v.is_empty() {
            return Err(v.into_messages());
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            phone,
            date_of_birth: dto.date_of_birth,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }
}

/* -------------------------
   Doctor
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorData {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    specialty: String,
}

impl DoctorData {
    pub fn validate(dto: &DoctorDto) -> Result<Self, Vec<String>> {
        let mut v = Violations::default();

        let first_name = v.required_text(dto.first_name.as_deref(), "First name", NAME_MAX);
        let last_name = v.required_text(dto.last_name.as_deref(), "Last name", NAME_MAX);
        let email = v.email(dto.email.as_deref(), DOCTOR_EMAIL_MAX);
        let phone = v.optional_text(dto.phone.as_deref(), "Phone", PHONE_MAX);
        let specialty = v.required_text(dto.specialty.as_deref(), "Specialty", SPECIALTY_MAX);

        if !v.is_empty() {
            return Err(v.into_messages());
        }

        Ok(Self {
            first_name,
            last_name,
            email,
            phone,
            specialty,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn specialty(&self) -> &str {
        &self.specialty
    }
}

/* -------------------------
   Appointment
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentData {
    patient_id: i64,
    doctor_id: i64,
    appointment_date: NaiveDateTime,
    reason: Option<String>,
}

impl AppointmentData {
    pub fn validate(dto: &AppointmentDto, now: NaiveDateTime) -> Result<Self, Vec<String>> {
        let mut v = Violations::default();

        if dto.patient_id.is_none() {
            v.push("A patient must be assigned");
        }
        if dto.doctor_id.is_none() {
            v.push("A doctor must be assigned");
        }
        match dto.appointment_date {
            None => v.push("Appointment date is required"),
            Some(at) if at <= now => v.push("Appointment date must be in the future"),
            Some(_) => {}
        }
        let reason = v.optional_text(dto.reason.as_deref(), "Reason", REASON_MAX);

        match (dto.patient_id, dto.doctor_id, dto.appointment_date) {
            (Some(patient_id), Some(doctor_id), Some(appointment_date)) if v.is_empty() => {
                Ok(Self {
                    patient_id,
                    doctor_id,
                    appointment_date,
                    reason,
                })
            }
            _ => Err(v.into_messages()),
        }
    }

    pub fn patient_id(&self) -> i64 {
        self.patient_id
    }

    pub fn doctor_id(&self) -> i64 {
        self.doctor_id
    }

    pub fn appointment_date(&self) -> NaiveDateTime {
        self.appointment_date
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn accepts_valid_patient_and_trims_fields() {
        let mut dto = patient_dto("ana@x.com");
        dto.first_name = Some("  Ana ".into());

        let data = PatientData::validate(&dto, today()).unwrap();
        assert_eq!(data.first_name(), "Ana");
        assert_eq!(data.email(), "ana@x.com");
    }

    #[test]
    fn patient_reports_every_violation_in_field_order() {
        let dto = PatientDto {
            first_name: Some("   ".into()),
            last_name: None,
            email: Some("not-an-email".into()),
            phone: Some(String::new()),
            date_of_birth: Some(today()),
            ..Default::default()
        };

        let errors = PatientData::validate(&dto, today()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "First name is required",
                "Last name is required",
                "Email must be a valid address",
                "Phone is required",
                "Date of birth must be in the past",
            ]
        );
    }

    #[test]
    fn patient_without_birth_date_is_accepted() {
        let mut dto = patient_dto("ana@x.com");
        dto.date_of_birth = None;
        assert!(PatientData::validate(&dto, today()).is_ok());
    }

    #[test]
    fn doctor_enforces_length_limits() {
        let mut dto = doctor_dto("luis@x.com");
        dto.first_name = Some("x".repeat(NAME_MAX + 1));
        dto.phone = Some("1".repeat(PHONE_MAX + 1));
        dto.specialty = None;

        let errors = DoctorData::validate(&dto).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "First name must not exceed 100 characters",
                "Phone must not exceed 15 characters",
                "Specialty is required",
            ]
        );
    }

    #[test]
    fn email_limit_is_per_entity() {
        let long = format!("{}@x.com", "a".repeat(114));
        assert_eq!(long.chars().count(), 120);

        let data = PatientData::validate(&patient_dto(&long), today()).unwrap();
        assert_eq!(data.email(), long);

        let at_limit = format!("{}@x.com", "a".repeat(PATIENT_EMAIL_MAX - 6));
        assert!(PatientData::validate(&patient_dto(&at_limit), today()).is_ok());
        let over = format!("{}@x.com", "a".repeat(PATIENT_EMAIL_MAX - 5));
        assert_eq!(
            PatientData::validate(&patient_dto(&over), today()).unwrap_err(),
            vec!["Email must not exceed 255 characters"]
        );

        assert_eq!(
            DoctorData::validate(&doctor_dto(&long)).unwrap_err(),
            vec!["Email must not exceed 100 characters"]
        );
        let doctor_at_limit = format!("{}@x.com", "a".repeat(DOCTOR_EMAIL_MAX - 6));
        assert!(DoctorData::validate(&doctor_dto(&doctor_at_limit)).is_ok());
    }

    #[test]
    fn values_at_the_limits_are_accepted() {
        let mut patient = patient_dto("ana@x.com");
        patient.first_name = Some("x".repeat(NAME_MAX));
        patient.last_name = Some("y".repeat(NAME_MAX));
        patient.phone = Some("1".repeat(PHONE_MAX));
        let data = PatientData::validate(&patient, today()).unwrap();
        assert_eq!(data.first_name().chars().count(), NAME_MAX);
        assert_eq!(data.phone().chars().count(), PHONE_MAX);

        let mut doctor = doctor_dto("luis@x.com");
        doctor.phone = Some("1".repeat(PHONE_MAX));
        doctor.specialty = Some("s".repeat(SPECIALTY_MAX));
        assert!(DoctorData::validate(&doctor).is_ok());

        let mut appointment = appointment_dto(1, 2);
        appointment.reason = Some("r".repeat(REASON_MAX));
        let data = AppointmentData::validate(&appointment, now()).unwrap();
        assert_eq!(data.reason().map(|r| r.chars().count()), Some(REASON_MAX));
    }

    #[test]
    fn doctor_phone_is_optional() {
        let mut dto = doctor_dto("luis@x.com");
        dto.phone = Some("  ".into());
        let data = DoctorData::validate(&dto).unwrap();
        assert_eq!(data.phone(), None);
    }

    #[test]
    fn doctor_requires_email() {
        let mut dto = doctor_dto("luis@x.com");
        dto.email = None;
        assert_eq!(
            DoctorData::validate(&dto).unwrap_err(),
            vec!["Email is required"]
        );
    }

    #[test]
    fn appointment_must_be_strictly_in_the_future() {
        let mut dto = appointment_dto(1, 2);
        dto.appointment_date = Some(now());

        let errors = AppointmentData::validate(&dto, now()).unwrap_err();
        assert_eq!(errors, vec!["Appointment date must be in the future"]);
    }

    #[test]
    fn appointment_missing_everything() {
        let dto = AppointmentDto {
            reason: Some("r".repeat(REASON_MAX + 1)),
            ..Default::default()
        };

        let errors = AppointmentData::validate(&dto, now()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "A patient must be assigned",
                "A doctor must be assigned",
                "Appointment date is required",
                "Reason must not exceed 255 characters",
            ]
        );
    }

    #[test]
    fn blank_reason_collapses_to_none() {
        let mut dto = appointment_dto(1, 2);
        dto.reason = Some(" ".into());
        let data = AppointmentData::validate(&dto, now()).unwrap();
        assert_eq!(data.reason(), None);
        assert_eq!(data.patient_id(), 1);
        assert_eq!(data.doctor_id(), 2);
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ana@x.com"));
        assert!(!is_valid_email("ana@x"));
        assert!(!is_valid_email("ana x@x.com"));
        assert!(!is_valid_email("@x.com"));
    }
}
