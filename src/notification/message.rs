use chrono::NaiveDateTime;

use crate::models::{Doctor, Patient};

/// e.g. `19/10/2026 at 03:45 PM`
pub fn format_appointment_date(at: NaiveDateTime) -> String {
    at.format("%d/%m/%Y at %I:%M %p").to_string()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppointmentNotice {
    Registered,
    Updated,
}

impl AppointmentNotice {
    pub fn subject(self) -> &'static str {
        match self {
            Self::Registered => "Medical appointment confirmation",
            Self::Updated => "Medical appointment update",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Updated => "updated",
        }
    }

    pub fn body(self, patient: &Patient, doctor: &Doctor, at: NaiveDateTime) -> String {
        format!(
            "Hello {}, your appointment with Dr. {} has been {} for {}",
            patient.full_name(),
            doctor.full_name(),
            self.verb(),
            format_appointment_date(at),
        )
    }
}
