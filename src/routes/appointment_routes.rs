// src/routes/appointment_routes.rs

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
    routing::get,
};

use super::{created, local_now};
use crate::{
    error::ApiError,
    models::{AppState, AppointmentDto, MessageResponse},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments).post(create_appointment))
        .route(
            "/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
}

/* ============================================================
   GET /appointments
   ============================================================ */

pub async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<AppointmentDto>>, ApiError> {
    let rows = state.appointments.find_all().await?;
    Ok(Json(rows.into_iter().map(AppointmentDto::from).collect()))
}

/* ============================================================
   GET /appointments/{id}
   ============================================================ */

pub async fn get_appointment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let Path(id) = path?;

    let row = state
        .appointments
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Appointment", id))?;

    Ok(Json(row.into()))
}

/* ============================================================
   POST /appointments (create)
   ============================================================ */

pub async fn create_appointment(
    State(state): State<AppState>,
    payload: Result<Json<AppointmentDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let saved = state.workflow.create(&dto, local_now()).await?;

    Ok(created(
        format!("/api/appointments/{}", saved.id),
        AppointmentDto::from(saved),
    ))
}

/* ============================================================
   PUT /appointments/{id} (full replacement)
   ============================================================ */

pub async fn update_appointment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AppointmentDto>, JsonRejection>,
) -> Result<Json<AppointmentDto>, ApiError> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let updated = state.workflow.update(id, &dto, local_now()).await?;
    Ok(Json(updated.into()))
}

/* ============================================================
   DELETE /appointments/{id}
   ============================================================ */

pub async fn delete_appointment(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;

    if !state.appointments.exists_by_id(id).await? {
        return Err(ApiError::not_found("Appointment", id));
    }

    state.appointments.delete_by_id(id).await?;
    tracing::info!(appointment_id = id, "appointment deleted");
    Ok(Json(MessageResponse::new("Appointment deleted successfully")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, NaiveDateTime};
    use serde_json::{Value, json};

    use crate::models::AppState;
    use crate::notification::message::format_appointment_date;
    use crate::routes::local_now;
    use crate::routes::testing::{TestResponse, send, test_state};

    fn tomorrow_at_ten() -> NaiveDateTime {
        (local_now() + Duration::days(1))
            .date()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    async fn seed(state: &AppState) -> (i64, i64) {
        let patient = send(
            state,
            "POST",
            "/api/patients",
            Some(json!({
                "firstName": "Ana",
                "lastName": "Gomez",
                "email": "ana@x.com",
                "phone": "555",
                "dateOfBirth": "1990-01-01"
            })),
        )
        .await;
        assert_eq!(patient.status, StatusCode::CREATED);

        let doctor = send(
            state,
            "POST",
            "/api/doctors",
            Some(json!({
                "firstName": "Luis",
                "lastName": "Diaz",
                "email": "luis@x.com",
                "phone": "555",
                "specialty": "Cardiology"
            })),
        )
        .await;
        assert_eq!(doctor.status, StatusCode::CREATED);

        (
            patient.body["id"].as_i64().unwrap(),
            doctor.body["id"].as_i64().unwrap(),
        )
    }

    fn booking(patient_id: i64, doctor_id: i64, at: NaiveDateTime) -> Value {
        json!({
            "patientId": patient_id,
            "doctorId": doctor_id,
            "appointmentDate": at,
            "reason": "checkup"
        })
    }

    async fn book(
        state: &AppState,
        patient_id: i64,
        doctor_id: i64,
        at: NaiveDateTime,
    ) -> TestResponse {
        send(state, "POST", "/api/appointments", Some(booking(patient_id, doctor_id, at))).await
    }

    #[tokio::test]
    async fn booking_scenario_notifies_patient() {
        let (state, sender) = test_state();
        let (patient_id, doctor_id) = seed(&state).await;
        let at = tomorrow_at_ten();

        let res = book(&state, patient_id, doctor_id, at).await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.location.as_deref(), Some("/api/appointments/1"));
        assert_eq!(res.body["patientId"], patient_id);
        assert_eq!(res.body["doctorId"], doctor_id);
        assert_eq!(res.body["reason"], "checkup");

        let sent = sender.messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "ana@x.com");
        assert!(sent[0].body.contains("Ana Gomez"));
        assert!(sent[0].body.contains("Luis Diaz"));
        assert!(sent[0].body.contains(&format_appointment_date(at)));

        // No slot uniqueness: the same booking goes through again.
        let again = book(&state, patient_id, doctor_id, at).await;
        assert_eq!(again.status, StatusCode::CREATED);
        assert_eq!(again.body["id"], 2);
    }

    #[tokio::test]
    async fn unresolved_reference_is_not_found_and_not_persisted() {
        let (state, sender) = test_state();
        let (patient_id, _) = seed(&state).await;

        let res = book(&state, patient_id, 77, tomorrow_at_ten()).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body, json!({ "message": "Patient or doctor does not exist" }));

        let list = send(&state, "GET", "/api/appointments", None).await;
        assert_eq!(list.body, json!([]));
        assert!(sender.messages().await.is_empty());
    }

    #[tokio::test]
    async fn past_date_is_rejected_and_not_persisted() {
        let (state, _) = test_state();
        let (patient_id, doctor_id) = seed(&state).await;
        let yesterday = local_now() - Duration::days(1);

        let res = book(&state, patient_id, doctor_id, yesterday).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body, json!(["Appointment date must be in the future"]));

        let list = send(&state, "GET", "/api/appointments", None).await;
        assert_eq!(list.body, json!([]));
    }

    #[tokio::test]
    async fn update_get_and_delete() {
        let (state, sender) = test_state();
        let (patient_id, doctor_id) = seed(&state).await;
        book(&state, patient_id, doctor_id, tomorrow_at_ten()).await;

        let later = tomorrow_at_ten() + Duration::days(2);
        let res = send(
            &state,
            "PUT",
            "/api/appointments/1",
            Some(json!({
                "patientId": patient_id,
                "doctorId": doctor_id,
                "appointmentDate": later
            })),
        )
        .await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body["reason"], Value::Null);

        let res = send(&state, "GET", "/api/appointments/1", None).await;
        assert_eq!(res.body["appointmentDate"], json!(later));

        let sent = sender.messages().await;
        assert_eq!(sent.last().unwrap().subject, "Medical appointment update");

        let res = send(&state, "DELETE", "/api/appointments/1", None).await;
        assert_eq!(res.body, json!({ "message": "Appointment deleted successfully" }));
        let res = send(&state, "DELETE", "/api/appointments/1", None).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_of_unknown_appointment_is_not_found() {
        let (state, _) = test_state();
        let (patient_id, doctor_id) = seed(&state).await;

        let body = booking(patient_id, doctor_id, tomorrow_at_ten());
        let res = send(&state, "PUT", "/api/appointments/5", Some(body)).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.body, json!({ "message": "Appointment with id 5 was not found" }));
    }

    #[tokio::test]
    async fn booked_patient_cannot_be_deleted() {
        let (state, _) = test_state();
        let (patient_id, doctor_id) = seed(&state).await;
        book(&state, patient_id, doctor_id, tomorrow_at_ten()).await;

        let res = send(&state, "DELETE", &format!("/api/patients/{patient_id}"), None).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            res.body,
            json!(["The patient still has appointments and cannot be deleted"])
        );
    }

    #[tokio::test]
    async fn health_is_open() {
        let (state, _) = test_state();
        let res = send(&state, "GET", "/health", None).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body, json!({ "status": "ok" }));
    }
}
