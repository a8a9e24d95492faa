// src/routes/patient_routes.rs

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
    routing::get,
};

use super::{created, email_taken, local_today, on_duplicate_email};
use crate::{
    error::ApiError,
    models::{AppState, MessageResponse, PatientDto},
    validation::PatientData,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route(
            "/patients/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
}

pub async fn list_patients(
    State(state): State<AppState>,
) -> Result<Json<Vec<PatientDto>>, ApiError> {
    let rows = state.patients.find_all().await?;
    Ok(Json(rows.into_iter().map(PatientDto::from).collect()))
}

pub async fn get_patient(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<PatientDto>, ApiError> {
    let Path(id) = path?;

    let row = state
        .patients
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Patient", id))?;

    Ok(Json(row.into()))
}

pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let data = PatientData::validate(&dto, local_today()).map_err(ApiError::Validation)?;

    // The unique constraint still backs this up if two requests race past it.
    if state.patients.exists_by_email(data.email()).await? {
        return Err(email_taken(data.email()));
    }

    let saved = state
        .patients
        .save(None, &data)
        .await
        .map_err(on_duplicate_email(data.email()))?;
    tracing::info!(patient_id = saved.id, "patient registered");

    Ok(created(
        format!("/api/patients/{}", saved.id),
        PatientDto::from(saved),
    ))
}

pub async fn update_patient(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<PatientDto>, JsonRejection>,
) -> Result<Json<PatientDto>, ApiError> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let data = PatientData::validate(&dto, local_today()).map_err(ApiError::Validation)?;

    if !state.patients.exists_by_id(id).await? {
        return Err(ApiError::not_found("Patient", id));
    }

    let updated = state
        .patients
        .save(Some(id), &data)
        .await
        .map_err(on_duplicate_email(data.email()))?;
    Ok(Json(updated.into()))
}

pub async fn delete_patient(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;

    if !state.patients.exists_by_id(id).await? {
        return Err(ApiError::not_found("Patient", id));
    }

    state.patients.delete_by_id(id).await?;
    tracing::info!(patient_id = id, "patient deleted");
    Ok(Json(MessageResponse::new("Patient deleted successfully")))
}
