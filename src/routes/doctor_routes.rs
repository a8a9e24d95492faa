// src/routes/doctor_routes.rs

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::Response,
    routing::get,
};

use super::{created, on_duplicate_email};
use crate::{
    error::ApiError,
    models::{AppState, DoctorDto, MessageResponse},
    validation::DoctorData,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route(
            "/doctors/{id}",
            get(get_doctor).put(update_doctor).delete(delete_doctor),
        )
}

pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Vec<DoctorDto>>, ApiError> {
    let rows = state.doctors.find_all().await?;
    Ok(Json(rows.into_iter().map(DoctorDto::from).collect()))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DoctorDto>, ApiError> {
    let Path(id) = path?;

    let row = state
        .doctors
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Doctor", id))?;

    Ok(Json(row.into()))
}

// Doctor email uniqueness is left entirely to the data layer.
pub async fn create_doctor(
    State(state): State<AppState>,
    payload: Result<Json<DoctorDto>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(dto) = payload?;
    let data = DoctorData::validate(&dto).map_err(ApiError::Validation)?;

    let saved = state
        .doctors
        .save(None, &data)
        .await
        .map_err(on_duplicate_email(data.email()))?;
    tracing::info!(doctor_id = saved.id, "doctor registered");

    Ok(created(
        format!("/api/doctors/{}", saved.id),
        DoctorDto::from(saved),
    ))
}

pub async fn update_doctor(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DoctorDto>, JsonRejection>,
) -> Result<Json<DoctorDto>, ApiError> {
    let Path(id) = path?;
    let Json(dto) = payload?;
    let data = DoctorData::validate(&dto).map_err(ApiError::Validation)?;

    if !state.doctors.exists_by_id(id).await? {
        return Err(ApiError::not_found("Doctor", id));
    }

    let updated = state
        .doctors
        .save(Some(id), &data)
        .await
        .map_err(on_duplicate_email(data.email()))?;
    Ok(Json(updated.into()))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = path?;

    if !state.doctors.exists_by_id(id).await? {
        return Err(ApiError::not_found("Doctor", id));
    }

    state.doctors.delete_by_id(id).await?;
    tracing::info!(doctor_id = id, "doctor deleted");
    Ok(Json(MessageResponse::new("Doctor deleted successfully")))
}
