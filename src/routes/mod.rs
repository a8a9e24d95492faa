use axum::{
    Json, Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::AppState;
use crate::repository::StoreError;

pub mod appointment_routes;
pub mod doctor_routes;
pub mod health_routes;
pub mod patient_routes;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", patient_routes::router())
        .nest("/api", doctor_routes::router())
        .nest("/api", appointment_routes::router())
        .merge(health_routes::router())
        .with_state(state)
}

/// 201 with `Location` pointing at the new resource.
pub(crate) fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body)).into_response()
}

pub(crate) fn email_taken(email: &str) -> ApiError {
    ApiError::Conflict(format!("The email '{email}' is already registered"))
}

/// Maps a unique-constraint failure on save to the same message the
/// pre-insert check produces.
pub(crate) fn on_duplicate_email(email: &str) -> impl FnOnce(StoreError) -> ApiError + '_ {
    move |e| match e {
        StoreError::Duplicate(_) => email_taken(email),
        other => other.into(),
    }
}

// Temporal rules are evaluated against server-local wall time.
pub(crate) fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub(crate) fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
