use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::models::MessageResponse;
use crate::notification::NotificationError;
use crate::repository::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Serialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more field rules failed; 400 with every message.
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    /// Duplicate unique value or a row still in use; reported like validation.
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        ApiError::NotFound(format!("{entity} with id {id} was not found"))
    }

    fn to_error_response(code: &str, message: &str) -> Json<ErrorResponse> {
        Json(ErrorResponse {
            error: ErrorObject {
                code: code.to_string(),
                message: message.to_string(),
            },
        })
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) => {
                ApiError::Conflict(format!("The {field} is already registered"))
            }
            StoreError::InUse(entity) => ApiError::Conflict(format!(
                "The {entity} still has appointments and cannot be deleted"
            )),
            StoreError::MissingReference => {
                ApiError::NotFound("Patient or doctor does not exist".into())
            }
            StoreError::NotFound(entity, id) => ApiError::not_found(&capitalize(entity), id),
            StoreError::Backend(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(messages) => {
                (StatusCode::BAD_REQUEST, Json(messages)).into_response()
            }
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, Json(vec![msg])).into_response(),
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(MessageResponse::new(msg))).into_response()
            }
            ApiError::Notification(e) => {
                let code = match &e {
                    NotificationError::UnsupportedChannel(_) => "UNSUPPORTED_CHANNEL",
                    NotificationError::Transport(_) => "NOTIFICATION_FAILED",
                };
                tracing::error!(error = %e, "notification error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response(code, &e.to_string()),
                )
                    .into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(detail = %msg, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::to_error_response("INTERNAL", &msg),
                )
                    .into_response()
            }
        }
    }
}
