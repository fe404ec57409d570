use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::utils::round_trip::RoundTripError;
use crate::utils::serialization::SerializationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("{message}")]
    ValidationFailed {
        message: String,
        form: serde_json::Value,
    },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    #[error("Database Error: {0}")]
    DatabaseError(String),
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<&'a serde_json::Value>,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => ErrorResponse { error: msg, form: None },
            AppError::ValidationFailed { message, form } => ErrorResponse {
                error: message,
                form: Some(form),
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { id } => {
                AppError::Conflict(format!("Employee {} was modified by another request", id))
            }
            StoreError::Database(err) => {
                log::error!("Database error: {:?}", err);
                AppError::DatabaseError("Database error".to_string())
            }
        }
    }
}

impl From<SerializationError> for AppError {
    fn from(err: SerializationError) -> Self {
        match err {
            SerializationError::Xml(_) => {
                log::error!("{}", err);
                AppError::InternalServerError(err.to_string())
            }
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

impl From<RoundTripError> for AppError {
    fn from(err: RoundTripError) -> Self {
        match err {
            RoundTripError::InvalidArgument => AppError::BadRequest(err.to_string()),
            RoundTripError::JsonMismatch { ref fields } | RoundTripError::XmlMismatch { ref fields } => {
                log::warn!("Round trip mismatch on {:?}", fields);
                AppError::InternalServerError(err.to_string())
            }
            RoundTripError::Encode(ref source)
            | RoundTripError::JsonDecode(ref source)
            | RoundTripError::XmlDecode(ref source) => {
                log::error!("{}: {}", err, source);
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}
