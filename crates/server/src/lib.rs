use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use engine::{EngineError, ValidationErrors};

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod budgets;
mod items;
mod server;
mod user;

pub enum ServerError {
    Engine(EngineError),
    /// Missing or wrong Basic credentials.
    Unauthorized,
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Credentials => StatusCode::UNAUTHORIZED,
        EngineError::PasswordHash(_) | EngineError::InvalidData(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn body_for_engine_error(err: EngineError) -> Error {
    match err {
        EngineError::Validation(errors) => Error {
            error: "invalid input".to_string(),
            fields: Some(errors.fields().clone()),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            internal()
        }
        other @ (EngineError::PasswordHash(_) | EngineError::InvalidData(_)) => {
            tracing::error!("{other}");
            internal()
        }
        other => Error {
            error: other.to_string(),
            fields: None,
        },
    }
}

fn internal() -> Error {
    Error {
        error: "internal server error".to_string(),
        fields: None,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Error {
                    error: "authentication credentials were not provided or are invalid"
                        .to_string(),
                    fields: None,
                },
            ),
            ServerError::Generic(error) => (StatusCode::BAD_REQUEST, Error { error, fields: None }),
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"family_budget\""),
            );
        }
        response
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        match value {
            EngineError::Credentials => Self::Unauthorized,
            other => Self::Engine(other),
        }
    }
}

/// A body that parsed as JSON but does not fit the request type is an
/// input error like any other. Unreadable bodies stay generic.
impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        match value {
            JsonRejection::JsonDataError(err) => Self::Engine(EngineError::Validation(
                ValidationErrors::single("non_field_errors", err.body_text()),
            )),
            other => Self::Generic(other.body_text()),
        }
    }
}

/// Unwraps a field the client must send.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> Result<T, ServerError> {
    value.ok_or_else(|| EngineError::from(ValidationErrors::required(field)).into())
}
