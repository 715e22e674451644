use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::identity::errors::IdentityError;

pub mod login;
pub mod validate;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Errors as seen by callers.
///
/// Deliberately coarse: unknown user and wrong password share one variant, as
/// do all server-side failures. Details go to the logs, not the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError,
    BadRequest(String),
    InvalidCredentials,
    InvalidToken,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InternalServerError => "INTERNAL_ERROR",
            ApiError::BadRequest(_) => "INVALID_REQUEST",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidToken => "INVALID_TOKEN",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match self {
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            ApiError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Invalid or expired token".to_string(),
            ),
        };

        (
            status,
            Json(ApiResponseBody::new_error(status, message, code)),
        )
            .into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::MalformedRequest(msg) => ApiError::BadRequest(msg),
            IdentityError::NotFound(_) | IdentityError::InvalidCredentials => {
                ApiError::InvalidCredentials
            }
            IdentityError::InvalidToken => ApiError::InvalidToken,
            IdentityError::StorageFailure(_)
            | IdentityError::CorruptPasswordHash(_)
            | IdentityError::SigningFailure(_)
            | IdentityError::Internal(_) => ApiError::InternalServerError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, code: &str) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                message,
                code: code.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    pub code: String,
}
