use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::models::Subject;
use crate::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Response header carrying the validated subject to the fronting proxy.
pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Validate the bearer token of the request.
///
/// Only the `Authorization` header is read. Any `X-User-ID` the caller sent is
/// ignored; the one in the response comes from the token.
pub async fn validate<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, ApiSuccess<ValidateResponseData>), ApiError> {
    let token = extract_token_from_header(&headers)?;

    let subject = state.identity_service.validate(token)?;

    let value = HeaderValue::from_str(subject.as_str()).map_err(|e| {
        tracing::warn!(error = %e, "Subject is not a valid header value");
        ApiError::InvalidToken
    })?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(USER_ID_HEADER, value);

    Ok((
        response_headers,
        ApiSuccess::new(StatusCode::OK, (&subject).into()),
    ))
}

fn extract_token_from_header(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        tracing::debug!("Missing Authorization header");
        ApiError::InvalidToken
    })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::debug!("Authorization header is not visible ASCII");
        ApiError::InvalidToken
    })?;

    auth_str.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("Authorization header is not a Bearer credential");
        ApiError::InvalidToken
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateResponseData {
    pub subject: String,
}

impl From<&Subject> for ValidateResponseData {
    fn from(subject: &Subject) -> Self {
        Self {
            subject: subject.as_str().to_string(),
        }
    }
}
