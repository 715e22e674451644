use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::identity::errors::PasswordInputError;
use crate::identity::errors::UsernameError;
use crate::identity::models::AccessToken;
use crate::identity::models::LoginCommand;
use crate::identity::models::Password;
use crate::identity::models::Username;
use crate::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: IdentityServicePort>(
    State(state): State<AppState<S>>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected login body");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let command = body
        .try_into_command()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .identity_service
        .login(command)
        .await
        .map_err(ApiError::from)
        .map(|ref token| ApiSuccess::new(StatusCode::OK, token.into()))
}

/// HTTP request body for login (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordInputError),
}

impl LoginRequestBody {
    fn try_into_command(self) -> Result<LoginCommand, ParseLoginRequestError> {
        let username = Username::new(self.username)?;
        let password = Password::new(self.password)?;

        Ok(LoginCommand::new(username, password))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub token_type: &'static str,
    /// Unix timestamp
    pub expires_at: i64,
    /// Seconds
    pub expires_in: i64,
}

impl From<&AccessToken> for LoginResponseData {
    fn from(token: &AccessToken) -> Self {
        Self {
            token: token.token.clone(),
            token_type: "Bearer",
            expires_at: token.expires_at,
            expires_in: token.lifetime_seconds(),
        }
    }
}
