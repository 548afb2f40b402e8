use std::sync::Arc;

use axum::{Extension, Json};

use crate::{
    authentication::{check_admin_password, issue_session_token},
    config::Config,
    data_formats::{JsonBody, LoginRequest, LoginResponse},
    errors::RequestError,
};

use super::JsonResult;

// ----------------- Auth Handlers -----------------
pub async fn login(
    Extension(config): Extension<Arc<Config>>,
    JsonBody(LoginRequest { password }): JsonBody<LoginRequest>,
) -> JsonResult<LoginResponse> {
    tracing::info!("login attempt received");

    let is_password_correct = check_admin_password(config.admin_secret.as_ref(), password)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "could not check admin password");
            RequestError::ServerError
        })?;

    if !is_password_correct {
        tracing::warn!("login failed: password mismatch");
        return Err(RequestError::NotAuthorized("Invalid credentials"));
    }

    let token = issue_session_token(&config.session_secret).map_err(|e| {
        tracing::error!(error = %e, "could not issue session token");
        RequestError::ServerError
    })?;
    tracing::info!("login successful");
    Ok(Json(LoginResponse { token }))
}
