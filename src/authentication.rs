use std::sync::Arc;

use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::{AdminSecret, AuthMode, Config};
use crate::errors::RequestError;

const SESSION_EXPIRY_DURATION: time::Duration = time::Duration::days(7);

/// Payload of the token handed out by the login endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaim {
    pub authenticated: bool,
    /// Issue time in milliseconds since the epoch.
    pub timestamp: i64,
    exp: i64,
}

/// Proof that the request passed the admin gate.
#[derive(Debug)]
pub struct AdminAuth {
    pub token: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let config = match parts.extensions.get::<Arc<Config>>() {
            Some(config) => config.clone(),
            None => {
                tracing::error!("config extension missing from request");
                return Err(RequestError::ServerError);
            }
        };

        let header = match parts.headers.get(AUTHORIZATION) {
            Some(header) => header,
            None => return Err(RequestError::NotAuthorized("Unauthorized")),
        };
        let header = match header.to_str() {
            Ok(header) if !header.trim().is_empty() => header,
            _ => {
                tracing::debug!("empty or non-ascii authorization header");
                return Err(RequestError::NotAuthorized("Unauthorized"));
            }
        };

        match config.auth_mode {
            AuthMode::Presence => Ok(AdminAuth {
                token: header.to_string(),
            }),
            AuthMode::Verify => {
                let token = match header.strip_prefix("Bearer ") {
                    Some(token) => token.trim(),
                    None => {
                        tracing::debug!("authorization header without bearer prefix");
                        return Err(RequestError::NotAuthorized("Unauthorized"));
                    }
                };
                verify_session_token(token, &config.session_secret)?;
                Ok(AdminAuth {
                    token: token.to_string(),
                })
            }
        }
    }
}

pub fn issue_session_token(secret: &str) -> Result<String> {
    let now = OffsetDateTime::now_utc();
    let claim = SessionClaim {
        authenticated: true,
        timestamp: (now.unix_timestamp_nanos() / 1_000_000) as i64,
        exp: (now + SESSION_EXPIRY_DURATION).unix_timestamp(),
    };

    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claim,
        &jsonwebtoken::EncodingKey::from_secret(secret.as_ref()),
    )
    .context("Failed to generate session token")
}

pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaim, RequestError> {
    let token_data = jsonwebtoken::decode::<SessionClaim>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_ref()),
        &jsonwebtoken::Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!(error = %e, "rejected session token");
        RequestError::NotAuthorized("Unauthorized")
    })?;
    let claim = token_data.claims;
    if !claim.authenticated || claim.exp < OffsetDateTime::now_utc().unix_timestamp() {
        return Err(RequestError::NotAuthorized("Unauthorized"));
    }
    Ok(claim)
}

/// Compare a submitted password with the configured admin secret.
pub async fn check_admin_password(secret: Option<&AdminSecret>, password: String) -> Result<bool> {
    match secret {
        Some(AdminSecret::Plain(expected)) => Ok(password == *expected),
        Some(AdminSecret::Argon2Hash(hash)) => verify_password_argon2(password, hash).await,
        None => Ok(false),
    }
}

pub async fn verify_password_argon2(password: String, hash: &str) -> Result<bool> {
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Stored admin password hash is malformed"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
