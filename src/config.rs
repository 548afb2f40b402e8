use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::{bail, Context, Result};
use rand::{distributions::Alphanumeric, Rng};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://greenline.db";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How write endpoints decide whether a caller is the admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Any non-empty `Authorization` header is accepted.
    Presence,
    /// The header must carry a session token issued by the login endpoint.
    Verify,
}

impl FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "presence" => Ok(AuthMode::Presence),
            "verify" => Ok(AuthMode::Verify),
            other => bail!("AUTH_MODE must be `presence` or `verify`, got `{other}`"),
        }
    }
}

#[derive(Clone)]
pub enum AdminSecret {
    Plain(String),
    Argon2Hash(String),
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminSecret::Plain(_) => f.write_str("AdminSecret::Plain(..)"),
            AdminSecret::Argon2Hash(_) => f.write_str("AdminSecret::Argon2Hash(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub admin_secret: Option<AdminSecret>,
    pub session_secret: String,
    pub auth_mode: AuthMode,
    pub blob_dir: PathBuf,
    pub public_blob_base_url: Option<String>,
    pub max_upload_bytes: usize,
    pub address: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let admin_secret = match (var("ADMIN_PASSWORD_HASH"), var("ADMIN_PASSWORD")) {
            (Some(hash), _) => Some(AdminSecret::Argon2Hash(hash)),
            (None, Some(password)) => Some(AdminSecret::Plain(password)),
            (None, None) => {
                tracing::warn!("neither ADMIN_PASSWORD nor ADMIN_PASSWORD_HASH is set, admin login is disabled");
                None
            }
        };

        let session_secret = var("SESSION_SECRET").unwrap_or_else(|| {
            tracing::warn!("SESSION_SECRET not set, session tokens will not survive a restart");
            random_secret()
        });

        let auth_mode = match var("AUTH_MODE") {
            Some(mode) => mode.parse()?,
            None => AuthMode::Presence,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(limit) => limit
                .parse()
                .with_context(|| format!("MAX_UPLOAD_BYTES must be a number, got `{limit}`"))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port: u16 = match var("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT must be a number, got `{port}`"))?,
            None => 3001,
        };
        let address = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("Invalid HOST/PORT combination `{host}:{port}`"))?;

        let allowed_origins = var("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            admin_secret,
            session_secret,
            auth_mode,
            blob_dir: var("BLOB_DIR").map(PathBuf::from).unwrap_or_else(|| "blobs".into()),
            public_blob_base_url: var("PUBLIC_BLOB_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
            max_upload_bytes,
            address,
            allowed_origins,
        })
    }
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
