use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to determine configuration directory")]
    ConfigDirResolution,

    #[error("Failed to read configuration file '{0}'")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse configuration file '{0}'")]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("Failed to read private key '{0}'")]
    KeyRead(PathBuf, #[source] std::io::Error),

    #[error("Private key is not a valid RSA PEM key")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("Token expiry ({expiry}) must be later than its emission time ({emission})")]
    InvalidValidity { emission: i64, expiry: i64 },

    #[error("Credentials expired at {expiry} (now {now})")]
    Expired { expiry: i64, now: i64 },

    #[error("Failed to sign request token")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Signed token is not a valid header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}
