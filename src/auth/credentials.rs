//! Signing configuration: the JWT payload fields and the RSA private key.

use crate::auth::error::AuthError;
use crate::utils::default_config_dir;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

pub const SETTINGS_FILE_NAME: &str = "settings.toml";
pub const PRIVATE_KEY_FILE_NAME: &str = "privateKey.pem";

/// Everything needed to sign requests for one API account.
///
/// Build it explicitly with [`Credentials::new`] or load it from a directory holding
/// `settings.toml` and `privateKey.pem`:
///
/// ```toml
/// [payload]
/// # Issuer, e.g. the company name
/// iss = "my-company"
/// # Expiration timestamp (seconds since the epoch)
/// exp = 1893456000
/// # Emission timestamp (seconds since the epoch)
/// iat = 1704067200
/// # Email of the API key owner
/// email = "name@company.com"
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub issuer: String,
    pub expiry_epoch: i64,
    pub emission_epoch: i64,
    pub email: String,
    pub private_key_pem: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    payload: Payload,
}

#[derive(Debug, Deserialize)]
struct Payload {
    iss: String,
    exp: i64,
    iat: i64,
    email: String,
}

impl Credentials {
    pub fn new(
        issuer: impl Into<String>,
        expiry_epoch: i64,
        emission_epoch: i64,
        email: impl Into<String>,
        private_key_pem: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            expiry_epoch,
            emission_epoch,
            email: email.into(),
            private_key_pem: private_key_pem.into(),
        }
    }

    /// Loads `settings.toml` and `privateKey.pem` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, AuthError> {
        let settings_path = dir.join(SETTINGS_FILE_NAME);
        let raw = fs::read_to_string(&settings_path)
            .map_err(|e| AuthError::ConfigRead(settings_path.clone(), e))?;
        let settings: SettingsFile =
            toml::from_str(&raw).map_err(|e| AuthError::ConfigParse(settings_path, e))?;

        let key_path = dir.join(PRIVATE_KEY_FILE_NAME);
        let private_key_pem = fs::read(&key_path).map_err(|e| AuthError::KeyRead(key_path, e))?;

        let payload = settings.payload;
        let credentials = Self::new(
            payload.iss,
            payload.exp,
            payload.iat,
            payload.email,
            private_key_pem,
        );
        credentials.validate()?;
        Ok(credentials)
    }

    /// Loads credentials from `<config dir>/euskalmet` (`~/.config/euskalmet` on Linux).
    pub fn from_default_location() -> Result<Self, AuthError> {
        let dir = default_config_dir().ok_or(AuthError::ConfigDirResolution)?;
        Self::from_dir(&dir)
    }

    /// Checks that the token validity window is not empty.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.expiry_epoch <= self.emission_epoch {
            return Err(AuthError::InvalidValidity {
                emission: self.emission_epoch,
                expiry: self.expiry_epoch,
            });
        }
        Ok(())
    }
}

// The private key never ends up in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("issuer", &self.issuer)
            .field("expiry_epoch", &self.expiry_epoch)
            .field("emission_epoch", &self.emission_epoch)
            .field("email", &self.email)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}
