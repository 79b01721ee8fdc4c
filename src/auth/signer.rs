use crate::auth::credentials::Credentials;
use crate::auth::error::AuthError;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};

const AUDIENCE: &str = "met01.apikey";
const TOKEN_VERSION: &str = "1.0.0";

/// Produces the headers that authenticate one request.
///
/// Implementations must be safe to share between harvest workers.
pub trait AuthProvider: Send + Sync {
    fn signed_headers(&self) -> Result<SignedHeaders, AuthError>;
}

/// Read-only header material attached to every request of a run.
#[derive(Debug, Clone, Default)]
pub struct SignedHeaders(HeaderMap);

impl SignedHeaders {
    pub fn new(headers: HeaderMap) -> Self {
        Self(headers)
    }

    /// `Authorization: Bearer <token>` plus `Accept: application/json`.
    pub fn bearer(token: &str) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(Self(headers))
    }

    pub fn as_map(&self) -> &HeaderMap {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Claims {
    aud: String,
    iss: String,
    exp: i64,
    version: String,
    iat: i64,
    email: String,
}

/// Signs RS256 tokens from a [`Credentials`] record.
pub struct JwtSigner {
    claims: Claims,
    key: EncodingKey,
}

impl JwtSigner {
    /// Validates the credentials and parses the private key once.
    pub fn new(credentials: &Credentials) -> Result<Self, AuthError> {
        credentials.validate()?;
        let key = EncodingKey::from_rsa_pem(&credentials.private_key_pem)
            .map_err(AuthError::InvalidKey)?;
        Ok(Self {
            claims: Claims {
                aud: AUDIENCE.to_string(),
                iss: credentials.issuer.clone(),
                exp: credentials.expiry_epoch,
                version: TOKEN_VERSION.to_string(),
                iat: credentials.emission_epoch,
                email: credentials.email.clone(),
            },
            key,
        })
    }

    pub fn token(&self) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        if self.claims.exp <= now {
            return Err(AuthError::Expired {
                expiry: self.claims.exp,
                now,
            });
        }
        encode(&Header::new(Algorithm::RS256), &self.claims, &self.key).map_err(AuthError::Signing)
    }
}

impl AuthProvider for JwtSigner {
    fn signed_headers(&self) -> Result<SignedHeaders, AuthError> {
        SignedHeaders::bearer(&self.token()?)
    }
}
