//! Request signing for the Euskalmet API.
//!
//! Every request carries a bearer JWT signed with the account's RSA private key.
//! [`Credentials`](credentials::Credentials) holds the signing configuration and
//! [`JwtSigner`](signer::JwtSigner) turns it into the header map attached to each
//! request.

pub mod credentials;
pub mod error;
pub mod signer;
