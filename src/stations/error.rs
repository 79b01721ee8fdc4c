use crate::api::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Catalog document '{document}' has an unexpected shape")]
    Malformed {
        document: String,
        #[source]
        source: serde_json::Error,
    },
}
