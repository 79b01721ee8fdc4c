use crate::api::error::ApiError;
use crate::auth::error::AuthError;
use crate::dataset::error::DatasetError;
use crate::harvest::error::HarvestError;
use crate::stations::error::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EuskalmetError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Harvest(#[from] HarvestError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Batch size must be at least one hour")]
    InvalidBatchSize,

    #[error("Failed to determine data directory")]
    DataDirResolution,
}
