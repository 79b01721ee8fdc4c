mod api;
mod auth;
mod dataset;
mod error;
mod euskalmet;
mod filtering;
mod harvest;
mod stations;
mod types;
mod utils;

pub use error::EuskalmetError;
pub use euskalmet::*;
pub use filtering::DatasetFrameExt;

pub use api::client::{ApiClient, ClientOptions, HttpApiClient, DEFAULT_BASE_URL};
pub use api::endpoint::Endpoint;
pub use api::error::{ApiError, ErrorClass};

pub use auth::credentials::{Credentials, PRIVATE_KEY_FILE_NAME, SETTINGS_FILE_NAME};
pub use auth::error::AuthError;
pub use auth::signer::{AuthProvider, JwtSigner, SignedHeaders};

pub use stations::catalog::Catalog;
pub use stations::error::CatalogError;
pub use stations::locate_station::StationLocator;

pub use harvest::engine::{HarvestOptions, HarvestReport, Harvester};
pub use harvest::error::HarvestError;
pub use harvest::executor::{default_workers, Executor, PoolExecutor, SerialExecutor};
pub use harvest::merge::merge;
pub use harvest::outcome::{FatalReason, FetchOutcome, FetchResult, InvalidReason, InvalidTask};
pub use harvest::readings::{parse_readings, ReadingParseError};
pub use harvest::retry::RetryPolicy;
pub use harvest::task::{build_tasks, FetchTask};

pub use dataset::error::DatasetError;
pub use dataset::store::ObservationStore;
pub use dataset::table::{to_table, write_csv, write_csv_to, COLUMNS};
pub use dataset::Dataset;

pub use types::date_unit::{DateUnit, DateUnitRange};
pub use types::into_utc_trait::IntoUtcDateTime;
pub use types::reading::ReadingRecord;
pub use types::region::Region;
pub use types::sensor::{Measure, Sensor};
pub use types::station::{Position, Station};
