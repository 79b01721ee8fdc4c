pub mod date_unit;
pub mod into_utc_trait;
pub mod reading;
pub mod region;
pub mod sensor;
pub mod station;
