use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::PathBuf;

const CONFIG_DIR_NAME: &str = "euskalmet";

pub(crate) fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(CONFIG_DIR_NAME))
}

pub(crate) fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join(CONFIG_DIR_NAME))
}

/// `"euskalmet/sensors/S1"` -> `"S1"`.
pub(crate) fn last_path_segment(key: &str) -> &str {
    key.trim_end_matches('/').rsplit('/').next().unwrap_or(key)
}

/// Catalog identifiers come back either as JSON strings or as numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or a number, found {other}"
        ))),
    }
}
