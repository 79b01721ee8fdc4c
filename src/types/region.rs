use serde::{Deserialize, Serialize};

/// Summary of a forecast region (e.g. `basque_country`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub key: String,
    pub region_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_region_list() -> Result<(), serde_json::Error> {
        let regions: Vec<Region> = serde_json::from_value(serde_json::json!([
            { "key": "euskalmet/geo/regions/basque_country", "regionId": "basque_country" },
            { "key": "euskalmet/geo/regions/europe", "regionId": "europe" }
        ]))?;
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].region_id, "basque_country");
        Ok(())
    }
}
