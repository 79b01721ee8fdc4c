//! Station metadata as published by the station catalog, plus the spatial-index
//! wrapper used by [`crate::StationLocator`].

use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// A weather-monitoring installation identified by a short code (e.g. `"C017"`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Station code used in every station-scoped endpoint.
    #[serde(alias = "stationId")]
    pub id: String,
    /// Human readable name, if the catalog provides one.
    #[serde(default)]
    pub name: Option<String>,
    /// Catalog resource key (e.g. `"euskalmet/stations/C017"`).
    #[serde(default)]
    pub key: Option<String>,
    /// Municipality the station belongs to, if known.
    #[serde(default)]
    pub municipality: Option<String>,
    /// Geographical position, if the catalog provides one.
    #[serde(default)]
    pub position: Option<Position>,
}

/// Geographical position of a station.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees.
    #[serde(alias = "y", alias = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[serde(alias = "x", alias = "lon")]
    pub longitude: f64,
    /// Altitude above sea level in meters, if available.
    #[serde(default, alias = "z")]
    pub altitude: Option<f64>,
}

impl Station {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            key: None,
            municipality: None,
            position: None,
        }
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.position = Some(Position {
            latitude,
            longitude,
            altitude: None,
        });
        self
    }
}

/// A station that is known to have a position, indexed by `[latitude, longitude]`.
#[derive(Debug, Clone)]
pub(crate) struct PositionedStation {
    pub station: Station,
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionedStation {
    pub fn from_station(station: &Station) -> Option<Self> {
        station.position.map(|p| Self {
            station: station.clone(),
            latitude: p.latitude,
            longitude: p.longitude,
        })
    }
}

impl RTreeObject for PositionedStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

impl PointDistance for PositionedStation {
    /// Squared planar distance in degrees. Only used to order R-tree candidates;
    /// real distances are computed with haversine afterwards.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}
