use crate::types::station::{PositionedStation, Station};
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;
use rstar::RTree;

/// Spatial index over the stations of a catalog that carry a position.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<PositionedStation>,
}

impl StationLocator {
    /// Stations without a position are skipped.
    pub fn new(stations: &[Station]) -> Self {
        let positioned: Vec<PositionedStation> = stations
            .iter()
            .filter_map(PositionedStation::from_station)
            .collect();
        Self {
            rtree: RTree::bulk_load(positioned),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Up to `n_results` stations within `max_distance_km`, closest first.
    pub fn nearest(
        &self,
        latitude: f64,
        longitude: f64,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<(Station, f64)> {
        if n_results == 0 {
            return vec![];
        }

        // The R-tree orders by planar degrees, so take a margin of candidates
        // before ranking them by haversine distance.
        let candidate_limit = (n_results * 2).max(20);

        let mut stations_with_dist: Vec<(Station, f64)> = self
            .rtree
            .nearest_neighbor_iter(&[latitude, longitude])
            .take(candidate_limit)
            .filter_map(|candidate| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude,
                        longitude,
                    },
                    HaversineLocation {
                        latitude: candidate.latitude,
                        longitude: candidate.longitude,
                    },
                    Units::Kilometers,
                );
                (dist_km <= max_distance_km).then(|| (candidate.station.clone(), dist_km))
            })
            .collect();

        stations_with_dist.sort_by_key(|(_, d)| OrderedFloat(*d));
        stations_with_dist.truncate(n_results);
        stations_with_dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basque_stations() -> Vec<Station> {
        vec![
            Station::new("C017").with_position(43.2843, -2.1715),
            Station::new("C040").with_position(43.3128, -1.9785),
            Station::new("C071").with_position(43.2627, -2.9253),
            Station::new("C054").with_position(42.8500, -2.6833),
            Station::new("C999"),
        ]
    }

    #[test]
    fn test_positionless_stations_are_skipped() {
        let locator = StationLocator::new(&basque_stations());
        assert_eq!(locator.len(), 4);
        assert!(!locator.is_empty());
        assert!(StationLocator::new(&[]).is_empty());
    }

    #[test]
    fn test_nearest_is_sorted_by_distance() {
        let locator = StationLocator::new(&basque_stations());
        // Donostia
        let results = locator.nearest(43.3183, -1.9812, 3, 100.0);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0.id, "C040");
        assert_eq!(results[1].0.id, "C017");
        assert!(results[0].1 < 1.0, "C040 is within a kilometer");
        for pair in results.windows(2) {
            assert!(pair[0].1 <= pair[1].1, "results must be ascending");
        }
    }

    #[test]
    fn test_max_distance_and_zero_results() {
        let locator = StationLocator::new(&basque_stations());
        let close = locator.nearest(43.3183, -1.9812, 10, 20.0);
        assert_eq!(close.len(), 2, "only C040 and C017 are within 20 km");
        assert!(close.iter().all(|(_, d)| *d <= 20.0));

        assert!(locator.nearest(43.3183, -1.9812, 0, 100.0).is_empty());
        assert!(locator.nearest(0.0, 0.0, 5, 1.0).is_empty());
    }
}
