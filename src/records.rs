use serde::{Deserialize, Serialize};

/// Fallback grouping label when a listing carries neither a neighborhood
/// nor a city.
pub const DEFAULT_NEIGHBORHOOD: &str = "City Center";

/// One business listing as returned by the search API. Never mutated after
/// the fetch; the orchestrator owns the list for the duration of one
/// analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub location: CompetitorLocation,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompetitorLocation {
    #[serde(default)]
    pub neighborhood: Option<Vec<String>>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub alias: String,
    pub title: String,
}

impl CompetitorRecord {
    /// Neighborhood label used for hotspot grouping: the first neighborhood
    /// entry, then city, then [`DEFAULT_NEIGHBORHOOD`]. Only entry 0 is
    /// consulted; an empty first entry falls through to the city.
    pub fn neighborhood_label(&self) -> &str {
        if let Some(first) = self
            .location
            .neighborhood
            .as_ref()
            .and_then(|entries| entries.first())
        {
            if !first.trim().is_empty() {
                return first;
            }
        }
        match &self.location.city {
            Some(city) if !city.trim().is_empty() => city,
            _ => DEFAULT_NEIGHBORHOOD,
        }
    }

    /// Coordinates usable for centroid math. Zero and non-finite values are
    /// treated as "no fix" sentinels from the upstream API.
    pub fn valid_coordinates(&self) -> Option<(f64, f64)> {
        let coords = self.coordinates.as_ref()?;
        let lat = coords.latitude?;
        let lng = coords.longitude?;
        if lat == 0.0 || lng == 0.0 || !lat.is_finite() || !lng.is_finite() {
            return None;
        }
        Some((lat, lng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_location(neighborhood: Option<Vec<String>>, city: Option<String>) -> CompetitorRecord {
        CompetitorRecord {
            id: "b1".into(),
            name: "Biz".into(),
            rating: 4.0,
            review_count: 10,
            location: CompetitorLocation {
                neighborhood,
                city,
                ..Default::default()
            },
            coordinates: None,
            categories: Vec::new(),
        }
    }

    #[test]
    fn label_prefers_neighborhood_then_city() {
        let record = record_with_location(
            Some(vec!["Downtown".into()]),
            Some("Springfield".into()),
        );
        assert_eq!(record.neighborhood_label(), "Downtown");

        let record = record_with_location(None, Some("Springfield".into()));
        assert_eq!(record.neighborhood_label(), "Springfield");

        let record = record_with_location(Some(vec!["".into()]), None);
        assert_eq!(record.neighborhood_label(), DEFAULT_NEIGHBORHOOD);
    }

    #[test]
    fn label_ignores_entries_past_the_first() {
        let record = record_with_location(
            Some(vec!["".into(), "Downtown".into()]),
            Some("Springfield".into()),
        );
        assert_eq!(record.neighborhood_label(), "Springfield");
    }

    #[test]
    fn zero_and_nan_coordinates_are_invalid() {
        let mut record = record_with_location(None, None);
        record.coordinates = Some(Coordinates {
            latitude: Some(0.0),
            longitude: Some(-74.0),
        });
        assert!(record.valid_coordinates().is_none());

        record.coordinates = Some(Coordinates {
            latitude: Some(f64::NAN),
            longitude: Some(-74.0),
        });
        assert!(record.valid_coordinates().is_none());

        record.coordinates = Some(Coordinates {
            latitude: Some(40.0),
            longitude: Some(-74.0),
        });
        assert_eq!(record.valid_coordinates(), Some((40.0, -74.0)));
    }

    #[test]
    fn deserializes_sparse_wire_objects() {
        let record: CompetitorRecord =
            serde_json::from_str(r#"{"id":"x","name":"Bare Minimum"}"#).unwrap();
        assert_eq!(record.rating, 0.0);
        assert_eq!(record.review_count, 0);
        assert!(record.coordinates.is_none());
        assert_eq!(record.neighborhood_label(), DEFAULT_NEIGHBORHOOD);
    }
}
