use mapposter_types::GeoPoint;
use serde::{Deserialize, Serialize};

/// Resolved poster location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Center of the poster.
    pub point: GeoPoint,
    /// City name to print on the poster.
    #[serde(default)]
    pub city: Option<String>,
    /// Country name to print on the poster.
    #[serde(default)]
    pub country: Option<String>,
}

impl Location {
    /// Creates a location without display names.
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point,
            city: None,
            country: None,
        }
    }

    /// Sets the city name.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Sets the country name.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}
