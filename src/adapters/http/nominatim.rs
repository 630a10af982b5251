use crate::domain::ports::{GeocodeMatch, Geocoder};
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Nominatim returns coordinates as strings; some mirrors send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn value(&self, field: &str) -> Result<f64> {
        let value = match self {
            Coordinate::Number(v) => Some(*v),
            Coordinate::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite()).ok_or_else(|| {
            ForecastError::location(format!("geocoding returned invalid {}: {:?}", field, self))
        })
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: Coordinate,
    lon: Coordinate,
    display_name: String,
}

/// Forward geocoding of free-text city names.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    endpoint: String,
}

impl NominatimClient {
    /// `client` must carry a User-Agent; Nominatim rejects anonymous requests.
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn search(&self, city: &str) -> Result<Option<GeocodeMatch>> {
        tracing::debug!("Geocoding '{}' via {}", city, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", city), ("format", "json")])
            .send()
            .await
            .map_err(|e| ForecastError::location(format!("geocoding request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::location(format!(
                "geocoding returned status {}",
                status
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ForecastError::location(format!("geocoding body unreadable: {}", e)))?;
        // Only the top-ranked entry is decoded; later entries may be partial.
        let places: Vec<serde_json::Value> = serde_json::from_slice(&body)
            .map_err(|e| ForecastError::location(format!("invalid geocoding response: {}", e)))?;

        let Some(first) = places.into_iter().next() else {
            return Ok(None);
        };
        let place: NominatimPlace = serde_json::from_value(first)
            .map_err(|e| ForecastError::location(format!("invalid geocoding match: {}", e)))?;

        Ok(Some(GeocodeMatch {
            latitude: place.lat.value("lat")?,
            longitude: place.lon.value("lon")?,
            display_name: place.display_name,
        }))
    }
}
