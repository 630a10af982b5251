use crate::domain::model::CurrentConditions;
use crate::domain::ports::WeatherProvider;
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,surface_pressure,wind_speed_10m";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentData>,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    surface_pressure: f64,
    wind_speed_10m: f64,
}

impl From<CurrentData> for CurrentConditions {
    fn from(current: CurrentData) -> Self {
        Self {
            temperature: current.temperature_2m,
            humidity: current.relative_humidity_2m,
            pressure: current.surface_pressure,
            wind_speed: current.wind_speed_10m,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    endpoint: String,
}

impl OpenMeteoClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions> {
        tracing::debug!(
            "Fetching current weather for ({}, {}) from {}",
            latitude,
            longitude,
            self.endpoint
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("forecast_days", "1".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ForecastError::weather(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::weather(format!(
                "forecast API returned status {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ForecastError::weather(format!("failed to read response: {}", e)))?;
        let body: ForecastResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ForecastError::weather(format!("invalid forecast response: {}", e)))?;

        let current = body
            .current
            .ok_or_else(|| ForecastError::weather("response has no 'current' block"))?;
        Ok(current.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(Client::new(), server.url("/v1/forecast"))
    }

    #[tokio::test]
    async fn test_fetch_current() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/forecast")
                .query_param("latitude", "17.6599")
                .query_param("longitude", "75.9064")
                .query_param("current", CURRENT_FIELDS)
                .query_param("forecast_days", "1")
                .query_param("timezone", "auto");
            then.status(200).json_body(serde_json::json!({
                "latitude": 17.66,
                "longitude": 75.91,
                "current_units": {"temperature_2m": "°C"},
                "current": {
                    "time": "2026-10-16T10:00",
                    "interval": 900,
                    "temperature_2m": 29.4,
                    "relative_humidity_2m": 62.0,
                    "surface_pressure": 951.3,
                    "wind_speed_10m": 11.2
                }
            }));
        });

        let conditions = client_for(&server)
            .fetch_current(17.6599, 75.9064)
            .await
            .unwrap();

        mock.assert();
        assert_eq!(conditions.temperature, 29.4);
        assert_eq!(conditions.humidity, 62.0);
        assert_eq!(conditions.pressure, 951.3);
        assert_eq!(conditions.wind_speed, 11.2);
    }

    #[tokio::test]
    async fn test_missing_current_block_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(200).json_body(serde_json::json!({"latitude": 1.0}));
        });

        assert!(matches!(
            client_for(&server).fetch_current(1.0, 2.0).await,
            Err(ForecastError::WeatherFetchError { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_field_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(200).json_body(serde_json::json!({
                "current": {"temperature_2m": 20.0, "relative_humidity_2m": 50.0, "surface_pressure": 1000.0}
            }));
        });

        let err = client_for(&server).fetch_current(1.0, 2.0).await.unwrap_err();
        assert!(err.to_string().contains("wind_speed_10m"));
    }

    #[tokio::test]
    async fn test_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/forecast");
            then.status(400)
                .json_body(serde_json::json!({"error": true, "reason": "Latitude must be in range"}));
        });

        assert!(matches!(
            client_for(&server).fetch_current(100.0, 2.0).await,
            Err(ForecastError::WeatherFetchError { .. })
        ));
    }
}
