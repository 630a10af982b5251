use crate::domain::ports::{Geolocator, IpLocation};
use crate::utils::error::{ForecastError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    loc: String,
    city: Option<String>,
    country: Option<String>,
}

/// ipinfo.io-style lookup of the caller's public IP.
#[derive(Debug, Clone)]
pub struct IpInfoClient {
    client: Client,
    endpoint: String,
}

impl IpInfoClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

/// Parses `"<lat>,<lon>"`.
pub fn parse_loc(loc: &str) -> Result<(f64, f64)> {
    let (lat, lon) = loc
        .split_once(',')
        .ok_or_else(|| ForecastError::location(format!("malformed loc '{}'", loc)))?;

    let parse = |part: &str| -> Result<f64> {
        part.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ForecastError::location(format!("malformed loc '{}'", loc)))
    };

    let latitude = parse(lat)?;
    let longitude = parse(lon)?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(ForecastError::location(format!(
            "coordinates out of range: {}",
            loc
        )));
    }
    Ok((latitude, longitude))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl Geolocator for IpInfoClient {
    async fn locate(&self) -> Result<IpLocation> {
        tracing::debug!("Requesting IP geolocation from {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| ForecastError::location(format!("geolocation request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::location(format!(
                "geolocation returned status {}",
                status
            )));
        }

        let body: IpInfoResponse = response
            .json()
            .await
            .map_err(|e| ForecastError::location(format!("invalid geolocation response: {}", e)))?;

        let (latitude, longitude) = parse_loc(&body.loc)?;
        Ok(IpLocation {
            latitude,
            longitude,
            city: non_empty(body.city),
            country: non_empty(body.country),
        })
    }
}
