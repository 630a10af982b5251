//! HTTP clients for the geolocation, geocoding and live-weather services.

pub mod ip_geolocation;
pub mod nominatim;
pub mod open_meteo;

pub use ip_geolocation::IpInfoClient;
pub use nominatim::NominatimClient;
pub use open_meteo::OpenMeteoClient;

use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

/// Builds a client with the given request timeout. `None` leaves requests unbounded.
pub fn build_client(timeout: Option<Duration>, user_agent: &str) -> Result<Client> {
    let mut builder = Client::builder().user_agent(user_agent.to_string());
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
