// Application layer: wires configuration and HTTP adapters into the services.

pub mod report;

use crate::adapters::http::{build_client, IpInfoClient, NominatimClient, OpenMeteoClient};
use crate::config::toml_config::{LocationConfig, WeatherConfig};
use crate::core::forecast::ForecastService;
use crate::core::location::LocationResolver;
use crate::core::registry::ModelRegistry;
use crate::utils::error::Result;
use std::sync::Arc;

pub type HttpForecastService =
    ForecastService<IpInfoClient, NominatimClient, OpenMeteoClient, Arc<ModelRegistry>>;

pub fn location_resolver(
    config: &LocationConfig,
) -> Result<LocationResolver<IpInfoClient, NominatimClient>> {
    let client = build_client(Some(config.timeout()), &config.user_agent)?;
    Ok(LocationResolver::new(
        IpInfoClient::new(client.clone(), config.geolocation_endpoint.clone()),
        NominatimClient::new(client, config.geocoding_endpoint.clone()),
        config.default.clone(),
    ))
}

pub fn forecast_service(
    location: &LocationConfig,
    weather: &WeatherConfig,
    registry: Arc<ModelRegistry>,
) -> Result<HttpForecastService> {
    let weather_client = build_client(weather.timeout(), &location.user_agent)?;
    Ok(ForecastService::new(
        location_resolver(location)?,
        OpenMeteoClient::new(weather_client, weather.endpoint.clone()),
        registry,
    ))
}
