use crate::core::location::LocationResolver;
use crate::domain::model::{LiveForecast, LocationRequest, Resolution};
use crate::domain::ports::{Geocoder, Geolocator, Predictor, WeatherProvider};
use crate::utils::error::Result;

/// Everything one request produced. A failed live fetch leaves `outcome` as
/// an error while the resolution is still reported.
#[derive(Debug)]
pub struct ForecastReport {
    pub resolution: Resolution,
    pub outcome: Result<LiveForecast>,
}

/// Resolve, fetch, predict; in that order, once per request.
pub struct ForecastService<G, C, W, P>
where
    G: Geolocator,
    C: Geocoder,
    W: WeatherProvider,
    P: Predictor,
{
    resolver: LocationResolver<G, C>,
    weather: W,
    predictor: P,
}

impl<G, C, W, P> ForecastService<G, C, W, P>
where
    G: Geolocator,
    C: Geocoder,
    W: WeatherProvider,
    P: Predictor,
{
    pub fn new(resolver: LocationResolver<G, C>, weather: W, predictor: P) -> Self {
        Self {
            resolver,
            weather,
            predictor,
        }
    }

    pub async fn run(&self, request: &LocationRequest) -> ForecastReport {
        let resolution = self.resolver.resolve(request).await;
        let location = &resolution.location;
        tracing::info!(
            "🌍 Using {}, {} ({:?})",
            location.city,
            location.country,
            location.source
        );

        let outcome = self.live_forecast(location.latitude, location.longitude).await;
        if let Err(e) = &outcome {
            tracing::warn!("Live forecast unavailable: {}", e);
        }

        ForecastReport {
            resolution,
            outcome,
        }
    }

    async fn live_forecast(&self, latitude: f64, longitude: f64) -> Result<LiveForecast> {
        let conditions = self.weather.fetch_current(latitude, longitude).await?;
        let prediction = self.predictor.predict(&conditions)?;
        Ok(LiveForecast {
            conditions,
            prediction,
        })
    }
}
