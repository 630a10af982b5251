#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use skycast::app::{self, HttpForecastService};
#[cfg(feature = "lambda")]
use skycast::domain::model::{LiveForecast, Notice, Resolution};
#[cfg(feature = "lambda")]
use skycast::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use skycast::{
    CurrentConditions, LambdaConfig, LocationRequest, ModelRegistry, Prediction,
    ResolvedLocation, S3Storage,
};
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
#[derive(Debug, Deserialize)]
pub struct Request {
    /// Defaults to automatic location unless a city is given.
    pub use_automatic: Option<bool>,
    pub city: Option<String>,
}

#[cfg(feature = "lambda")]
#[derive(Debug, Serialize)]
pub struct Response {
    pub location: ResolvedLocation,
    pub notice: Option<Notice>,
    pub conditions: Option<CurrentConditions>,
    pub prediction: Option<Prediction>,
    pub error: Option<String>,
}

#[cfg(feature = "lambda")]
impl Response {
    fn from_report(resolution: Resolution, outcome: skycast::Result<LiveForecast>) -> Self {
        let (conditions, prediction, error) = match outcome {
            Ok(forecast) => (Some(forecast.conditions), Some(forecast.prediction), None),
            Err(e) => (None, None, Some(e.to_string())),
        };
        Self {
            location: resolution.location,
            notice: resolution.notice,
            conditions,
            prediction,
            error,
        }
    }
}

#[cfg(feature = "lambda")]
async fn function_handler(
    service: &HttpForecastService,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    let Request {
        use_automatic,
        city,
    } = event.payload;
    let use_automatic = use_automatic.unwrap_or(city.is_none());
    let request = LocationRequest::from_flags(use_automatic, city);
    tracing::info!("Forecast request: {:?}", request);

    let report = service.run(&request).await;
    Ok(Response::from_report(report.resolution, report.outcome))
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()?;
    lambda_config.validate()?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let region = Region::new(lambda_config.s3_region.clone());
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(region)
        .build();
    let s3_client = S3Client::from_conf(config);
    let storage = S3Storage::new(s3_client, lambda_config.s3_bucket.clone());

    // Loaded once per cold start and shared by every invocation.
    let registry = ModelRegistry::load(
        &storage,
        &lambda_config.regression_key(),
        &lambda_config.classification_key(),
    )
    .await?;

    let service = Arc::new(app::forecast_service(
        &lambda_config.location,
        &lambda_config.weather,
        registry,
    )?);

    run(service_fn(move |event: LambdaEvent<Request>| {
        let service = Arc::clone(&service);
        async move { function_handler(&service, event).await }
    }))
    .await
}
