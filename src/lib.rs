pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, AppConfig};

#[cfg(feature = "cli")]
pub use config::{ForecastArgs, TrainArgs};

#[cfg(feature = "lambda")]
pub use config::lambda::{LambdaConfig, S3Storage};

pub use core::{
    etl::TrainingEngine, forecast::ForecastService, location::LocationResolver,
    pipeline::TrainingPipeline, registry::ModelRegistry,
};
pub use domain::model::{
    CurrentConditions, FeatureVector, LocationRequest, LocationSource, Prediction,
    ResolvedLocation,
};
pub use utils::error::{ForecastError, Result};
