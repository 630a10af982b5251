use crate::domain::model::{CurrentConditions, Dataset, Prediction, TrainedModels};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings a training run needs, independent of where they came from.
pub trait ConfigProvider: Send + Sync {
    fn data_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn regression_artifact(&self) -> &str;
    fn classification_artifact(&self) -> &str;
    fn regularization_c(&self) -> f64;
    fn max_iterations(&self) -> usize;
    fn tolerance(&self) -> f64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Dataset>;
    async fn transform(&self, data: Dataset) -> Result<TrainedModels>;
    async fn load(&self, models: TrainedModels) -> Result<String>;
}

/// Coordinates reported by an IP geolocation service.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn locate(&self) -> Result<IpLocation>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best-ranked match only; `None` means the service found nothing.
    async fn search(&self, city: &str) -> Result<Option<GeocodeMatch>>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<CurrentConditions>;
}

pub trait Predictor: Send + Sync {
    fn predict(&self, conditions: &CurrentConditions) -> Result<Prediction>;
}
