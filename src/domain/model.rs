use crate::core::estimators::{LinearRegression, LogisticRegression};
use crate::utils::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Predictor columns shared by training and serving, in persisted order.
pub const FEATURE_COLUMNS: [&str; 3] = ["Humidity", "Pressure", "WindSpeed"];
pub const TEMPERATURE_COLUMN: &str = "Temperature";
pub const RAIN_COLUMN: &str = "RainTomorrow";

pub const REGRESSION_MODEL: &str = "model_regression";
pub const CLASSIFICATION_MODEL: &str = "model_classification";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "Pressure")]
    pub pressure: f64,
    #[serde(rename = "WindSpeed")]
    pub wind_speed: f64,
}

impl FeatureVector {
    pub fn new(humidity: f64, pressure: f64, wind_speed: f64) -> Self {
        Self {
            humidity,
            pressure,
            wind_speed,
        }
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        match column {
            "Humidity" => Some(self.humidity),
            "Pressure" => Some(self.pressure),
            "WindSpeed" => Some(self.wind_speed),
            _ => None,
        }
    }

    /// Values laid out in the order given by `columns`.
    pub fn ordered(&self, columns: &[String]) -> Result<Vec<f64>> {
        columns
            .iter()
            .map(|column| {
                self.get(column).ok_or_else(|| {
                    ForecastError::prediction(format!("unknown feature column '{}'", column))
                })
            })
            .collect()
    }

    pub fn is_finite(&self) -> bool {
        self.humidity.is_finite() && self.pressure.is_finite() && self.wind_speed.is_finite()
    }
}

/// Cleaned historical records, column-aligned.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub features: Vec<FeatureVector>,
    pub temperature: Vec<f64>,
    pub rain: Vec<f64>,
    pub dropped_rows: usize,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn push(&mut self, features: FeatureVector, temperature: f64, rain: f64) {
        self.features.push(features);
        self.temperature.push(temperature);
        self.rain.push(rain);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTask {
    Regression,
    Classification,
}

impl ModelTask {
    pub fn artifact_name(&self) -> &'static str {
        match self {
            ModelTask::Regression => REGRESSION_MODEL,
            ModelTask::Classification => CLASSIFICATION_MODEL,
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            ModelTask::Regression => TEMPERATURE_COLUMN,
            ModelTask::Classification => RAIN_COLUMN,
        }
    }
}

/// Persisted form of a fitted model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact<E> {
    pub task: ModelTask,
    pub target: String,
    pub feature_columns: Vec<String>,
    pub training_rows: usize,
    pub trained_at: DateTime<Utc>,
    pub estimator: E,
}

impl<E> ModelArtifact<E> {
    pub fn new(task: ModelTask, training_rows: usize, estimator: E) -> Self {
        Self {
            task,
            target: task.target().to_string(),
            feature_columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            training_rows,
            trained_at: Utc::now(),
            estimator,
        }
    }
}

pub type RegressionModel = ModelArtifact<LinearRegression>;
pub type ClassificationModel = ModelArtifact<LogisticRegression>;

#[derive(Debug, Clone)]
pub struct TrainedModels {
    pub regression: RegressionModel,
    pub classification: ClassificationModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationSource {
    Auto,
    Manual,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
    pub source: LocationSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationRequest {
    Automatic,
    Manual(String),
}

impl LocationRequest {
    /// Maps the `use_automatic` toggle and free-text city onto a request.
    pub fn from_flags(use_automatic: bool, city: Option<String>) -> Self {
        if use_automatic {
            LocationRequest::Automatic
        } else {
            LocationRequest::Manual(city.unwrap_or_default())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub location: ResolvedLocation,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
}

impl CurrentConditions {
    /// Temperature is reported to the user but never fed to the models.
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(self.humidity, self.pressure, self.wind_speed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_temperature: f64,
    pub rain_predicted: bool,
    pub rain_confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveForecast {
    pub conditions: CurrentConditions,
    pub prediction: Prediction,
}
