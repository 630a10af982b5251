use crate::core::location::DefaultLocation;
use crate::core::ConfigProvider;
use crate::utils::error::{ForecastError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "skycast.toml";

/// Application settings. Every section is optional; missing keys take defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub artifacts: ArtifactsConfig,
    pub training: TrainingConfig,
    pub location: LocationConfig,
    pub weather: WeatherConfig,
    pub logging: LoggingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub path: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: "data/weather.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    pub dir: String,
    pub regression: String,
    pub classification: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: "models".to_string(),
            regression: "model_regression.json".to_string(),
            classification: "model_classification.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Inverse L2 strength for the rain classifier.
    pub c: f64,
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub use_automatic: bool,
    pub geolocation_endpoint: String,
    pub geocoding_endpoint: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub default: DefaultLocation,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            use_automatic: true,
            geolocation_endpoint: "https://ipinfo.io/json".to_string(),
            geocoding_endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            timeout_seconds: 5,
            user_agent: "weather-app/1.0".to_string(),
            default: DefaultLocation::default(),
        }
    }
}

impl LocationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub endpoint: String,
    /// Unset means no client-side timeout.
    pub timeout_seconds: Option<u64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.open-meteo.com/v1/forecast".to_string(),
            timeout_seconds: None,
        }
    }
}

impl WeatherConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

pub const MAX_TIMEOUT_SECONDS: u64 = 300;

/// Bounds shared by the file config and the Lambda environment config.
pub fn validate_timeouts(location: &LocationConfig, weather: &WeatherConfig) -> Result<()> {
    validation::validate_range(
        "location.timeout_seconds",
        location.timeout_seconds,
        1,
        MAX_TIMEOUT_SECONDS,
    )?;
    if let Some(timeout) = weather.timeout_seconds {
        validation::validate_range("weather.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
    }
    Ok(())
}

impl AppConfig {
    /// Reads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForecastError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForecastError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit path must exist; otherwise `skycast.toml` is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForecastError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("data.path", &self.data.path)?;
        validation::validate_file_extension("data.path", &self.data.path, &["csv"])?;

        validation::validate_path("artifacts.dir", &self.artifacts.dir)?;
        validation::validate_file_extension(
            "artifacts.regression",
            &self.artifacts.regression,
            &["json"],
        )?;
        validation::validate_file_extension(
            "artifacts.classification",
            &self.artifacts.classification,
            &["json"],
        )?;
        if self.artifacts.regression == self.artifacts.classification {
            return Err(ForecastError::ConfigValidationError {
                field: "artifacts".to_string(),
                message: "regression and classification artifacts must differ".to_string(),
            });
        }

        validation::validate_range("training.c", self.training.c, 1e-6, 1e6)?;
        validation::validate_range("training.max_iter", self.training.max_iter, 1, 10_000)?;
        validation::validate_range("training.tol", self.training.tol, 1e-15, 1.0)?;

        validation::validate_url(
            "location.geolocation_endpoint",
            &self.location.geolocation_endpoint,
        )?;
        validation::validate_url(
            "location.geocoding_endpoint",
            &self.location.geocoding_endpoint,
        )?;
        validation::validate_non_empty_string("location.user_agent", &self.location.user_agent)?;
        validation::validate_non_empty_string(
            "location.default.city",
            &self.location.default.city,
        )?;
        validation::validate_coordinates(
            "location.default",
            self.location.default.latitude,
            self.location.default.longitude,
        )?;

        validation::validate_url("weather.endpoint", &self.weather.endpoint)?;
        validate_timeouts(&self.location, &self.weather)?;

        if LogFormat::parse(&self.logging.format).is_none() {
            return Err(ForecastError::InvalidConfigValueError {
                field: "logging.format".to_string(),
                value: self.logging.format.clone(),
                reason: "Supported formats: compact, json".to_string(),
            });
        }

        Ok(())
    }

    pub fn regression_path(&self) -> String {
        join(&self.artifacts.dir, &self.artifacts.regression)
    }

    pub fn classification_path(&self) -> String {
        join(&self.artifacts.dir, &self.artifacts.classification)
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.logging.format).unwrap_or_default()
    }
}

fn join(dir: &str, file: &str) -> String {
    Path::new(dir).join(file).to_string_lossy().into_owned()
}

impl ConfigProvider for AppConfig {
    fn data_path(&self) -> &str {
        &self.data.path
    }

    fn output_path(&self) -> &str {
        &self.artifacts.dir
    }

    fn regression_artifact(&self) -> &str {
        &self.artifacts.regression
    }

    fn classification_artifact(&self) -> &str {
        &self.artifacts.classification
    }

    fn regularization_c(&self) -> f64 {
        self.training.c
    }

    fn max_iterations(&self) -> usize {
        self.training.max_iter
    }

    fn tolerance(&self) -> f64 {
        self.training.tol
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
