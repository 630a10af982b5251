use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("Schema error in column '{column}': {reason}")]
    SchemaError { column: String, reason: String },

    #[error("No usable rows in {source_name} after cleaning")]
    EmptyDatasetError { source_name: String },

    #[error("Training failed for {model}: {message}")]
    TrainingFailure { model: String, message: String },

    #[error("Failed to load artifact '{artifact}': {message}")]
    ArtifactLoadError { artifact: String, message: String },

    #[error("Location resolution failed: {message}")]
    LocationResolutionFailure { message: String },

    #[error("Weather fetch failed: {message}")]
    WeatherFetchError { message: String },

    #[error("Prediction failed: {message}")]
    PredictionError { message: String },

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Training,
    Artifact,
    Network,
    Inference,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the binaries.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ForecastError {
    pub fn schema(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaError {
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn training(model: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TrainingFailure {
            model: model.into(),
            message: message.into(),
        }
    }

    pub fn artifact(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactLoadError {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    pub fn location(message: impl Into<String>) -> Self {
        Self::LocationResolutionFailure {
            message: message.into(),
        }
    }

    pub fn weather(message: impl Into<String>) -> Self {
        Self::WeatherFetchError {
            message: message.into(),
        }
    }

    pub fn prediction(message: impl Into<String>) -> Self {
        Self::PredictionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SchemaError { .. } | Self::EmptyDatasetError { .. } | Self::CsvError(_) => {
                ErrorCategory::Data
            }
            Self::TrainingFailure { .. } => ErrorCategory::Training,
            Self::ArtifactLoadError { .. } | Self::SerializationError(_) => ErrorCategory::Artifact,
            Self::LocationResolutionFailure { .. }
            | Self::WeatherFetchError { .. }
            | Self::ApiError(_) => ErrorCategory::Network,
            Self::PredictionError { .. } => ErrorCategory::Inference,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    /// Serving-path failures are recoverable within a request; anything that
    /// stops a training run or prevents the registry from loading is not.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LocationResolutionFailure { .. } => ErrorSeverity::Low,
            Self::WeatherFetchError { .. } | Self::ApiError(_) | Self::PredictionError { .. } => {
                ErrorSeverity::Medium
            }
            Self::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::SchemaError { .. } => {
                "Check that the CSV has Humidity, Pressure, WindSpeed, Temperature and RainTomorrow columns with numeric values"
            }
            Self::EmptyDatasetError { .. } => {
                "Provide a dataset with at least one fully populated row"
            }
            Self::TrainingFailure { .. } => {
                "Make sure the dataset contains both rain and no-rain days and only finite values"
            }
            Self::ArtifactLoadError { .. } | Self::SerializationError(_) => {
                "Re-run the train binary to regenerate both model artifacts"
            }
            Self::LocationResolutionFailure { .. } => {
                "Check the city name or network connectivity; the default location is used meanwhile"
            }
            Self::WeatherFetchError { .. } | Self::ApiError(_) => {
                "Check your internet connection and try again later"
            }
            Self::PredictionError { .. } => "Re-train the models with the current feature schema",
            Self::CsvError(_) => "Make sure the historical data file is valid CSV",
            Self::IoError(_) => "Check file paths and permissions",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::ConfigValidationError { .. } => "Review the configuration file and CLI flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::SchemaError { column, .. } => {
                format!("The historical data has a problem with column '{}'", column)
            }
            Self::EmptyDatasetError { .. } => {
                "The historical data has no complete rows to train on".to_string()
            }
            Self::TrainingFailure { model, .. } => format!("Could not train the {} model", model),
            Self::ArtifactLoadError { artifact, .. } => {
                format!("Could not load model '{}'", artifact)
            }
            Self::LocationResolutionFailure { .. } => {
                "Location lookup failed, using the default location".to_string()
            }
            Self::WeatherFetchError { .. } | Self::ApiError(_) => {
                "Weather fetch failed".to_string()
            }
            Self::PredictionError { .. } => "Prediction is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serving_errors_are_not_fatal() {
        assert_eq!(
            ForecastError::location("timeout").severity(),
            ErrorSeverity::Low
        );
        assert_eq!(
            ForecastError::weather("missing field").severity(),
            ErrorSeverity::Medium
        );
        assert_eq!(
            ForecastError::training("regression", "singular").severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ForecastError::schema("Humidity", "missing").category(),
            ErrorCategory::Data
        );
        assert_eq!(
            ForecastError::artifact("model_regression", "bad json").category(),
            ErrorCategory::Artifact
        );
        let io_err: ForecastError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io_err.category(), ErrorCategory::System);
        assert_eq!(io_err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_names_column() {
        let err = ForecastError::schema("RainTomorrow", "unexpected label 'Maybe'");
        assert!(err.user_friendly_message().contains("RainTomorrow"));
        assert!(err.to_string().contains("Maybe"));
    }
}
