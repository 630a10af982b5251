#[cfg(feature = "lambda")]
use crate::config::toml_config::{validate_timeouts, LocationConfig, WeatherConfig};
#[cfg(feature = "lambda")]
use crate::core::Storage;
#[cfg(feature = "lambda")]
use crate::utils::error::{ForecastError, Result};
#[cfg(feature = "lambda")]
use crate::utils::validation::validate_required_field;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use std::env;

/// Runtime settings of the forecast Lambda, read from the environment.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub s3_bucket: String,
    pub s3_region: String,
    pub models_prefix: String,
    pub regression_artifact: String,
    pub classification_artifact: String,
    pub location: LocationConfig,
    pub weather: WeatherConfig,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let mut location = LocationConfig::default();
        let mut weather = WeatherConfig::default();

        if let Ok(endpoint) = env::var("GEOLOCATION_ENDPOINT") {
            location.geolocation_endpoint = endpoint;
        }
        if let Ok(endpoint) = env::var("GEOCODING_ENDPOINT") {
            location.geocoding_endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("LOCATION_TIMEOUT_SECONDS") {
            location.timeout_seconds = parse_env("LOCATION_TIMEOUT_SECONDS", &timeout)?;
        }
        if let Ok(endpoint) = env::var("WEATHER_ENDPOINT") {
            weather.endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("WEATHER_TIMEOUT_SECONDS") {
            weather.timeout_seconds = Some(parse_env("WEATHER_TIMEOUT_SECONDS", &timeout)?);
        }

        let bucket = env::var("S3_BUCKET").ok();
        let s3_bucket = validate_required_field("S3_BUCKET", &bucket)?.clone();

        Ok(Self {
            s3_bucket,
            s3_region: env::var("S3_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            models_prefix: env::var("MODELS_PREFIX").unwrap_or_else(|_| "models".to_string()),
            regression_artifact: env::var("REGRESSION_ARTIFACT")
                .unwrap_or_else(|_| "model_regression.json".to_string()),
            classification_artifact: env::var("CLASSIFICATION_ARTIFACT")
                .unwrap_or_else(|_| "model_classification.json".to_string()),
            location,
            weather,
        })
    }

    pub fn regression_key(&self) -> String {
        object_key(&self.models_prefix, &self.regression_artifact)
    }

    pub fn classification_key(&self) -> String {
        object_key(&self.models_prefix, &self.classification_artifact)
    }
}

#[cfg(feature = "lambda")]
fn parse_env(field: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| ForecastError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected a whole number of seconds".to_string(),
        })
}

#[cfg(feature = "lambda")]
fn object_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_s3_bucket_name("s3_bucket", &self.s3_bucket)?;
        validate_aws_region("s3_region", &self.s3_region)?;
        validate_file_extension("regression_artifact", &self.regression_artifact, &["json"])?;
        validate_file_extension(
            "classification_artifact",
            &self.classification_artifact,
            &["json"],
        )?;

        validate_url("geolocation_endpoint", &self.location.geolocation_endpoint)?;
        validate_url("geocoding_endpoint", &self.location.geocoding_endpoint)?;
        validate_url("weather_endpoint", &self.weather.endpoint)?;
        validate_timeouts(&self.location, &self.weather)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(feature = "lambda")]
fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| ForecastError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }
    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }
    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }
    Ok(())
}

#[cfg(feature = "lambda")]
fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    crate::utils::validation::validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ForecastError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }
    Ok(())
}

/// Model artifacts stored as S3 objects.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| ForecastError::artifact(path, format!("S3 get_object failed: {}", e)))?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| ForecastError::artifact(path, format!("S3 body read failed: {}", e)))?;

        Ok(data.into_bytes().to_vec())
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| ForecastError::ConfigError {
                message: format!("Failed to write s3://{}/{}: {}", self.bucket, path, e),
            })?;
        Ok(())
    }
}

#[cfg(all(test, feature = "lambda"))]
mod tests {
    use super::*;

    #[test]
    fn test_object_key() {
        assert_eq!(object_key("models", "a.json"), "models/a.json");
        assert_eq!(object_key("/models/", "a.json"), "models/a.json");
        assert_eq!(object_key("", "a.json"), "a.json");
    }

    #[test]
    fn test_bucket_name_rules() {
        assert!(validate_s3_bucket_name("s3_bucket", "skycast-models").is_ok());
        assert!(validate_s3_bucket_name("s3_bucket", "ab").is_err());
        assert!(validate_s3_bucket_name("s3_bucket", "Skycast").is_err());
        assert!(validate_s3_bucket_name("s3_bucket", "-skycast").is_err());
    }

    fn config_with_timeouts(location: u64, weather: Option<u64>) -> LambdaConfig {
        let mut config = LambdaConfig {
            s3_bucket: "skycast-models".to_string(),
            s3_region: "ap-south-1".to_string(),
            models_prefix: "models".to_string(),
            regression_artifact: "model_regression.json".to_string(),
            classification_artifact: "model_classification.json".to_string(),
            location: LocationConfig::default(),
            weather: WeatherConfig::default(),
        };
        config.location.timeout_seconds = location;
        config.weather.timeout_seconds = weather;
        config
    }

    #[test]
    fn test_timeouts_share_cli_bounds() {
        use crate::utils::validation::Validate;

        assert!(config_with_timeouts(5, None).validate().is_ok());
        assert!(config_with_timeouts(120, Some(300)).validate().is_ok());
        assert!(config_with_timeouts(0, None).validate().is_err());
        assert!(config_with_timeouts(5, Some(301)).validate().is_err());
    }

    #[test]
    fn test_from_env_requires_bucket() {
        std::env::remove_var("S3_BUCKET");
        match LambdaConfig::from_env() {
            Err(ForecastError::MissingConfigError { field }) => assert_eq!(field, "S3_BUCKET"),
            other => panic!("expected missing bucket, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_env_seconds() {
        assert_eq!(parse_env("T", " 5 ").unwrap(), 5);
        assert!(parse_env("T", "five").is_err());
    }
}
