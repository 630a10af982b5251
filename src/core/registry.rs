use crate::domain::model::{
    ClassificationModel, ModelArtifact, ModelTask, RegressionModel, TrainedModels, FEATURE_COLUMNS,
};
use crate::domain::ports::Storage;
use crate::utils::error::{ForecastError, Result};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// The two fitted models used for serving. Built once at startup and shared
/// read-only behind an `Arc`; there is no reload path.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    regression: RegressionModel,
    classification: ClassificationModel,
}

impl ModelRegistry {
    /// Loads and validates both artifacts. Either one failing fails the whole load.
    pub async fn load<S: Storage>(
        storage: &S,
        regression_path: &str,
        classification_path: &str,
    ) -> Result<Arc<Self>> {
        let regression_bytes = read_artifact(storage, regression_path).await?;
        let classification_bytes = read_artifact(storage, classification_path).await?;

        let registry = Self::from_bytes(&regression_bytes, &classification_bytes)?;
        tracing::info!(
            "📦 Models loaded: {} ({} rows), {} ({} rows)",
            regression_path,
            registry.regression.training_rows,
            classification_path,
            registry.classification.training_rows
        );
        Ok(Arc::new(registry))
    }

    pub fn from_bytes(regression: &[u8], classification: &[u8]) -> Result<Self> {
        let regression: RegressionModel = decode(ModelTask::Regression, regression)?;
        let classification: ClassificationModel = decode(ModelTask::Classification, classification)?;
        Self::from_models(TrainedModels {
            regression,
            classification,
        })
    }

    pub fn from_models(models: TrainedModels) -> Result<Self> {
        let TrainedModels {
            regression,
            classification,
        } = models;

        validate_artifact(
            ModelTask::Regression,
            &regression,
            regression.estimator.n_features(),
            regression.estimator.intercept.is_finite()
                && regression.estimator.coefficients.iter().all(|c| c.is_finite()),
        )?;
        validate_artifact(
            ModelTask::Classification,
            &classification,
            classification.estimator.n_features(),
            classification.estimator.is_consistent(),
        )?;

        Ok(Self {
            regression,
            classification,
        })
    }

    pub fn regression(&self) -> &RegressionModel {
        &self.regression
    }

    pub fn classification(&self) -> &ClassificationModel {
        &self.classification
    }
}

async fn read_artifact<S: Storage>(storage: &S, path: &str) -> Result<Vec<u8>> {
    storage
        .read_file(path)
        .await
        .map_err(|e| ForecastError::artifact(path, e.to_string()))
}

fn decode<E: DeserializeOwned>(task: ModelTask, bytes: &[u8]) -> Result<ModelArtifact<E>> {
    serde_json::from_slice(bytes)
        .map_err(|e| ForecastError::artifact(task.artifact_name(), format!("invalid JSON: {}", e)))
}

fn validate_artifact<E>(
    task: ModelTask,
    artifact: &ModelArtifact<E>,
    n_parameters: usize,
    parameters_ok: bool,
) -> Result<()> {
    let name = task.artifact_name();

    if artifact.task != task {
        return Err(ForecastError::artifact(
            name,
            format!("artifact holds a {:?} model", artifact.task),
        ));
    }
    if artifact.target != task.target() {
        return Err(ForecastError::artifact(
            name,
            format!(
                "target is '{}', expected '{}'",
                artifact.target,
                task.target()
            ),
        ));
    }
    if artifact.feature_columns.len() != FEATURE_COLUMNS.len()
        || artifact
            .feature_columns
            .iter()
            .zip(FEATURE_COLUMNS)
            .any(|(persisted, expected)| persisted != expected)
    {
        return Err(ForecastError::artifact(
            name,
            format!(
                "feature columns {:?} do not match {:?}",
                artifact.feature_columns, FEATURE_COLUMNS
            ),
        ));
    }
    if n_parameters != FEATURE_COLUMNS.len() {
        return Err(ForecastError::artifact(
            name,
            format!(
                "{} coefficients for {} features",
                n_parameters,
                FEATURE_COLUMNS.len()
            ),
        ));
    }
    if !parameters_ok {
        return Err(ForecastError::artifact(name, "parameters are inconsistent or non-finite"));
    }
    Ok(())
}
