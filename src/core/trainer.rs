use crate::core::estimators::{LinearRegression, LogisticOptions, LogisticRegression};
use crate::domain::model::{
    ClassificationModel, Dataset, ModelArtifact, ModelTask, RegressionModel, TrainedModels,
    FEATURE_COLUMNS,
};
use crate::utils::error::{ForecastError, Result};
use ndarray::{Array1, Array2};

/// Offline batch trainer for the temperature and rain models.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    options: LogisticOptions,
}

impl Trainer {
    pub fn new(options: LogisticOptions) -> Self {
        Self { options }
    }

    pub fn train(&self, dataset: &Dataset) -> Result<TrainedModels> {
        if dataset.is_empty() {
            return Err(ForecastError::training(
                ModelTask::Regression.artifact_name(),
                "dataset has no rows",
            ));
        }

        let x = design_matrix(dataset);
        let temperature = Array1::from(dataset.temperature.clone());
        let rain = Array1::from(dataset.rain.clone());

        let regression: RegressionModel = ModelArtifact::new(
            ModelTask::Regression,
            dataset.len(),
            LinearRegression::fit(&x, &temperature)?,
        );
        tracing::debug!(
            "Regression fitted: intercept={:.4}, coefficients={:?}",
            regression.estimator.intercept,
            regression.estimator.coefficients
        );

        let classification: ClassificationModel = ModelArtifact::new(
            ModelTask::Classification,
            dataset.len(),
            LogisticRegression::fit(&x, &rain, self.options)?,
        );
        tracing::debug!(
            "Classifier fitted: intercept={:.4}, coefficients={:?}",
            classification.estimator.intercept,
            classification.estimator.coefficients
        );

        Ok(TrainedModels {
            regression,
            classification,
        })
    }
}

/// Rows of the dataset with columns in `FEATURE_COLUMNS` order.
pub fn design_matrix(dataset: &Dataset) -> Array2<f64> {
    let mut x = Array2::zeros((dataset.len(), FEATURE_COLUMNS.len()));
    for (i, features) in dataset.features.iter().enumerate() {
        x[[i, 0]] = features.humidity;
        x[[i, 1]] = features.pressure;
        x[[i, 2]] = features.wind_speed;
    }
    x
}
