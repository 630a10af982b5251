use crate::core::registry::ModelRegistry;
use crate::domain::model::{CurrentConditions, FeatureVector, Prediction};
use crate::domain::ports::Predictor;
use crate::utils::error::{ForecastError, Result};
use std::sync::Arc;

const RAIN_THRESHOLD: f64 = 0.5;

/// Runs both models against one set of current conditions.
pub fn predict(conditions: &CurrentConditions, registry: &ModelRegistry) -> Result<Prediction> {
    predict_features(&conditions.features(), registry)
}

/// Features are bound to each model by column name, in the order it was trained with.
pub fn predict_features(features: &FeatureVector, registry: &ModelRegistry) -> Result<Prediction> {
    if !features.is_finite() {
        return Err(ForecastError::prediction(format!(
            "non-finite input features: {:?}",
            features
        )));
    }

    let regression = registry.regression();
    let row = features.ordered(&regression.feature_columns)?;
    let predicted_temperature = regression.estimator.predict_row(&row)?;

    let classification = registry.classification();
    let row = features.ordered(&classification.feature_columns)?;
    let rain_confidence = classification.estimator.predict_proba_row(&row)?;

    if !predicted_temperature.is_finite() || !rain_confidence.is_finite() {
        return Err(ForecastError::prediction("model produced a non-finite output"));
    }

    Ok(Prediction {
        predicted_temperature,
        rain_predicted: rain_confidence > RAIN_THRESHOLD,
        rain_confidence,
    })
}

impl Predictor for ModelRegistry {
    fn predict(&self, conditions: &CurrentConditions) -> Result<Prediction> {
        predict(conditions, self)
    }
}

impl<P: Predictor + ?Sized> Predictor for Arc<P> {
    fn predict(&self, conditions: &CurrentConditions) -> Result<Prediction> {
        (**self).predict(conditions)
    }
}
