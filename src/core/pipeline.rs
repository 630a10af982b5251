use crate::core::estimators::LogisticOptions;
use crate::core::loader;
use crate::core::trainer::Trainer;
use crate::core::{ConfigProvider, Dataset, Pipeline, Storage, TrainedModels};
use crate::utils::error::Result;

/// Extract = read and clean the historical CSV, transform = fit both models,
/// load = persist both artifacts.
pub struct TrainingPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> TrainingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn artifact_path(&self, file_name: &str) -> String {
        let dir = self.config.output_path().trim_end_matches('/');
        if dir.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", dir, file_name)
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for TrainingPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let path = self.config.data_path();
        tracing::debug!("Reading historical data from: {}", path);
        let bytes = self.storage.read_file(path).await?;
        loader::load_from_bytes(&bytes, path)
    }

    async fn transform(&self, data: Dataset) -> Result<TrainedModels> {
        let trainer = Trainer::new(LogisticOptions {
            c: self.config.regularization_c(),
            max_iter: self.config.max_iterations(),
            tol: self.config.tolerance(),
        });
        trainer.train(&data)
    }

    async fn load(&self, models: TrainedModels) -> Result<String> {
        // Serialize both before touching storage.
        let regression = serde_json::to_vec_pretty(&models.regression)?;
        let classification = serde_json::to_vec_pretty(&models.classification)?;

        let regression_path = self.artifact_path(self.config.regression_artifact());
        let classification_path = self.artifact_path(self.config.classification_artifact());

        tracing::debug!(
            "Writing {} ({} bytes) and {} ({} bytes)",
            regression_path,
            regression.len(),
            classification_path,
            classification.len()
        );
        // Each write is atomic, the pair is not: a failed second write leaves
        // the new regression artifact beside the previous classifier.
        self.storage.write_file(&regression_path, &regression).await?;
        self.storage
            .write_file(&classification_path, &classification)
            .await?;

        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::ModelRegistry;
    use crate::utils::error::ForecastError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        fail_writes_to: Option<String>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
                fail_writes_to: None,
            }
        }

        fn failing_writes_to(mut self, path: &str) -> Self {
            self.fail_writes_to = Some(path.to_string());
            self
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ForecastError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.fail_writes_to.as_deref() == Some(path) {
                return Err(ForecastError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("read-only: {}", path),
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        output_path: String,
    }

    impl ConfigProvider for MockConfig {
        fn data_path(&self) -> &str {
            "weather.csv"
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn regression_artifact(&self) -> &str {
            "model_regression.json"
        }

        fn classification_artifact(&self) -> &str {
            "model_classification.json"
        }

        fn regularization_c(&self) -> f64 {
            1.0
        }

        fn max_iterations(&self) -> usize {
            100
        }

        fn tolerance(&self) -> f64 {
            1e-8
        }
    }

    const CSV: &str = "Humidity,Pressure,WindSpeed,Temperature,RainTomorrow\n\
                       50,1010,10,25,No\n\
                       80,995,20,18,Yes\n";

    fn pipeline(output_path: &str) -> (TrainingPipeline<MockStorage, MockConfig>, MockStorage) {
        let storage = MockStorage::with_file("weather.csv", CSV.as_bytes());
        let config = MockConfig {
            output_path: output_path.to_string(),
        };
        (TrainingPipeline::new(storage.clone(), config), storage)
    }

    #[tokio::test]
    async fn test_extract_reads_through_storage() {
        let (pipeline, _) = pipeline("models");
        let dataset = pipeline.extract().await.unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rain, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_file("other.csv", b"");
        let pipeline = TrainingPipeline::new(
            storage,
            MockConfig {
                output_path: "models".to_string(),
            },
        );
        assert!(matches!(
            pipeline.extract().await,
            Err(ForecastError::IoError(_))
        ));
    }

    #[tokio::test]
    async fn test_full_cycle_writes_loadable_artifacts() {
        let (pipeline, storage) = pipeline("models/");
        let dataset = pipeline.extract().await.unwrap();
        let models = pipeline.transform(dataset).await.unwrap();
        let output = pipeline.load(models).await.unwrap();
        assert_eq!(output, "models/");

        let regression = storage.get_file("models/model_regression.json").await.unwrap();
        let classification = storage
            .get_file("models/model_classification.json")
            .await
            .unwrap();
        let registry = ModelRegistry::from_bytes(&regression, &classification).unwrap();
        assert_eq!(registry.regression().training_rows, 2);
    }

    #[tokio::test]
    async fn test_artifacts_at_root_when_output_empty() {
        let (pipeline, storage) = pipeline("");
        let dataset = pipeline.extract().await.unwrap();
        let models = pipeline.transform(dataset).await.unwrap();
        pipeline.load(models).await.unwrap();
        assert!(storage.get_file("model_regression.json").await.is_some());
    }

    #[tokio::test]
    async fn test_failed_classification_write_keeps_new_regression() {
        let previous = b"previous classifier".to_vec();
        let storage = MockStorage::with_file("weather.csv", CSV.as_bytes())
            .failing_writes_to("models/model_classification.json");
        storage
            .files
            .lock()
            .await
            .insert("models/model_classification.json".to_string(), previous.clone());
        let pipeline = TrainingPipeline::new(
            storage.clone(),
            MockConfig {
                output_path: "models".to_string(),
            },
        );

        let models = pipeline
            .transform(pipeline.extract().await.unwrap())
            .await
            .unwrap();
        let result = pipeline.load(models).await;

        assert!(matches!(result, Err(ForecastError::IoError(_))));
        assert!(storage.get_file("models/model_regression.json").await.is_some());
        assert_eq!(
            storage.get_file("models/model_classification.json").await,
            Some(previous)
        );
    }
}
