use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a training pipeline through extract, transform and load.
pub struct TrainingEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> TrainingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting training run");

        tracing::info!("📥 Extracting historical data...");
        let dataset = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} rows ({} incomplete rows dropped)",
            dataset.len(),
            dataset.dropped_rows
        );
        self.monitor.log_stats("Extract");

        tracing::info!("🧮 Training models...");
        let models = self.pipeline.transform(dataset).await?;
        tracing::info!(
            "Trained {} and {} on {} rows",
            models.regression.task.artifact_name(),
            models.classification.task.artifact_name(),
            models.regression.training_rows
        );
        self.monitor.log_stats("Transform");

        tracing::info!("💾 Saving model artifacts...");
        let output_path = self.pipeline.load(models).await?;
        tracing::info!("Artifacts saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Dataset, FeatureVector, TrainedModels};
    use crate::core::trainer::Trainer;
    use crate::utils::error::ForecastError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedPipeline {
        fail_transform: bool,
        loads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Result<Dataset> {
            let mut dataset = Dataset::default();
            dataset.push(FeatureVector::new(50.0, 1010.0, 10.0), 25.0, 0.0);
            dataset.push(FeatureVector::new(80.0, 995.0, 20.0), 18.0, 1.0);
            Ok(dataset)
        }

        async fn transform(&self, data: Dataset) -> Result<TrainedModels> {
            if self.fail_transform {
                return Err(ForecastError::training("model_classification", "boom"));
            }
            Trainer::default().train(&data)
        }

        async fn load(&self, _models: TrainedModels) -> Result<String> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok("models".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_returns_output_path() {
        let engine = TrainingEngine::new(ScriptedPipeline {
            fail_transform: false,
            loads: AtomicUsize::new(0),
        });
        assert_eq!(engine.run().await.unwrap(), "models");
    }

    #[tokio::test]
    async fn test_training_failure_skips_load() {
        let engine = TrainingEngine::new(ScriptedPipeline {
            fail_transform: true,
            loads: AtomicUsize::new(0),
        });
        assert!(engine.run().await.is_err());
        assert_eq!(engine.pipeline.loads.load(Ordering::SeqCst), 0);
    }
}
