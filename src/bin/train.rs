use clap::Parser;
use skycast::utils::{logger, validation::Validate};
use skycast::{AppConfig, LocalStorage, TrainArgs, TrainingEngine, TrainingPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = TrainArgs::parse();

    let mut config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(args.verbose);
            eprintln!("❌ Failed to load configuration: {}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    args.apply(&mut config);

    logger::init_logger(
        args.verbose,
        config.logging.level.as_deref(),
        config.log_format(),
    );
    tracing::info!("🚀 Starting skycast model training");
    tracing::debug!("Training config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitoring.enabled;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // Paths in the config are taken relative to the working directory.
    let storage = LocalStorage::new(".".to_string());
    let pipeline = TrainingPipeline::new(storage, config);
    let engine = TrainingEngine::with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Models trained and saved.");
            println!("✅ Models trained and saved.");
            println!("📁 Artifacts written to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Training failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // a failed training run never exits 0
            std::process::exit(e.severity().exit_code().max(1));
        }
    }

    Ok(())
}
