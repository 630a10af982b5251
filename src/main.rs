use anyhow::Context;
use clap::Parser;
use skycast::app::{self, report};
use skycast::core::{loader, summary::DatasetSummary};
use skycast::utils::{logger, validation::Validate};
use skycast::{AppConfig, ForecastArgs, LocalStorage, LocationRequest, ModelRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ForecastArgs::parse();

    let mut config = AppConfig::load(args.config.as_deref())
        .context("failed to load skycast configuration")?;
    args.apply(&mut config);

    logger::init_logger(
        args.verbose,
        config.logging.level.as_deref(),
        config.log_format(),
    );
    tracing::info!("Starting skycast");
    tracing::debug!("Forecast config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // Both models must load before any request is served.
    let storage = LocalStorage::new(".".to_string());
    let registry = match ModelRegistry::load(
        &storage,
        &config.regression_path(),
        &config.classification_path(),
    )
    .await
    {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!(
                "❌ Model loading failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code().max(1));
        }
    };

    let service = app::forecast_service(&config.location, &config.weather, registry)
        .context("failed to build HTTP clients")?;

    let request = LocationRequest::from_flags(config.location.use_automatic, args.city.clone());
    let forecast = service.run(&request).await;

    println!("🌦️ Weather Forecast");
    println!("{}", report::render_report(&forecast));
    println!();

    // History renders whether or not the live section succeeded.
    match loader::load(&config.data.path) {
        Ok(dataset) => match DatasetSummary::from_dataset(&dataset) {
            Some(summary) => println!("{}", report::render_history(&summary, &dataset.temperature)),
            None => println!("📊 Past Weather History: no records"),
        },
        Err(e) => {
            tracing::warn!("History unavailable from {}: {}", config.data.path, e);
            println!("📊 Past Weather History unavailable: {}", e.user_friendly_message());
        }
    }

    Ok(())
}
