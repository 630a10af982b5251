pub mod cli;
pub mod lambda;
pub mod toml_config;

pub use toml_config::AppConfig;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Arguments of the offline `train` binary.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "train")]
#[command(about = "Train the temperature and rain models from historical weather data")]
pub struct TrainArgs {
    #[arg(long, help = "Historical weather CSV (overrides data.path)")]
    pub data: Option<String>,

    #[arg(long, help = "Directory for model artifacts (overrides artifacts.dir)")]
    pub output_dir: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl TrainArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(data) = &self.data {
            config.data.path = data.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.artifacts.dir = dir.clone();
        }
        if self.monitor {
            config.monitoring.enabled = true;
        }
    }
}

/// Arguments of the `skycast` forecast binary.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "skycast")]
#[command(about = "Live weather with predicted temperature and rain for your location")]
pub struct ForecastArgs {
    #[arg(long, help = "City to look up instead of locating by IP")]
    pub city: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Directory holding the trained models (overrides artifacts.dir)")]
    pub models_dir: Option<String>,

    #[arg(long, help = "Historical CSV to summarize after the forecast (overrides data.path)")]
    pub history: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ForecastArgs {
    /// A city on the command line switches off automatic location.
    pub fn apply(&self, config: &mut AppConfig) {
        if self.city.is_some() {
            config.location.use_automatic = false;
        }
        if let Some(dir) = &self.models_dir {
            config.artifacts.dir = dir.clone();
        }
        if let Some(history) = &self.history {
            config.data.path = history.clone();
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_train_args_override_config() {
        let args = TrainArgs::parse_from([
            "train",
            "--data",
            "history.csv",
            "--output-dir",
            "out",
            "--monitor",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.data.path, "history.csv");
        assert_eq!(config.artifacts.dir, "out");
        assert!(config.monitoring.enabled);
    }

    #[test]
    fn test_forecast_args_city_disables_auto() {
        let args = ForecastArgs::parse_from(["skycast", "--city", "Pune", "--models-dir", "m"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert!(!config.location.use_automatic);
        assert_eq!(config.artifacts.dir, "m");
    }

    #[test]
    fn test_forecast_args_default_keeps_config() {
        let args = ForecastArgs::parse_from(["skycast"]);
        let mut config = AppConfig::default();
        args.apply(&mut config);
        assert_eq!(config, AppConfig::default());
    }
}
