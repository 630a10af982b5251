#![allow(dead_code)]

use skycast::config::toml_config::{AppConfig, LocationConfig, WeatherConfig};
use skycast::core::location::DefaultLocation;
use std::path::Path;
use tempfile::TempDir;

pub const TWO_DAY_CSV: &str = "Humidity,Pressure,WindSpeed,Temperature,RainTomorrow\n\
                               50,1010,10,25,No\n\
                               80,995,20,18,Yes\n";

pub const WEEK_CSV: &str = "Date,Humidity,Pressure,WindSpeed,Temperature,RainTomorrow\n\
                            2024-06-01,55,1012,8,31,No\n\
                            2024-06-02,62,1008,11,29,No\n\
                            2024-06-03,,1004,14,27,Yes\n\
                            2024-06-04,78,999,19,24,Yes\n\
                            2024-06-05,84,996,23,22,Yes\n\
                            2024-06-06,70,1003,NA,26,No\n\
                            2024-06-07,66,1006,12,28,No\n\
                            2024-06-08,88,992,26,21,Yes\n";

/// Workspace with a CSV at `data/weather.csv` and artifacts under `models/`.
pub fn workspace(csv: &str) -> (TempDir, AppConfig) {
    let dir = TempDir::new().unwrap();
    let data_path = dir.path().join("data").join("weather.csv");
    std::fs::create_dir_all(data_path.parent().unwrap()).unwrap();
    std::fs::write(&data_path, csv).unwrap();

    let mut config = AppConfig::default();
    config.data.path = path_string(&data_path);
    config.artifacts.dir = path_string(&dir.path().join("models"));
    (dir, config)
}

pub fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn pune_default() -> DefaultLocation {
    DefaultLocation {
        city: "Pune".to_string(),
        country: "India".to_string(),
        latitude: 18.5204,
        longitude: 73.8567,
    }
}

pub fn location_config(base_url: &str) -> LocationConfig {
    LocationConfig {
        use_automatic: true,
        geolocation_endpoint: format!("{}/json", base_url),
        geocoding_endpoint: format!("{}/search", base_url),
        timeout_seconds: 2,
        user_agent: "weather-app/1.0".to_string(),
        default: pune_default(),
    }
}

pub fn weather_config(base_url: &str) -> WeatherConfig {
    WeatherConfig {
        endpoint: format!("{}/v1/forecast", base_url),
        timeout_seconds: Some(2),
    }
}
