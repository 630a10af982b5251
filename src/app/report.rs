//! Plain-text rendering of a forecast report for the terminal.

use crate::core::forecast::ForecastReport;
use crate::core::summary::{sparkline, DatasetSummary};
use crate::domain::model::{NoticeLevel, Resolution};
use std::fmt::Write;

pub fn render_location(resolution: &Resolution) -> String {
    let mut out = String::new();
    if let Some(notice) = &resolution.notice {
        let marker = match notice.level {
            NoticeLevel::Warning => "⚠️ ",
            NoticeLevel::Error => "❌",
        };
        let _ = writeln!(out, "{} {}", marker, notice.message);
    }
    let location = &resolution.location;
    let _ = write!(
        out,
        "📍 Location: {}, {} ({:.4}, {:.4}) [{:?}]",
        location.city, location.country, location.latitude, location.longitude, location.source
    );
    out
}

pub fn render_report(report: &ForecastReport) -> String {
    let mut out = render_location(&report.resolution);
    out.push('\n');

    match &report.outcome {
        Ok(forecast) => {
            let c = &forecast.conditions;
            let p = &forecast.prediction;
            let _ = writeln!(out, "🌡️ {}°C", c.temperature);
            let _ = writeln!(out, "💧 Humidity: {}%", c.humidity);
            let _ = writeln!(out, "📈 Pressure: {} hPa", c.pressure);
            let _ = writeln!(out, "💨 Wind Speed: {} km/h", c.wind_speed);
            let _ = writeln!(out, "🔮 Predicted Temp: {:.1}°C", p.predicted_temperature);
            let _ = write!(
                out,
                "🌧️ Rain? {} ({:.1}% confidence)",
                if p.rain_predicted { "Yes" } else { "No" },
                p.rain_confidence * 100.0
            );
        }
        Err(e) => {
            let _ = write!(out, "❌ {}: {}", e.user_friendly_message(), e);
        }
    }
    out
}

pub fn render_history(summary: &DatasetSummary, temperatures: &[f64]) -> String {
    format!(
        "📊 Past Weather History\n{}\nTemperature over time: {}",
        summary,
        sparkline(temperatures, 60)
    )
}
