use crate::domain::model::Dataset;
use serde::Serialize;
use std::fmt;

/// Aggregate view of the historical records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub dropped_rows: usize,
    pub temperature_min: f64,
    pub temperature_mean: f64,
    pub temperature_max: f64,
    pub rain_rate: f64,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        if dataset.is_empty() {
            return None;
        }
        let rows = dataset.len();
        let temperature = &dataset.temperature;

        let min = temperature.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temperature.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = temperature.iter().sum::<f64>() / rows as f64;
        let rainy = dataset.rain.iter().filter(|r| **r == 1.0).count();

        Some(Self {
            rows,
            dropped_rows: dataset.dropped_rows,
            temperature_min: min,
            temperature_mean: mean,
            temperature_max: max,
            rain_rate: rainy as f64 / rows as f64,
        })
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Records: {} ({} incomplete rows skipped)",
            self.rows, self.dropped_rows
        )?;
        writeln!(
            f,
            "Temperature: min {:.1}°C / mean {:.1}°C / max {:.1}°C",
            self.temperature_min, self.temperature_mean, self.temperature_max
        )?;
        write!(f, "Rainy days: {:.0}%", self.rain_rate * 100.0)
    }
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One glyph per value, downsampled to at most `width` glyphs.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let step = values.len().div_ceil(width);
    values
        .chunks(step)
        .map(|chunk| {
            let mean = chunk.iter().sum::<f64>() / chunk.len() as f64;
            let level = if span > 0.0 {
                (((mean - min) / span) * (SPARK_LEVELS.len() - 1) as f64).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FeatureVector;

    #[test]
    fn test_summary() {
        let mut dataset = Dataset::default();
        dataset.push(FeatureVector::new(50.0, 1010.0, 10.0), 25.0, 0.0);
        dataset.push(FeatureVector::new(80.0, 995.0, 20.0), 18.0, 1.0);
        dataset.push(FeatureVector::new(70.0, 1000.0, 15.0), 20.0, 1.0);
        dataset.push(FeatureVector::new(60.0, 1004.0, 12.0), 21.0, 0.0);
        dataset.dropped_rows = 3;

        let summary = DatasetSummary::from_dataset(&dataset).unwrap();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.temperature_min, 18.0);
        assert_eq!(summary.temperature_max, 25.0);
        assert_eq!(summary.temperature_mean, 21.0);
        assert_eq!(summary.rain_rate, 0.5);

        let text = summary.to_string();
        assert!(text.contains("3 incomplete rows skipped"));
        assert!(text.contains("Rainy days: 50%"));
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 10), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 10), "▁▁");
        assert_eq!(sparkline(&[1.0, 1.0, 3.0, 3.0], 2), "▁█");
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn test_empty_dataset_has_no_summary() {
        assert!(DatasetSummary::from_dataset(&Dataset::default()).is_none());
    }
}
