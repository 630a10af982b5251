use crate::domain::model::{Dataset, FeatureVector, FEATURE_COLUMNS, RAIN_COLUMN, TEMPERATURE_COLUMN};
use crate::utils::error::{ForecastError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;

/// Tokens read as missing values, matching the pandas defaults.
const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_null(field: &str) -> bool {
    NULL_TOKENS.contains(&field)
}

struct ColumnIndex {
    features: [usize; 3],
    temperature: usize,
    rain: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ForecastError::schema(name, "required column is missing"))
        };

        Ok(Self {
            features: [
                find(FEATURE_COLUMNS[0])?,
                find(FEATURE_COLUMNS[1])?,
                find(FEATURE_COLUMNS[2])?,
            ],
            temperature: find(TEMPERATURE_COLUMN)?,
            rain: find(RAIN_COLUMN)?,
        })
    }
}

fn parse_number(column: &str, value: &str, line: u64) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ForecastError::schema(
            column,
            format!("non-numeric value '{}' on line {}", value, line),
        )),
    }
}

/// `Yes`/`No` become 1/0; values that are already numeric pass through.
pub fn encode_rain_label(value: &str) -> Result<f64> {
    match value {
        "Yes" => Ok(1.0),
        "No" => Ok(0.0),
        other => match other.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(ForecastError::schema(
                RAIN_COLUMN,
                format!("unexpected label '{}', expected Yes, No or a number", other),
            )),
        },
    }
}

pub fn load(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    load_from_reader(file, &path.display().to_string())
}

pub fn load_from_bytes(bytes: &[u8], source_name: &str) -> Result<Dataset> {
    load_from_reader(bytes, source_name)
}

/// Reads historical records and drops every row with a missing value in any column.
pub fn load_from_reader<R: Read>(reader: R, source_name: &str) -> Result<Dataset> {
    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnIndex::from_headers(&headers)?;

    let mut dataset = Dataset::default();

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() || record.iter().any(is_null) {
            dataset.dropped_rows += 1;
            continue;
        }

        let mut values = [0.0; 3];
        for (slot, (&index, column)) in values
            .iter_mut()
            .zip(columns.features.iter().zip(FEATURE_COLUMNS))
        {
            *slot = parse_number(column, &record[index], line)?;
        }
        let temperature = parse_number(TEMPERATURE_COLUMN, &record[columns.temperature], line)?;
        let rain = encode_rain_label(&record[columns.rain])?;

        dataset.push(
            FeatureVector::new(values[0], values[1], values[2]),
            temperature,
            rain,
        );
    }

    if dataset.is_empty() {
        return Err(ForecastError::EmptyDatasetError {
            source_name: source_name.to_string(),
        });
    }

    tracing::debug!(
        "Loaded {} rows from {} ({} dropped)",
        dataset.len(),
        source_name,
        dataset.dropped_rows
    );
    Ok(dataset)
}
