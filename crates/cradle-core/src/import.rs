//! Event file import (JSON and CSV)
//!
//! This is the validation boundary in front of the engine: anything that
//! cannot be interpreted as a typed event is rejected here with an error,
//! never passed on.

use chrono::DateTime;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{
    Category, DiaperData, DiaperKind, Event, EventPayload, FeedingData, FeedingType, HealthData,
    SleepData,
};

/// Load events from a `.json` or `.csv` file
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let parse: fn(BufReader<File>) -> Result<Vec<Event>> = match extension.as_str() {
        "json" => parse_json_events,
        "csv" => parse_csv_events,
        _ => return Err(Error::UnsupportedFormat(path.display().to_string())),
    };

    let events = parse(BufReader::new(File::open(path)?))?;

    debug!(path = %path.display(), count = events.len(), "Loaded events");
    Ok(events)
}

/// Parse a JSON array of events
pub fn parse_json_events<R: Read>(reader: R) -> Result<Vec<Event>> {
    Ok(serde_json::from_reader(reader)?)
}

/// One CSV row; columns that do not apply to the row's category are ignored
#[derive(Debug, Deserialize)]
struct CsvRow {
    category: String,
    timestamp: String,
    #[serde(default)]
    quantity_ml: Option<f64>,
    #[serde(default)]
    feeding_type: Option<String>,
    #[serde(default)]
    duration_hours: Option<f64>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    medication: Option<String>,
    #[serde(default)]
    dosage: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

/// Parse CSV events
///
/// Header: `category,timestamp,quantity_ml,feeding_type,duration_hours,kind,`
/// `temperature,weight,medication,dosage,note`. Empty cells are absent values.
pub fn parse_csv_events<R: Read>(reader: R) -> Result<Vec<Event>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    for (index, result) in rdr.deserialize::<CsvRow>().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row = result?;
        let event = row_to_event(row).map_err(|e| match e {
            Error::InvalidData(msg) => Error::InvalidData(format!("line {}: {}", line, msg)),
            other => other,
        })?;
        events.push(event);
    }

    Ok(events)
}

fn row_to_event(row: CsvRow) -> Result<Event> {
    let category: Category = row.category.parse().map_err(Error::InvalidData)?;

    let timestamp = DateTime::parse_from_rfc3339(&row.timestamp).map_err(|e| {
        Error::InvalidData(format!("Invalid timestamp '{}': {}", row.timestamp, e))
    })?;

    let payload = match category {
        Category::Feeding => EventPayload::Feeding(FeedingData {
            quantity_ml: row.quantity_ml,
            feeding_type: parse_optional::<FeedingType>(row.feeding_type)?,
        }),
        Category::Sleep => EventPayload::Sleep(SleepData {
            duration_hours: row.duration_hours,
        }),
        Category::Diaper => EventPayload::Diaper(DiaperData {
            kind: parse_optional::<DiaperKind>(row.kind)?,
        }),
        Category::Health => EventPayload::Health(HealthData {
            temperature: row.temperature,
            weight: row.weight,
            medication: non_empty(row.medication),
            dosage: non_empty(row.dosage),
        }),
    };
    payload.validate()?;

    let mut event = Event::new(timestamp, payload);
    event.note = non_empty(row.note);
    Ok(event)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn parse_optional<T>(value: Option<String>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    non_empty(value)
        .map(|s| s.parse::<T>().map_err(Error::InvalidData))
        .transpose()
}
