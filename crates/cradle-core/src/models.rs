//! Domain models for Cradle

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Caregiving event category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Feeding,
    Sleep,
    Diaper,
    Health,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feeding => "feeding",
            Self::Sleep => "sleep",
            Self::Diaper => "diaper",
            Self::Health => "health",
        }
    }

    /// All categories in report order
    pub fn all() -> &'static [Category] {
        &[Self::Feeding, Self::Sleep, Self::Diaper, Self::Health]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feeding" => Ok(Self::Feeding),
            "sleep" => Ok(Self::Sleep),
            "diaper" => Ok(Self::Diaper),
            "health" => Ok(Self::Health),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a feeding was given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedingType {
    Breast,
    Bottle,
}

impl FeedingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breast => "breast",
            Self::Bottle => "bottle",
        }
    }
}

impl std::str::FromStr for FeedingType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breast" => Ok(Self::Breast),
            "bottle" => Ok(Self::Bottle),
            _ => Err(format!("Unknown feeding type: {}", s)),
        }
    }
}

/// What a diaper contained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiaperKind {
    Wet,
    Dirty,
    Both,
}

impl DiaperKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wet => "wet",
            Self::Dirty => "dirty",
            Self::Both => "both",
        }
    }
}

impl std::str::FromStr for DiaperKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wet" => Ok(Self::Wet),
            "dirty" => Ok(Self::Dirty),
            "both" => Ok(Self::Both),
            _ => Err(format!("Unknown diaper kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_ml: Option<f64>,
    #[serde(alias = "type", skip_serializing_if = "Option::is_none")]
    pub feeding_type: Option<FeedingType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiaperData {
    #[serde(alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DiaperKind>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthData {
    /// Body temperature in °C
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Weight in kg
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

/// Category-specific payload of an event
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Feeding(FeedingData),
    Sleep(SleepData),
    Diaper(DiaperData),
    Health(HealthData),
}

impl EventPayload {
    pub fn category(&self) -> Category {
        match self {
            Self::Feeding(_) => Category::Feeding,
            Self::Sleep(_) => Category::Sleep,
            Self::Diaper(_) => Category::Diaper,
            Self::Health(_) => Category::Health,
        }
    }

    /// Parse an open key-value payload into the typed payload for `category`
    pub fn from_map(category: Category, map: Option<Map<String, Value>>) -> Result<Self> {
        let value = Value::Object(map.unwrap_or_default());
        let invalid =
            |e: serde_json::Error| Error::InvalidData(format!("Invalid {} payload: {}", category, e));

        let payload = match category {
            Category::Feeding => Self::Feeding(serde_json::from_value(value).map_err(invalid)?),
            Category::Sleep => Self::Sleep(serde_json::from_value(value).map_err(invalid)?),
            Category::Diaper => Self::Diaper(serde_json::from_value(value).map_err(invalid)?),
            Category::Health => Self::Health(serde_json::from_value(value).map_err(invalid)?),
        };

        payload.validate()?;
        Ok(payload)
    }

    /// Serialize back to an open key-value payload (absent fields omitted)
    pub fn to_map(&self) -> Map<String, Value> {
        let value = match self {
            Self::Feeding(data) => serde_json::to_value(data),
            Self::Sleep(data) => serde_json::to_value(data),
            Self::Diaper(data) => serde_json::to_value(data),
            Self::Health(data) => serde_json::to_value(data),
        };

        match value {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Reject values no caregiver could have recorded
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Feeding(data) => non_negative("quantity_ml", data.quantity_ml),
            Self::Sleep(data) => non_negative("duration_hours", data.duration_hours),
            Self::Diaper(_) => Ok(()),
            Self::Health(data) => {
                non_negative("weight", data.weight)?;
                match data.temperature {
                    Some(t) if !t.is_finite() => Err(Error::InvalidData(format!(
                        "temperature must be a finite number, got {}",
                        t
                    ))),
                    _ => Ok(()),
                }
            }
        }
    }
}

fn non_negative(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(Error::InvalidData(format!(
            "{} must be a non-negative number, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

/// One timestamped caregiving occurrence
///
/// Events are immutable once handed to the engine. The category is derived
/// from the payload variant so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent", into = "RawEvent")]
pub struct Event {
    pub timestamp: DateTime<FixedOffset>,
    pub payload: EventPayload,
    pub note: Option<String>,
}

impl Event {
    pub fn new(timestamp: DateTime<FixedOffset>, payload: EventPayload) -> Self {
        Self {
            timestamp,
            payload,
            note: None,
        }
    }

    pub fn feeding(timestamp: DateTime<FixedOffset>, quantity_ml: Option<f64>) -> Self {
        Self::new(
            timestamp,
            EventPayload::Feeding(FeedingData {
                quantity_ml,
                feeding_type: None,
            }),
        )
    }

    pub fn sleep(timestamp: DateTime<FixedOffset>, duration_hours: Option<f64>) -> Self {
        Self::new(timestamp, EventPayload::Sleep(SleepData { duration_hours }))
    }

    pub fn diaper(timestamp: DateTime<FixedOffset>, kind: Option<DiaperKind>) -> Self {
        Self::new(timestamp, EventPayload::Diaper(DiaperData { kind }))
    }

    pub fn health(timestamp: DateTime<FixedOffset>, data: HealthData) -> Self {
        Self::new(timestamp, EventPayload::Health(data))
    }

    /// Attach a free-text note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn category(&self) -> Category {
        self.payload.category()
    }

    /// Recorded feeding quantity (feeding events only)
    pub fn quantity_ml(&self) -> Option<f64> {
        match &self.payload {
            EventPayload::Feeding(data) => data.quantity_ml,
            _ => None,
        }
    }

    /// Recorded sleep duration (sleep events only)
    pub fn duration_hours(&self) -> Option<f64> {
        match &self.payload {
            EventPayload::Sleep(data) => data.duration_hours,
            _ => None,
        }
    }

    /// Recorded diaper kind (diaper events only)
    pub fn diaper_kind(&self) -> Option<DiaperKind> {
        match &self.payload {
            EventPayload::Diaper(data) => data.kind,
            _ => None,
        }
    }
}

/// Wire shape of an event: category tag plus an open payload map
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEvent {
    category: Category,
    timestamp: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl TryFrom<RawEvent> for Event {
    type Error = Error;

    fn try_from(raw: RawEvent) -> Result<Self> {
        Ok(Self {
            timestamp: raw.timestamp,
            payload: EventPayload::from_map(raw.category, raw.payload)?,
            note: raw.note,
        })
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let payload = event.payload.to_map();
        Self {
            category: event.category(),
            timestamp: event.timestamp,
            payload: (!payload.is_empty()).then_some(payload),
            note: event.note,
        }
    }
}

/// Hours elapsed from `from` to `to` (negative when `to` is earlier)
pub fn hours_between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}
