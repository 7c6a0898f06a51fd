//! Cradle Core Library
//!
//! Insight and prediction engine for infant caregiving events:
//! - Typed event model (feeding, sleep, diaper, health)
//! - JSON/CSV event import with boundary validation
//! - Lookback windows partitioned by category
//! - Descriptive statistics, patterns and rule-based alerts
//! - Seeded predictive models (interval, regression, tree ensembles, k-means)
//! - Short-horizon forecasting
//!
//! Every computation is a pure function of the supplied events, the reference
//! instant and the window length. Nothing is persisted between calls.

pub mod config;
pub mod daily;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;
pub mod predict;
pub mod stats;
pub mod window;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::{EngineConfig, OutputFormat};
pub use error::{Error, Result};
pub use import::{load_events, parse_csv_events, parse_json_events};
pub use insights::{
    compute_insights, AnalysisContext, Analyzer, DescriptiveStats, InsightEngine, InsightReport,
    ItemKind, MlData, MlInsight, Patterns, ReportItem,
};
pub use models::{
    Category, DiaperData, DiaperKind, Event, EventPayload, FeedingData, FeedingType, HealthData,
    SleepData,
};
pub use window::EventWindow;
