//! Insight Engine - caregiving insights over one event window
//!
//! The engine runs a fixed set of analyzers over an [`EventWindow`](crate::EventWindow)
//! and concatenates their output into one [`InsightReport`]. Each analyzer
//! degrades on its own: sparse data for one section never blocks another.
//!
//! ## Sections
//!
//! - **Feeding** - daily rate, overdue alert, half-window trend
//! - **Sleep** - daily hours and low-sleep warning
//! - **Diaper** - daily rate and type distribution
//! - **Patterns** - best sleep hour, feeding interval, recommendations
//! - **Predictions** - model-backed insights from [`crate::predict`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cradle_core::compute_insights;
//!
//! let report = compute_insights(&events, now, 14)?;
//! for alert in &report.alerts {
//!     println!("{}: {}", alert.title, alert.message);
//! }
//! ```

pub mod descriptive;
pub mod diaper;
pub mod engine;
pub mod feeding;
pub mod patterns;
pub mod predictions;
pub mod sleep;
pub mod types;

pub use descriptive::{
    DescriptiveStats, DiaperSummary, FeedingSummary, HealthSummary, IntervalSummary, SleepSummary,
};
pub use diaper::DiaperAnalyzer;
pub use engine::{compute_insights, AnalysisContext, Analyzer, InsightEngine};
pub use feeding::FeedingAnalyzer;
pub use patterns::{detect_patterns, PatternAnalyzer};
pub use predictions::PredictionAnalyzer;
pub use sleep::SleepAnalyzer;
pub use types::{
    AnalyzerId, BestSleepHour, InsightReport, ItemKind, MlData, MlInsight, Patterns, ReportItem,
};
