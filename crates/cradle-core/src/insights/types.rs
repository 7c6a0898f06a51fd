//! Core types for the insight report

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::predict::{
    AnomalyReport, CorrelationAnalysis, DiaperChangePrediction, FeedingAmountPrediction,
    NextFeedingPrediction, RoutineAnalysis, SleepDurationPrediction, SleepQualityClassification,
    WeeklyForecast,
};

/// Analyzers registered with the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerId {
    Feeding,
    Sleep,
    Diaper,
    Patterns,
    Predictions,
}

impl AnalyzerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerId::Feeding => "feeding",
            AnalyzerId::Sleep => "sleep",
            AnalyzerId::Diaper => "diaper",
            AnalyzerId::Patterns => "patterns",
            AnalyzerId::Predictions => "predictions",
        }
    }
}

impl fmt::Display for AnalyzerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalyzerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feeding" => Ok(AnalyzerId::Feeding),
            "sleep" => Ok(AnalyzerId::Sleep),
            "diaper" => Ok(AnalyzerId::Diaper),
            "patterns" => Ok(AnalyzerId::Patterns),
            "predictions" => Ok(AnalyzerId::Predictions),
            _ => Err(format!("Unknown analyzer: {}", s)),
        }
    }
}

/// Kind tag carried by every report item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Descriptive fact
    Info,
    /// Change compared with an earlier period
    Trend,
    /// Worth attention
    Warning,
    /// Needs action now
    Urgent,
    Recommendation,
    MlInfo,
    MlAlert,
    MlWarning,
    MlClassification,
    MlPrediction,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Info => "info",
            ItemKind::Trend => "trend",
            ItemKind::Warning => "warning",
            ItemKind::Urgent => "urgent",
            ItemKind::Recommendation => "recommendation",
            ItemKind::MlInfo => "ml_info",
            ItemKind::MlAlert => "ml_alert",
            ItemKind::MlWarning => "ml_warning",
            ItemKind::MlClassification => "ml_classification",
            ItemKind::MlPrediction => "ml_prediction",
        }
    }

    /// Icon used when an item does not set its own
    pub fn default_icon(&self) -> &'static str {
        match self {
            ItemKind::Info => "info",
            ItemKind::Trend => "trending_up",
            ItemKind::Warning | ItemKind::MlWarning => "warning",
            ItemKind::Urgent | ItemKind::MlAlert => "alarm",
            ItemKind::Recommendation => "lightbulb",
            ItemKind::MlInfo | ItemKind::MlClassification | ItemKind::MlPrediction => "smart_toy",
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(
            self,
            ItemKind::Warning | ItemKind::Urgent | ItemKind::MlAlert | ItemKind::MlWarning
        )
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(ItemKind::Info),
            "trend" => Ok(ItemKind::Trend),
            "warning" => Ok(ItemKind::Warning),
            "urgent" => Ok(ItemKind::Urgent),
            "recommendation" => Ok(ItemKind::Recommendation),
            "ml_info" => Ok(ItemKind::MlInfo),
            "ml_alert" => Ok(ItemKind::MlAlert),
            "ml_warning" => Ok(ItemKind::MlWarning),
            "ml_classification" => Ok(ItemKind::MlClassification),
            "ml_prediction" => Ok(ItemKind::MlPrediction),
            _ => Err(format!("Unknown item kind: {}", s)),
        }
    }
}

/// An insight, alert or recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    /// Stable machine identifier (e.g., "feeding:overdue")
    pub key: String,
    pub kind: ItemKind,
    pub title: String,
    pub message: String,
    pub icon: String,
}

impl ReportItem {
    pub fn new(
        key: impl Into<String>,
        kind: ItemKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            kind,
            title: title.into(),
            message: message.into(),
            icon: kind.default_icon().to_string(),
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// Numeric output of the model behind an ML insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum MlData {
    NextFeeding(NextFeedingPrediction),
    FeedingAnomalies(AnomalyReport),
    SleepQuality(SleepQualityClassification),
    SleepDuration(SleepDurationPrediction),
    FeedingAmount(FeedingAmountPrediction),
    RoutineClusters(RoutineAnalysis),
    Correlation(CorrelationAnalysis),
    DiaperChange(DiaperChangePrediction),
    Forecast(WeeklyForecast),
}

impl MlData {
    pub fn model(&self) -> &'static str {
        match self {
            MlData::NextFeeding(_) => "next_feeding",
            MlData::FeedingAnomalies(_) => "feeding_anomalies",
            MlData::SleepQuality(_) => "sleep_quality",
            MlData::SleepDuration(_) => "sleep_duration",
            MlData::FeedingAmount(_) => "feeding_amount",
            MlData::RoutineClusters(_) => "routine_clusters",
            MlData::Correlation(_) => "correlation",
            MlData::DiaperChange(_) => "diaper_change",
            MlData::Forecast(_) => "forecast",
        }
    }
}

/// A model-backed finding with the numbers that produced its message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlInsight {
    pub key: String,
    pub kind: ItemKind,
    pub title: String,
    pub message: String,
    pub icon: String,
    pub data: MlData,
}

impl MlInsight {
    /// Create an insight keyed by its model name
    pub fn new(
        kind: ItemKind,
        title: impl Into<String>,
        message: impl Into<String>,
        data: MlData,
    ) -> Self {
        Self {
            key: format!("ml:{}", data.model()),
            kind,
            title: title.into(),
            message: message.into(),
            icon: kind.default_icon().to_string(),
            data,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSleepHour {
    /// Local hour of day, 0-23
    pub hour: u32,
    pub avg_duration_hours: f64,
}

/// Named pattern facts; absent when not computable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_sleep_hour: Option<BestSleepHour>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_feeding_interval_hours: Option<f64>,
}

impl Patterns {
    pub fn is_empty(&self) -> bool {
        self.best_sleep_hour.is_none() && self.avg_feeding_interval_hours.is_none()
    }

    /// Fill fields not yet set from `other`
    fn merge(&mut self, other: Patterns) {
        if self.best_sleep_hour.is_none() {
            self.best_sleep_hour = other.best_sleep_hour;
        }
        if self.avg_feeding_interval_hours.is_none() {
            self.avg_feeding_interval_hours = other.avg_feeding_interval_hours;
        }
    }
}

/// Composite output of one insight computation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: Vec<ReportItem>,
    pub alerts: Vec<ReportItem>,
    pub patterns: Patterns,
    pub recommendations: Vec<ReportItem>,
    pub ml_insights: Vec<MlInsight>,
}

impl InsightReport {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
            && self.alerts.is_empty()
            && self.patterns.is_empty()
            && self.recommendations.is_empty()
            && self.ml_insights.is_empty()
    }

    /// Append another section's output, keeping order
    pub fn merge(&mut self, other: InsightReport) {
        self.insights.extend(other.insights);
        self.alerts.extend(other.alerts);
        self.patterns.merge(other.patterns);
        self.recommendations.extend(other.recommendations);
        self.ml_insights.extend(other.ml_insights);
    }

    /// Whether any item in any list carries `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.insights
            .iter()
            .chain(&self.alerts)
            .chain(&self.recommendations)
            .any(|i| i.key == key)
            || self.ml_insights.iter().any(|i| i.key == key)
    }

    pub fn ml_insight(&self, key: &str) -> Option<&MlInsight> {
        self.ml_insights.iter().find(|i| i.key == key)
    }

    /// Total number of items across all lists
    pub fn item_count(&self) -> usize {
        self.insights.len()
            + self.alerts.len()
            + self.recommendations.len()
            + self.ml_insights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predict::{ForecastConfidence, Trend};

    #[test]
    fn test_item_kind_round_trip_names() {
        assert_eq!(ItemKind::MlClassification.as_str(), "ml_classification");
        assert_eq!(ItemKind::from_str("ml_alert").unwrap(), ItemKind::MlAlert);
        assert!(ItemKind::from_str("alert").is_err());
        assert!(ItemKind::Urgent.is_alert());
        assert!(!ItemKind::Trend.is_alert());
    }

    #[test]
    fn test_report_item_builder() {
        let item = ReportItem::new("sleep:low", ItemKind::Warning, "Low sleep", "6.0h/day");
        assert_eq!(item.icon, "warning");

        let item = item.with_icon("bedtime");
        assert_eq!(item.key, "sleep:low");
        assert_eq!(item.icon, "bedtime");
    }

    #[test]
    fn test_ml_data_is_tagged_by_model() {
        let forecast = WeeklyForecast {
            days_analyzed: 7,
            feeding_per_day: 8.0,
            sleep_hours_per_day: 14.0,
            diaper_per_day: 6.0,
            feeding_trend: Trend::Stable,
            confidence: ForecastConfidence::Medium,
        };
        let insight = MlInsight::new(
            ItemKind::MlPrediction,
            "Forecast",
            "8 feedings/day",
            MlData::Forecast(forecast),
        );
        assert_eq!(insight.key, "ml:forecast");

        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["kind"], "ml_prediction");
        assert_eq!(json["data"]["model"], "forecast");
        assert_eq!(json["data"]["feeding_trend"], "stable");

        let back: MlInsight = serde_json::from_value(json).unwrap();
        assert_eq!(back, insight);
    }

    #[test]
    fn test_empty_report_serializes_empty_patterns() {
        let report = InsightReport::default();
        assert!(report.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["patterns"], serde_json::json!({}));
        assert_eq!(json["insights"], serde_json::json!([]));
    }

    #[test]
    fn test_merge_keeps_order_and_first_patterns() {
        let mut report = InsightReport::default();
        report.insights.push(ReportItem::new("a", ItemKind::Info, "A", "a"));
        report.patterns.avg_feeding_interval_hours = Some(3.0);

        let mut other = InsightReport::default();
        other.insights.push(ReportItem::new("b", ItemKind::Info, "B", "b"));
        other.patterns.avg_feeding_interval_hours = Some(9.0);
        other.patterns.best_sleep_hour = Some(BestSleepHour {
            hour: 21,
            avg_duration_hours: 4.0,
        });

        report.merge(other);
        let keys: Vec<&str> = report.insights.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(report.patterns.avg_feeding_interval_hours, Some(3.0));
        assert_eq!(report.patterns.best_sleep_hour.as_ref().unwrap().hour, 21);
        assert!(report.contains_key("b"));
        assert_eq!(report.item_count(), 2);
    }
}
