//! Insight Engine - orchestrates the analyzers over one event window

use chrono::{DateTime, FixedOffset};

use crate::models::Event;
use crate::window::EventWindow;
use crate::Result;

use super::types::{AnalyzerId, InsightReport};
use super::{DiaperAnalyzer, FeedingAnalyzer, PatternAnalyzer, PredictionAnalyzer, SleepAnalyzer};

/// Context provided to analyzers
pub struct AnalysisContext<'a> {
    pub window: &'a EventWindow,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(window: &'a EventWindow) -> Self {
        Self { window }
    }

    /// Reference instant of the window
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.window.now()
    }
}

/// Trait for report section analyzers
///
/// An analyzer never fails: when its data is missing or too sparse it
/// contributes nothing.
pub trait Analyzer: Send + Sync {
    /// Unique identifier for this analyzer
    fn id(&self) -> AnalyzerId;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze the window and produce this analyzer's part of the report
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> InsightReport;
}

/// The main insight engine that orchestrates analysis
pub struct InsightEngine {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the built-in analyzers
    ///
    /// Registration order is report order: feeding, sleep and diaper
    /// sections first, then patterns and recommendations, then model output.
    pub fn new() -> Self {
        let mut engine = Self { analyzers: vec![] };

        engine.register(Box::new(FeedingAnalyzer));
        engine.register(Box::new(SleepAnalyzer));
        engine.register(Box::new(DiaperAnalyzer));
        engine.register(Box::new(PatternAnalyzer));
        engine.register(Box::new(PredictionAnalyzer));

        engine
    }

    /// Create an engine with no analyzers
    pub fn empty() -> Self {
        Self { analyzers: vec![] }
    }

    /// Register an analyzer after the existing ones
    pub fn register(&mut self, analyzer: Box<dyn Analyzer>) {
        self.analyzers.push(analyzer);
    }

    /// Run every analyzer over an already built window
    pub fn analyze(&self, window: &EventWindow) -> InsightReport {
        if window.is_empty() {
            tracing::debug!("Empty window, returning empty report");
            return InsightReport::default();
        }

        let ctx = AnalysisContext::new(window);
        let mut report = InsightReport::default();

        for analyzer in &self.analyzers {
            let section = analyzer.analyze(&ctx);
            tracing::debug!(
                analyzer = analyzer.name(),
                items = section.item_count(),
                "Analyzer complete"
            );
            report.merge(section);
        }

        tracing::info!(
            events = window.len(),
            days = window.days(),
            insights = report.insights.len(),
            alerts = report.alerts.len(),
            recommendations = report.recommendations.len(),
            ml_insights = report.ml_insights.len(),
            "Insight analysis complete"
        );

        report
    }

    /// Build the window and analyze it
    pub fn compute(
        &self,
        events: &[Event],
        now: DateTime<FixedOffset>,
        window_days: u32,
    ) -> Result<InsightReport> {
        let window = EventWindow::new(events, now, window_days)?;
        Ok(self.analyze(&window))
    }

    /// Get list of registered analyzers
    pub fn analyzer_ids(&self) -> Vec<AnalyzerId> {
        self.analyzers.iter().map(|a| a.id()).collect()
    }
}

/// Compute the full insight report for one subject's events
///
/// Only events within `[now - window_days, now]` are considered. Fails only
/// when `window_days` is zero.
pub fn compute_insights(
    events: &[Event],
    now: DateTime<FixedOffset>,
    window_days: u32,
) -> Result<InsightReport> {
    InsightEngine::new().compute(events, now, window_days)
}
