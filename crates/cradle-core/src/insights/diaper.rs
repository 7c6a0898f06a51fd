//! Diaper section

use super::descriptive::DiaperSummary;
use super::engine::{AnalysisContext, Analyzer};
use super::types::{AnalyzerId, InsightReport, ItemKind, ReportItem};

pub struct DiaperAnalyzer;

impl Analyzer for DiaperAnalyzer {
    fn id(&self) -> AnalyzerId {
        AnalyzerId::Diaper
    }

    fn name(&self) -> &'static str {
        "Diaper"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> InsightReport {
        let mut report = InsightReport::default();

        let Some(summary) = DiaperSummary::from_window(ctx.window) else {
            return report;
        };

        report.insights.push(
            ReportItem::new(
                "diaper:daily",
                ItemKind::Info,
                "Diapers",
                format!("Average of {:.1} changes/day", summary.daily_average),
            )
            .with_icon("baby_changing_station"),
        );

        if summary.has_kinds() {
            report.insights.push(
                ReportItem::new(
                    "diaper:distribution",
                    ItemKind::Info,
                    "Diaper types",
                    format!(
                        "{} wet, {} dirty, {} both",
                        summary.wet, summary.dirty, summary.both
                    ),
                )
                .with_icon("baby_changing_station"),
            );
        }

        report
    }
}
