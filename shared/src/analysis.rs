//! End-to-end risk analysis of one weather series
//!
//! Re-running an analysis is a pure function of the series and the session
//! ledger: nothing here keeps state between runs.

use serde::{Deserialize, Serialize};

use crate::models::{
    annotate_series, apply_risk_decay, detect_outbreaks, mark_treatments, recommend_treatments,
    risk_trend, AnnotatedDay, OutbreakWindow, RiskSummary, RiskTrend, SchedulingStrategy,
    TreatmentLedger, TreatmentRecommendation, WeatherRecord,
};

/// Everything the presentation layer needs from one analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAnalysis {
    pub days: Vec<AnnotatedDay>,
    pub trend: Option<RiskTrend>,
    pub summary: RiskSummary,
    pub outbreaks: Vec<OutbreakWindow>,
    pub recommendations: Vec<TreatmentRecommendation>,
}

impl RiskAnalysis {
    /// Analyse a series against the confirmed treatments of a session.
    ///
    /// Records are sorted by date first. Trend, summary, outbreaks and
    /// recommendations all read the classified tiers; decay from confirmed
    /// treatments is applied last, to the returned days only.
    pub fn run(
        mut records: Vec<WeatherRecord>,
        ledger: &TreatmentLedger,
        strategy: SchedulingStrategy,
    ) -> Self {
        records.sort_by_key(|record| record.date);

        let mut days = annotate_series(&records);
        let trend = risk_trend(&days);
        let summary = RiskSummary::from_days(&days);
        let outbreaks = detect_outbreaks(&days);
        let recommendations = recommend_treatments(&days, strategy);

        apply_risk_decay(&mut days, ledger);
        mark_treatments(&mut days, ledger, &recommendations);

        Self {
            days,
            trend,
            summary,
            outbreaks,
            recommendations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn trend_label(&self) -> Option<&'static str> {
        self.trend.map(|trend| trend.label())
    }
}
