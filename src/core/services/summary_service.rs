use chrono::{NaiveDate, NaiveDateTime};

use crate::core::{
    indicators::{compute_indicators, EngineSettings, FinancialIndicators},
    series::{category_breakdown, generate_tick_labels, generate_time_series, CategoryBreakdown, ChartView, TnwSeries},
};
use crate::ledger::Ledger;

/// Read-only projections of the budget collection.
pub struct SummaryService;

impl SummaryService {
    pub fn indicators(ledger: &Ledger, today: NaiveDate, settings: &EngineSettings) -> FinancialIndicators {
        compute_indicators(ledger.budget.iter(), today, settings)
    }

    pub fn time_series(ledger: &Ledger, settings: &EngineSettings) -> TnwSeries {
        generate_time_series(ledger.budget.iter(), settings)
    }

    pub fn tick_labels(view: ChartView, now: NaiveDateTime) -> Vec<String> {
        generate_tick_labels(view, now)
    }

    pub fn breakdown(ledger: &Ledger) -> CategoryBreakdown {
        category_breakdown(ledger.budget.iter())
    }
}
