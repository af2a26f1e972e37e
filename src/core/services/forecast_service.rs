use chrono::NaiveDate;

use crate::core::{
    chart::{merge_chart, MergedSeries},
    forecast::{ExpenseForecastOutcome, ForecastEngine, IncomeForecastOutcome, IncomeForecastRequest},
    indicators::EngineSettings,
    services::{ServiceError, ServiceResult, SummaryService},
};
use crate::ledger::Ledger;

/// Drives the forecast engine from the live ledger.
pub struct ForecastService;

impl ForecastService {
    pub fn apply_income(
        engine: &mut ForecastEngine,
        ledger: &Ledger,
        request: &IncomeForecastRequest,
        today: NaiveDate,
        settings: &EngineSettings,
    ) -> ServiceResult<IncomeForecastOutcome> {
        if let Some(amount) = request.override_amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ServiceError::Invalid(
                    "forecast amount must be a non-negative number".into(),
                ));
            }
        }
        let indicators = SummaryService::indicators(ledger, today, settings);
        let outcome = engine.apply_income(request, &indicators, today)?;
        Ok(outcome.clone())
    }

    pub fn apply_expenses(
        engine: &mut ForecastEngine,
        ledger: &Ledger,
        today: NaiveDate,
        settings: &EngineSettings,
    ) -> ExpenseForecastOutcome {
        let indicators = SummaryService::indicators(ledger, today, settings);
        engine.apply_expenses(ledger.expenses.iter(), &indicators).clone()
    }

    /// Base series overlaid with the most recent forecast steps.
    pub fn chart(engine: &ForecastEngine, ledger: &Ledger, settings: &EngineSettings) -> MergedSeries {
        let base = SummaryService::time_series(ledger, settings);
        let expenses = engine
            .last_expenses()
            .map(|outcome| outcome.series.as_slice())
            .unwrap_or_default();
        let income = engine
            .last_income()
            .map(|outcome| outcome.series.as_slice())
            .unwrap_or_default();
        merge_chart(&base, expenses, income)
    }
}
