//! Running net-worth projection layered over the ledger indicators.
//!
//! The running total is seeded from the live net worth the first time it is
//! read or adjusted, then accumulates every applied step until [`ForecastEngine::reset`].

use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use tracing::info;

use crate::{
    domain::entry::{EntryType, LedgerEntry},
    errors::{LedgerError, Result},
};

use super::{
    indicators::{classify_forecast, FinancialIndicators, SustainabilityStatus},
    period::{align_forecast_date, count_biweekly_periods, period_start, reference_anchor},
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ForecastState {
    #[default]
    Unseeded,
    Seeded(f64),
}

/// One dated value of a projected series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Parameters of a hypothetical income step.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeForecastRequest {
    pub target_date: NaiveDate,
    /// Biweekly income to project; treated as zero when absent.
    pub override_amount: Option<f64>,
    pub use_existing_average: bool,
    pub subtract_needs: bool,
    pub subtract_wants: bool,
}

impl IncomeForecastRequest {
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            override_amount: None,
            use_existing_average: false,
            subtract_needs: false,
            subtract_wants: false,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.override_amount = Some(amount);
        self
    }

    pub fn using_average(mut self) -> Self {
        self.use_existing_average = true;
        self
    }

    pub fn subtracting_needs(mut self) -> Self {
        self.subtract_needs = true;
        self
    }

    pub fn subtracting_wants(mut self) -> Self {
        self.subtract_wants = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeForecastOutcome {
    pub anchor: NaiveDate,
    pub target_date: NaiveDate,
    pub periods: u32,
    pub biweekly_income: f64,
    pub contribution: f64,
    pub running_total: f64,
    pub status: SustainabilityStatus,
    pub series: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseForecastOutcome {
    pub total_needs: f64,
    pub total_wants: f64,
    pub total_expenses: f64,
    pub running_total: f64,
    /// `None` when no average income is available to compare against.
    pub status: Option<SustainabilityStatus>,
    pub series: Vec<ForecastPoint>,
}

/// Figures shown on the forecast panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub net_worth: f64,
    pub is_projected: bool,
    pub avg_biweekly_income: Option<f64>,
    pub total_needs: f64,
    pub total_wants: f64,
    pub periods: Option<u32>,
    pub status: Option<SustainabilityStatus>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ForecastEngine {
    state: ForecastState,
    anchor_weekday: Weekday,
    last_income: Option<IncomeForecastOutcome>,
    last_expenses: Option<ExpenseForecastOutcome>,
}

impl ForecastEngine {
    pub fn new(anchor_weekday: Weekday) -> Self {
        Self {
            state: ForecastState::Unseeded,
            anchor_weekday,
            last_income: None,
            last_expenses: None,
        }
    }

    pub fn state(&self) -> ForecastState {
        self.state
    }

    pub fn anchor_weekday(&self) -> Weekday {
        self.anchor_weekday
    }

    pub fn last_income(&self) -> Option<&IncomeForecastOutcome> {
        self.last_income.as_ref()
    }

    pub fn last_expenses(&self) -> Option<&ExpenseForecastOutcome> {
        self.last_expenses.as_ref()
    }

    /// Current running total, seeding it from the live net worth if needed.
    pub fn running_total(&mut self, indicators: &FinancialIndicators) -> f64 {
        match self.state {
            ForecastState::Seeded(total) => total,
            ForecastState::Unseeded => {
                let seed = indicators.total_net_worth;
                self.state = ForecastState::Seeded(seed);
                seed
            }
        }
    }

    /// Projects `request` forward from the reference anchor and adds it to the running total.
    pub fn apply_income(
        &mut self,
        request: &IncomeForecastRequest,
        indicators: &FinancialIndicators,
        today: NaiveDate,
    ) -> Result<&IncomeForecastOutcome> {
        let biweekly_income = if request.use_existing_average {
            indicators.avg_biweekly_income.ok_or_else(|| {
                LedgerError::InsufficientData(
                    "no income entries to derive an average biweekly income".into(),
                )
            })?
        } else {
            request.override_amount.unwrap_or(0.0)
        };
        if !biweekly_income.is_finite() {
            return Err(LedgerError::Validation(
                "forecast income must be a finite number".into(),
            ));
        }

        let anchor = reference_anchor(today, self.anchor_weekday);
        let target_date = align_forecast_date(request.target_date, self.anchor_weekday);
        let periods = count_biweekly_periods(anchor, target_date);

        let mut contribution = biweekly_income * f64::from(periods);
        if request.subtract_needs {
            contribution -= indicators.avg_needs_spending;
        }
        if request.subtract_wants {
            contribution -= indicators.avg_wants_spending;
        }

        let before = self.running_total(indicators);
        let after = before + contribution;
        self.state = ForecastState::Seeded(after);

        let series = (0..=periods)
            .map(|index| ForecastPoint {
                date: period_start(anchor, index),
                value: before + contribution * f64::from(index) / f64::from(periods),
            })
            .collect();

        let status = classify_forecast(
            biweekly_income,
            indicators.avg_needs_spending + indicators.avg_wants_spending,
            indicators.avg_needs_spending,
        );

        info!(
            %anchor,
            %target_date,
            periods,
            contribution,
            running_total = after,
            "income forecast applied"
        );

        Ok(&*self.last_income.insert(IncomeForecastOutcome {
            anchor,
            target_date,
            periods,
            biweekly_income,
            contribution,
            running_total: after,
            status,
            series,
        }))
    }

    /// Replays the expense ledger in date order and subtracts its total.
    pub fn apply_expenses<'a, I>(
        &mut self,
        expenses: I,
        indicators: &FinancialIndicators,
    ) -> &ExpenseForecastOutcome
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
    {
        let mut sorted: Vec<&LedgerEntry> = expenses.into_iter().collect();
        sorted.sort_by_key(|entry| entry.date);

        let before = self.running_total(indicators);
        let mut running = before;
        let mut total_needs = 0.0;
        let mut total_wants = 0.0;
        let mut total_expenses = 0.0;
        let mut series = Vec::with_capacity(sorted.len());

        for expense in sorted {
            running -= expense.amount;
            series.push(ForecastPoint {
                date: expense.date,
                value: running,
            });
            match expense.kind {
                EntryType::Needs => total_needs += expense.amount,
                EntryType::Wants => total_wants += expense.amount,
                _ => {}
            }
            total_expenses += expense.amount;
        }

        let after = before - total_expenses;
        self.state = ForecastState::Seeded(after);

        let status = indicators
            .avg_biweekly_income
            .map(|income| classify_forecast(income, total_needs + total_wants, total_needs));

        info!(
            entries = series.len(),
            total_expenses,
            running_total = after,
            "expense forecast applied"
        );

        &*self.last_expenses.insert(ExpenseForecastOutcome {
            total_needs,
            total_wants,
            total_expenses,
            running_total: after,
            status,
            series,
        })
    }

    /// Discards the running total and the retained series.
    pub fn reset(&mut self) {
        self.state = ForecastState::Unseeded;
        self.last_income = None;
        self.last_expenses = None;
        info!("forecast reset");
    }

    /// Panel figures; reads the running total without seeding it.
    pub fn summary(&self, indicators: &FinancialIndicators, today: NaiveDate) -> ForecastSummary {
        let (net_worth, is_projected) = match self.state {
            ForecastState::Seeded(total) => (total, true),
            ForecastState::Unseeded => (indicators.total_net_worth, false),
        };
        let costs = indicators.total_needs + indicators.total_wants;
        ForecastSummary {
            net_worth,
            is_projected,
            avg_biweekly_income: indicators.avg_biweekly_income,
            total_needs: indicators.total_needs,
            total_wants: indicators.total_wants,
            periods: self.last_income.as_ref().map(|outcome| outcome.periods),
            status: indicators
                .avg_biweekly_income
                .map(|income| classify_forecast(income, costs, costs)),
            start_date: reference_anchor(today, self.anchor_weekday),
            end_date: self.last_income.as_ref().map(|outcome| outcome.target_date),
        }
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(super::period::DEFAULT_ANCHOR_WEEKDAY)
    }
}
