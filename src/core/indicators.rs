use std::fmt;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::entry::{EntryType, LedgerEntry};

use super::period::{periods_since_year_start, DEFAULT_ANCHOR_WEEKDAY};

/// Lower and upper fractions of net worth separating the three status tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub sustainable: f64,
    pub shutdown: f64,
}

impl TierThresholds {
    pub const fn new(sustainable: f64, shutdown: f64) -> Self {
        Self {
            sustainable,
            shutdown,
        }
    }
}

/// Tunable constants of the indicator and forecast engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub fixed_capital: f64,
    pub first_home_seed: f64,
    pub retirement_seed: f64,
    pub first_home_rate: f64,
    pub retirement_rate: f64,
    pub emergency_rate: f64,
    pub tax_free_rate: f64,
    pub needs_thresholds: TierThresholds,
    pub wants_thresholds: TierThresholds,
    pub anchor_weekday: Weekday,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fixed_capital: 2818.66,
            first_home_seed: 8000.0,
            retirement_seed: 12000.0,
            first_home_rate: 0.30,
            retirement_rate: 0.20,
            emergency_rate: 0.10,
            tax_free_rate: 0.10,
            needs_thresholds: TierThresholds::new(0.20, 0.30),
            wants_thresholds: TierThresholds::new(0.10, 0.20),
            anchor_weekday: DEFAULT_ANCHOR_WEEKDAY,
        }
    }
}

/// Three-tier health classification shared by ledger and forecast views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SustainabilityStatus {
    Sustainable,
    Breakeven,
    Shutdown,
}

impl SustainabilityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SustainabilityStatus::Sustainable => "Sustainable",
            SustainabilityStatus::Breakeven => "Breakeven",
            SustainabilityStatus::Shutdown => "Shutdown",
        }
    }

    /// Wording used on forecast panels.
    pub fn forecast_label(&self) -> &'static str {
        match self {
            SustainabilityStatus::Sustainable => "Sustainable Profit",
            other => other.label(),
        }
    }
}

impl fmt::Display for SustainabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies spending against net worth; boundaries fall into the milder tier.
pub fn classify(amount: f64, net_worth: f64, thresholds: TierThresholds) -> SustainabilityStatus {
    if amount <= thresholds.sustainable * net_worth {
        SustainabilityStatus::Sustainable
    } else if amount < thresholds.shutdown * net_worth {
        SustainabilityStatus::Breakeven
    } else {
        SustainabilityStatus::Shutdown
    }
}

/// Classifies an income figure against what it must cover.
pub fn classify_forecast(income: f64, full_cost: f64, breakeven_cost: f64) -> SustainabilityStatus {
    if income > full_cost {
        SustainabilityStatus::Sustainable
    } else if income >= breakeven_cost {
        SustainabilityStatus::Breakeven
    } else {
        SustainabilityStatus::Shutdown
    }
}

/// Derived savings buckets for one average pay period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllocationBuckets {
    pub first_home: f64,
    pub retirement: f64,
    pub emergency: f64,
    pub tax_free: f64,
}

impl AllocationBuckets {
    pub fn from_average(average: f64, settings: &EngineSettings) -> Self {
        Self {
            first_home: average * settings.first_home_rate + settings.first_home_seed,
            retirement: average * settings.retirement_rate + settings.retirement_seed,
            emergency: average * settings.emergency_rate,
            tax_free: average * settings.tax_free_rate,
        }
    }

    /// Growth set aside this period, excluding the pre-existing seeds.
    pub fn period_contribution(&self, settings: &EngineSettings) -> f64 {
        (self.first_home - settings.first_home_seed)
            + (self.retirement - settings.retirement_seed)
            + self.emergency
            + self.tax_free
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub income: usize,
    pub needs: usize,
    pub wants: usize,
    pub inflow: usize,
}

/// Summary figures derived from the budget ledger. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialIndicators {
    pub total_net_worth: f64,
    pub total_income: f64,
    pub total_inflows: f64,
    pub total_expenses: f64,
    pub total_needs: f64,
    pub total_wants: f64,
    pub fixed_capital: f64,
    /// `None` until at least one income entry exists.
    pub avg_biweekly_income: Option<f64>,
    pub allocations: Option<AllocationBuckets>,
    pub avg_needs_spending: f64,
    pub avg_wants_spending: f64,
    pub disposable_income: Option<f64>,
    pub num_biweekly_periods: u32,
    pub needs_status: SustainabilityStatus,
    pub wants_status: SustainabilityStatus,
    pub counts: EntryCounts,
}

#[derive(Default)]
struct Totals {
    income: f64,
    needs: f64,
    wants: f64,
    inflow: f64,
    counts: EntryCounts,
}

impl Totals {
    fn add(&mut self, entry: &LedgerEntry) {
        match entry.kind {
            EntryType::Income => {
                self.income += entry.amount;
                self.counts.income += 1;
            }
            EntryType::Needs => {
                self.needs += entry.amount;
                self.counts.needs += 1;
            }
            EntryType::Wants => {
                self.wants += entry.amount;
                self.counts.wants += 1;
            }
            EntryType::Inflow => {
                self.inflow += entry.amount;
                self.counts.inflow += 1;
            }
            EntryType::Other(_) => {}
        }
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

/// Reduces the budget ledger into [`FinancialIndicators`] in a single pass.
pub fn compute_indicators<'a, I>(
    entries: I,
    today: NaiveDate,
    settings: &EngineSettings,
) -> FinancialIndicators
where
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut totals = Totals::default();
    for entry in entries {
        totals.add(entry);
    }

    let total_expenses = totals.needs + totals.wants;
    let total_net_worth =
        settings.fixed_capital + (totals.income + totals.inflow) - total_expenses;

    let avg_biweekly_income =
        (totals.counts.income > 0).then(|| totals.income / totals.counts.income as f64);
    let avg_needs_spending = average(totals.needs, totals.counts.needs);
    let avg_wants_spending = average(totals.wants, totals.counts.wants);

    let allocations = avg_biweekly_income.map(|avg| AllocationBuckets::from_average(avg, settings));
    let disposable_income = allocations.map(|buckets| {
        totals.income - buckets.period_contribution(settings) - avg_needs_spending - avg_wants_spending
    });

    let indicators = FinancialIndicators {
        total_net_worth,
        total_income: totals.income,
        total_inflows: totals.inflow,
        total_expenses,
        total_needs: totals.needs,
        total_wants: totals.wants,
        fixed_capital: settings.fixed_capital,
        avg_biweekly_income,
        allocations,
        avg_needs_spending,
        avg_wants_spending,
        disposable_income,
        num_biweekly_periods: periods_since_year_start(today),
        needs_status: classify(totals.needs, total_net_worth, settings.needs_thresholds),
        wants_status: classify(totals.wants, total_net_worth, settings.wants_thresholds),
        counts: totals.counts,
    };

    debug!(
        net_worth = indicators.total_net_worth,
        income = indicators.total_income,
        needs = indicators.total_needs,
        wants = indicators.total_wants,
        "indicators computed"
    );
    indicators
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(kind: EntryType, amount: f64) -> LedgerEntry {
        LedgerEntry::new(0, kind, amount, "Test", date(2024, 1, 5))
    }

    #[test]
    fn boundaries_belong_to_the_milder_tier() {
        let needs = EngineSettings::default().needs_thresholds;
        assert_eq!(classify(200.0, 1000.0, needs), SustainabilityStatus::Sustainable);
        assert_eq!(classify(200.01, 1000.0, needs), SustainabilityStatus::Breakeven);
        assert_eq!(classify(300.0, 1000.0, needs), SustainabilityStatus::Shutdown);
    }

    #[test]
    fn wants_use_their_own_thresholds() {
        let wants = EngineSettings::default().wants_thresholds;
        assert_eq!(classify(100.0, 1000.0, wants), SustainabilityStatus::Sustainable);
        assert_eq!(classify(150.0, 1000.0, wants), SustainabilityStatus::Breakeven);
        assert_eq!(classify(200.0, 1000.0, wants), SustainabilityStatus::Shutdown);
    }

    #[test]
    fn forecast_classification_compares_income_to_costs() {
        assert_eq!(classify_forecast(500.0, 400.0, 300.0), SustainabilityStatus::Sustainable);
        assert_eq!(classify_forecast(400.0, 400.0, 300.0), SustainabilityStatus::Breakeven);
        assert_eq!(classify_forecast(299.0, 400.0, 300.0), SustainabilityStatus::Shutdown);
        assert_eq!(SustainabilityStatus::Sustainable.forecast_label(), "Sustainable Profit");
    }

    #[test]
    fn empty_ledger_has_no_average_income() {
        let settings = EngineSettings::default();
        let indicators = compute_indicators(Vec::<LedgerEntry>::new().iter(), date(2024, 1, 10), &settings);
        assert_eq!(indicators.total_net_worth, settings.fixed_capital);
        assert_eq!(indicators.avg_biweekly_income, None);
        assert_eq!(indicators.allocations, None);
        assert_eq!(indicators.disposable_income, None);
        assert_eq!(indicators.avg_needs_spending, 0.0);
    }

    #[test]
    fn allocations_and_disposable_income_follow_the_average() {
        let settings = EngineSettings::default();
        let ledger = vec![
            entry(EntryType::Income, 1000.0),
            entry(EntryType::Income, 3000.0),
            entry(EntryType::Needs, 100.0),
            entry(EntryType::Needs, 300.0),
            entry(EntryType::Wants, 50.0),
            entry(EntryType::Inflow, 25.0),
        ];
        let indicators = compute_indicators(&ledger, date(2024, 1, 10), &settings);

        assert_eq!(indicators.avg_biweekly_income, Some(2000.0));
        let buckets = indicators.allocations.unwrap();
        assert!((buckets.first_home - 8600.0).abs() < 1e-9);
        assert!((buckets.retirement - 12400.0).abs() < 1e-9);
        assert!((buckets.emergency - 200.0).abs() < 1e-9);
        assert!((buckets.tax_free - 200.0).abs() < 1e-9);
        assert_eq!(indicators.avg_needs_spending, 200.0);
        assert_eq!(indicators.avg_wants_spending, 50.0);
        let disposable = indicators.disposable_income.unwrap();
        assert!((disposable - (4000.0 - 1400.0 - 200.0 - 50.0)).abs() < 1e-9);
        assert_eq!(indicators.counts.inflow, 1);
        assert_eq!(indicators.total_inflows, 25.0);
    }

    #[test]
    fn settings_deserialize_with_missing_fields() {
        let settings: EngineSettings =
            serde_json::from_str(r#"{"fixed_capital": 100.0}"#).unwrap();
        assert_eq!(settings.fixed_capital, 100.0);
        assert_eq!(settings.first_home_seed, 8000.0);
        assert_eq!(settings.anchor_weekday, Weekday::Fri);
    }
}
