use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    config::Config,
    domain::entry::{EntryDraft, LedgerEntry},
    ledger::{CollectionKind, EntryCollection, Ledger},
    storage::{LoadReport, StorageBackend},
};

use super::{
    chart::MergedSeries,
    forecast::{
        ExpenseForecastOutcome, ForecastEngine, ForecastState, ForecastSummary,
        IncomeForecastOutcome, IncomeForecastRequest,
    },
    indicators::{EngineSettings, FinancialIndicators},
    series::{CategoryBreakdown, ChartView, TnwSeries},
    services::{EntryService, ForecastService, ServiceResult, SummaryService},
    time::Clock,
};

/// Owns the ledger, its store and the running forecast for one user session.
///
/// Every mutation is persisted before the call returns, so any figures read
/// afterwards reflect it.
pub struct FinanceSession {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
    config: Config,
    forecast: ForecastEngine,
    clock: Box<dyn Clock>,
    load_reports: Vec<LoadReport>,
}

impl FinanceSession {
    /// Loads both collections from `storage`.
    pub fn open(
        storage: Box<dyn StorageBackend>,
        config: Config,
        clock: Box<dyn Clock>,
    ) -> ServiceResult<Self> {
        let forecast = ForecastEngine::new(config.engine.anchor_weekday);
        let mut session = Self {
            ledger: Ledger::new(),
            storage,
            config,
            forecast,
            clock,
            load_reports: Vec::new(),
        };
        session.reload()?;
        Ok(session)
    }

    /// Re-reads the store, replacing in-memory collections and resetting the forecast.
    pub fn reload(&mut self) -> ServiceResult<&[LoadReport]> {
        let mut reports = Vec::with_capacity(CollectionKind::ALL.len());
        for kind in CollectionKind::ALL {
            let (collection, report) = self.storage.load_collection(kind)?;
            if report.dropped > 0 || report.reset {
                warn!(collection = %kind, dropped = report.dropped, reset = report.reset, "collection repaired on load");
            }
            self.ledger.set_collection(collection);
            reports.push(report);
        }
        self.forecast.reset();
        info!(
            budget = self.ledger.budget.len(),
            expenses = self.ledger.expenses.len(),
            "session loaded"
        );
        self.load_reports = reports;
        Ok(&self.load_reports)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.config.engine
    }

    /// Swaps configuration; the forecast restarts under the new settings.
    pub fn set_config(&mut self, config: Config) {
        self.forecast = ForecastEngine::new(config.engine.anchor_weekday);
        self.config = config;
    }

    pub fn load_reports(&self) -> &[LoadReport] {
        &self.load_reports
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn collection(&self, kind: CollectionKind) -> &EntryCollection {
        self.ledger.collection(kind)
    }

    pub fn entry(&self, kind: CollectionKind, id: u32) -> ServiceResult<&LedgerEntry> {
        EntryService::get(&self.ledger, kind, id)
    }

    pub fn add_entry(&mut self, kind: CollectionKind, draft: &EntryDraft) -> ServiceResult<u32> {
        self.mutate(kind, |ledger| EntryService::add(ledger, kind, draft))
    }

    pub fn edit_entry(&mut self, kind: CollectionKind, id: u32, draft: &EntryDraft) -> ServiceResult<()> {
        self.mutate(kind, |ledger| EntryService::edit(ledger, kind, id, draft))
    }

    pub fn delete_entry(&mut self, kind: CollectionKind, id: u32) -> ServiceResult<LedgerEntry> {
        self.mutate(kind, |ledger| EntryService::remove(ledger, kind, id))
    }

    /// Applies `change` and persists the collection, restoring it if the write fails.
    fn mutate<T, F>(&mut self, kind: CollectionKind, change: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut Ledger) -> ServiceResult<T>,
    {
        let snapshot = self.ledger.collection(kind).clone();
        let value = change(&mut self.ledger)?;
        if let Err(err) = self.storage.save_collection(self.ledger.collection(kind)) {
            warn!(collection = %kind, error = %err, "persist failed; reverting");
            self.ledger.set_collection(snapshot);
            return Err(err.into());
        }
        Ok(value)
    }

    pub fn indicators(&self) -> FinancialIndicators {
        SummaryService::indicators(&self.ledger, self.today(), self.settings())
    }

    pub fn time_series(&self) -> TnwSeries {
        SummaryService::time_series(&self.ledger, self.settings())
    }

    pub fn tick_labels(&self, view: Option<ChartView>) -> Vec<String> {
        SummaryService::tick_labels(view.unwrap_or(self.config.default_view), self.clock.local_now())
    }

    pub fn breakdown(&self) -> CategoryBreakdown {
        SummaryService::breakdown(&self.ledger)
    }

    pub fn forecast_state(&self) -> ForecastState {
        self.forecast.state()
    }

    /// Running forecast total, seeding it on first access.
    pub fn forecast_total(&mut self) -> f64 {
        let indicators = self.indicators();
        self.forecast.running_total(&indicators)
    }

    pub fn apply_income_forecast(
        &mut self,
        request: &IncomeForecastRequest,
    ) -> ServiceResult<IncomeForecastOutcome> {
        let today = self.today();
        ForecastService::apply_income(&mut self.forecast, &self.ledger, request, today, &self.config.engine)
    }

    pub fn apply_expense_forecast(&mut self) -> ExpenseForecastOutcome {
        let today = self.today();
        ForecastService::apply_expenses(&mut self.forecast, &self.ledger, today, &self.config.engine)
    }

    pub fn reset_forecast(&mut self) {
        self.forecast.reset();
    }

    pub fn forecast_summary(&self) -> ForecastSummary {
        self.forecast.summary(&self.indicators(), self.today())
    }

    pub fn chart(&self) -> MergedSeries {
        ForecastService::chart(&self.forecast, &self.ledger, self.settings())
    }
}
