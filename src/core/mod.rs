//! Projection engine: period arithmetic, indicators, series, forecasting and
//! the session that ties them to a ledger store.

pub mod chart;
pub mod forecast;
pub mod indicators;
pub mod period;
pub mod series;
pub mod services;
pub mod session;
pub mod time;

pub use chart::{merge_chart, MergedSeries};
pub use forecast::{ForecastEngine, ForecastState, IncomeForecastRequest};
pub use indicators::{EngineSettings, FinancialIndicators, SustainabilityStatus};
pub use series::{ChartView, TnwSeries};
pub use session::FinanceSession;
pub use time::{Clock, FixedClock};
