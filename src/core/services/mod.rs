pub mod entry_service;
pub mod forecast_service;
pub mod summary_service;

pub use entry_service::EntryService;
pub use forecast_service::ForecastService;
pub use summary_service::SummaryService;

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
