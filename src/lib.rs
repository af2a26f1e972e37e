#![doc(test(attr(deny(warnings))))]

//! Fintel Core keeps a personal budget and expense ledger, derives net worth
//! indicators from it and projects net worth forward in biweekly periods.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("fintel_core tracing initialized");
    });
}
