#![doc(test(attr(deny(warnings))))]

//! Expense Core tracks income and expense entries over financial months
//! (26th to 25th) and calendar years, and feeds list and chart views from a
//! single filter/sort/aggregate pipeline.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Core tracing initialized.");
    });
}
