mod export;
mod rankings;
mod suite;
pub(crate) mod summary;


pub(crate) use export::export_results;
pub(crate) use suite::{SuiteConfig, SuiteOutcome, run_suite};
pub(crate) use summary::print_report;
