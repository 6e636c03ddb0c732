//! Report projections over the reconciled view.
//!
//! Each projection reads the same [`ReconciledView`] and builds one report:
//! - `completion_counts`: people per training
//! - `fiscal_year_completions`: listed trainings completed in the fiscal year
//! - `expiration_status`: expired and soon-to-expire trainings per person

pub mod counts;
pub mod expiration;
pub mod fiscal_year;

pub use counts::{completion_counts, CompletionCounts};
pub use expiration::{expiration_status, ExpirationEntry, ExpirationReport, ExpirationStatus};
pub use fiscal_year::{fiscal_year_completions, FiscalWindow, FiscalYearCompletions};
pub use crate::ordered::OrderedMap;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::reconcile::ReconciledView;

pub const COMPLETION_COUNTS_FILE: &str = "training_completion_counts.json";
pub const FISCAL_YEAR_FILE: &str = "fiscal_year_completions.json";
pub const EXPIRATION_FILE: &str = "expired_or_expiring_trainings.json";

/// The three reports produced by one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reports {
    pub counts: CompletionCounts,
    pub fiscal_year: FiscalYearCompletions,
    pub expiration: ExpirationReport,
}

pub fn build_reports(view: &ReconciledView, config: &ReportConfig) -> Result<Reports, ReportError> {
    Ok(Reports {
        counts: completion_counts(view),
        fiscal_year: fiscal_year_completions(view, config)?,
        expiration: expiration_status(view, config)?,
    })
}
