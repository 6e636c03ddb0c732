use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::ordered::OrderedMap;
use crate::reconcile::ReconciledView;

/// Fiscal year `Y` runs from July 1 of `Y - 1` through June 30 of `Y`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiscalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FiscalWindow {
    pub fn for_year(year: i32) -> Result<Self, ReportError> {
        let start = year
            .checked_sub(1)
            .and_then(|prev| NaiveDate::from_ymd_opt(prev, 7, 1));
        let end = NaiveDate::from_ymd_opt(year, 6, 30);
        match (start, end) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(ReportError::FiscalYear(year)),
        }
    }

    /// Inclusive on both ends
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Training name -> people who completed it within the fiscal year
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FiscalYearCompletions(pub OrderedMap<String, Vec<String>>);

impl FiscalYearCompletions {
    pub fn people(&self, training: &str) -> &[String] {
        self.0.get(training).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// People whose latest completion of a listed training falls in the fiscal
/// year. Trainings outside `config.fiscal_trainings` are ignored.
pub fn fiscal_year_completions(
    view: &ReconciledView,
    config: &ReportConfig,
) -> Result<FiscalYearCompletions, ReportError> {
    let window = FiscalWindow::for_year(config.fiscal_year)?;
    debug!(
        fiscal_year = config.fiscal_year,
        start = %window.start,
        end = %window.end,
        "Building fiscal-year report"
    );

    let mut results: OrderedMap<String, Vec<String>> = OrderedMap::new();
    for record in view {
        if config.is_fiscal_training(&record.training) && window.contains(record.completed_on) {
            results
                .entry_or_default(record.training.clone())
                .push(record.person.clone());
        }
    }
    Ok(FiscalYearCompletions(results))
}
