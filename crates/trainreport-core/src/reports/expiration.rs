use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ReportConfig;
use crate::dates::parse_record_date;
use crate::error::ReportError;
use crate::models::CompletionRecord;
use crate::ordered::OrderedMap;
use crate::reconcile::ReconciledView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExpirationStatus {
    #[serde(rename = "expired")]
    Expired,
    #[serde(rename = "expires soon")]
    ExpiresSoon,
}

impl std::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpirationStatus::Expired => write!(f, "expired"),
            ExpirationStatus::ExpiresSoon => write!(f, "expires soon"),
        }
    }
}

impl ExpirationStatus {
    /// `None` when the expiration is beyond `soon_date`
    pub fn classify(expires_on: NaiveDate, check_date: NaiveDate, soon_date: NaiveDate) -> Option<Self> {
        if expires_on < check_date {
            Some(ExpirationStatus::Expired)
        } else if expires_on <= soon_date {
            Some(ExpirationStatus::ExpiresSoon)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpirationEntry {
    pub training_name: String,
    pub completion_date: String,
    pub expires: String,
    pub status: ExpirationStatus,
}

/// Person name -> trainings that are expired or expire within the horizon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExpirationReport {
    pub people: OrderedMap<String, Vec<ExpirationEntry>>,
    /// Records left out because their expiration date did not parse
    #[serde(skip)]
    pub skipped: usize,
}

impl ExpirationReport {
    pub fn entries(&self, person: &str) -> &[ExpirationEntry] {
        self.people.get(person).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Classify every record that has an expiration date against the check date.
///
/// Records that never expire, or expire after the horizon, are left out. A
/// record whose expiration date does not parse is skipped with a warning and
/// counted in [`ExpirationReport::skipped`].
pub fn expiration_status(
    view: &ReconciledView,
    config: &ReportConfig,
) -> Result<ExpirationReport, ReportError> {
    let check_date = config.check_date;
    let soon_date = config
        .expiry_horizon()
        .and_then(|horizon| check_date.checked_add_signed(horizon))
        .ok_or(ReportError::Horizon(config.expiry_horizon_days))?;
    debug!(%check_date, %soon_date, "Building expiration report");

    let mut report = ExpirationReport::default();
    for record in view {
        let Some(expires) = record.expires.as_deref() else {
            continue;
        };

        let expires_on = match parse_record_date(expires) {
            Ok(date) => date,
            Err(e) => {
                warn!(
                    person = %record.person,
                    training = %record.training,
                    expires,
                    error = %e,
                    "Skipping record with invalid expiration date"
                );
                report.skipped += 1;
                continue;
            }
        };

        if let Some(status) = ExpirationStatus::classify(expires_on, check_date, soon_date) {
            report
                .people
                .entry_or_default(record.person.clone())
                .push(entry_for(record, expires, status));
        }
    }
    Ok(report)
}

fn entry_for(record: &CompletionRecord, expires: &str, status: ExpirationStatus) -> ExpirationEntry {
    ExpirationEntry {
        training_name: record.training.clone(),
        completion_date: record.completion_date.clone(),
        expires: expires.to_string(),
        status,
    }
}
