use chrono::NaiveDate;

use super::RawCompletion;

/// Identifies a canonical record: (person name, training name)
pub type RecordKey = (String, String);

/// The most recent valid completion for one (person, training) pair.
///
/// `completion_date` keeps the roster's original text so reports echo the
/// input exactly; `completed_on` is the parsed form used for comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    pub person: String,
    pub training: String,
    pub completion_date: String,
    pub completed_on: NaiveDate,
    pub expires: Option<String>,
}

impl CompletionRecord {
    /// Build a record from a roster entry whose timestamp already parsed
    pub fn from_entry(
        person: &str,
        entry: &RawCompletion,
        timestamp: &str,
        completed_on: NaiveDate,
    ) -> Self {
        Self {
            person: person.to_string(),
            training: entry.training.clone(),
            completion_date: timestamp.to_string(),
            completed_on,
            expires: entry.expiration().map(str::to_string),
        }
    }

    pub fn key(&self) -> RecordKey {
        (self.person.clone(), self.training.clone())
    }

    pub fn never_expires(&self) -> bool {
        self.expires.is_none()
    }
}
