//! Completion reconciliation.
//!
//! Folds every roster entry into one canonical record per (person, training)
//! pair. Entries with a missing or unparseable timestamp are skipped with a
//! warning; among the remaining entries the latest completion date wins, and
//! on an exact tie the entry seen first in the roster is kept.

use tracing::{debug, warn};

use crate::dates::{format_record_date, parse_record_date};
use crate::models::{CompletionRecord, Person, RecordKey};
use crate::ordered::{OrderedMap, Values};

/// Counters collected while building a [`ReconciledView`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Every roster entry looked at
    pub entries_seen: usize,
    pub missing_timestamp: usize,
    pub invalid_timestamp: usize,
    /// Valid entries that lost to another entry for the same pair
    pub superseded: usize,
    /// Canonical records in the finished view
    pub records: usize,
}

impl ReconcileStats {
    pub fn skipped(&self) -> usize {
        self.missing_timestamp + self.invalid_timestamp
    }
}

/// Canonical records keyed by (person, training), in first-insertion order.
///
/// Built once per run and read-only afterwards. A newer entry replaces its
/// pair's record in place, so iteration order is the order in which each
/// pair first received a valid entry.
#[derive(Debug, Clone, Default)]
pub struct ReconciledView {
    records: OrderedMap<RecordKey, CompletionRecord>,
    stats: ReconcileStats,
}

impl ReconciledView {
    pub fn build(people: &[Person]) -> Self {
        let mut view = Self::default();

        for person in people {
            for entry in &person.completions {
                view.stats.entries_seen += 1;

                let Some(timestamp) = entry.timestamp.as_deref() else {
                    warn!(
                        person = %person.name,
                        training = %entry.training,
                        "Skipping completion with missing timestamp"
                    );
                    view.stats.missing_timestamp += 1;
                    continue;
                };

                let completed_on = match parse_record_date(timestamp) {
                    Ok(date) => date,
                    Err(e) => {
                        warn!(
                            person = %person.name,
                            training = %entry.training,
                            timestamp,
                            error = %e,
                            "Skipping completion with invalid date format"
                        );
                        view.stats.invalid_timestamp += 1;
                        continue;
                    }
                };

                view.offer(CompletionRecord::from_entry(
                    &person.name,
                    entry,
                    timestamp,
                    completed_on,
                ));
            }
        }

        view.stats.records = view.records.len();
        debug!(stats = ?view.stats, "Reconciled roster");
        view
    }

    /// Keep `candidate` if its pair has no record yet or it is strictly newer
    fn offer(&mut self, candidate: CompletionRecord) {
        let key = candidate.key();
        match self.records.get_mut(&key) {
            Some(current) => {
                if candidate.completed_on > current.completed_on {
                    debug!(
                        person = %candidate.person,
                        training = %candidate.training,
                        replaced = %format_record_date(current.completed_on),
                        kept = %format_record_date(candidate.completed_on),
                        "Newer completion supersedes earlier one"
                    );
                    *current = candidate;
                }
                self.stats.superseded += 1;
            }
            None => {
                self.records.insert(key, candidate);
            }
        }
    }

    pub fn get(&self, person: &str, training: &str) -> Option<&CompletionRecord> {
        self.records.get(&(person.to_string(), training.to_string()))
    }

    pub fn iter(&self) -> Values<'_, RecordKey, CompletionRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }
}

impl<'a> IntoIterator for &'a ReconciledView {
    type Item = &'a CompletionRecord;
    type IntoIter = Values<'a, RecordKey, CompletionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawCompletion;
    use chrono::NaiveDate;

    fn entry(training: &str, timestamp: Option<&str>, expires: Option<&str>) -> RawCompletion {
        RawCompletion::new(training, timestamp, expires)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_most_recent_wins() {
        let people = vec![Person::new(
            "Alice",
            vec![
                entry("X-Ray Safety", Some("01/01/2023"), Some("01/01/2024")),
                entry("X-Ray Safety", Some("06/01/2023"), Some("06/01/2024")),
                entry("X-Ray Safety", Some("03/15/2023"), Some("03/15/2024")),
            ],
        )];

        let view = ReconciledView::build(&people);
        assert_eq!(view.len(), 1);

        let record = view.get("Alice", "X-Ray Safety").unwrap();
        assert_eq!(record.completed_on, ymd(2023, 6, 1));
        assert_eq!(record.completion_date, "06/01/2023");
        assert_eq!(record.expires.as_deref(), Some("06/01/2024"));
    }

    #[test]
    fn test_compares_dates_not_strings() {
        // "9/1/2023" sorts after "10/1/2023" as text
        let people = vec![Person::new(
            "Alice",
            vec![
                entry("X-Ray Safety", Some("10/1/2023"), None),
                entry("X-Ray Safety", Some("9/1/2023"), None),
            ],
        )];

        let view = ReconciledView::build(&people);
        assert_eq!(view.get("Alice", "X-Ray Safety").unwrap().completion_date, "10/1/2023");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let people = vec![Person::new(
            "Alice",
            vec![
                entry("X-Ray Safety", Some("06/01/2023"), Some("06/01/2024")),
                entry("X-Ray Safety", Some("6/1/2023"), Some("12/01/2024")),
            ],
        )];

        let view = ReconciledView::build(&people);
        let record = view.get("Alice", "X-Ray Safety").unwrap();
        assert_eq!(record.completion_date, "06/01/2023");
        assert_eq!(record.expires.as_deref(), Some("06/01/2024"));
    }

    #[test]
    fn test_invalid_timestamp_skipped() {
        let people = vec![Person::new(
            "Alice",
            vec![
                entry("X-Ray Safety", Some("01/01/2023"), None),
                entry("X-Ray Safety", Some("13/45/2024"), None),
                entry("Laboratory Safety Training", Some("13/45/2024"), None),
            ],
        )];

        let view = ReconciledView::build(&people);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get("Alice", "X-Ray Safety").unwrap().completion_date, "01/01/2023");
        assert!(view.get("Alice", "Laboratory Safety Training").is_none());
        assert_eq!(view.stats().invalid_timestamp, 2);
    }

    #[test]
    fn test_missing_timestamp_skipped() {
        let people = vec![Person::new(
            "Alice",
            vec![
                entry("X-Ray Safety", None, Some("01/01/2030")),
                entry("X-Ray Safety", Some("02/02/2022"), None),
                entry("Laboratory Safety Training", None, None),
            ],
        )];

        let view = ReconciledView::build(&people);
        assert_eq!(view.len(), 1);
        let record = view.get("Alice", "X-Ray Safety").unwrap();
        assert_eq!(record.completion_date, "02/02/2022");
        assert!(record.never_expires());
        assert_eq!(view.stats().missing_timestamp, 2);
    }

    #[test]
    fn test_pairs_are_per_person() {
        let people = vec![
            Person::new("Alice", vec![entry("X-Ray Safety", Some("01/01/2023"), None)]),
            Person::new("Bob", vec![entry("X-Ray Safety", Some("02/01/2023"), None)]),
        ];

        let view = ReconciledView::build(&people);
        assert_eq!(view.len(), 2);
        assert_eq!(view.get("Bob", "X-Ray Safety").unwrap().completed_on, ymd(2023, 2, 1));
    }

    #[test]
    fn test_iteration_keeps_first_insertion_order() {
        let people = vec![
            Person::new(
                "Carol",
                vec![
                    entry("Laboratory Safety Training", Some("01/01/2023"), None),
                    entry("X-Ray Safety", Some("01/01/2023"), None),
                ],
            ),
            Person::new("Alice", vec![entry("X-Ray Safety", Some("01/01/2023"), None)]),
            // Replacement must not move Carol's lab record to the back
            Person::new(
                "Carol",
                vec![entry("Laboratory Safety Training", Some("05/05/2023"), None)],
            ),
        ];

        let view = ReconciledView::build(&people);
        let order: Vec<(&str, &str)> = view
            .iter()
            .map(|r| (r.person.as_str(), r.training.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Carol", "Laboratory Safety Training"),
                ("Carol", "X-Ray Safety"),
                ("Alice", "X-Ray Safety"),
            ]
        );
        assert_eq!(
            view.get("Carol", "Laboratory Safety Training").unwrap().completion_date,
            "05/05/2023"
        );
    }

    #[test]
    fn test_stats_account_for_every_entry() {
        let people = vec![Person::new(
            "Alice",
            vec![
                entry("X-Ray Safety", Some("01/01/2023"), None),
                entry("X-Ray Safety", Some("06/01/2023"), None),
                entry("X-Ray Safety", Some("03/01/2023"), None),
                entry("X-Ray Safety", None, None),
                entry("X-Ray Safety", Some("not a date"), None),
                entry("Laboratory Safety Training", Some("01/01/2023"), None),
            ],
        )];

        let stats = ReconciledView::build(&people).stats();
        assert_eq!(
            stats,
            ReconcileStats {
                entries_seen: 6,
                missing_timestamp: 1,
                invalid_timestamp: 1,
                superseded: 2,
                records: 2,
            }
        );
        assert_eq!(stats.skipped() + stats.superseded + stats.records, stats.entries_seen);
    }

    #[test]
    fn test_empty_roster() {
        let view = ReconciledView::build(&[]);
        assert!(view.is_empty());
        assert_eq!(view.stats(), ReconcileStats::default());
    }
}
