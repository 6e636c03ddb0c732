//! One complete run: load the roster, reconcile, build and write the reports.

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::Config;
use crate::error::{PipelineError, WriteError};
use crate::io::{load_people, ReportWriter};
use crate::reconcile::{ReconcileStats, ReconciledView};
use crate::reports::{
    build_reports, Reports, COMPLETION_COUNTS_FILE, EXPIRATION_FILE, FISCAL_YEAR_FILE,
};

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub stats: ReconcileStats,
    pub trainings_counted: usize,
    pub fiscal_year_trainings: usize,
    pub people_with_expirations: usize,
    pub expiration_skipped: usize,
    pub written: Vec<PathBuf>,
}

/// Run the whole batch described by `config`.
///
/// Input and configuration problems abort before anything is written. Each
/// report is then written independently; if any write fails the others are
/// still attempted and the run fails with every failure listed.
pub fn run(config: &Config) -> Result<RunSummary, PipelineError> {
    config.validate()?;

    let people = load_people(&config.input)?;
    info!(path = %config.input.display(), people = people.len(), "Roster loaded");

    let view = ReconciledView::build(&people);
    let stats = view.stats();
    info!(
        entries = stats.entries_seen,
        records = stats.records,
        missing_timestamp = stats.missing_timestamp,
        invalid_timestamp = stats.invalid_timestamp,
        "Completions reconciled"
    );

    let reports = build_reports(&view, &config.reports)?;
    let written = write_reports(&config.output_dir, &reports)?;

    Ok(RunSummary {
        stats,
        trainings_counted: reports.counts.0.len(),
        fiscal_year_trainings: reports.fiscal_year.0.len(),
        people_with_expirations: reports.expiration.people.len(),
        expiration_skipped: reports.expiration.skipped,
        written,
    })
}

/// Write all three reports into `output_dir`
pub fn write_reports(output_dir: &Path, reports: &Reports) -> Result<Vec<PathBuf>, PipelineError> {
    let writer = ReportWriter::new(output_dir)
        .map_err(|e| PipelineError::Write(vec![(output_dir.display().to_string(), e)]))?;

    let mut written = Vec::new();
    let mut failures = Vec::new();

    let mut attempt = |name: &str, result: Result<PathBuf, WriteError>| match result {
        Ok(path) => {
            info!(path = %path.display(), "Report written");
            written.push(path);
        }
        Err(e) => {
            error!(report = name, error = %e, "Failed to write report");
            failures.push((name.to_string(), e));
        }
    };

    attempt(COMPLETION_COUNTS_FILE, writer.write(COMPLETION_COUNTS_FILE, &reports.counts));
    attempt(FISCAL_YEAR_FILE, writer.write(FISCAL_YEAR_FILE, &reports.fiscal_year));
    attempt(EXPIRATION_FILE, writer.write(EXPIRATION_FILE, &reports.expiration));

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(PipelineError::Write(failures))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::reports::ExpirationStatus;

    const ROSTER: &str = r#"[
        {"name": "Alice", "completions": [
            {"name": "X-Ray Safety", "timestamp": "01/01/2023", "expires": "01/01/2024"},
            {"name": "X-Ray Safety", "timestamp": "06/01/2023", "expires": "06/01/2024"}
        ]},
        {"name": "Bob", "completions": [
            {"name": "Laboratory Safety Training", "timestamp": "07/01/2023", "expires": "10/15/2023"},
            {"name": "X-Ray Safety", "timestamp": "13/45/2024", "expires": "09/01/2023"},
            {"name": "Electrical Safety for Labs", "expires": "09/01/2023"},
            {"name": "Fire Safety", "timestamp": "08/01/2023", "expires": null}
        ]}
    ]"#;

    fn config_in(dir: &Path) -> Config {
        let input = dir.join("trainings.txt");
        std::fs::write(&input, ROSTER).unwrap();
        Config {
            input,
            output_dir: dir.join("output"),
            ..Config::default()
        }
    }

    fn read_json(path: PathBuf) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_alice_scenario() {
        let people: Vec<crate::models::Person> = serde_json::from_str(ROSTER).unwrap();
        let view = ReconciledView::build(&people[..1]);
        let reports = build_reports(&view, &Config::default().reports).unwrap();

        assert_eq!(view.get("Alice", "X-Ray Safety").unwrap().completion_date, "06/01/2023");
        assert_eq!(reports.counts.get("X-Ray Safety"), 1);
        // Fiscal year 2024 starts 07/01/2023, after Alice's latest completion
        assert!(reports.fiscal_year.people("X-Ray Safety").is_empty());
        assert!(reports.expiration.entries("Alice").is_empty());
        assert!(reports.expiration.people.is_empty());
    }

    #[test]
    fn test_run_writes_all_reports() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let summary = run(&config).unwrap();
        assert_eq!(summary.written.len(), 3);
        assert_eq!(summary.stats.missing_timestamp, 1);
        assert_eq!(summary.stats.invalid_timestamp, 1);
        assert_eq!(summary.stats.records, 3);

        let out = dir.path().join("output");
        assert_eq!(
            read_json(out.join(COMPLETION_COUNTS_FILE)),
            serde_json::json!({
                "X-Ray Safety": 1,
                "Laboratory Safety Training": 1,
                "Fire Safety": 1
            })
        );
        assert_eq!(
            read_json(out.join(FISCAL_YEAR_FILE)),
            serde_json::json!({
                "Laboratory Safety Training": ["Bob"]
            })
        );
        assert_eq!(
            read_json(out.join(EXPIRATION_FILE)),
            serde_json::json!({
                "Bob": [{
                    "training_name": "Laboratory Safety Training",
                    "completion_date": "07/01/2023",
                    "expires": "10/15/2023",
                    "status": ExpirationStatus::ExpiresSoon.to_string()
                }]
            })
        );
    }

    #[test]
    fn test_report_files_keep_roster_order() {
        let dir = tempfile::tempdir().unwrap();
        run(&config_in(dir.path())).unwrap();

        let text = std::fs::read_to_string(dir.path().join("output").join(COMPLETION_COUNTS_FILE)).unwrap();
        let xray = text.find("X-Ray Safety").unwrap();
        let lab = text.find("Laboratory Safety Training").unwrap();
        let fire = text.find("Fire Safety").unwrap();
        assert!(xray < lab && lab < fire);
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            input: dir.path().join("absent.txt"),
            output_dir: dir.path().join("output"),
            ..Config::default()
        };

        let result = run(&config);
        assert!(matches!(result, Err(PipelineError::Load(LoadError::NotFound(_)))));
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_invalid_config_rejected_before_loading() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.reports.fiscal_trainings.truncate(1);

        assert!(matches!(run(&config), Err(PipelineError::Config(_))));
        assert!(!dir.path().join("output").exists());
    }

    #[test]
    fn test_one_failed_write_does_not_block_others() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(config.output_dir.join(FISCAL_YEAR_FILE)).unwrap();

        match run(&config) {
            Err(PipelineError::Write(failures)) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].0, FISCAL_YEAR_FILE);
            }
            other => panic!("expected write failure, got {:?}", other),
        }
        assert!(config.output_dir.join(COMPLETION_COUNTS_FILE).is_file());
        assert!(config.output_dir.join(EXPIRATION_FILE).is_file());
    }
}
