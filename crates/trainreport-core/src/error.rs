use std::path::PathBuf;

use thiserror::Error;

/// Why a roster date string could not be turned into a calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("date is empty")]
    Empty,

    #[error("'{0}' is not in month/day/year form")]
    Malformed(String),

    #[error("'{0}' is not a real calendar day")]
    OutOfRange(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("fiscal-year report needs exactly {expected} trainings, got {found}")]
    TrainingCount { expected: usize, found: usize },

    #[error("training name in fiscal-year list is empty")]
    EmptyTrainingName,

    #[error("training '{0}' is listed more than once")]
    DuplicateTraining(String),

    #[error("expiry horizon must not be negative (got {0} days)")]
    NegativeHorizon(i64),

    #[error("invalid check date '{value}': expected YYYY-MM-DD")]
    CheckDate { value: String },

    #[error("could not read config file {path}: {message}")]
    File { path: PathBuf, message: String },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("fiscal year {0} is outside the supported calendar range")]
    FiscalYear(i32),

    #[error("expiry horizon of {0} days overflows the calendar")]
    Horizon(i64),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("input file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read input file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file {path} is not a valid roster")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report for {path}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write report {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal outcomes of a whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{} report(s) could not be written: {}", .0.len(), failed_names(.0))]
    Write(Vec<(String, WriteError)>),
}

fn failed_names(failures: &[(String, WriteError)]) -> String {
    failures
        .iter()
        .map(|(name, e)| format!("{} ({})", name, e))
        .collect::<Vec<_>>()
        .join(", ")
}
