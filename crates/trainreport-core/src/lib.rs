//! Core library for trainreport.
//!
//! Reads a roster of people and their training completions, keeps the most
//! recent valid completion per (person, training) pair, and derives three
//! reports from that reconciled view:
//!
//! - completion counts per training
//! - fiscal-year completions for a configured set of trainings
//! - expired and soon-to-expire trainings per person

pub mod config;
pub mod dates;
pub mod error;
pub mod io;
pub mod models;
pub mod ordered;
pub mod pipeline;
pub mod reconcile;
pub mod reports;

pub use config::{Config, ReportConfig};
pub use error::{ConfigError, DateParseError, LoadError, PipelineError, ReportError, WriteError};
pub use models::{CompletionRecord, Person, RawCompletion};
pub use pipeline::{run, RunSummary};
pub use reconcile::{ReconcileStats, ReconciledView};
pub use reports::{
    build_reports, CompletionCounts, ExpirationReport, ExpirationStatus, FiscalYearCompletions,
    Reports,
};
