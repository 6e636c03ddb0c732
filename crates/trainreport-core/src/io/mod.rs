//! File boundaries of a run: reading the roster and writing report files.

pub mod loader;
pub mod writer;

pub use loader::load_people;
pub use writer::ReportWriter;
