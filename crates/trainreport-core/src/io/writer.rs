use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::WriteError;

/// Indentation used for report files
const REPORT_INDENT: &[u8] = b"    ";

/// Writes reports as pretty-printed JSON files into one directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Creates `output_dir` (and parents) if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| WriteError::CreateDir {
            path: output_dir.clone(),
            source: e,
        })?;
        Ok(Self { output_dir })
    }

    pub fn report_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Serialize `report` to `<output_dir>/<file_name>`, replacing any old file
    pub fn write<T: Serialize>(&self, file_name: &str, report: &T) -> Result<PathBuf, WriteError> {
        let path = self.report_path(file_name);
        let contents = to_report_json(report).map_err(|e| WriteError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, contents).map_err(|e| WriteError::Write {
            path: path.clone(),
            source: e,
        })?;
        debug!(path = %path.display(), "Report written");
        Ok(path)
    }
}

fn to_report_json<T: Serialize>(report: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(REPORT_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;
    Ok(buf)
}
