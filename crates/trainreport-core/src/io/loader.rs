use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::LoadError;
use crate::models::Person;

/// Read the roster: a JSON array of people with their completions
pub fn load_people(path: &Path) -> Result<Vec<Person>, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let people: Vec<Person> = serde_json::from_str(&contents).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), count = people.len(), "Loaded roster");
    Ok(people)
}
