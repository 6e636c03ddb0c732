use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub completions: Vec<RawCompletion>,
}

/// One completion entry as it appears in the roster.
///
/// `timestamp` is `None` both when the field is absent and when it is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCompletion {
    #[serde(rename = "name")]
    pub training: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, completions: Vec<RawCompletion>) -> Self {
        Self {
            name: name.into(),
            completions,
        }
    }
}

impl RawCompletion {
    pub fn new(
        training: impl Into<String>,
        timestamp: Option<&str>,
        expires: Option<&str>,
    ) -> Self {
        Self {
            training: training.into(),
            timestamp: timestamp.map(str::to_string),
            expires: expires.map(str::to_string),
        }
    }

    /// Expiration date string, or `None` when the training never expires.
    /// An empty string counts as "never expires".
    pub fn expiration(&self) -> Option<&str> {
        self.expires.as_deref().filter(|s| !s.is_empty())
    }
}
