use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzerError;

/// How strictly values are converted when they are stored into a table column.
///
/// - `Legacy`: any conversion is accepted, nullability is not enforced.
/// - `Strict`: only conversions that can never lose information are accepted.
/// - `Ansi`: ANSI store-assignment rules; overflow is a runtime error.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreAssignmentPolicy {
    Legacy,
    Strict,
    /// Default policy for table writes.
    #[default]
    Ansi,
}

/// Session settings read by the output resolver.
///
/// - `case_sensitive` selects the name comparator used for by-name matching.
/// - `store_assignment_policy` controls conversion strictness.
/// - `char_varchar_as_string` disables length checks for `char`/`varchar` columns.
/// - `session_time_zone` is copied onto every synthesized cast.
/// - `ansi_enabled` is the session-wide ANSI flag, used by casts under `Strict`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub case_sensitive: bool,
    pub store_assignment_policy: StoreAssignmentPolicy,
    pub char_varchar_as_string: bool,
    pub session_time_zone: String,
    pub ansi_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            store_assignment_policy: StoreAssignmentPolicy::default(),
            char_varchar_as_string: false,
            session_time_zone: "UTC".to_string(),
            ansi_enabled: false,
        }
    }
}

impl Config {
    pub fn from(store_assignment_policy: StoreAssignmentPolicy, case_sensitive: bool) -> Self {
        Self {
            store_assignment_policy,
            case_sensitive,
            ..Self::default()
        }
    }

    pub fn legacy() -> Self {
        Self::from(StoreAssignmentPolicy::Legacy, false)
    }

    pub fn strict() -> Self {
        Self::from(StoreAssignmentPolicy::Strict, false)
    }

    pub fn ansi() -> Self {
        Self::from(StoreAssignmentPolicy::Ansi, false)
    }

    /// Parse a configuration from a JSON object; missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self, AnalyzerError> {
        serde_json::from_str(text).map_err(|err| AnalyzerError::InvalidConfig(err.to_string()))
    }

    /// Name comparator used for by-name resolution.
    pub fn names_match(&self, left: &str, right: &str) -> bool {
        if self.case_sensitive {
            left == right
        } else {
            left == right || left.to_lowercase() == right.to_lowercase()
        }
    }
}
