#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Match {
    All,
    Equals(String),
    StartsWith(String),
}

impl Match {
    /// Builds a matcher from an already lowercased pattern.
    ///
    /// Only a trailing `*` is a wildcard; any other `*` is literal, so
    /// `*/read` only matches the string `*/read`.
    pub(super) fn from_pattern(pattern: &str) -> Self {
        if pattern == "*" {
            return Match::All;
        }
        match pattern.strip_suffix('*') {
            Some(prefix) => Match::StartsWith(prefix.to_string()),
            None => Match::Equals(pattern.to_string()),
        }
    }

    /// `value` must already be lowercased.
    pub(super) fn matches(&self, value: &str) -> bool {
        match self {
            Match::All => true,
            Match::Equals(expected) => expected == value,
            // Raw string prefix, not path-segment aware.
            Match::StartsWith(prefix) => value.starts_with(prefix.as_str()),
        }
    }
}

pub(super) fn normalize(value: &str) -> String {
    value.to_lowercase()
}
