use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoverageVerdict {
    Granted,
    Denied,
    /// Not granted, and at least one assigned role could not be resolved.
    Unknown,
}

impl CoverageVerdict {
    pub fn is_granted(self) -> bool {
        matches!(self, CoverageVerdict::Granted)
    }
}

impl fmt::Display for CoverageVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CoverageVerdict::Granted => "GRANTED",
            CoverageVerdict::Denied => "DENIED",
            CoverageVerdict::Unknown => "UNKNOWN",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageMatch {
    pub verdict: CoverageVerdict,
    /// Grant pattern that allowed the permission, or the deny pattern that
    /// overrode it. `None` when nothing matched.
    pub matched_pattern: Option<String>,
}

impl CoverageMatch {
    pub(crate) fn new(verdict: CoverageVerdict) -> Self {
        Self {
            verdict,
            matched_pattern: None,
        }
    }

    pub(crate) fn with_pattern(verdict: CoverageVerdict, pattern: &str) -> Self {
        Self {
            verdict,
            matched_pattern: Some(pattern.to_string()),
        }
    }
}
