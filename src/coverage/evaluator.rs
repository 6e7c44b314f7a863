use super::decision::{CoverageMatch, CoverageVerdict};
use super::matchers::{normalize, Match};
use std::fmt;
use std::str::FromStr;

/// A parsed action pattern such as `Microsoft.Compute/*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPattern {
    raw: String,
    normalized: String,
    matcher: Match,
}

impl ActionPattern {
    pub fn parse(pattern: &str) -> Self {
        let normalized = normalize(pattern);
        let matcher = Match::from_pattern(&normalized);
        Self {
            raw: pattern.to_string(),
            normalized,
            matcher,
        }
    }

    /// The pattern as it was supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true when this pattern covers `required`, ignoring case.
    pub fn covers(&self, required: &str) -> bool {
        self.matcher.matches(&normalize(required))
    }

    fn covers_normalized(&self, required: &str) -> bool {
        self.matcher.matches(required)
    }
}

impl FromStr for ActionPattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ActionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Case-insensitive, order-preserving set of parsed patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<ActionPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Adds a pattern unless an equal one (ignoring case) is already present.
    /// Blank patterns are ignored.
    pub fn insert(&mut self, pattern: &str) -> bool {
        let parsed = ActionPattern::parse(pattern);
        if parsed.normalized.is_empty()
            || self
                .patterns
                .iter()
                .any(|existing| existing.normalized == parsed.normalized)
        {
            return false;
        }
        self.patterns.push(parsed);
        true
    }

    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.insert(pattern.as_ref());
        }
    }

    pub fn union(&mut self, other: &PatternSet) {
        for pattern in &other.patterns {
            self.insert(&pattern.raw);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionPattern> {
        self.patterns.iter()
    }

    fn first_covering(&self, required: &str) -> Option<&ActionPattern> {
        self.patterns
            .iter()
            .find(|pattern| pattern.covers_normalized(required))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PatternSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PatternSet::new();
        set.extend(iter);
        set
    }
}

/// Returns true when `pattern` covers the concrete action `required`.
pub fn covers(pattern: &str, required: &str) -> bool {
    ActionPattern::parse(pattern).covers(required)
}

/// Evaluates one required permission. Denies take precedence over grants.
pub fn evaluate(required: &str, granted: &PatternSet, denied: &PatternSet) -> CoverageMatch {
    let required = normalize(required);
    if required.is_empty() {
        return CoverageMatch::new(CoverageVerdict::Denied);
    }
    let Some(grant) = granted.first_covering(&required) else {
        return CoverageMatch::new(CoverageVerdict::Denied);
    };
    if let Some(deny) = denied.first_covering(&required) {
        return CoverageMatch::with_pattern(CoverageVerdict::Denied, deny.as_str());
    }
    CoverageMatch::with_pattern(CoverageVerdict::Granted, grant.as_str())
}
