use crate::error::Error;
use log::{debug, info, warn};
use serde::Serialize;
use std::thread;
use std::time::Duration;

pub(crate) const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub(crate) const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Source of the latest policy compliance summary.
pub trait ComplianceSource {
    fn non_compliant_resources(&self, scope: &str) -> Result<u64, Error>;
}

/// Fixed-count, fixed-interval polling; no backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PollOutcome {
    Found {
        non_compliant_resources: u64,
        attempts: u32,
    },
    NotFoundWithinWindow {
        attempts: u32,
    },
}

/// Polls until a positive non-compliant count is seen or attempts run out.
pub fn poll_non_compliant<S>(source: &S, scope: &str, options: PollOptions) -> PollOutcome
where
    S: ComplianceSource + ?Sized,
{
    poll_non_compliant_with(source, scope, options, thread::sleep)
}

/// Same as [`poll_non_compliant`] with an injectable sleep.
pub fn poll_non_compliant_with<S, F>(
    source: &S,
    scope: &str,
    options: PollOptions,
    mut sleep: F,
) -> PollOutcome
where
    S: ComplianceSource + ?Sized,
    F: FnMut(Duration),
{
    for attempt in 1..=options.max_attempts {
        match source.non_compliant_resources(scope) {
            Ok(count) if count > 0 => {
                info!("{count} non-compliant resource(s) at {scope} after {attempt} attempt(s)");
                return PollOutcome::Found {
                    non_compliant_resources: count,
                    attempts: attempt,
                };
            }
            Ok(_) => debug!("attempt {attempt}: no non-compliant resources at {scope} yet"),
            Err(err) => warn!("attempt {attempt}: compliance summary failed at {scope}: {err}"),
        }
        if attempt < options.max_attempts {
            sleep(options.interval);
        }
    }
    PollOutcome::NotFoundWithinWindow {
        attempts: options.max_attempts,
    }
}
