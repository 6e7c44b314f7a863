mod checks;
mod render;
mod requirements;


pub use checks::{granular_report, wildcard_report, GranularReport, RequirementVerdict};
pub use render::{render_json, render_pretty, OutputFormat};
pub use requirements::{
    default_granular_permissions, default_providers, default_wildcard_categories, Requirement,
};

use crate::compliance::PollOutcome;
use crate::context::CheckKind;
use crate::coverage::CoverageVerdict;
use crate::providers::{ProviderOutcome, ProviderStatus};
use serde::Serialize;

/// Result of a full preflight run.
#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub principal_id: String,
    pub principal_name: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "check", rename_all = "lowercase")]
pub enum Section {
    Wildcard {
        scopes: Vec<String>,
        roles: Vec<String>,
        unresolved_roles: Vec<String>,
        verdicts: Vec<RequirementVerdict>,
    },
    Granular {
        scope: String,
        report: GranularReport,
    },
    Providers {
        subscription_id: Option<String>,
        providers: Vec<ProviderStatus>,
    },
    Compliance {
        scope: String,
        outcome: PollOutcome,
    },
    /// A selected check that could not run.
    Skipped {
        skipped: CheckKind,
        reason: String,
    },
}

impl Section {
    pub fn kind(&self) -> CheckKind {
        match self {
            Section::Wildcard { .. } => CheckKind::Wildcard,
            Section::Granular { .. } => CheckKind::Granular,
            Section::Providers { .. } => CheckKind::Providers,
            Section::Compliance { .. } => CheckKind::Compliance,
            Section::Skipped { skipped, .. } => *skipped,
        }
    }

    /// True when the section reports nothing that blocks onboarding.
    pub fn passed(&self) -> bool {
        match self {
            Section::Wildcard { verdicts, .. } => verdicts.iter().all(|v| v.verdict.is_granted()),
            Section::Granular { report, .. } => match report {
                GranularReport::Evaluated { verdicts } => {
                    verdicts.iter().all(|v| v.verdict.is_granted())
                }
                GranularReport::Unavailable { .. } => false,
            },
            Section::Providers {
                subscription_id,
                providers,
            } => {
                subscription_id.is_some()
                    && providers.iter().all(|p| {
                        matches!(
                            p.outcome,
                            ProviderOutcome::Registered
                                | ProviderOutcome::Registering
                                | ProviderOutcome::RegistrationStarted
                        )
                    })
            }
            // Non-compliance is informational.
            Section::Compliance { .. } => true,
            Section::Skipped { .. } => false,
        }
    }
}

impl PreflightReport {
    pub fn passed(&self) -> bool {
        self.sections.iter().all(Section::passed)
    }

    /// Number of verdicts with the given value across all sections.
    pub fn count(&self, verdict: CoverageVerdict) -> usize {
        self.sections
            .iter()
            .map(|section| match section {
                Section::Wildcard { verdicts, .. } => {
                    verdicts.iter().filter(|v| v.verdict == verdict).count()
                }
                Section::Granular {
                    report: GranularReport::Evaluated { verdicts },
                    ..
                } => verdicts.iter().filter(|v| v.verdict == verdict).count(),
                _ => 0,
            })
            .sum()
    }
}
