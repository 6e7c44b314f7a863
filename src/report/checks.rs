use log::warn;
use serde::Serialize;

use super::requirements::Requirement;
use crate::catalog::{PermissionSource, RoleCatalog};
use crate::coverage::CoverageVerdict;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementVerdict {
    pub label: String,
    pub permission: String,
    pub verdict: CoverageVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GranularReport {
    Evaluated { verdicts: Vec<RequirementVerdict> },
    /// The effective permissions document was empty or could not be fetched.
    Unavailable { reason: String },
}

/// One verdict per table entry, in table order. Duplicate entries are
/// reported once each.
pub fn wildcard_report(catalog: &RoleCatalog, table: &[Requirement]) -> Vec<RequirementVerdict> {
    table
        .iter()
        .map(|requirement| {
            let result = catalog.evaluate(&requirement.permission);
            RequirementVerdict {
                label: requirement.label.clone(),
                permission: requirement.permission.clone(),
                verdict: result.verdict,
                matched_pattern: result.matched_pattern,
            }
        })
        .collect()
}

/// Evaluates `permissions` against the effective permissions at `scope`.
pub fn granular_report<S>(source: &S, scope: &str, permissions: &[Requirement]) -> GranularReport
where
    S: PermissionSource + ?Sized,
{
    let document = match source.effective_permissions(scope) {
        Ok(document) => document,
        Err(err) => {
            warn!("effective permissions lookup failed at {scope}: {err}");
            return GranularReport::Unavailable {
                reason: err.to_string(),
            };
        }
    };
    if document.is_empty() {
        return GranularReport::Unavailable {
            reason: format!("no effective permissions returned for {scope}"),
        };
    }
    let catalog = RoleCatalog::from_permissions(document);
    GranularReport::Evaluated {
        verdicts: wildcard_report(&catalog, permissions),
    }
}
