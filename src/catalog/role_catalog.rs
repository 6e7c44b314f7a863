use log::{debug, warn};

use super::role_names::{aggregate_role_names, RoleNames};
use super::source::{PermissionSource, RolePermissions};
use crate::coverage::{evaluate, CoverageMatch, CoverageVerdict};

/// Effective grants and denies for one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct RoleCatalog {
    roles: RoleNames,
    permissions: RolePermissions,
    unresolved: Vec<String>,
}

impl RoleCatalog {
    /// Resolves each role's patterns. Roles whose lookup fails contribute
    /// nothing and are recorded as unresolved.
    pub fn resolve<S>(source: &S, roles: RoleNames) -> Self
    where
        S: PermissionSource + ?Sized,
    {
        let mut permissions = RolePermissions::default();
        let mut unresolved = Vec::new();
        for role in roles.iter() {
            match source.role_permissions(role) {
                Ok(role_permissions) => {
                    debug!(
                        "role {role}: {} grant(s), {} deny(s)",
                        role_permissions.granted.len(),
                        role_permissions.denied.len()
                    );
                    permissions.union(&role_permissions);
                }
                Err(err) => {
                    warn!("skipping role {role}: {err}");
                    unresolved.push(role.to_string());
                }
            }
        }
        Self {
            roles,
            permissions,
            unresolved,
        }
    }

    /// Aggregates role assignments across `scopes` and resolves them.
    pub fn collect<S, I, T>(source: &S, principal_id: &str, scopes: I) -> Self
    where
        S: PermissionSource + ?Sized,
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let roles = aggregate_role_names(source, principal_id, scopes);
        Self::resolve(source, roles)
    }

    /// A catalog backed by one pre-resolved permissions document.
    pub fn from_permissions(permissions: RolePermissions) -> Self {
        Self {
            roles: RoleNames::new(),
            permissions,
            unresolved: Vec::new(),
        }
    }

    pub fn roles(&self) -> &RoleNames {
        &self.roles
    }

    pub fn permissions(&self) -> &RolePermissions {
        &self.permissions
    }

    pub fn unresolved_roles(&self) -> &[String] {
        &self.unresolved
    }

    /// Evaluates `required` against the aggregate. A permission that is not
    /// granted becomes `Unknown` when some role could not be resolved, unless
    /// a deny already matched it.
    pub fn evaluate(&self, required: &str) -> CoverageMatch {
        let mut result = evaluate(
            required,
            &self.permissions.granted,
            &self.permissions.denied,
        );
        if result.verdict == CoverageVerdict::Denied
            && result.matched_pattern.is_none()
            && !self.unresolved.is_empty()
        {
            result.verdict = CoverageVerdict::Unknown;
        }
        result
    }
}
