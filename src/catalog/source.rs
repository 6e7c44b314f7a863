use crate::coverage::PatternSet;
use crate::error::Error;
use crate::models::{Permission, Principal};

/// Granted and denied action patterns contributed by one role, or by an
/// effective permissions document.
#[derive(Debug, Clone, Default)]
pub struct RolePermissions {
    pub granted: PatternSet,
    pub denied: PatternSet,
}

impl RolePermissions {
    pub fn new<G, D, S>(granted: G, denied: D) -> Self
    where
        G: IntoIterator<Item = S>,
        D: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            granted: granted.into_iter().collect(),
            denied: denied.into_iter().collect(),
        }
    }

    /// Folds ARM permission blocks; `notActions` become denies.
    pub fn from_permissions<'a, I>(permissions: I) -> Self
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        let mut merged = Self::default();
        for permission in permissions {
            merged.granted.extend(&permission.actions);
            merged.denied.extend(&permission.not_actions);
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty() && self.denied.is_empty()
    }

    pub fn union(&mut self, other: &RolePermissions) {
        self.granted.union(&other.granted);
        self.denied.union(&other.denied);
    }
}

/// Resolves the principal the run is evaluated for.
pub trait IdentitySource {
    fn signed_in_principal(&self) -> Result<Principal, Error>;
}

/// Read-only authorization lookups the catalog is built from.
///
/// Implementations may fail freely; callers in this crate fold failures
/// into empty contributions.
pub trait PermissionSource {
    /// Names of the roles assigned to `principal_id` at `scope`.
    fn role_assignment_names(&self, principal_id: &str, scope: &str)
        -> Result<Vec<String>, Error>;

    /// Granted and denied patterns of the named role.
    fn role_permissions(&self, role_name: &str) -> Result<RolePermissions, Error>;

    /// Effective permissions of the caller at `scope`.
    fn effective_permissions(&self, scope: &str) -> Result<RolePermissions, Error>;
}
