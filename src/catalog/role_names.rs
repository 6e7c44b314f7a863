use log::{debug, warn};
use std::collections::BTreeMap;

use super::source::PermissionSource;

/// Role names unioned case-insensitively; the first spelling seen is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleNames {
    names: BTreeMap<String, String>,
}

impl RoleNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let key = name.to_lowercase();
        if self.names.contains_key(&key) {
            return false;
        }
        self.names.insert(key, name.to_string());
        true
    }

    pub fn union(&mut self, other: &RoleNames) {
        for name in other.iter() {
            self.insert(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates in case-insensitive name order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.values().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for RoleNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names = RoleNames::new();
        for name in iter {
            names.insert(name.as_ref());
        }
        names
    }
}

/// Role names assigned to `principal_id` at `scope`. A failed lookup yields
/// an empty set.
pub fn assigned_role_names<S>(source: &S, principal_id: &str, scope: &str) -> RoleNames
where
    S: PermissionSource + ?Sized,
{
    match source.role_assignment_names(principal_id, scope) {
        Ok(names) => {
            debug!("{} role assignment(s) at {scope}", names.len());
            names.into_iter().collect()
        }
        Err(err) => {
            warn!("role assignment lookup failed at {scope}: {err}");
            RoleNames::new()
        }
    }
}

/// Union of the role names assigned at every scope.
pub fn aggregate_role_names<S, I, T>(source: &S, principal_id: &str, scopes: I) -> RoleNames
where
    S: PermissionSource + ?Sized,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut names = RoleNames::new();
    for scope in scopes {
        names.union(&assigned_role_names(source, principal_id, scope.as_ref()));
    }
    names
}
