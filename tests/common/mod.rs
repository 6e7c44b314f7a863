#![allow(dead_code)]

use cortex_preflight::{
    ComplianceSource, Error, PermissionSource, ProviderRegistry, RolePermissions,
};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory stand-in for the Azure lookups.
#[derive(Default)]
pub struct FakeAzure {
    pub assignments: HashMap<String, Vec<String>>,
    pub roles: HashMap<String, RolePermissions>,
    pub effective: HashMap<String, RolePermissions>,
    pub providers: RefCell<HashMap<String, String>>,
    pub compliance: RefCell<Vec<u64>>,
    pub registered: RefCell<Vec<String>>,
}

impl FakeAzure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(mut self, scope: &str, roles: &[&str]) -> Self {
        self.assignments.insert(
            scope.to_string(),
            roles.iter().map(|role| role.to_string()).collect(),
        );
        self
    }

    pub fn role(mut self, name: &str, granted: &[&str], denied: &[&str]) -> Self {
        self.roles.insert(
            name.to_string(),
            RolePermissions::new(granted.iter(), denied.iter()),
        );
        self
    }

    pub fn effective(mut self, scope: &str, granted: &[&str], denied: &[&str]) -> Self {
        self.effective.insert(
            scope.to_string(),
            RolePermissions::new(granted.iter(), denied.iter()),
        );
        self
    }

    pub fn provider(self, namespace: &str, state: &str) -> Self {
        self.providers
            .borrow_mut()
            .insert(namespace.to_string(), state.to_string());
        self
    }

    /// Counts returned by successive compliance polls; exhausted means 0.
    pub fn compliance_counts(self, counts: &[u64]) -> Self {
        let mut counts = counts.to_vec();
        counts.reverse();
        *self.compliance.borrow_mut() = counts;
        self
    }
}

fn unavailable(what: &str) -> Error {
    Error::Config(format!("{what} unavailable"))
}

impl PermissionSource for FakeAzure {
    fn role_assignment_names(
        &self,
        _principal_id: &str,
        scope: &str,
    ) -> Result<Vec<String>, Error> {
        self.assignments
            .get(scope)
            .cloned()
            .ok_or_else(|| unavailable(scope))
    }

    fn role_permissions(&self, role_name: &str) -> Result<RolePermissions, Error> {
        self.roles
            .get(role_name)
            .cloned()
            .ok_or_else(|| Error::RoleNotFound(role_name.to_string()))
    }

    fn effective_permissions(&self, scope: &str) -> Result<RolePermissions, Error> {
        self.effective
            .get(scope)
            .cloned()
            .ok_or_else(|| unavailable(scope))
    }
}

impl ProviderRegistry for FakeAzure {
    fn provider_state(&self, _subscription_id: &str, namespace: &str) -> Result<String, Error> {
        self.providers
            .borrow()
            .get(namespace)
            .cloned()
            .ok_or_else(|| unavailable(namespace))
    }

    fn register_provider(
        &self,
        _subscription_id: &str,
        namespace: &str,
    ) -> Result<String, Error> {
        self.registered.borrow_mut().push(namespace.to_string());
        self.providers
            .borrow_mut()
            .insert(namespace.to_string(), "Registering".to_string());
        Ok("Registering".to_string())
    }
}

impl ComplianceSource for FakeAzure {
    fn non_compliant_resources(&self, _scope: &str) -> Result<u64, Error> {
        Ok(self.compliance.borrow_mut().pop().unwrap_or(0))
    }
}
