use super::AzureClient;
use crate::catalog::{PermissionSource, RolePermissions};
use crate::compliance::ComplianceSource;
use crate::error::Error;
use crate::providers::ProviderRegistry;
use log::{debug, warn};
use std::collections::HashMap;

/// Adapts [`AzureClient`] to the lookup traits the checks consume.
pub struct AzureSource<'a> {
    client: &'a AzureClient,
    definition_scope: String,
}

impl<'a> AzureSource<'a> {
    /// `definition_scope` is where role definitions are looked up by name.
    pub fn new(client: &'a AzureClient, definition_scope: impl Into<String>) -> Self {
        Self {
            client,
            definition_scope: definition_scope.into(),
        }
    }
}

impl PermissionSource for AzureSource<'_> {
    fn role_assignment_names(
        &self,
        principal_id: &str,
        scope: &str,
    ) -> Result<Vec<String>, Error> {
        let assignments = self.client.list_role_assignments(scope, principal_id)?;
        let mut names_by_id: HashMap<String, String> = HashMap::new();
        let mut names = Vec::new();
        for assignment in assignments {
            let definition_id = assignment.properties.role_definition_id;
            let name = names_by_id
                .entry(definition_id.to_lowercase())
                .or_insert_with(|| match self.client.get_role_definition(&definition_id) {
                    Ok(definition) => definition.properties.role_name,
                    // Keep the id so the role is reported as unresolved.
                    Err(err) => {
                        warn!("cannot resolve role definition {definition_id}: {err}");
                        definition_id.clone()
                    }
                });
            names.push(name.clone());
        }
        debug!("{} assigned role(s) at {scope}", names.len());
        Ok(names)
    }

    fn role_permissions(&self, role_name: &str) -> Result<RolePermissions, Error> {
        if is_definition_id(role_name) {
            let definition = self.client.get_role_definition(role_name)?;
            return Ok(RolePermissions::from_permissions(
                definition.properties.permissions.iter(),
            ));
        }
        let definitions = self
            .client
            .find_role_definitions(&self.definition_scope, role_name)?;
        if definitions.is_empty() {
            return Err(Error::RoleNotFound(role_name.to_string()));
        }
        Ok(RolePermissions::from_permissions(
            definitions
                .iter()
                .flat_map(|definition| definition.properties.permissions.iter()),
        ))
    }

    fn effective_permissions(&self, scope: &str) -> Result<RolePermissions, Error> {
        let permissions = self.client.list_permissions(scope)?;
        Ok(RolePermissions::from_permissions(permissions.iter()))
    }
}

impl ProviderRegistry for AzureSource<'_> {
    fn provider_state(&self, subscription_id: &str, namespace: &str) -> Result<String, Error> {
        Ok(self
            .client
            .get_provider(subscription_id, namespace)?
            .registration_state)
    }

    fn register_provider(
        &self,
        subscription_id: &str,
        namespace: &str,
    ) -> Result<String, Error> {
        Ok(self
            .client
            .register_provider(subscription_id, namespace)?
            .registration_state)
    }
}

impl ComplianceSource for AzureSource<'_> {
    fn non_compliant_resources(&self, scope: &str) -> Result<u64, Error> {
        Ok(self
            .client
            .summarize_policy_states(scope)?
            .iter()
            .map(|summary| summary.results.non_compliant_resources)
            .sum())
    }
}

/// Role definition ids look like
/// `/subscriptions/{id}/providers/Microsoft.Authorization/roleDefinitions/{guid}`.
fn is_definition_id(role: &str) -> bool {
    role.starts_with('/')
        && role
            .to_ascii_lowercase()
            .contains("/providers/microsoft.authorization/roledefinitions/")
}
