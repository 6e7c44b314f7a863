use super::AzureClient;
use crate::client_defaults::AUTHORIZATION_API_VERSION;
use crate::error::Error;
use crate::models::{Permission, RoleAssignment, RoleDefinition};

const PROVIDER: &str = "Microsoft.Authorization";

impl AzureClient {
    /// Lists role assignments for a principal at `scope`, including ones
    /// inherited from parent scopes and group memberships.
    pub fn list_role_assignments(
        &self,
        scope: &str,
        principal_id: &str,
    ) -> Result<Vec<RoleAssignment>, Error> {
        let url = self.management_url(scope, &["providers", PROVIDER, "roleAssignments"])?;
        let query = [
            ("api-version", AUTHORIZATION_API_VERSION.to_string()),
            ("$filter", format!("assignedTo('{principal_id}')")),
        ];
        self.list_all(url, &query)
    }

    /// Retrieves a role definition by its full resource id.
    pub fn get_role_definition(&self, role_definition_id: &str) -> Result<RoleDefinition, Error> {
        let url = self.management_url(role_definition_id, &[])?;
        let resp = self
            .management_get(url)
            .query(&[("api-version", AUTHORIZATION_API_VERSION)])
            .send()?;
        self.expect_ok_json(resp)
    }

    /// Finds role definitions visible at `scope` by display name.
    pub fn find_role_definitions(
        &self,
        scope: &str,
        role_name: &str,
    ) -> Result<Vec<RoleDefinition>, Error> {
        let url = self.management_url(scope, &["providers", PROVIDER, "roleDefinitions"])?;
        let escaped = role_name.replace('\'', "''");
        let query = [
            ("api-version", AUTHORIZATION_API_VERSION.to_string()),
            ("$filter", format!("roleName eq '{escaped}'")),
        ];
        self.list_all(url, &query)
    }

    /// Lists the caller's effective permissions at `scope`.
    pub fn list_permissions(&self, scope: &str) -> Result<Vec<Permission>, Error> {
        let url = self.management_url(scope, &["providers", PROVIDER, "permissions"])?;
        let query = [("api-version", AUTHORIZATION_API_VERSION.to_string())];
        self.list_all(url, &query)
    }
}
