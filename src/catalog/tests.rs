use super::*;
use crate::coverage::CoverageVerdict;
use crate::error::{ApiError, Error};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
struct FakeSource {
    assignments: HashMap<String, Vec<String>>,
    roles: HashMap<String, RolePermissions>,
    effective: HashMap<String, RolePermissions>,
    role_lookups: RefCell<Vec<String>>,
}

impl FakeSource {
    fn assign(mut self, scope: &str, roles: &[&str]) -> Self {
        self.assignments.insert(
            scope.to_string(),
            roles.iter().map(|role| role.to_string()).collect(),
        );
        self
    }

    fn role(mut self, name: &str, granted: &[&str], denied: &[&str]) -> Self {
        self.roles.insert(
            name.to_string(),
            RolePermissions::new(granted.iter(), denied.iter()),
        );
        self
    }
}

fn forbidden() -> Error {
    Error::Api(ApiError {
        status: 403,
        code: "AuthorizationFailed".to_string(),
        message: "denied".to_string(),
        target: None,
    })
}

impl PermissionSource for FakeSource {
    fn role_assignment_names(
        &self,
        _principal_id: &str,
        scope: &str,
    ) -> Result<Vec<String>, Error> {
        self.assignments.get(scope).cloned().ok_or_else(forbidden)
    }

    fn role_permissions(&self, role_name: &str) -> Result<RolePermissions, Error> {
        self.role_lookups.borrow_mut().push(role_name.to_string());
        self.roles
            .get(role_name)
            .cloned()
            .ok_or_else(|| Error::RoleNotFound(role_name.to_string()))
    }

    fn effective_permissions(&self, scope: &str) -> Result<RolePermissions, Error> {
        self.effective.get(scope).cloned().ok_or_else(forbidden)
    }
}

const ROOT: &str = "/providers/Microsoft.Management/managementGroups/tenant-1";
const SUB: &str = "/subscriptions/sub-1";

#[test]
fn failed_assignment_lookup_yields_empty_set() {
    let source = FakeSource::default();
    let names = assigned_role_names(&source, "principal", SUB);
    assert!(names.is_empty());
}

#[test]
fn aggregation_unions_and_dedupes_role_names() {
    let source = FakeSource::default()
        .assign(ROOT, &["Owner"])
        .assign(SUB, &["Reader", "Owner"]);
    let names = aggregate_role_names(&source, "principal", [ROOT, SUB]);
    let collected: Vec<&str> = names.iter().collect();
    assert_eq!(collected, vec!["Owner", "Reader"]);
}

#[test]
fn aggregation_dedupes_ignoring_case_and_skips_failed_scopes() {
    let source = FakeSource::default()
        .assign(ROOT, &["Reader"])
        .assign(SUB, &["reader", "Contributor"]);
    let names = aggregate_role_names(&source, "principal", [ROOT, "/bad/scope", SUB]);
    assert_eq!(names.len(), 2);
    assert!(names.contains("READER"));
    assert!(names.contains("Contributor"));
    assert_eq!(names.iter().next(), Some("Contributor"));
}

#[test]
fn contributor_covers_compute_category() {
    let source = FakeSource::default()
        .assign(SUB, &["Contributor"])
        .role("Contributor", &["*"], &[]);
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    let result = catalog.evaluate("Microsoft.Compute/*");
    assert_eq!(result.verdict, CoverageVerdict::Granted);
    assert_eq!(result.matched_pattern.as_deref(), Some("*"));
}

#[test]
fn reader_does_not_cover_role_assignment_category() {
    let source = FakeSource::default()
        .assign(SUB, &["Reader"])
        .role("Reader", &["*/read"], &[]);
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    let result = catalog.evaluate("Microsoft.Authorization/roleAssignments/*");
    assert_eq!(result.verdict, CoverageVerdict::Denied);
}

#[test]
fn failed_role_lookup_does_not_blank_other_roles() {
    let source = FakeSource::default()
        .assign(SUB, &["Broken Role", "Contributor"])
        .role("Contributor", &["*"], &[]);
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    assert_eq!(catalog.unresolved_roles(), &["Broken Role".to_string()]);
    assert_eq!(
        catalog.evaluate("Microsoft.Compute/virtualMachines/read").verdict,
        CoverageVerdict::Granted
    );
    assert_eq!(source.role_lookups.borrow().len(), 2);
}

#[test]
fn unresolved_role_turns_missing_grant_into_unknown() {
    let source = FakeSource::default()
        .assign(SUB, &["Broken Role", "Reader"])
        .role("Reader", &["*/read"], &[]);
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    assert_eq!(
        catalog.evaluate("Microsoft.Storage/storageAccounts/write").verdict,
        CoverageVerdict::Unknown
    );
}

#[test]
fn explicit_deny_stays_denied_with_unresolved_roles() {
    let source = FakeSource::default()
        .assign(SUB, &["Broken Role", "Contributor"])
        .role(
            "Contributor",
            &["*"],
            &["Microsoft.Authorization/roleAssignments/write"],
        );
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    let result = catalog.evaluate("Microsoft.Authorization/roleAssignments/write");
    assert_eq!(result.verdict, CoverageVerdict::Denied);
}

#[test]
fn deny_from_one_role_overrides_grant_from_another() {
    let source = FakeSource::default()
        .assign(SUB, &["Owner", "Locked"])
        .role("Owner", &["*"], &[])
        .role("Locked", &[], &["Microsoft.Authorization/*"]);
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    assert_eq!(
        catalog
            .evaluate("Microsoft.Authorization/roleAssignments/write")
            .verdict,
        CoverageVerdict::Denied
    );
    assert_eq!(
        catalog.evaluate("Microsoft.Compute/virtualMachines/read").verdict,
        CoverageVerdict::Granted
    );
}

#[test]
fn no_assignments_denies_everything() {
    let source = FakeSource::default().assign(SUB, &[]);
    let catalog = RoleCatalog::collect(&source, "principal", [SUB]);
    assert!(catalog.roles().is_empty());
    assert_eq!(
        catalog.evaluate("Microsoft.Compute/*").verdict,
        CoverageVerdict::Denied
    );
}

#[test]
fn effective_permissions_catalog_uses_not_actions_as_denies() {
    let permission = crate::models::Permission {
        actions: vec!["*".to_string()],
        not_actions: vec!["Microsoft.Authorization/*/Delete".to_string()],
        ..Default::default()
    };
    let catalog = RoleCatalog::from_permissions(RolePermissions::from_permissions([&permission]));
    assert_eq!(
        catalog
            .evaluate("Microsoft.Authorization/*/Delete")
            .verdict,
        CoverageVerdict::Denied
    );
    assert_eq!(
        catalog
            .evaluate("Microsoft.Authorization/roleAssignments/write")
            .verdict,
        CoverageVerdict::Granted
    );
}
