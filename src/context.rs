use crate::models::Principal;
use serde::Serialize;
use std::fmt;

/// One kind of check a preflight run can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Category table evaluated against the aggregated role catalog.
    Wildcard,
    /// Concrete permissions evaluated against the effective permissions document.
    Granular,
    /// Resource provider registration.
    Providers,
    /// Policy compliance polling.
    Compliance,
}

impl CheckKind {
    /// Checks run when the caller selects none.
    pub const DEFAULT: [CheckKind; 3] =
        [CheckKind::Wildcard, CheckKind::Granular, CheckKind::Providers];
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CheckKind::Wildcard => "wildcard",
            CheckKind::Granular => "granular",
            CheckKind::Providers => "providers",
            CheckKind::Compliance => "compliance",
        };
        f.write_str(label)
    }
}

/// Whether a check may perform mutating calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Approval {
    /// Report what would change, change nothing.
    #[default]
    ReportOnly,
    /// Perform the mutation without asking.
    AutoApprove,
}

impl Approval {
    pub fn from_flag(auto_approve: bool) -> Self {
        if auto_approve {
            Approval::AutoApprove
        } else {
            Approval::ReportOnly
        }
    }
}

/// Everything a check needs to know about the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub principal: Principal,
    pub tenant_id: Option<String>,
    pub subscription_id: Option<String>,
    pub extra_scopes: Vec<String>,
}

impl RunContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal,
            tenant_id: None,
            subscription_id: None,
            extra_scopes: Vec::new(),
        }
    }

    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn subscription(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.extra_scopes.push(scope.into());
        self
    }

    pub fn root_management_group_scope(&self) -> Option<String> {
        self.tenant_id
            .as_deref()
            .map(|tenant| format!("/providers/Microsoft.Management/managementGroups/{tenant}"))
    }

    pub fn subscription_scope(&self) -> Option<String> {
        self.subscription_id
            .as_deref()
            .map(|subscription| format!("/subscriptions/{subscription}"))
    }

    /// Scopes whose role assignments are unioned: root management group,
    /// subscription, then explicit scopes.
    pub fn assignment_scopes(&self) -> Vec<String> {
        let mut scopes = Vec::new();
        scopes.extend(self.root_management_group_scope());
        scopes.extend(self.subscription_scope());
        scopes.extend(self.extra_scopes.iter().cloned());
        dedupe(scopes)
    }

    /// Scopes whose effective permissions are queried: subscription, then
    /// explicit scopes.
    pub fn permission_scopes(&self) -> Vec<String> {
        let mut scopes = Vec::new();
        scopes.extend(self.subscription_scope());
        scopes.extend(self.extra_scopes.iter().cloned());
        dedupe(scopes)
    }

    /// Scope role definitions are looked up at.
    pub fn definition_scope(&self) -> String {
        self.subscription_scope()
            .or_else(|| self.root_management_group_scope())
            .or_else(|| self.extra_scopes.first().cloned())
            .unwrap_or_else(|| "/".to_string())
    }
}

fn dedupe(scopes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(scopes.len());
    for scope in scopes {
        let trimmed = scope.trim_end_matches('/');
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(trimmed)) {
            out.push(trimmed.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> RunContext {
        RunContext::new(Principal::new("oid-1", "Alex"))
    }

    #[test]
    fn assignment_scopes_order_root_subscription_extra() {
        let ctx = context()
            .tenant("tenant-1")
            .subscription("sub-1")
            .scope("/subscriptions/sub-1/resourceGroups/rg");
        assert_eq!(
            ctx.assignment_scopes(),
            vec![
                "/providers/Microsoft.Management/managementGroups/tenant-1".to_string(),
                "/subscriptions/sub-1".to_string(),
                "/subscriptions/sub-1/resourceGroups/rg".to_string(),
            ]
        );
        assert_eq!(ctx.permission_scopes().len(), 2);
        assert_eq!(ctx.definition_scope(), "/subscriptions/sub-1");
    }

    #[test]
    fn duplicate_scopes_collapse() {
        let ctx = context()
            .subscription("sub-1")
            .scope("/subscriptions/SUB-1/");
        assert_eq!(ctx.assignment_scopes(), vec!["/subscriptions/sub-1".to_string()]);
    }

    #[test]
    fn definition_scope_falls_back_to_root_group() {
        let ctx = context().tenant("tenant-1");
        assert_eq!(
            ctx.definition_scope(),
            "/providers/Microsoft.Management/managementGroups/tenant-1"
        );
        assert!(ctx.permission_scopes().is_empty());
    }
}
