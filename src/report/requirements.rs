use serde::{Deserialize, Serialize};

/// A labelled permission to verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub label: String,
    pub permission: String,
}

impl Requirement {
    pub fn new(label: impl Into<String>, permission: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            permission: permission.into(),
        }
    }

    /// A requirement labelled by its own permission string.
    pub fn bare(permission: impl Into<String>) -> Self {
        let permission = permission.into();
        Self {
            label: permission.clone(),
            permission,
        }
    }
}

const WILDCARD_CATEGORIES: &[(&str, &str)] = &[
    ("Compute", "Microsoft.Compute/*"),
    ("Network", "Microsoft.Network/*"),
    ("Storage", "Microsoft.Storage/*"),
    ("Key Vault", "Microsoft.KeyVault/*"),
    ("App Service", "Microsoft.Web/*"),
    ("Kubernetes", "Microsoft.ContainerService/*"),
    ("Container Registry", "Microsoft.ContainerRegistry/*"),
    ("SQL", "Microsoft.Sql/*"),
    ("Monitoring", "Microsoft.Insights/*"),
    ("Security Center", "Microsoft.Security/*"),
    ("Event Hub", "Microsoft.EventHub/*"),
    ("Managed Identity", "Microsoft.ManagedIdentity/*"),
    ("Resources", "Microsoft.Resources/*"),
    ("Policy", "Microsoft.Authorization/policyAssignments/*"),
    ("IAM", "Microsoft.Authorization/roleAssignments/*"),
];

const GRANULAR_PERMISSIONS: &[&str] = &[
    "Microsoft.Authorization/roleAssignments/read",
    "Microsoft.Authorization/roleAssignments/write",
    "Microsoft.Authorization/roleDefinitions/write",
    "Microsoft.Authorization/policyAssignments/write",
    "Microsoft.Authorization/policyDefinitions/write",
    "Microsoft.ManagedIdentity/userAssignedIdentities/write",
    "Microsoft.ManagedIdentity/userAssignedIdentities/assign/action",
    "Microsoft.Resources/deployments/write",
    "Microsoft.Resources/subscriptions/resourceGroups/write",
    "Microsoft.PolicyInsights/remediations/write",
    "Microsoft.Insights/diagnosticSettings/write",
    "Microsoft.EventHub/namespaces/write",
    "Microsoft.EventHub/namespaces/authorizationRules/listKeys/action",
    "Microsoft.Storage/storageAccounts/write",
];

const PROVIDERS: &[&str] = &[
    "Microsoft.Insights",
    "Microsoft.PolicyInsights",
    "Microsoft.ManagedIdentity",
    "Microsoft.Security",
    "Microsoft.EventHub",
    "Microsoft.Storage",
];

pub fn default_wildcard_categories() -> Vec<Requirement> {
    WILDCARD_CATEGORIES
        .iter()
        .map(|(label, permission)| Requirement::new(*label, *permission))
        .collect()
}

pub fn default_granular_permissions() -> Vec<Requirement> {
    GRANULAR_PERMISSIONS
        .iter()
        .map(|permission| Requirement::bare(*permission))
        .collect()
}

pub fn default_providers() -> Vec<String> {
    PROVIDERS.iter().map(|ns| ns.to_string()).collect()
}
