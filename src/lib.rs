#![forbid(unsafe_code)]

mod azure;
mod build_url;
mod catalog;
pub mod cli;
mod client_defaults;
mod compliance;
pub mod config;
mod context;
mod coverage;
mod error;
mod models;
mod providers;
mod report;
mod runner;

pub use error::{ApiError, Error};

pub use azure::{AzureClient, AzureClientBuilder, AzureSource};

pub use catalog::{
    aggregate_role_names, assigned_role_names, IdentitySource, PermissionSource, RoleCatalog,
    RoleNames, RolePermissions,
};

pub use compliance::{
    poll_non_compliant, poll_non_compliant_with, ComplianceSource, PollOptions, PollOutcome,
};

pub use context::{Approval, CheckKind, RunContext};

pub use coverage::{covers, evaluate, ActionPattern, CoverageMatch, CoverageVerdict, PatternSet};

pub use models::{
    ListResponse, Permission, PolicySummary, Principal, Provider, RoleAssignment,
    RoleAssignmentProperties, RoleDefinition, RoleDefinitionProperties, SummarizeResults,
};

pub use providers::{ensure_registered, ProviderOutcome, ProviderRegistry, ProviderStatus};

pub use report::{
    default_granular_permissions, default_providers, default_wildcard_categories,
    granular_report, render_json, render_pretty, wildcard_report, GranularReport, OutputFormat,
    PreflightReport, Requirement, RequirementVerdict, Section,
};

pub use runner::{run_preflight, run_preflight_with, PreflightPlan};
