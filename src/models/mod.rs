mod authorization;
mod common;
mod identity;
mod policy_insights;
mod provider;

pub use authorization::{
    Permission, RoleAssignment, RoleAssignmentProperties, RoleDefinition,
    RoleDefinitionProperties,
};
pub use common::ListResponse;
pub use identity::Principal;
pub use policy_insights::{PolicySummary, SummarizeResults};
pub use provider::{Provider, REGISTERED_STATE};
