mod role_catalog;
mod role_names;
mod source;

#[cfg(test)]
mod tests;

pub use role_catalog::RoleCatalog;
pub use role_names::{aggregate_role_names, assigned_role_names, RoleNames};
pub use source::{IdentitySource, PermissionSource, RolePermissions};
