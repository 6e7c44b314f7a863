use std::time::Duration;

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub(crate) const DEFAULT_MANAGEMENT_URL: &str = "https://management.azure.com";
pub(crate) const DEFAULT_GRAPH_URL: &str = "https://graph.microsoft.com/v1.0";

pub(crate) const AUTHORIZATION_API_VERSION: &str = "2022-04-01";
pub(crate) const RESOURCES_API_VERSION: &str = "2021-04-01";
pub(crate) const POLICY_INSIGHTS_API_VERSION: &str = "2019-10-01";

/// Upper bound on `nextLink` pages followed for one collection.
pub(crate) const MAX_LIST_PAGES: usize = 100;
