use super::AzureClient;
use crate::client_defaults::POLICY_INSIGHTS_API_VERSION;
use crate::error::Error;
use crate::models::{ListResponse, PolicySummary};

impl AzureClient {
    /// Summarizes the latest policy states at `scope`.
    pub fn summarize_policy_states(&self, scope: &str) -> Result<Vec<PolicySummary>, Error> {
        let url = self.management_url(
            scope,
            &[
                "providers",
                "Microsoft.PolicyInsights",
                "policyStates",
                "latest",
                "summarize",
            ],
        )?;
        let resp = self
            .management_post(url)
            .query(&[("api-version", POLICY_INSIGHTS_API_VERSION)])
            .send()?;
        let summary: ListResponse<PolicySummary> = self.expect_ok_json(resp)?;
        Ok(summary.value)
    }
}
