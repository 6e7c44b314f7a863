use serde::{Deserialize, Serialize};

/// One entry of a `policyStates/latest/summarize` response.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicySummary {
    pub results: SummarizeResults,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SummarizeResults {
    pub non_compliant_resources: u64,
    pub non_compliant_policies: u64,
}
