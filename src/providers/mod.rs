use crate::context::Approval;
use crate::error::Error;
use crate::models::REGISTERED_STATE;
use log::{info, warn};
use serde::Serialize;

const REGISTERING_STATE: &str = "Registering";

/// Resource provider state lookups and the mutating register call.
pub trait ProviderRegistry {
    fn provider_state(&self, subscription_id: &str, namespace: &str) -> Result<String, Error>;
    fn register_provider(&self, subscription_id: &str, namespace: &str)
        -> Result<String, Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderOutcome {
    Registered,
    /// Registration was already in progress when checked.
    Registering,
    /// Registration was requested during this run.
    RegistrationStarted,
    /// Not registered and the run was not allowed to register it.
    NeedsRegistration,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub outcome: ProviderOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProviderStatus {
    fn new(namespace: &str, state: Option<String>, outcome: ProviderOutcome) -> Self {
        Self {
            namespace: namespace.to_string(),
            state,
            outcome,
            error: None,
        }
    }

    fn failed(namespace: &str, state: Option<String>, err: &Error) -> Self {
        Self {
            namespace: namespace.to_string(),
            state,
            outcome: ProviderOutcome::Error,
            error: Some(err.to_string()),
        }
    }
}

/// Checks every namespace and registers the missing ones when `approval`
/// allows it. A failure for one namespace never stops the others.
pub fn ensure_registered<R, I, S>(
    registry: &R,
    subscription_id: &str,
    namespaces: I,
    approval: Approval,
) -> Vec<ProviderStatus>
where
    R: ProviderRegistry + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    namespaces
        .into_iter()
        .map(|namespace| check_one(registry, subscription_id, namespace.as_ref(), approval))
        .collect()
}

fn check_one<R>(
    registry: &R,
    subscription_id: &str,
    namespace: &str,
    approval: Approval,
) -> ProviderStatus
where
    R: ProviderRegistry + ?Sized,
{
    let state = match registry.provider_state(subscription_id, namespace) {
        Ok(state) => state,
        Err(err) => {
            warn!("provider state lookup failed for {namespace}: {err}");
            return ProviderStatus::failed(namespace, None, &err);
        }
    };
    if state.eq_ignore_ascii_case(REGISTERED_STATE) {
        return ProviderStatus::new(namespace, Some(state), ProviderOutcome::Registered);
    }
    if state.eq_ignore_ascii_case(REGISTERING_STATE) {
        return ProviderStatus::new(namespace, Some(state), ProviderOutcome::Registering);
    }
    if approval != Approval::AutoApprove {
        return ProviderStatus::new(namespace, Some(state), ProviderOutcome::NeedsRegistration);
    }
    info!("registering resource provider {namespace} in {subscription_id}");
    match registry.register_provider(subscription_id, namespace) {
        Ok(new_state) => ProviderStatus::new(
            namespace,
            Some(new_state),
            ProviderOutcome::RegistrationStarted,
        ),
        Err(err) => {
            warn!("registering {namespace} failed: {err}");
            ProviderStatus::failed(namespace, Some(state), &err)
        }
    }
}
