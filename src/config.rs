//! Configuration loading.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`CORTEX_PREFLIGHT_*`)
//! 2. An explicit `--config` file, otherwise the first of
//!    `.cortex-preflight.toml` in the working directory or
//!    `{config_dir}/cortex-preflight/config.toml`
//! 3. Compiled defaults
//!
//! The CLI applies its own flags on top of the loaded config.

use crate::compliance::PollOptions;
use crate::error::Error;
use crate::report::{
    default_granular_permissions, default_providers, default_wildcard_categories, Requirement,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "CORTEX_PREFLIGHT";
const PROJECT_CONFIG_NAME: &str = ".cortex-preflight.toml";
const CONFIG_DIR_NAME: &str = "cortex-preflight";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub azure: AzureConfig,
    pub checks: ChecksConfig,
    pub compliance: ComplianceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AzureConfig {
    pub management_url: Option<String>,
    pub graph_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// PEM bundle of extra root certificates.
    pub ca_cert_file: Option<PathBuf>,
    pub tenant_id: Option<String>,
    pub subscription_id: Option<String>,
    pub scopes: Vec<String>,
}

/// Replacement check tables. `None` keeps the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChecksConfig {
    pub wildcard: Option<Vec<Requirement>>,
    pub granular: Option<Vec<String>>,
    pub providers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComplianceConfig {
    pub max_attempts: Option<u32>,
    pub interval_secs: Option<u64>,
}

impl Config {
    /// Loads `explicit` if given, otherwise the first config file found.
    /// Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> Result<Self, Error> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::discover() {
                Some(path) => Self::load_from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        toml::from_str(&content).map_err(|err| Error::Config(format!("{}: {err}", path.display())))
    }

    fn discover() -> Option<PathBuf> {
        let project = env::current_dir().ok().map(|dir| dir.join(PROJECT_CONFIG_NAME));
        let user = dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
        [project, user].into_iter().flatten().find(|path| path.is_file())
    }

    /// Applies `CORTEX_PREFLIGHT_*` values returned by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}_{name}")).filter(|value| !value.trim().is_empty())
        };
        if let Some(subscription) = var("SUBSCRIPTION_ID") {
            self.azure.subscription_id = Some(subscription);
        }
        if let Some(tenant) = var("TENANT_ID") {
            self.azure.tenant_id = Some(tenant);
        }
        if let Some(url) = var("MANAGEMENT_URL") {
            self.azure.management_url = Some(url);
        }
        if let Some(url) = var("GRAPH_URL") {
            self.azure.graph_url = Some(url);
        }
        if let Some(timeout) = var("TIMEOUT_SECS") {
            let secs = timeout.trim().parse::<u64>().map_err(|err| {
                Error::Config(format!("{ENV_PREFIX}_TIMEOUT_SECS={timeout}: {err}"))
            })?;
            self.azure.timeout_secs = Some(secs);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.azure.timeout_secs.map(Duration::from_secs)
    }

    pub fn wildcard_table(&self) -> Vec<Requirement> {
        self.checks
            .wildcard
            .clone()
            .unwrap_or_else(default_wildcard_categories)
    }

    pub fn granular_table(&self) -> Vec<Requirement> {
        match &self.checks.granular {
            Some(permissions) => permissions.iter().map(Requirement::bare).collect(),
            None => default_granular_permissions(),
        }
    }

    pub fn providers(&self) -> Vec<String> {
        self.checks
            .providers
            .clone()
            .unwrap_or_else(default_providers)
    }

    pub fn poll_options(&self) -> PollOptions {
        let defaults = PollOptions::default();
        PollOptions {
            max_attempts: self.compliance.max_attempts.unwrap_or(defaults.max_attempts),
            interval: self
                .compliance
                .interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.interval),
        }
    }
}
