//! Command-line driver for the preflight checks.

use clap::{ArgAction, Parser, ValueEnum};
use log::{debug, LevelFilter};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::azure::{AzureClient, AzureSource};
use crate::catalog::IdentitySource;
use crate::config::Config;
use crate::context::{Approval, CheckKind, RunContext};
use crate::error::Error;
use crate::models::Principal;
use crate::report::{render_json, render_pretty, OutputFormat, PreflightReport};
use crate::runner::{run_preflight, PreflightPlan};

/// Validate Azure permissions and resource-provider registration before
/// onboarding a subscription to Cortex Cloud.
///
/// With no `--check-*` flag the wildcard, granular and provider checks run.
#[derive(Parser, Debug)]
#[command(name = "cortex-preflight")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to .cortex-preflight.toml, then the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subscription to check
    #[arg(long, value_name = "ID")]
    pub subscription: Option<String>,

    /// Tenant whose root management group is checked
    #[arg(long, value_name = "ID")]
    pub tenant: Option<String>,

    /// Additional scope to check (repeatable)
    #[arg(long = "scope", value_name = "SCOPE")]
    pub scopes: Vec<String>,

    /// Object id of the principal; skips the Graph `/me` lookup. Effective
    /// permissions are always the caller's, so the granular check is not run.
    #[arg(long, value_name = "OBJECT_ID")]
    pub principal_id: Option<String>,

    /// Check wildcard permission categories against assigned roles
    #[arg(long)]
    pub check_wildcard: bool,

    /// Check concrete permissions against effective permissions
    #[arg(long)]
    pub check_granular: bool,

    /// Check resource provider registration
    #[arg(long)]
    pub check_providers: bool,

    /// Poll policy compliance for non-compliant resources
    #[arg(long)]
    pub check_compliance: bool,

    /// Register missing resource providers without asking
    #[arg(long)]
    pub auto_approve: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = FormatArg::Pretty)]
    pub format: FormatArg,

    /// Bearer token for Azure Resource Manager
    #[arg(long, env = "CORTEX_PREFLIGHT_ARM_TOKEN", hide_env_values = true)]
    pub arm_token: Option<String>,

    /// Bearer token for Microsoft Graph
    #[arg(long, env = "CORTEX_PREFLIGHT_GRAPH_TOKEN", hide_env_values = true)]
    pub graph_token: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pretty,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Pretty => OutputFormat::Pretty,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

impl Cli {
    pub fn selected_checks(&self) -> Vec<CheckKind> {
        [
            (self.check_wildcard, CheckKind::Wildcard),
            (self.check_granular, CheckKind::Granular),
            (self.check_providers, CheckKind::Providers),
            (self.check_compliance, CheckKind::Compliance),
        ]
        .into_iter()
        .filter_map(|(selected, kind)| selected.then_some(kind))
        .collect()
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Command-line values take precedence over the config file.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(subscription) = &self.subscription {
            config.azure.subscription_id = Some(subscription.clone());
        }
        if let Some(tenant) = &self.tenant {
            config.azure.tenant_id = Some(tenant.clone());
        }
        config.azure.scopes.extend(self.scopes.iter().cloned());
    }

    /// Rejects flag combinations that would mix principals in one report.
    pub fn validate(&self) -> Result<(), Error> {
        if self.principal_id.is_some() && self.check_granular {
            return Err(Error::Config(
                "--check-granular reads the caller's effective permissions and cannot be combined with --principal-id"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn plan(&self, config: &Config) -> PreflightPlan {
        let mut plan = PreflightPlan {
            wildcard: config.wildcard_table(),
            granular: config.granular_table(),
            providers: config.providers(),
            approval: Approval::from_flag(self.auto_approve),
            poll: config.poll_options(),
            ..PreflightPlan::default()
        }
        .with_checks(self.selected_checks());
        if self.principal_id.is_some() {
            plan.checks.remove(&CheckKind::Granular);
        }
        plan
    }
}

/// Initialises `env_logger`; `RUST_LOG` overrides the verbosity flag.
pub fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.to_string());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

pub fn build_client(cli: &Cli, config: &Config) -> Result<AzureClient, Error> {
    let mut builder = AzureClient::builder()?;
    if let Some(url) = &config.azure.management_url {
        builder = builder.management_url(url)?;
    }
    if let Some(url) = &config.azure.graph_url {
        builder = builder.graph_url(url)?;
    }
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout.max(Duration::from_secs(1)));
    }
    if let Some(path) = &config.azure.ca_cert_file {
        let pem = fs::read(path)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        builder = builder.add_ca_cert_pem(&pem)?;
    }
    if let Some(token) = &cli.arm_token {
        builder = builder.bearer_token(token.clone());
    }
    if let Some(token) = &cli.graph_token {
        builder = builder.graph_bearer_token(token.clone());
    }
    builder.build()
}

pub fn context(principal: Principal, config: &Config) -> RunContext {
    let mut ctx = RunContext::new(principal);
    ctx.tenant_id = config.azure.tenant_id.clone();
    ctx.subscription_id = config.azure.subscription_id.clone();
    ctx.extra_scopes = config.azure.scopes.clone();
    ctx
}

/// Runs the selected checks and prints the report. Returns whether every
/// check passed; errors are fatal for the run.
pub fn run(cli: &Cli) -> Result<bool, Error> {
    cli.validate()?;
    let mut config = Config::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    debug!("effective config: {config:?}");

    let client = build_client(cli, &config)?;
    let principal = match &cli.principal_id {
        Some(id) => Principal::new(id.clone(), String::new()),
        None => client.signed_in_principal()?,
    };
    let ctx = context(principal, &config);
    let plan = cli.plan(&config);

    let source = AzureSource::new(&client, ctx.definition_scope());
    let report = run_preflight(&source, &ctx, &plan);
    print_report(&report, cli.format.into())?;
    Ok(report.passed())
}

fn print_report(report: &PreflightReport, format: OutputFormat) -> Result<(), Error> {
    match format {
        OutputFormat::Pretty => print!("{}", render_pretty(report)),
        OutputFormat::Json => println!("{}", render_json(report)?),
    }
    Ok(())
}
