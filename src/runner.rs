use crate::catalog::{PermissionSource, RoleCatalog};
use crate::compliance::{poll_non_compliant_with, ComplianceSource, PollOptions};
use crate::context::{Approval, CheckKind, RunContext};
use crate::providers::{ensure_registered, ProviderRegistry};
use crate::report::{
    default_granular_permissions, default_providers, default_wildcard_categories,
    granular_report, wildcard_report, PreflightReport, Requirement, Section,
};
use log::{info, warn};
use std::collections::BTreeSet;
use std::thread;
use std::time::Duration;

const NO_SCOPE: &str = "no subscription or scope given";

/// What a run checks and with which tables.
#[derive(Debug, Clone)]
pub struct PreflightPlan {
    pub checks: BTreeSet<CheckKind>,
    pub wildcard: Vec<Requirement>,
    pub granular: Vec<Requirement>,
    pub providers: Vec<String>,
    pub approval: Approval,
    pub poll: PollOptions,
}

impl Default for PreflightPlan {
    fn default() -> Self {
        Self {
            checks: CheckKind::DEFAULT.into_iter().collect(),
            wildcard: default_wildcard_categories(),
            granular: default_granular_permissions(),
            providers: default_providers(),
            approval: Approval::ReportOnly,
            poll: PollOptions::default(),
        }
    }
}

impl PreflightPlan {
    /// Replaces the selected checks; an empty selection keeps the defaults.
    pub fn with_checks<I: IntoIterator<Item = CheckKind>>(mut self, checks: I) -> Self {
        let selected: BTreeSet<CheckKind> = checks.into_iter().collect();
        if !selected.is_empty() {
            self.checks = selected;
        }
        self
    }
}

pub fn run_preflight<S>(source: &S, ctx: &RunContext, plan: &PreflightPlan) -> PreflightReport
where
    S: PermissionSource + ProviderRegistry + ComplianceSource + ?Sized,
{
    run_preflight_with(source, ctx, plan, thread::sleep)
}

/// Same as [`run_preflight`] with an injectable sleep for compliance polling.
pub fn run_preflight_with<S, F>(
    source: &S,
    ctx: &RunContext,
    plan: &PreflightPlan,
    mut sleep: F,
) -> PreflightReport
where
    S: PermissionSource + ProviderRegistry + ComplianceSource + ?Sized,
    F: FnMut(Duration),
{
    let mut sections = Vec::new();
    for check in &plan.checks {
        info!("running {check} check for {}", ctx.principal.label());
        match check {
            CheckKind::Wildcard => sections.push(wildcard_section(source, ctx, plan)),
            CheckKind::Granular => {
                let scopes = ctx.permission_scopes();
                if scopes.is_empty() {
                    sections.push(skipped(CheckKind::Granular, NO_SCOPE));
                }
                for scope in scopes {
                    let report = granular_report(source, &scope, &plan.granular);
                    sections.push(Section::Granular { scope, report });
                }
            }
            CheckKind::Providers => {
                let providers = match ctx.subscription_id.as_deref() {
                    Some(subscription) => {
                        ensure_registered(source, subscription, &plan.providers, plan.approval)
                    }
                    None => {
                        warn!("provider check needs a subscription");
                        Vec::new()
                    }
                };
                sections.push(Section::Providers {
                    subscription_id: ctx.subscription_id.clone(),
                    providers,
                });
            }
            CheckKind::Compliance => match ctx.permission_scopes().into_iter().next() {
                Some(scope) => {
                    let outcome = poll_non_compliant_with(source, &scope, plan.poll, &mut sleep);
                    sections.push(Section::Compliance { scope, outcome });
                }
                None => sections.push(skipped(CheckKind::Compliance, NO_SCOPE)),
            },
        }
    }
    PreflightReport {
        principal_id: ctx.principal.id.clone(),
        principal_name: ctx.principal.label().to_string(),
        sections,
    }
}

fn wildcard_section<S>(source: &S, ctx: &RunContext, plan: &PreflightPlan) -> Section
where
    S: PermissionSource + ?Sized,
{
    let scopes = ctx.assignment_scopes();
    let catalog = RoleCatalog::collect(source, &ctx.principal.id, &scopes);
    if catalog.roles().is_empty() {
        warn!(
            "{} has no role assignments at any checked scope",
            ctx.principal.label()
        );
    }
    Section::Wildcard {
        verdicts: wildcard_report(&catalog, &plan.wildcard),
        roles: catalog.roles().iter().map(str::to_string).collect(),
        unresolved_roles: catalog.unresolved_roles().to_vec(),
        scopes,
    }
}

fn skipped(check: CheckKind, reason: &str) -> Section {
    warn!("{check} check skipped: {reason}");
    Section::Skipped {
        skipped: check,
        reason: reason.to_string(),
    }
}
