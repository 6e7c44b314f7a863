use colored::Colorize;
use std::fmt::Write;

use super::checks::{GranularReport, RequirementVerdict};
use super::{PreflightReport, Section};
use crate::compliance::PollOutcome;
use crate::coverage::CoverageVerdict;
use crate::error::Error;
use crate::providers::{ProviderOutcome, ProviderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

pub fn render_json(report: &PreflightReport) -> Result<String, Error> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_pretty(report: &PreflightReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({})",
        "Principal:".bold(),
        report.principal_name,
        report.principal_id
    );
    for section in &report.sections {
        out.push('\n');
        render_section(&mut out, section);
    }
    out.push('\n');
    let summary = format!(
        "{} granted, {} denied, {} unknown",
        report.count(CoverageVerdict::Granted),
        report.count(CoverageVerdict::Denied),
        report.count(CoverageVerdict::Unknown)
    );
    if report.passed() {
        let _ = writeln!(out, "{} {summary}", "PASS".green().bold());
    } else {
        let _ = writeln!(out, "{} {summary}", "FAIL".red().bold());
    }
    out
}

fn render_section(out: &mut String, section: &Section) {
    match section {
        Section::Wildcard {
            scopes,
            roles,
            unresolved_roles,
            verdicts,
        } => {
            let _ = writeln!(out, "{}", "Wildcard permission categories".bold());
            let _ = writeln!(out, "  scopes: {}", join_or_none(scopes));
            let _ = writeln!(out, "  roles:  {}", join_or_none(roles));
            if !unresolved_roles.is_empty() {
                let _ = writeln!(
                    out,
                    "  {} could not resolve: {}",
                    "!".yellow(),
                    unresolved_roles.join(", ")
                );
            }
            render_verdicts(out, verdicts);
        }
        Section::Granular { scope, report } => {
            let _ = writeln!(out, "{} {scope}", "Granular permissions at".bold());
            match report {
                GranularReport::Evaluated { verdicts } => render_verdicts(out, verdicts),
                GranularReport::Unavailable { reason } => {
                    let _ = writeln!(
                        out,
                        "  {} could not fetch effective permissions: {reason}",
                        "?".yellow()
                    );
                }
            }
        }
        Section::Providers {
            subscription_id,
            providers,
        } => {
            let _ = writeln!(out, "{}", "Resource providers".bold());
            match subscription_id {
                Some(subscription) => {
                    let _ = writeln!(out, "  subscription: {subscription}");
                    for provider in providers {
                        render_provider(out, provider);
                    }
                }
                None => {
                    let _ = writeln!(out, "  {} no subscription selected", "?".yellow());
                }
            }
        }
        Section::Skipped { skipped, reason } => {
            let _ = writeln!(out, "{} {skipped} check", "Skipped".bold());
            let _ = writeln!(out, "  {} {reason}", "✘".red());
        }
        Section::Compliance { scope, outcome } => {
            let _ = writeln!(out, "{} {scope}", "Policy compliance at".bold());
            match outcome {
                PollOutcome::Found {
                    non_compliant_resources,
                    attempts,
                } => {
                    let _ = writeln!(
                        out,
                        "  {non_compliant_resources} non-compliant resource(s) found after {attempts} attempt(s)"
                    );
                }
                PollOutcome::NotFoundWithinWindow { attempts } => {
                    let _ = writeln!(
                        out,
                        "  nothing found within the timeout window ({attempts} attempt(s))"
                    );
                }
            }
        }
    }
}

fn render_verdicts(out: &mut String, verdicts: &[RequirementVerdict]) {
    for verdict in verdicts {
        let mark = match verdict.verdict {
            CoverageVerdict::Granted => "✔".green(),
            CoverageVerdict::Denied => "✘".red(),
            CoverageVerdict::Unknown => "?".yellow(),
        };
        let mut line = format!("  {mark} {:<24} {}", verdict.label, verdict.verdict);
        if verdict.label != verdict.permission {
            let _ = write!(line, " ({})", verdict.permission);
        }
        if let Some(pattern) = &verdict.matched_pattern {
            let via = if verdict.verdict.is_granted() {
                "via"
            } else {
                "blocked by"
            };
            let _ = write!(line, " {via} {pattern}");
        }
        out.push_str(&line);
        out.push('\n');
    }
}

fn render_provider(out: &mut String, provider: &ProviderStatus) {
    let (mark, note) = match provider.outcome {
        ProviderOutcome::Registered => ("✔".green(), "registered".to_string()),
        ProviderOutcome::Registering => ("…".yellow(), "registration in progress".to_string()),
        ProviderOutcome::RegistrationStarted => {
            ("✔".green(), "registration requested".to_string())
        }
        ProviderOutcome::NeedsRegistration => (
            "✘".red(),
            format!(
                "not registered ({}); rerun with --auto-approve to register",
                provider.state.as_deref().unwrap_or("unknown")
            ),
        ),
        ProviderOutcome::Error => (
            "?".yellow(),
            format!(
                "lookup failed: {}",
                provider.error.as_deref().unwrap_or("unknown error")
            ),
        ),
    };
    let _ = writeln!(out, "  {mark} {:<28} {note}", provider.namespace);
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
