mod common;

use common::FakeAzure;
use cortex_preflight::{
    run_preflight_with, Approval, CheckKind, CoverageVerdict, GranularReport, PollOptions,
    PollOutcome, PreflightPlan, Principal, ProviderOutcome, Requirement, RunContext, Section,
};
use std::time::Duration;

const ROOT: &str = "/providers/Microsoft.Management/managementGroups/tenant-1";
const SUB: &str = "/subscriptions/sub-1";

fn context() -> RunContext {
    RunContext::new(Principal::new("oid-1", "Dana Ops"))
        .tenant("tenant-1")
        .subscription("sub-1")
}

fn plan(checks: &[CheckKind]) -> PreflightPlan {
    PreflightPlan {
        wildcard: vec![
            Requirement::new("Compute", "Microsoft.Compute/*"),
            Requirement::new("IAM", "Microsoft.Authorization/roleAssignments/*"),
        ],
        granular: vec![
            Requirement::bare("Microsoft.Resources/deployments/write"),
            Requirement::bare("Microsoft.Authorization/roleAssignments/write"),
        ],
        providers: vec![
            "Microsoft.Insights".to_string(),
            "Microsoft.PolicyInsights".to_string(),
        ],
        poll: PollOptions {
            max_attempts: 4,
            interval: Duration::from_secs(30),
        },
        ..PreflightPlan::default()
    }
    .with_checks(checks.iter().copied())
}

fn no_sleep(_: Duration) {}

#[test]
fn owner_at_root_and_reader_at_subscription_pass_wildcard_check() {
    let azure = FakeAzure::new()
        .assign(ROOT, &["Owner"])
        .assign(SUB, &["Reader", "Owner"])
        .role("Owner", &["*"], &[])
        .role("Reader", &["*/read"], &[]);
    let report = run_preflight_with(&azure, &context(), &plan(&[CheckKind::Wildcard]), no_sleep);

    assert_eq!(report.sections.len(), 1);
    match &report.sections[0] {
        Section::Wildcard {
            scopes,
            roles,
            verdicts,
            ..
        } => {
            assert_eq!(scopes, &vec![ROOT.to_string(), SUB.to_string()]);
            assert_eq!(roles, &vec!["Owner".to_string(), "Reader".to_string()]);
            assert!(verdicts.iter().all(|v| v.verdict == CoverageVerdict::Granted));
        }
        other => panic!("unexpected section: {other:?}"),
    }
    assert!(report.passed());
}

#[test]
fn reader_only_fails_iam_category() {
    let azure = FakeAzure::new()
        .assign(SUB, &["Reader"])
        .role("Reader", &["*/read"], &[]);
    let report = run_preflight_with(&azure, &context(), &plan(&[CheckKind::Wildcard]), no_sleep);

    let Section::Wildcard { verdicts, .. } = &report.sections[0] else {
        panic!("expected wildcard section");
    };
    assert_eq!(verdicts[0].verdict, CoverageVerdict::Denied);
    assert_eq!(verdicts[1].verdict, CoverageVerdict::Denied);
    assert!(!report.passed());
}

#[test]
fn broken_role_is_reported_without_hiding_other_grants() {
    let azure = FakeAzure::new()
        .assign(SUB, &["Contributor", "Deleted Custom Role"])
        .role(
            "Contributor",
            &["*"],
            &["Microsoft.Authorization/*/Write", "Microsoft.Authorization/*/Delete"],
        );
    let report = run_preflight_with(&azure, &context(), &plan(&[CheckKind::Wildcard]), no_sleep);

    let Section::Wildcard {
        verdicts,
        unresolved_roles,
        ..
    } = &report.sections[0]
    else {
        panic!("expected wildcard section");
    };
    assert_eq!(unresolved_roles, &vec!["Deleted Custom Role".to_string()]);
    assert_eq!(verdicts[0].verdict, CoverageVerdict::Granted);
    // `*` grants the literal pattern and no notAction matches it, so IAM
    // passes too: the evaluator treats wildcards in requirements literally.
    assert_eq!(verdicts[1].verdict, CoverageVerdict::Granted);
}

#[test]
fn granular_check_uses_effective_permissions_and_survives_failures() {
    let azure = FakeAzure::new().effective(
        SUB,
        &["*"],
        &["Microsoft.Authorization/roleAssignments/write"],
    );
    let ctx = context().scope("/subscriptions/sub-1/resourceGroups/missing");
    let report = run_preflight_with(&azure, &ctx, &plan(&[CheckKind::Granular]), no_sleep);

    assert_eq!(report.sections.len(), 2);
    let Section::Granular { scope, report: granular } = &report.sections[0] else {
        panic!("expected granular section");
    };
    assert_eq!(scope, SUB);
    let GranularReport::Evaluated { verdicts } = granular else {
        panic!("expected evaluated report");
    };
    assert_eq!(verdicts[0].verdict, CoverageVerdict::Granted);
    assert_eq!(verdicts[1].verdict, CoverageVerdict::Denied);

    let Section::Granular { report: missing, .. } = &report.sections[1] else {
        panic!("expected granular section");
    };
    assert!(matches!(missing, GranularReport::Unavailable { .. }));
}

#[test]
fn providers_are_registered_only_with_auto_approve() {
    let azure = FakeAzure::new()
        .provider("Microsoft.Insights", "Registered")
        .provider("Microsoft.PolicyInsights", "NotRegistered");

    let report_only = run_preflight_with(
        &azure,
        &context(),
        &plan(&[CheckKind::Providers]),
        no_sleep,
    );
    assert!(!report_only.passed());
    assert!(azure.registered.borrow().is_empty());

    let mut approved = plan(&[CheckKind::Providers]);
    approved.approval = Approval::AutoApprove;
    let report = run_preflight_with(&azure, &context(), &approved, no_sleep);
    let Section::Providers { providers, .. } = &report.sections[0] else {
        panic!("expected providers section");
    };
    assert_eq!(providers[0].outcome, ProviderOutcome::Registered);
    assert_eq!(providers[1].outcome, ProviderOutcome::RegistrationStarted);
    assert_eq!(
        *azure.registered.borrow(),
        vec!["Microsoft.PolicyInsights".to_string()]
    );
    assert!(report.passed());
}

#[test]
fn compliance_polling_stops_early_with_fixed_interval() {
    let azure = FakeAzure::new().compliance_counts(&[0, 0, 6]);
    let mut sleeps = Vec::new();
    let report = run_preflight_with(
        &azure,
        &context(),
        &plan(&[CheckKind::Compliance]),
        |d| sleeps.push(d),
    );
    let Section::Compliance { scope, outcome } = &report.sections[0] else {
        panic!("expected compliance section");
    };
    assert_eq!(scope, SUB);
    assert_eq!(
        *outcome,
        PollOutcome::Found {
            non_compliant_resources: 6,
            attempts: 3
        }
    );
    assert_eq!(sleeps, vec![Duration::from_secs(30); 2]);
    assert!(report.passed());
}

#[test]
fn compliance_polling_reports_empty_window() {
    let azure = FakeAzure::new();
    let report = run_preflight_with(
        &azure,
        &context(),
        &plan(&[CheckKind::Compliance]),
        no_sleep,
    );
    let Section::Compliance { outcome, .. } = &report.sections[0] else {
        panic!("expected compliance section");
    };
    assert_eq!(*outcome, PollOutcome::NotFoundWithinWindow { attempts: 4 });
}

#[test]
fn principal_without_assignments_is_reported_not_fatal() {
    let azure = FakeAzure::new();
    let report = run_preflight_with(&azure, &context(), &plan(&[CheckKind::Wildcard]), no_sleep);
    let Section::Wildcard { roles, verdicts, .. } = &report.sections[0] else {
        panic!("expected wildcard section");
    };
    assert!(roles.is_empty());
    assert!(verdicts.iter().all(|v| v.verdict == CoverageVerdict::Denied));
}

#[test]
fn checks_without_a_scope_are_reported_as_failed() {
    let azure = FakeAzure::new();
    let ctx = RunContext::new(Principal::new("oid-1", "Dana Ops")).tenant("tenant-1");
    let report = run_preflight_with(
        &azure,
        &ctx,
        &plan(&[CheckKind::Granular, CheckKind::Compliance]),
        no_sleep,
    );

    let skipped: Vec<CheckKind> = report
        .sections
        .iter()
        .filter_map(|section| match section {
            Section::Skipped { skipped, reason } => {
                assert!(reason.contains("no subscription"));
                Some(*skipped)
            }
            _ => None,
        })
        .collect();
    assert_eq!(skipped, vec![CheckKind::Granular, CheckKind::Compliance]);
    assert!(!report.passed());
}
