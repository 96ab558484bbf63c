//! Check runner
//!
//! Runs checks one after another, each as its own report test case.
//! Report context is per thread, so checks run on the calling task rather
//! than being spawned.

use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::traits::{Check, CheckContext, CheckResult};
use crate::report::{ReportStatus, Status};

/// Label marking test cases produced by the check runner
pub const SUITE_LABEL: &str = "smoke";

/// Run `checks` in order and collect their results
pub async fn run_checks(ctx: &CheckContext, checks: &[Arc<dyn Check>]) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(checks.len());

    for check in checks {
        results.push(run_check(ctx, check.as_ref()).await);
    }

    results
}

/// Run one check as a report test case
pub async fn run_check(ctx: &CheckContext, check: &dyn Check) -> CheckResult {
    let name = check.name();
    let start = Instant::now();
    info!(check = %name, "Starting check");

    let outcome = ctx
        .lifecycle
        .test_case_async(name, async {
            ctx.lifecycle.add_label("suite", SUITE_LABEL);
            ctx.lifecycle.add_label("check", name);
            check.run(ctx).await
        })
        .await;

    let duration = start.elapsed();
    match outcome {
        Ok(()) => {
            info!(
                check = %name,
                duration_ms = duration.as_millis(),
                "Check PASSED"
            );
            CheckResult::new(name, Status::Passed, duration)
        }
        Err(e) => {
            let status = e.report_status();
            error!(
                check = %name,
                %status,
                duration_ms = duration.as_millis(),
                error = %e,
                "Check FAILED"
            );
            CheckResult::new(name, status, duration).with_message(e.to_string())
        }
    }
}
