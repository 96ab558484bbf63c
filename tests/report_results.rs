//! Smoke checks against a live service, written to a results directory

use axum::Router;
use axum::routing::get;
use std::sync::Arc;

use pingstep::api::create_router;
use pingstep::checks::{CHECKS, CheckContext, PING_REASON, SUITE_LABEL, run_checks};
use pingstep::client::PingClient;
use pingstep::report::{FileSystemResultsWriter, ReportLifecycle, Status};
use pingstep_testkit::{ResultsDir, TestServer};

fn context(base_url: &str, results: &ResultsDir) -> CheckContext {
    let writer = Arc::new(FileSystemResultsWriter::new(results.path()));
    let lifecycle = Arc::new(ReportLifecycle::new(writer));
    let client = PingClient::new(base_url)
        .unwrap()
        .with_reporter(lifecycle.clone());
    CheckContext::new(client, lifecycle)
}

#[tokio::test]
async fn all_checks_pass_against_ping_service() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let results = ResultsDir::new().unwrap();
    let ctx = context(&server.base_url(), &results);

    let checks: Vec<_> = CHECKS.values().cloned().collect();
    let summary = run_checks(&ctx, &checks).await;

    assert_eq!(summary.len(), 2);
    assert!(summary.iter().all(|r| r.passed), "{summary:?}");
    assert_eq!(summary[0].check_name, "ping");
    assert_eq!(summary[1].check_name, "unknown-route");

    let written = results.results().unwrap();
    assert_eq!(written.len(), 2);

    let ping = results.result("ping").unwrap().unwrap();
    assert_eq!(ping["status"], "passed");
    assert_eq!(ping["stage"], "finished");

    let labels = ping["labels"].as_array().unwrap();
    assert!(
        labels
            .iter()
            .any(|l| l["name"] == "suite" && l["value"] == SUITE_LABEL)
    );

    let steps = ping["steps"].as_array().unwrap();
    let names: Vec<_> = steps.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["[GET] /ping", PING_REASON]);
    assert!(steps.iter().all(|s| s["status"] == "passed"));

    let assertion = &steps[1];
    assert_eq!(assertion["description"], "Matcher assertion");
    let attachment = &assertion["attachments"][0];
    assert_eq!(attachment["name"], "assertThat");
    assert_eq!(attachment["type"], "text/html");

    let html = results
        .attachment_text(attachment["source"].as_str().unwrap())
        .unwrap();
    assert!(html.contains("is &quot;pong&quot;"));

    // Two HTTP attachments per request plus one per assertion
    assert_eq!(results.attachment_files().unwrap().len(), 6);
}

#[tokio::test]
async fn wrong_reply_fails_ping_check() {
    let router = Router::new().route("/ping", get(|| async { "pang" }));
    let server = TestServer::spawn(router).await.unwrap();
    let results = ResultsDir::new().unwrap();
    let ctx = context(&server.base_url(), &results);

    let checks = vec![CHECKS["ping"].clone()];
    let summary = run_checks(&ctx, &checks).await;

    assert!(!summary[0].passed);
    assert_eq!(summary[0].status, Status::Failed);

    let ping = results.result("ping").unwrap().unwrap();
    assert_eq!(ping["status"], "failed");
    let step = &ping["steps"][1];
    assert_eq!(step["name"], PING_REASON);
    assert_eq!(step["status"], "failed");
    assert!(
        step["statusDetails"]["message"]
            .as_str()
            .unwrap()
            .contains("but: was \"pang\"")
    );
}

#[tokio::test]
async fn unreachable_service_is_broken() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let base_url = server.base_url();
    server.shutdown().await.unwrap();

    let results = ResultsDir::new().unwrap();
    let ctx = context(&base_url, &results);

    let checks = vec![CHECKS["ping"].clone()];
    let summary = run_checks(&ctx, &checks).await;

    assert_eq!(summary[0].status, Status::Broken);

    let ping = results.result("ping").unwrap().unwrap();
    assert_eq!(ping["status"], "broken");
    assert_eq!(ping["steps"][0]["name"], "[GET] /ping");
    assert_eq!(ping["steps"][0]["status"], "broken");
    // No assertion step is reached
    assert_eq!(ping["steps"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn served_ping1_flags_unknown_route_check() {
    let router = create_router().route("/ping1", get(|| async { "pong" }));
    let server = TestServer::spawn(router).await.unwrap();
    let results = ResultsDir::new().unwrap();
    let ctx = context(&server.base_url(), &results);

    let checks = vec![CHECKS["unknown-route"].clone()];
    let summary = run_checks(&ctx, &checks).await;

    assert_eq!(summary[0].status, Status::Failed);
    let result = results.result("unknown-route").unwrap().unwrap();
    assert!(
        result["statusDetails"]["message"]
            .as_str()
            .unwrap()
            .contains("Expected: is 404")
    );
}
