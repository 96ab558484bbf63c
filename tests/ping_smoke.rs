//! End-to-end: a live ping service, the HTTP client and reported assertions

use std::sync::Arc;

use pingstep::api::create_router;
use pingstep::client::{ClientError, PingClient};
use pingstep::report::matcher::{MatcherExt, contains_string, is};
use pingstep::report::{InMemoryResultsWriter, ReportLifecycle, STEP_DESCRIPTION, Stage, Status};
use pingstep_testkit::TestServer;

fn lifecycle() -> (Arc<ReportLifecycle>, Arc<InMemoryResultsWriter>) {
    let writer = Arc::new(InMemoryResultsWriter::new());
    (Arc::new(ReportLifecycle::new(writer.clone())), writer)
}

#[tokio::test]
async fn ping_assertion_recorded_as_passed_step() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let (lifecycle, writer) = lifecycle();
    let client = PingClient::new(&server.base_url()).unwrap();

    lifecycle
        .test_case_async("ping returns pong", async {
            let body = client.ping().await?;
            lifecycle.check_that("API /ping returned correct data", &body, &is("pong"))?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
        })
        .await
        .unwrap();

    let result = writer.last_result().unwrap();
    assert_eq!(result.status, Some(Status::Passed));
    assert_eq!(result.steps.len(), 1);

    let step = &result.steps[0];
    assert_eq!(step.name, "API /ping returned correct data");
    assert_eq!(step.status, Some(Status::Passed));
    assert_eq!(step.stage, Stage::Finished);
    assert_eq!(step.description.as_deref(), Some(STEP_DESCRIPTION));

    let html = writer.attachment_text(&step.attachments[0].source).unwrap();
    assert!(html.contains("<pre>pong</pre>"));
    assert!(html.contains("No any mismatches found"));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn unreasoned_assertion_named_after_matcher() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let (lifecycle, writer) = lifecycle();
    let client = PingClient::new(&server.base_url()).unwrap();

    let matcher = contains_string("po").and(contains_string("ng"));
    lifecycle
        .test_case_async("combined matcher", async {
            let body = client.ping().await?;
            lifecycle.check_that("", &body, &matcher)?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
        })
        .await
        .unwrap();

    let result = writer.last_result().unwrap();
    assert_eq!(
        result.steps[0].name,
        "Assert that: (a string containing \"po\" and a string containing \"ng\")"
    );
}

#[tokio::test]
async fn failed_assertion_fails_step_and_test_case() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let (lifecycle, writer) = lifecycle();
    let client = PingClient::new(&server.base_url()).unwrap();

    let outcome = lifecycle
        .test_case_async("expects ping", async {
            let body = client.ping().await?;
            lifecycle.check_that("body is ping", &body, &is("ping"))?;
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(())
        })
        .await;
    assert!(outcome.is_err());

    let result = writer.last_result().unwrap();
    assert_eq!(result.status, Some(Status::Failed));

    let step = result.step("body is ping").unwrap();
    assert_eq!(step.status, Some(Status::Failed));
    let message = step.status_details.as_ref().unwrap().message.as_deref().unwrap();
    assert!(message.contains("but: was \"pong\""));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let client = PingClient::new(&server.base_url()).unwrap();

    let response = client.get("/ping1").await.unwrap();
    assert_eq!(response.status, 404);

    match client.get_text("/ping1").await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_reporter_attaches_request_and_response() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let (lifecycle, writer) = lifecycle();
    let client = PingClient::new(&server.base_url())
        .unwrap()
        .with_reporter(lifecycle.clone());

    lifecycle
        .test_case_async("web reporting", async {
            lifecycle.step_async("[GET] /ping", client.ping()).await
        })
        .await
        .unwrap();

    let result = writer.last_result().unwrap();
    let step = result.step("[GET] /ping").unwrap();
    assert_eq!(step.status, Some(Status::Passed));

    let names: Vec<_> = step.attachments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Request", "Response"]);

    let request = writer.attachment_text(&step.attachments[0].source).unwrap();
    assert_eq!(request, format!("GET {}/ping", server.base_url()));

    let response = writer.attachment_text(&step.attachments[1].source).unwrap();
    assert!(response.starts_with("HTTP 200"));
    assert!(response.ends_with("pong"));
}

#[tokio::test]
async fn no_test_case_means_no_report() {
    let server = TestServer::spawn(create_router()).await.unwrap();
    let (lifecycle, writer) = lifecycle();
    let client = PingClient::new(&server.base_url())
        .unwrap()
        .with_reporter(lifecycle.clone());

    let body = client.ping().await.unwrap();
    lifecycle
        .check_that("API /ping returned correct data", &body, &is("pong"))
        .unwrap();

    assert!(writer.results().is_empty());
}
