use crate::e2e::helpers;

use helpers::{engine_stub::StubEngine, TestContext};
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ok_for_health_check(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();

    response.assert_status(StatusCode::OK);

    // Health endpoint returns plain text
    let body = String::from_utf8(response.body_bytes.clone()).unwrap();
    assert_eq!(body, "OK");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_ready_status_with_engine_device(ctx: &TestContext) {
    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ready"));
    assert_eq!(body.get("engine").and_then(|v| v.as_str()), Some("available"));
    assert_eq!(body.get("device").and_then(|v| v.as_str()), Some("cuda:0"));
}

#[tokio::test]
async fn it_should_report_not_ready_when_engine_is_down() {
    let ctx = TestContext::with_engine(StubEngine::new().unhealthy()).await;

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let body = response.body.as_ref().unwrap();
    assert_eq!(
        body.get("status").and_then(|v| v.as_str()),
        Some("not_ready")
    );
    assert_eq!(
        body.get("engine").and_then(|v| v.as_str()),
        Some("unavailable")
    );

    // Liveness does not depend on the engine
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_status(StatusCode::OK);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_request_id_in_health_responses(ctx: &TestContext) {
    let response = ctx.client.get("/health").await.unwrap();
    response.assert_header_exists("x-request-id");

    let response = ctx.client.get("/health/ready").await.unwrap();
    response.assert_header_exists("x-request-id");

    let request_id = response.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_404_for_unknown_route(ctx: &TestContext) {
    let response = ctx.client.get("/nonexistent").await.unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}
