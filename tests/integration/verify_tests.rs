//! Link verification against mock servers

use kb_linkcheck::config::UserAgentConfig;
use kb_linkcheck::crawler::{
    build_http_client, interpret, verify_link, ProbeFailure, ProbeOutcome,
};
use reqwest::Client;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

fn test_client() -> Client {
    build_http_client(&UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    })
    .expect("Failed to build client")
}

async fn label_for(url: &str) -> String {
    interpret(verify_link(&test_client(), url, PROBE_TIMEOUT).await).to_string()
}

#[tokio::test]
async fn test_head_success() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(label_for(&format!("{}/doc", server.uri())).await, "OK");
}

#[tokio::test]
async fn test_access_required_statuses() {
    let server = MockServer::start().await;
    for (route, status) in [("/forbidden", 403), ("/unauthorized", 401), ("/locked", 423)] {
        Mock::given(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;
    }

    for route in ["/forbidden", "/unauthorized", "/locked"] {
        assert_eq!(
            label_for(&format!("{}{}", server.uri(), route)).await,
            "OK - Access Required"
        );
    }
}

#[tokio::test]
async fn test_head_status_is_final() {
    // A HEAD answer of any status is used as is, without a GET retry
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(
        label_for(&format!("{}/gone", server.uri())).await,
        "Broken (404)"
    );
}

#[tokio::test]
async fn test_redirects_are_followed() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", &*format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert_eq!(label_for(&format!("{}/old", server.uri())).await, "OK");
}

#[tokio::test]
async fn test_unfollowable_redirect_status() {
    // 300 without a location cannot be followed, the status itself is final
    let server = MockServer::start().await;
    Mock::given(path("/choices"))
        .respond_with(ResponseTemplate::new(300))
        .mount(&server)
        .await;

    assert_eq!(
        label_for(&format!("{}/choices", server.uri())).await,
        "OK - Redirected"
    );
}

#[tokio::test]
async fn test_head_timeout_falls_back_to_get() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/slow-head"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow-head"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = verify_link(
        &test_client(),
        &format!("{}/slow-head", server.uri()),
        PROBE_TIMEOUT,
    )
    .await;
    assert_eq!(outcome, ProbeOutcome::Status(404));
    assert_eq!(interpret(outcome).to_string(), "Broken (404)");
}

#[tokio::test]
async fn test_both_attempts_time_out() {
    let server = MockServer::start().await;
    Mock::given(path("/stalled"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let outcome = verify_link(
        &test_client(),
        &format!("{}/stalled", server.uri()),
        PROBE_TIMEOUT,
    )
    .await;
    assert_eq!(outcome, ProbeOutcome::Failed(ProbeFailure::Timeout));
    assert_eq!(interpret(outcome).to_string(), "Broken (Timeout)");
}

#[tokio::test]
async fn test_connection_refused_is_client_error() {
    // Nothing listens on port 1
    assert_eq!(
        label_for("http://127.0.0.1:1/doc").await,
        "Broken (Client Error)"
    );
}
