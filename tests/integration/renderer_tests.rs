//! HTTP rendering session tests

use kb_linkcheck::render::{ContentRoot, HttpRenderer, RenderError, RenderSession};
use reqwest::Client;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_navigate_and_query() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/kb",
        r#"<html><body>
            <article class="kb-article-content">
                <a href="https://example.com/a">A</a>
                <a href="https://example.com/b">B</a>
            </article>
        </body></html>"#
            .to_string(),
    )
    .await;

    let mut renderer = HttpRenderer::new(Client::new());
    let navigation = renderer
        .navigate(&format!("{}/kb", server.uri()), TIMEOUT)
        .await
        .expect("Navigation failed");

    assert_eq!(navigation.status, 200);
    assert_eq!(navigation.final_url, format!("{}/kb", server.uri()));

    renderer
        .wait_for("article.kb-article-content", TIMEOUT)
        .await
        .expect("Content should be present");

    let content = renderer
        .query("article.kb-article-content")
        .await
        .expect("Query failed")
        .expect("Content should match");
    let anchors = content.anchors();
    assert_eq!(anchors.len(), 2);
    assert_eq!(anchors[1].href, "https://example.com/b");

    assert!(renderer
        .snapshot()
        .is_some_and(|html| html.contains("kb-article-content")));
}

#[tokio::test]
async fn test_final_url_after_redirect() {
    let server = MockServer::start().await;
    Mock::given(path("/kb"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", &*format!("{}/login_with_sso.do", server.uri())),
        )
        .mount(&server)
        .await;
    mount_html(&server, "/login_with_sso.do", "<html><body>Sign in</body></html>".to_string()).await;

    let mut renderer = HttpRenderer::new(Client::new());
    let navigation = renderer
        .navigate(&format!("{}/kb", server.uri()), TIMEOUT)
        .await
        .expect("Navigation failed");

    assert_eq!(navigation.status, 200);
    assert!(navigation.final_url.ends_with("/login_with_sso.do"));
}

#[tokio::test]
async fn test_wait_for_missing_content() {
    let server = MockServer::start().await;
    mount_html(&server, "/kb", "<html><body><p>Empty</p></body></html>".to_string()).await;

    let mut renderer = HttpRenderer::new(Client::new());
    renderer
        .navigate(&format!("{}/kb", server.uri()), TIMEOUT)
        .await
        .expect("Navigation failed");

    let result = renderer.wait_for("article.kb-article-content", TIMEOUT).await;
    assert!(matches!(result, Err(RenderError::ContentNotFound { .. })));
    assert!(renderer
        .query("article.kb-article-content")
        .await
        .expect("Query failed")
        .is_none());
}

#[tokio::test]
async fn test_query_all_in_document_order() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/viewer",
        r#"<html><body><div id="viewer"><div class="textLayer">
            <span>first</span><span>second</span><span>third</span>
        </div></div></body></html>"#
            .to_string(),
    )
    .await;

    let mut renderer = HttpRenderer::new(Client::new());
    renderer
        .navigate(&format!("{}/viewer", server.uri()), TIMEOUT)
        .await
        .expect("Navigation failed");

    let spans = renderer
        .query_all("#viewer .textLayer span")
        .await
        .expect("Query failed");
    let texts: Vec<String> = spans.iter().map(|s| s.text()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_frames_include_embedded_documents() {
    let server = MockServer::start().await;
    mount_html(
        &server,
        "/viewer",
        r#"<html><body>
            <a href="https://example.com/shell">Shell</a>
            <iframe src="/frame"></iframe>
            <iframe src="/missing-frame"></iframe>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &server,
        "/frame",
        r#"<html><body><a href="https://example.com/inner">Inner</a></body></html>"#.to_string(),
    )
    .await;

    let mut renderer = HttpRenderer::new(Client::new());
    renderer
        .navigate(&format!("{}/viewer", server.uri()), TIMEOUT)
        .await
        .expect("Navigation failed");

    // The frame answering 404 is skipped
    let frames = renderer.frames().await.expect("Frames failed");
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].anchors()[0].href, "https://example.com/shell");
    assert_eq!(frames[1].anchors()[0].href, "https://example.com/inner");
}

#[tokio::test]
async fn test_failed_navigation_clears_document() {
    let server = MockServer::start().await;
    mount_html(&server, "/kb", "<html><body><a href=\"/x\">X</a></body></html>".to_string()).await;

    let mut renderer = HttpRenderer::new(Client::new());
    renderer
        .navigate(&format!("{}/kb", server.uri()), TIMEOUT)
        .await
        .expect("Navigation failed");

    let result = renderer.navigate("http://127.0.0.1:1/kb", TIMEOUT).await;
    assert!(matches!(result, Err(RenderError::Navigation { .. })));
    assert!(renderer.snapshot().is_none());
    assert!(matches!(
        renderer.query("a").await,
        Err(RenderError::NoDocument)
    ));
}
