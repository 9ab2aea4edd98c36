//! Integration tests for `ArticleFetcher` using wiremock HTTP mocks.

use std::time::Duration;

use cointrend_core::{ContentExtractor, ExtractionError};
use cointrend_scraper::{ArticleFetcher, DEFAULT_USER_AGENT, NO_TITLE};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE_HTML: &str = r#"<!doctype html>
<html>
  <head>
    <title>Bitcoin ETF flows hit record</title>
    <meta property="article:published_time" content="2026-03-01T07:00:00Z">
  </head>
  <body>
    <nav><p>Home | Markets</p></nav>
    <p>Spot bitcoin ETFs recorded their largest single-day inflow since launch on Friday.</p>
    <p>Traders said the move reflected renewed institutional appetite ahead of the halving.</p>
  </body>
</html>"#;

fn fetcher() -> ArticleFetcher {
    ArticleFetcher::new(2, DEFAULT_USER_AGENT).expect("fetcher construction should not fail")
}

#[tokio::test]
async fn extract_returns_title_content_and_date() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news/etf"))
        .and(header("User-Agent", DEFAULT_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARTICLE_HTML))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/news/etf", server.uri());
    let article = fetcher().extract(&url).await.expect("extraction succeeds");

    assert_eq!(article.title, "Bitcoin ETF flows hit record");
    assert!(article.content.starts_with("Spot bitcoin ETFs"));
    assert!(article.content.contains("\n\nTraders said"));
    assert!(!article.content.contains("Home | Markets"));
    assert!(article.published_at.is_some());
}

#[tokio::test]
async fn page_without_title_uses_placeholder() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<p>An untitled page that still has a reasonably long paragraph of text.</p>",
        ))
        .mount(&server)
        .await;

    let article = fetcher()
        .extract(&format!("{}/untitled", server.uri()))
        .await
        .expect("extraction succeeds");
    assert_eq!(article.title, NO_TITLE);
}

#[tokio::test]
async fn page_without_paragraphs_is_no_content() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body><p>tiny</p></body></html>"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/empty", server.uri());
    let err = fetcher().extract(&url).await.unwrap_err();

    match err {
        ExtractionError::NoContent { url: failed } => assert_eq!(failed, url),
        other => panic!("expected NoContent, got {other:?}"),
    }
}

#[tokio::test]
async fn not_found_maps_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher()
        .extract(&format!("{}/gone", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ExtractionError::Status { status: 404, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(ARTICLE_HTML)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let fetcher = ArticleFetcher::new(1, DEFAULT_USER_AGENT).unwrap();
    let err = fetcher
        .extract(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Timeout { .. }), "got {err:?}");
}

#[tokio::test]
async fn unreachable_host_maps_to_request_error() {
    let err = fetcher()
        .extract("http://127.0.0.1:1/article")
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractionError::Request { .. }), "got {err:?}");
}

#[tokio::test]
async fn malformed_url_maps_to_request_error() {
    let err = fetcher().extract("not a url").await.unwrap_err();
    assert!(matches!(err, ExtractionError::Request { .. }), "got {err:?}");
}
