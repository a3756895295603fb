//! Homepage fetching and site-file probes against wiremock servers
//!
//! Mock servers speak plain HTTP only, so every HTTPS attempt fails at the
//! TLS handshake and exercises the HTTP fallback.

use seo_audit::config::Config;
use seo_audit::fetcher::{HttpFetcher, PageSource};
use seo_audit::{AuditError, AuditPipeline};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::HOMEPAGE;

/// `127.0.0.1:PORT` for a mock server
fn domain_of(server: &MockServer) -> String {
    let url = url::Url::parse(&server.uri()).expect("Failed to parse mock server URI");
    format!(
        "{}:{}",
        url.host_str().expect("Failed to extract host"),
        url.port().expect("Mock server URI has a port")
    )
}

async fn serve_homepage(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_https_failure_falls_back_to_http() {
    let mock_server = MockServer::start().await;
    serve_homepage(&mock_server, 200, HOMEPAGE).await;

    let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();
    let page = fetcher.fetch(&domain_of(&mock_server)).await.unwrap();

    assert_eq!(page.effective_url.scheme(), "http");
    assert_eq!(page.status, 200);
    assert!(page.html.contains("Handmade oak widgets"));
}

#[tokio::test]
async fn test_fallback_audit_reports_no_https() {
    let mock_server = MockServer::start().await;
    serve_homepage(&mock_server, 200, HOMEPAGE).await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nAllow: /\nSitemap: /sitemap-index.xml")
                .insert_header("content-type", "text/plain"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/sitemap-index.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let pipeline = AuditPipeline::from_config(&Config::default()).unwrap();
    let result = pipeline.run_audit(&domain_of(&mock_server)).await.unwrap();

    assert!(result.url.starts_with("http://"));
    assert!(!result.technical.https);
    assert!(result.technical.mobile_viewport);
    assert!(result.technical.robots_txt_present);
    assert!(result.technical.crawlable);
    // Found through the robots.txt directive after /sitemap.xml 404s
    assert!(result.technical.sitemap_present);
    assert!(result
        .issues
        .iter()
        .any(|i| i.title == "HTTPS not enabled"));
}

#[tokio::test]
async fn test_html_robots_response_counts_as_absent() {
    let mock_server = MockServer::start().await;

    // Single-page apps answer every path with their shell
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(HOMEPAGE)
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let pipeline = AuditPipeline::from_config(&Config::default()).unwrap();
    let result = pipeline.run_audit(&domain_of(&mock_server)).await.unwrap();

    assert!(!result.technical.robots_txt_present);
    assert!(result.technical.crawlable);
}

#[tokio::test]
async fn test_forbidden_is_auth_required() {
    let mock_server = MockServer::start().await;
    serve_homepage(&mock_server, 403, "<h1>Forbidden</h1>").await;

    let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();
    let err = fetcher.fetch(&domain_of(&mock_server)).await.unwrap_err();

    assert!(matches!(err, AuditError::AuthRequired { status: 403, .. }));
    assert!(err.is_terminal());
}

#[tokio::test]
async fn test_challenge_page_is_blocked() {
    let mock_server = MockServer::start().await;
    let challenge = r#"<html><head><title>Just a moment...</title></head>
        <body><script src="/cdn-cgi/challenge-platform/h/g/orchestrate/jsch/v1"></script>
        </body></html>"#;
    serve_homepage(&mock_server, 503, challenge).await;

    let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();
    let err = fetcher.fetch(&domain_of(&mock_server)).await.unwrap_err();

    match err {
        AuditError::Blocked { signals, .. } => {
            assert!(signals.iter().any(|s| s.contains("challenge-platform")));
        }
        other => panic!("Expected Blocked, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_errors_on_both_protocols() {
    let mock_server = MockServer::start().await;
    serve_homepage(&mock_server, 500, "oops").await;

    let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();
    let err = fetcher.fetch(&domain_of(&mock_server)).await.unwrap_err();

    match err {
        AuditError::Fetch { message, .. } => {
            assert!(message.contains("http: HTTP 500"), "message: {}", message);
        }
        other => panic!("Expected Fetch, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_homepage_is_audited() {
    let mock_server = MockServer::start().await;
    serve_homepage(&mock_server, 404, HOMEPAGE).await;

    let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();
    let page = fetcher.fetch(&domain_of(&mock_server)).await.unwrap();

    assert_eq!(page.status, 404);
}

#[tokio::test]
async fn test_cloudflare_detection_script_is_not_a_block() {
    let mock_server = MockServer::start().await;
    let page = HOMEPAGE.replace(
        "</body>",
        r#"<script src="/cdn-cgi/challenge-platform/scripts/jsd/main.js"></script></body>"#,
    );
    serve_homepage(&mock_server, 200, &page).await;

    let fetcher = HttpFetcher::from_config(&Config::default()).unwrap();
    let fetched = fetcher.fetch(&domain_of(&mock_server)).await.unwrap();

    assert_eq!(fetched.status, 200);
    assert!(fetched.html.contains("scripts/jsd/main.js"));
}
