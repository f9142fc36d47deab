mod common;

use common::{CountingRenderer, init_test_tracing};
use pagemeta_config::PagemetaConfig;
use pagemeta_web::{ArticleExtractor, ExtractError, ExtractRequest, PageSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STATIC_ARTICLE: &str = r#"<!doctype html>
<html><head>
  <meta property="og:title" content="Static Story">
  <meta name="description" content="Served without JavaScript.">
  <meta property="og:site_name" content="Fixture Times">
  <meta property="og:image" content="/img/lead.jpg">
  <meta property="article:published_time" content="2024-03-05T08:30:00+01:00">
</head><body>
  <nav>Home | World</nav>
  <article><p>First paragraph.</p>  <p>Second paragraph.</p></article>
</body></html>"#;

const SPA_SHELL: &str = r#"<!doctype html>
<html><head><title>Loading</title></head>
<body><div id="root"></div><script src="/bundle.js"></script></body></html>"#;

const RENDERED_ARTICLE: &str = r#"<html><head>
  <meta property="og:title" content="Rendered Story">
  <meta property="og:description" content="Hydrated on the client.">
</head><body><main>Body text after hydration.</main></body></html>"#;

fn extractor_with(config: &PagemetaConfig, renderer: std::sync::Arc<CountingRenderer>) -> ArticleExtractor {
    ArticleExtractor::with_renderer(config, renderer).unwrap()
}

async fn serve(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status).set_body_raw(body, "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn static_page_skips_the_renderer() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/story", 200, STATIC_ARTICLE).await;

    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    let url = format!("{}/story", server.uri());
    let out = extractor.extract_detailed(&url).await.unwrap();

    assert_eq!(renderer.calls(), 0);
    assert_eq!(out.source, PageSource::Static);
    let meta = out.metadata;
    assert_eq!(meta.url, url);
    assert_eq!(meta.title, "Static Story");
    assert_eq!(meta.description, "Served without JavaScript.");
    assert_eq!(meta.site_name, "Fixture Times");
    assert_eq!(meta.thumbnail_url, format!("{}/img/lead.jpg", server.uri()));
    assert_eq!(meta.published_at, "2024-03-05T07:30:00.000Z");
    assert_eq!(meta.excerpt, "First paragraph. Second paragraph.");
}

#[tokio::test]
async fn framework_shell_is_rendered() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/app", 200, SPA_SHELL).await;

    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    let out = extractor
        .extract_detailed(&format!("{}/app", server.uri()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
    assert_eq!(out.source, PageSource::Rendered);
    assert_eq!(out.metadata.title, "Rendered Story");
    assert_eq!(out.metadata.description, "Hydrated on the client.");
    assert_eq!(out.metadata.excerpt, "Body text after hydration.");
}

#[tokio::test]
async fn listed_host_is_rendered_even_when_static_fetch_succeeds() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/post", 200, STATIC_ARTICLE).await;

    let mut config = PagemetaConfig::default();
    config.detection.js_hosts = vec!["127.0.0.1".into()];
    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&config, renderer.clone());

    let out = extractor
        .extract_detailed(&format!("{}/post", server.uri()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
    assert_eq!(out.source, PageSource::Rendered);
    assert_eq!(out.metadata.title, "Rendered Story");
}

#[tokio::test]
async fn error_status_falls_back_to_render_without_retrying() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/gone", 500, "<html><body>oops</body></html>").await;

    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    let meta = extractor
        .extract(&format!("{}/gone", server.uri()))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
    assert_eq!(meta.title, "Rendered Story");
}

#[tokio::test]
async fn unreachable_host_falls_back_to_render() {
    init_test_tracing();
    // Bind and drop a listener to get a port with nothing behind it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    let out = extractor
        .extract_detailed(&format!("http://127.0.0.1:{port}/story"))
        .await
        .unwrap();

    assert_eq!(renderer.calls(), 1);
    assert_eq!(out.source, PageSource::Rendered);
}

#[tokio::test]
async fn render_failure_is_reported_with_cause() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/app", 200, SPA_SHELL).await;

    let renderer = CountingRenderer::failing("navigation to page timed out after 30s");
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    let err = extractor
        .extract(&format!("{}/app", server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::Failed(_)));
    let message = err.to_string();
    assert!(message.starts_with("extraction failed:"), "{message}");
    assert!(message.contains("timed out after 30s"), "{message}");
}

#[tokio::test]
async fn missing_url_is_rejected_before_any_work() {
    init_test_tracing();
    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    for raw in ["", "   "] {
        let err = extractor.extract(raw).await.unwrap_err();
        assert!(matches!(err, ExtractError::MissingUrl), "{raw:?} gave {err}");
    }

    let err = extractor
        .extract_request(&ExtractRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ExtractError::MissingUrl));
    assert_eq!(err.to_string(), "a URL is required");

    assert_eq!(renderer.calls(), 0);
}

#[tokio::test]
async fn malformed_url_is_a_failure() {
    init_test_tracing();
    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    let err = extractor.extract("not a url").await.unwrap_err();

    assert!(matches!(err, ExtractError::Failed(_)));
    assert_eq!(renderer.calls(), 0);
}

#[tokio::test]
async fn non_web_schemes_never_reach_fetch_or_render() {
    init_test_tracing();
    let renderer = CountingRenderer::returning(RENDERED_ARTICLE);
    let extractor = extractor_with(&PagemetaConfig::default(), renderer.clone());

    for raw in [
        "file:///etc/passwd",
        "javascript:alert(1)",
        "data:text/html,<title>x</title>",
        "ftp://files.example/story.html",
    ] {
        let err = extractor.extract(raw).await.unwrap_err();
        assert!(matches!(err, ExtractError::Failed(_)), "{raw} gave {err}");
        assert!(err.to_string().contains("unsupported URL scheme"), "{err}");
    }

    assert_eq!(renderer.calls(), 0);
}

#[tokio::test]
async fn bare_page_yields_default_fields() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/bare", 200, "<html><body><p>Just text.</p></body></html>").await;

    let extractor = extractor_with(
        &PagemetaConfig::default(),
        CountingRenderer::returning(RENDERED_ARTICLE),
    );

    let meta = extractor
        .extract(&format!("{}/bare", server.uri()))
        .await
        .unwrap();

    assert_eq!(meta.title, "Untitled");
    assert_eq!(meta.description, "");
    assert_eq!(meta.thumbnail_url, "");
    assert_eq!(meta.site_name, "127.0.0.1");
    assert_eq!(meta.excerpt, "Just text.");
    assert!(chrono::DateTime::parse_from_rfc3339(&meta.published_at).is_ok());
}

#[tokio::test]
async fn request_form_input_is_accepted() {
    init_test_tracing();
    let server = MockServer::start().await;
    serve(&server, "/story", 200, STATIC_ARTICLE).await;

    let extractor = extractor_with(
        &PagemetaConfig::default(),
        CountingRenderer::returning(RENDERED_ARTICLE),
    );
    let request: ExtractRequest =
        serde_json::from_value(serde_json::json!({ "url": format!("{}/story", server.uri()) }))
            .unwrap();

    let meta = extractor.extract_request(&request).await.unwrap();
    assert_eq!(meta.title, "Static Story");
}

#[test]
fn webdriver_backed_extractor_builds_without_a_browser() {
    assert!(ArticleExtractor::from_config(&PagemetaConfig::default()).is_ok());
}
