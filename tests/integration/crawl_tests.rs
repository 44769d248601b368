//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use pretty_assertions::assert_eq;
use site_harvest::config::{Config, OutputConfig, SiteConfig, UserAgentConfig, DEFAULT_FEED_PATH};
use site_harvest::crawler::{run_crawl, Crawler, DomHrefScanner};
use site_harvest::output::RouteManifest;
use site_harvest::{HarvestError, RouteType};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration for a mock server origin
fn create_test_config(origin: &str, seeds: Vec<String>, content_dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            origin: origin.to_string(),
            seeds,
            assessment_path: Some("/readiness".to_string()),
            feed_path: DEFAULT_FEED_PATH.to_string(),
        },
        user_agent: UserAgentConfig {
            crawler_name: "testbot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            content_dir: content_dir.path().to_path_buf(),
        },
    }
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

fn pathnames(manifest: &RouteManifest) -> Vec<(&str, RouteType)> {
    manifest
        .routes
        .iter()
        .map(|route| (route.pathname.as_str(), route.route_type))
        .collect()
}

#[tokio::test]
async fn test_crawl_same_origin_routes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/blog">Blog</a>
           <a href="/about">About</a>
           <a href="https://external.example.org/page">Elsewhere</a>
           <a href="/logo.png">Logo</a>"#,
    )
    .await;
    mount_page(&mock_server, "/blog", "<h1>Blog</h1>").await;
    mount_page(&mock_server, "/about", "<h1>About</h1>").await;

    // Asset links are never requested
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, vec![format!("{}/", base_url)], &dir);

    let manifest = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(manifest.origin, base_url);
    assert_eq!(
        pathnames(&manifest),
        vec![
            ("/", RouteType::Home),
            ("/about", RouteType::Page),
            ("/blog", RouteType::BlogIndex),
        ]
    );
    assert_eq!(manifest.routes[1].url, format!("{}/about", base_url));

    // The manifest on disk matches what was returned
    let written = RouteManifest::load(&config.output.routes_file()).expect("Manifest not written");
    assert_eq!(written.routes, manifest.routes);

    let raw = std::fs::read_to_string(config.output.routes_file()).unwrap();
    assert!(raw.ends_with("}\n"));
    assert!(raw.contains("\"discoveredAtISO\""));
    assert!(raw.contains("\"type\": \"blogIndex\""));
}

#[tokio::test]
async fn test_crawl_cycles_fetch_each_url_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/a">A</a><a href="/b">B</a><a href="/#top">Top</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(
            r#"<a href="/">Home</a><a href="/b/">B</a><a href="/a?ref=self">A again</a>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(r#"<a href="/a#section">A</a><a href="//b">B</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, vec![format!("{}/", base_url)], &dir);

    let crawler = Crawler::new(&config).unwrap();
    let manifest = crawler.crawl(&config.site.seeds).await.expect("Crawl failed");

    assert_eq!(
        pathnames(&manifest),
        vec![("/", RouteType::Home), ("/a", RouteType::Page), ("/b", RouteType::Page)]
    );
}

#[tokio::test]
async fn test_crawl_records_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/old-page">Old</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/old-page"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new-page/"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new-page/", r#"<a href="contact">Contact</a>"#).await;
    mount_page(&mock_server, "/contact", "<p>Call us</p>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, vec![format!("{}/", base_url)], &dir);

    let manifest = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(
        pathnames(&manifest),
        vec![
            ("/", RouteType::Home),
            ("/contact", RouteType::Page),
            ("/new-page", RouteType::Page),
        ]
    );
}

#[tokio::test]
async fn test_crawl_skips_errors_and_non_html() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Missing</a>
           <a href="/broken">Broken</a>
           <a href="/data">Data</a>
           <a href="/readiness">Assessment</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"links": "<a href=\"/hidden\">x</a>"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hidden"))
        .respond_with(html_page("never linked from HTML"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/readiness", "<form>Quiz</form>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, vec![format!("{}/", base_url)], &dir);

    let manifest = run_crawl(&config).await.expect("Crawl failed");

    assert_eq!(
        pathnames(&manifest),
        vec![("/", RouteType::Home), ("/readiness", RouteType::Assessment)]
    );
}

#[tokio::test]
async fn test_crawl_with_dom_scanner() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href='/blog/first-post'>Post</a><a href="mailto:hi@example.com">Mail</a>"#,
    )
    .await;
    mount_page(&mock_server, "/blog/first-post", "<article>Post</article>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, vec![format!("{}/", base_url)], &dir);

    let crawler = Crawler::new(&config)
        .unwrap()
        .with_scanner(Box::new(DomHrefScanner));
    let manifest = crawler.crawl(&config.site.seeds).await.expect("Crawl failed");

    assert_eq!(
        pathnames(&manifest),
        vec![("/", RouteType::Home), ("/blog/first-post", RouteType::BlogPost)]
    );
}

#[tokio::test]
async fn test_crawl_without_usable_seed_fails() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        "https://site.example",
        vec!["https://site.example/logo.png".to_string()],
        &dir,
    );

    let err = Crawler::new(&config)
        .unwrap()
        .crawl(&config.site.seeds)
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::Config(_)));
    assert!(!config.output.routes_file().exists());
}
