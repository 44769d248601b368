//! Integration tests for the importers and the read interface
//!
//! Pages and feeds are served by wiremock; every run writes into its own
//! temporary content directory.

use pretty_assertions::assert_eq;
use site_harvest::config::{Config, OutputConfig, SiteConfig, UserAgentConfig, DEFAULT_FEED_PATH};
use site_harvest::content::{frontmatter, ContentLibrary};
use site_harvest::crawler::run_crawl;
use site_harvest::import::{run_blog_import, run_pages_import};
use site_harvest::output::{write_json, BlogIndex, PagesIndex, Route, RouteManifest};
use site_harvest::{HarvestError, PageState, RouteType};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(origin: &str, content_dir: &TempDir) -> Config {
    Config {
        site: SiteConfig {
            origin: origin.to_string(),
            seeds: vec![format!("{}/", origin)],
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

fn paragraph(topic: &str) -> String {
    format!(
        "<p>{} is covered here in enough detail that the page clears the content threshold \
         used when picking the main region of the document, with a little room to spare.</p>",
        topic
    )
}

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

async fn mount_feed(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/blog"))
        .and(query_param("format", "rss"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn post_page(title: &str, topic: &str) -> String {
    format!(
        r#"<html><head><meta property="og:title" content="{title}"></head><body>
            <header><nav><a href="/">Home</a></nav></header>
            <main><article><h1>{title}</h1>
{body}</article></main>
            <footer>Footer text</footer>
        </body></html>"#,
        title = title,
        body = paragraph(topic)
    )
}

fn write_manifest(config: &Config, origin: &str, routes: &[(&str, RouteType)]) {
    let routes = routes
        .iter()
        .map(|(pathname, route_type)| Route {
            url: format!("{}{}", origin, pathname),
            pathname: pathname.to_string(),
            route_type: *route_type,
        })
        .collect();
    write_json(
        &config.output.routes_file(),
        &RouteManifest::new(origin, routes),
    )
    .unwrap();
}

fn read_blog_index(config: &Config) -> BlogIndex {
    let raw = std::fs::read_to_string(config.output.blog_index_file()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn read_pages_index(config: &Config) -> PagesIndex {
    let raw = std::fs::read_to_string(config.output.pages_index_file()).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_blog_import_from_feed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let feed = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel>
  <title>Blog</title><link>{base}/blog</link><description>Posts</description>
  <item>
    <title>Older Post</title>
    <link>{base}/blog/older-post</link>
    <pubDate>Mon, 01 Jan 2024 10:00:00 +0000</pubDate>
  </item>
  <item>
    <title>Newer "Quoted" Post</title>
    <link>{base}/blog/newer-post</link>
    <pubDate>Sat, 01 Jun 2024 08:30:00 +0000</pubDate>
  </item>
  <item>
    <title>Duplicate</title>
    <link>{base}/blog/older-post?utm_source=rss</link>
  </item>
  <item>
    <title>Gone</title>
    <link>{base}/blog/gone</link>
  </item>
</channel></rss>"#,
        base = base_url
    );
    mount_feed(
        &mock_server,
        ResponseTemplate::new(200).set_body_raw(feed, "application/rss+xml"),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/blog/older-post"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(post_page("Ignored", "Mobility"), "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/blog/newer-post", post_page("Ignored", "Strength")).await;
    Mock::given(method("GET"))
        .and(path("/blog/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    let report = run_blog_import(&config).await.expect("Blog import failed");

    assert_eq!(report.imported, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].state, PageState::DeadLink);

    let index = read_blog_index(&config);
    assert_eq!(index.source, base_url);
    let slugs: Vec<&str> = index.posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["newer-post", "older-post"]);
    assert_eq!(index.posts[0].title, "Newer \"Quoted\" Post");
    assert_eq!(index.posts[0].date, "2024-06-01T08:30:00.000Z");
    assert!(index.posts[1].excerpt.starts_with("Ignored Mobility is covered"));
    assert!(!index.posts[1].excerpt.contains("Footer"));

    let raw = std::fs::read_to_string(config.output.blog_dir().join("newer-post.md")).unwrap();
    assert!(raw.starts_with(
        "---\ntitle: \"Newer \\\"Quoted\\\" Post\"\ndate: \"2024-06-01T08:30:00.000Z\"\nslug: \"newer-post\"\n"
    ));
    assert!(raw.contains("# Ignored"));
    assert!(raw.ends_with('\n'));

    // Read back through the library
    let library = ContentLibrary::new(config.output.clone());
    assert_eq!(library.blog_index().unwrap(), index.posts);

    let post = library.blog_post("newer-post").unwrap().expect("post missing");
    assert_eq!(post.title, index.posts[0].title);
    assert_eq!(post.date, index.posts[0].date);
    assert_eq!(post.source, format!("{}/blog/newer-post", base_url));
    assert_eq!(post.excerpt, index.posts[0].excerpt);
    assert!(post.content_markdown.contains("Strength is covered"));
}

#[tokio::test]
async fn test_blog_import_falls_back_to_routes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_feed(&mock_server, ResponseTemplate::new(503)).await;
    mount_html(
        &mock_server,
        "/blog/from-routes",
        format!(
            r#"<html><head><meta property="article:published_time" content="2023-03-04T05:06:07Z"></head>
               <body><article><h1>From Routes</h1>{}</article></body></html>"#,
            paragraph("Recovery")
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);
    write_manifest(
        &config,
        &base_url,
        &[
            ("/", RouteType::Home),
            ("/about", RouteType::Page),
            ("/blog", RouteType::BlogIndex),
            ("/blog/from-routes", RouteType::BlogPost),
        ],
    );

    let report = run_blog_import(&config).await.expect("Blog import failed");
    assert_eq!(report.imported, 1);
    assert_eq!(report.failed(), 0);

    let index = read_blog_index(&config);
    assert_eq!(index.posts.len(), 1);
    assert_eq!(index.posts[0].slug, "from-routes");
    assert_eq!(index.posts[0].title, "From Routes");
    assert_eq!(index.posts[0].date, "2023-03-04T05:06:07.000Z");
}

#[tokio::test]
async fn test_blog_import_with_no_posts_writes_empty_index() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_feed(&mock_server, ResponseTemplate::new(404)).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    let report = run_blog_import(&config).await.expect("Empty import must succeed");
    assert_eq!(report.summary_line(), "Import complete: 0 imported, 0 failed");

    let raw = std::fs::read_to_string(config.output.blog_index_file()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["posts"], serde_json::json!([]));
    assert!(config.output.blog_dir().is_dir());

    let library = ContentLibrary::new(config.output.clone());
    assert!(library.blog_index().unwrap().is_empty());
}

#[tokio::test]
async fn test_pages_import() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        format!(
            "<html><head><title>Welcome Home</title></head><body><main>{}</main></body></html>",
            paragraph("Coaching")
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/services/personal-training",
        format!(
            "<html><body><main><h1>Personal Training</h1>\n{}</main></body></html>",
            paragraph("Programming")
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/readiness",
        "<html><head><title>Readiness</title></head><body><form>Quiz</form></body></html>"
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/brochure"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF", "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/a-post"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);
    write_manifest(
        &config,
        &base_url,
        &[
            ("/", RouteType::Home),
            ("/services/personal-training", RouteType::Page),
            ("/brochure", RouteType::Page),
            ("/readiness", RouteType::Assessment),
            ("/blog", RouteType::BlogIndex),
            ("/blog/a-post", RouteType::BlogPost),
        ],
    );

    let report = run_pages_import(&config).await.expect("Pages import failed");
    assert_eq!(report.imported, 3);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.failures[0].state, PageState::ContentMismatch);

    let index = read_pages_index(&config);
    let entries: Vec<(&str, &str, &str)> = index
        .pages
        .iter()
        .map(|p| (p.slug.as_str(), p.title.as_str(), p.page_type.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("home", "Welcome Home", "home"),
            ("readiness", "Readiness", "assessment"),
            ("services-personal-training", "Personal Training", "page"),
        ]
    );

    let raw = std::fs::read_to_string(config.output.pages_dir().join("home.md")).unwrap();
    let document = frontmatter::parse(&raw);
    assert_eq!(document.front_matter.slug.as_deref(), Some("home"));
    assert_eq!(document.front_matter.page_type.as_deref(), Some("home"));
    assert_eq!(
        document.front_matter.source,
        Some(format!("{}/", base_url))
    );
    assert!(document.body.starts_with("Coaching is covered"));

    // Forms are chrome; the assessment page keeps its front-matter only
    let readiness = std::fs::read_to_string(config.output.pages_dir().join("readiness.md")).unwrap();
    assert!(readiness.contains("type: \"assessment\"\n"));
    assert!(!readiness.contains("Quiz"));

    let library = ContentLibrary::new(config.output.clone());
    let home = library.home_page().unwrap().expect("home page missing");
    assert_eq!(home.slug, "home");
    assert_eq!(home.title, "Welcome Home");
    assert_eq!(
        library.page("services-personal-training").unwrap().unwrap().page_type,
        "page"
    );
    assert_eq!(library.page("../routes").unwrap(), None);
}

#[tokio::test]
async fn test_pages_import_slug_collisions() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    for route in ["/about-us", "/about/us", "/about+us"] {
        mount_html(
            &mock_server,
            route,
            format!(
                "<html><head><title>{}</title></head><body><main>{}</main></body></html>",
                route,
                paragraph("Team")
            ),
        )
        .await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);
    write_manifest(
        &config,
        &base_url,
        &[
            ("/about-us", RouteType::Page),
            ("/about/us", RouteType::Page),
            ("/about+us", RouteType::Page),
        ],
    );

    run_pages_import(&config).await.expect("Pages import failed");

    let index = read_pages_index(&config);
    let entries: Vec<(&str, &str)> = index
        .pages
        .iter()
        .map(|p| (p.slug.as_str(), p.title.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("about-us", "/about+us"),
            ("about-us-2", "/about-us"),
            ("about-us-3", "/about/us"),
        ]
    );
    for slug in ["about-us", "about-us-2", "about-us-3"] {
        assert!(config.output.pages_dir().join(format!("{}.md", slug)).exists());
    }
}

#[tokio::test]
async fn test_pages_import_requires_manifest() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config("https://site.example", &dir);

    let err = run_pages_import(&config).await.unwrap_err();
    assert!(matches!(err, HarvestError::ManifestMissing { .. }));
    assert!(!config.output.pages_index_file().exists());
}

#[tokio::test]
async fn test_full_pipeline() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Registered first so the feed query never reaches the HTML blog index
    mount_feed(&mock_server, ResponseTemplate::new(500)).await;
    mount_html(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
                <nav><a href="/about">About</a><a href="/blog">Blog</a></nav>
                <main>{}</main></body></html>"#,
            paragraph("The gym")
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/about",
        format!(
            "<html><head><title>About</title></head><body><main>{}</main></body></html>",
            paragraph("Our story")
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/blog",
        r#"<html><body><a href="/blog/first">First</a></body></html>"#.to_string(),
    )
    .await;
    mount_html(&mock_server, "/blog/first", post_page("First Post", "Squats")).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&base_url, &dir);

    let manifest = run_crawl(&config).await.expect("Crawl failed");
    assert_eq!(manifest.routes.len(), 4);

    let pages = run_pages_import(&config).await.expect("Pages import failed");
    assert_eq!(pages.imported, 2);

    let posts = run_blog_import(&config).await.expect("Blog import failed");
    assert_eq!(posts.imported, 1);

    let library = ContentLibrary::new(config.output.clone());
    let slugs: Vec<String> = library
        .pages_index()
        .unwrap()
        .into_iter()
        .map(|p| p.slug)
        .collect();
    assert_eq!(slugs, vec!["about", "home"]);

    let post = library.blog_post("first").unwrap().expect("post missing");
    assert_eq!(post.title, "First Post");
    assert!(post.content_markdown.contains("Squats is covered"));
    assert!(!post.content_markdown.contains("Footer text"));
}
