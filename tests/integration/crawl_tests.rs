//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and run full
//! harvests end-to-end into temporary directories.

use img_harvest::config::{CrawlPolicy, HttpConfig};
use img_harvest::crawler::{read_seed_file, CrawlEngine, Fetcher, RunCoordinator};
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Host name the mock server is also reachable under, for external-link tests
const OTHER_HOST: &str = "other.test";

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn image(bytes: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_bytes(bytes.to_vec())
        .insert_header("content-type", "image/jpeg")
}

/// Builds a coordinator whose client resolves `other.test` to the mock server
fn coordinator(
    server: &MockServer,
    base: &Path,
    crawl_external: bool,
    deduplicate: bool,
) -> RunCoordinator {
    let policy = CrawlPolicy::new(base, "127.0.0.1")
        .with_crawl_external(crawl_external)
        .with_deduplication(deduplicate);

    let client = reqwest::Client::builder()
        .resolve(OTHER_HOST, *server.address())
        .build()
        .expect("Failed to build client");

    RunCoordinator::with_engine(CrawlEngine::new(policy, Fetcher::new(client)))
}

async fn requested_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .iter()
        .map(|r| r.url.path().to_string())
        .collect()
}

#[tokio::test]
async fn test_shared_image_downloaded_once_with_dedup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(html(r#"<img src="/x.jpg"><a href="/other.html">Other</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other.html"))
        .respond_with(html(r#"<img src="/x.jpg">"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x.jpg"))
        .respond_with(image(b"JPEG"))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), false, true);
    let summary = run.run(&[format!("{}/index.html", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 2);
    assert_eq!(summary.counters.images_downloaded, 1);
    assert_eq!(summary.counters.images_failed, 0);

    let saved = tmp
        .path()
        .join("127.0.0.1")
        .join("index.html")
        .join("x.jpg");
    assert_eq!(std::fs::read(saved).unwrap(), b"JPEG");
}

#[tokio::test]
async fn test_shared_image_downloaded_per_page_without_dedup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(html(r#"<img src="/x.jpg"><a href="/other.html">Other</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other.html"))
        .respond_with(html(r#"<img src="/x.jpg">"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x.jpg"))
        .respond_with(image(b"JPEG"))
        .expect(2)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), false, false);
    let summary = run.run(&[format!("{}/index.html", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 2);
    assert_eq!(summary.counters.images_downloaded, 2);

    let host_dir = tmp.path().join("127.0.0.1");
    assert!(host_dir.join("index.html").join("x.jpg").is_file());
    assert!(host_dir.join("other.html").join("x.jpg").is_file());
}

#[tokio::test]
async fn test_existing_files_skipped_without_dedup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(html(r#"<img src="/x.jpg"><a href="/other.html">Other</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other.html"))
        .respond_with(html(r#"<img src="/x.jpg">"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/x.jpg"))
        .respond_with(image(b"NEW"))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    for page in ["index.html", "other.html"] {
        let dir = tmp.path().join("127.0.0.1").join(page);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("x.jpg"), b"OLD").unwrap();
    }

    let mut run = coordinator(&server, tmp.path(), false, false);
    let summary = run.run(&[format!("{}/index.html", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 2);
    assert_eq!(summary.counters.images_downloaded, 0);
    assert_eq!(summary.counters.images_failed, 0);
}

#[tokio::test]
async fn test_direct_image_seed() {
    let server = MockServer::start().await;

    // Fetched once as a page, once as an image
    Mock::given(method("GET"))
        .and(path("/pic.jpg"))
        .respond_with(image(&[0xFF, 0xD8, 0xFF, 0xE0]))
        .expect(2)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), false, true);
    let summary = run.run(&[format!("{}/pic.jpg", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 1);
    assert_eq!(summary.counters.images_downloaded, 1);

    let saved = tmp
        .path()
        .join("127.0.0.1")
        .join("pic.jpg")
        .join("pic.jpg");
    assert_eq!(std::fs::read(saved).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
}

#[tokio::test]
async fn test_failing_image_attempted_exactly_three_times() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<img src="/bad.png"><a href="/p2">2</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p2"))
        .respond_with(html(r#"<img src="/bad.png"><a href="/p3">3</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/p3"))
        .respond_with(html(r#"<img src="/bad.png"><img src="/bad.png">"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bad.png"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    // Dedup off so every page dispatches the image again
    let mut run = coordinator(&server, tmp.path(), false, false);
    let summary = run.run(&[format!("{}/", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 3);
    assert_eq!(summary.counters.images_downloaded, 0);
    assert_eq!(summary.counters.images_failed, 1);
    assert!(run
        .state()
        .is_image_failed(&format!("{}/bad.png", server.uri())));
}

#[tokio::test]
async fn test_external_link_skipped_when_disabled() {
    let server = MockServer::start().await;
    let external = format!("http://{}:{}/page", OTHER_HOST, server.address().port());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(r#"<a href="{}">Elsewhere</a>"#, external)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>external</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), false, true);
    let summary = run.run(&[format!("{}/", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 1);
    assert!(!run.state().is_visited(&external));
}

#[tokio::test]
async fn test_external_link_followed_when_enabled() {
    let server = MockServer::start().await;
    let external = format!("http://{}:{}/page", OTHER_HOST, server.address().port());

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(r#"<a href="{}">Elsewhere</a>"#, external)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(r#"<img src="logo.png">"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(image(b"PNG"))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), true, true);
    let summary = run.run(&[format!("{}/", server.uri())]).await;

    assert_eq!(summary.counters.urls_crawled, 2);
    assert_eq!(summary.counters.images_downloaded, 1);
    assert!(run.state().is_visited(&external));
    assert!(tmp
        .path()
        .join(OTHER_HOST)
        .join("page")
        .join("logo.png")
        .is_file());
}

#[tokio::test]
async fn test_depth_first_order_images_before_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/a">A</a><img src="/root.png"><a href="/b">B</a><a href="/a">A again</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<a href="/a1">A1</a><a href="/b">B</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a1"))
        .respond_with(html(r#"<img src="/a1.png"><a href="/">Home</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html("<p>leaf</p>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/root.png"))
        .respond_with(image(b"R"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a1.png"))
        .respond_with(image(b"A"))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), false, true);
    let summary = run.run(&[format!("{}/", server.uri())]).await;

    assert_eq!(
        requested_paths(&server).await,
        vec!["/", "/root.png", "/a", "/a1", "/a1.png", "/b"]
    );
    assert_eq!(summary.counters.urls_crawled, 4);
    assert_eq!(summary.counters.images_downloaded, 2);
}

#[tokio::test]
async fn test_seed_file_shares_visited_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(html(r#"<a href="/other.html">Other</a>"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/other.html"))
        .respond_with(html("<p>other</p>"))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}/index.html", server.uri()).unwrap();
    writeln!(file).unwrap();
    writeln!(file, "not a url").unwrap();
    writeln!(file, "{}/other.html", server.uri()).unwrap();
    file.flush().unwrap();

    let seeds = read_seed_file(file.path()).unwrap();
    assert_eq!(seeds.len(), 4);

    let tmp = TempDir::new().unwrap();
    let mut run = coordinator(&server, tmp.path(), false, true);
    let summary = run.run(&seeds).await;

    assert_eq!(summary.counters.urls_crawled, 2);
}

#[tokio::test]
async fn test_full_harvest_with_default_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gallery"))
        .respond_with(html(r#"<img src="img/one.gif"><img src="img/two.png">"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/one.gif"))
        .respond_with(image(b"GIF"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/two.png"))
        .respond_with(image(b"PNG"))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let base = tmp.path().join("out");
    let policy = CrawlPolicy::new(&base, "127.0.0.1");

    let summary = img_harvest::crawler::harvest(
        policy,
        &HttpConfig::default(),
        &[format!("{}/gallery", server.uri())],
    )
    .await
    .expect("Harvest failed");

    assert_eq!(summary.counters.urls_crawled, 1);
    assert_eq!(summary.counters.images_downloaded, 2);
    let gallery = base.join("127.0.0.1").join("gallery");
    assert!(gallery.join("one.gif").is_file());
    assert!(gallery.join("two.png").is_file());
}
