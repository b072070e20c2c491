//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl-then-rewrite cycle against a temporary output directory.

use flate2::write::GzEncoder;
use flate2::Compression;
use site_mirror::config::Config;
use site_mirror::{Mirror, MirrorError, PageState};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Host directory the mock server's files land in
const HOST_DIR: &str = "127.0.0.1";

/// Creates a test configuration writing under `out`
fn create_test_config(out: &TempDir, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.mirror.out_dir = out.path().display().to_string();
    config.mirror.max_depth = max_depth;
    config.mirror.timeout_secs = 5;
    config
}

/// Mounts a GET responder that must be hit exactly `times` times
async fn serve(server: &MockServer, route: &str, mime: &str, body: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_vec(), mime))
        .expect(times)
        .mount(server)
        .await;
}

fn local(out: &TempDir, rel: &str) -> PathBuf {
    out.path().join(HOST_DIR).join(rel)
}

fn read(out: &TempDir, rel: &str) -> String {
    std::fs::read_to_string(local(out, rel)).expect("mirrored file exists")
}

/// Resolves a relative reference found in `from` and checks the target exists
fn assert_resolves(from: &Path, reference: &str) {
    let dir = from.parent().expect("file has a parent directory");
    let target = dir.join(reference.split('#').next().unwrap_or(reference));
    assert!(
        target.exists(),
        "{} -> {} does not exist",
        from.display(),
        target.display()
    );
}

#[tokio::test]
async fn test_mirror_small_site() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let index = br#"<html><head><title>Home</title><link rel="stylesheet" href="/s.css"></head>
<body><a href="/about/">About</a><img src="/logo.png"></body></html>"#;
    let about = br#"<html><head><title>About</title></head>
<body><a href="/">Home</a><img src="/logo.png"></body></html>"#;

    serve(&server, "/", "text/html; charset=utf-8", index, 1).await;
    serve(&server, "/about/", "text/html", about, 1).await;
    serve(&server, "/logo.png", "image/png", b"\x89PNG\r\n", 1).await;
    serve(&server, "/s.css", "text/css", b"body { color: red; }", 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 1)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.documents_saved, 2);
    assert_eq!(stats.resources_saved, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(mirror.state().local_paths().len(), 4);

    assert!(local(&out, "index.html").exists());
    assert!(local(&out, "about/index.html").exists());
    assert!(local(&out, "logo.png").exists());
    assert!(local(&out, "s.css").exists());

    let home = read(&out, "index.html");
    assert!(home.contains(r#"<base href="./">"#));
    assert!(home.contains(r#"href="s.css""#));
    assert!(home.contains(r#"href="about/index.html""#));
    assert!(home.contains(r#"src="logo.png""#));

    let about = read(&out, "about/index.html");
    assert!(about.contains(r#"href="../index.html""#));
    assert!(about.contains(r#"src="../logo.png""#));
}

#[tokio::test]
async fn test_rewritten_references_resolve_to_files() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let base = server.uri();

    let index = format!(
        r#"<html><head></head><body>
<a href="{base}/docs/intro">Intro</a>
<img src="{base}/img/a.png">
</body></html>"#
    );
    let intro = br#"<html><head></head><body>
<a href="../">Up</a><a href="/#contact">Contact</a><img src="../img/a.png">
</body></html>"#;

    serve(&server, "/", "text/html", index.as_bytes(), 1).await;
    serve(&server, "/docs/intro", "text/html", intro, 1).await;
    serve(&server, "/img/a.png", "image/png", b"png", 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 2)).unwrap();
    mirror.run(&format!("{base}/")).await.unwrap();

    let intro_path = local(&out, "docs/intro/index.html");
    let intro = read(&out, "docs/intro/index.html");

    for reference in ["../../index.html", "../../index.html#contact", "../../img/a.png"] {
        assert!(intro.contains(&format!("\"{reference}\"")), "{intro}");
        assert_resolves(&intro_path, reference);
    }

    let home = read(&out, "index.html");
    assert!(home.contains(r#"href="docs/intro/index.html""#));
    assert_resolves(&local(&out, "index.html"), "docs/intro/index.html");
}

#[tokio::test]
async fn test_self_link_fetched_once() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let page = br#"<html><head></head><body><a href="/">me</a><a href="/#top">me again</a></body></html>"#;
    serve(&server, "/", "text/html", page, 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 5)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.visited, 1);
    assert_eq!(stats.documents_saved, 1);
}

#[tokio::test]
async fn test_cycle_between_pages_terminates() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    serve(&server, "/", "text/html", br#"<a href="/a">a</a>"#, 1).await;
    serve(&server, "/a", "text/html", br#"<a href="/b">b</a>"#, 1).await;
    serve(&server, "/b", "text/html", br#"<a href="/a">a</a><a href="/">root</a>"#, 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 10)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.documents_saved, 3);
    assert!(local(&out, "a/index.html").exists());
    assert!(local(&out, "b/index.html").exists());
}

#[tokio::test]
async fn test_resource_and_link_to_same_url_fetched_once() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let index = br#"<html><head></head><body>
<a href="/logo.png">full size</a><img src="/logo.png"><img src="logo.png">
</body></html>"#;
    serve(&server, "/", "text/html", index, 1).await;
    serve(&server, "/logo.png", "image/png", b"png", 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 3)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.resources_saved, 1);
}

#[tokio::test]
async fn test_stylesheet_urls_followed() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let index = br#"<html><head><link rel="stylesheet" href="/css/site.css"></head><body></body></html>"#;
    let css = b"body { background: url(../img/bg.png); }\n.logo { background: url('/img/logo.svg') }";

    serve(&server, "/", "text/html", index, 1).await;
    serve(&server, "/css/site.css", "text/css", css, 1).await;
    serve(&server, "/img/bg.png", "image/png", b"bg", 1).await;
    serve(&server, "/img/logo.svg", "image/svg+xml", b"<svg/>", 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 2)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.resources_saved, 3);
    assert!(local(&out, "img/bg.png").exists());

    let css = read(&out, "css/site.css");
    assert!(css.contains("url(../img/bg.png)"));
    assert!(css.contains("url('../img/logo.svg')"));
}

#[tokio::test]
async fn test_stylesheet_urls_respect_depth() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let index = br#"<html><head><link rel="stylesheet" href="/site.css"></head></html>"#;
    serve(&server, "/", "text/html", index, 1).await;
    serve(&server, "/site.css", "text/css", b"div { background: url(bg.png) }", 1).await;
    serve(&server, "/bg.png", "image/png", b"bg", 0).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 1)).unwrap();
    mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert!(!local(&out, "bg.png").exists());
    assert_eq!(read(&out, "site.css"), "div { background: url(bg.png) }");
}

#[tokio::test]
async fn test_external_links_never_fetched() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    // Same server under another hostname: off-site by strict host equality
    let port = server.address().port();
    let external = format!("http://localhost:{port}/elsewhere");
    let index = format!(
        r#"<html><head></head><body><a href="{external}">away</a><img src="{external}.png"></body></html>"#
    );

    serve(&server, "/", "text/html", index.as_bytes(), 1).await;
    serve(&server, "/elsewhere", "text/html", b"nope", 0).await;
    serve(&server, "/elsewhere.png", "image/png", b"nope", 0).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 3)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.visited, 1);
    assert_eq!(stats.external_references, 2);
    assert!(mirror
        .state()
        .local_paths()
        .keys()
        .all(|url| url.starts_with(&server.uri())));
    assert!(!out.path().join("localhost").exists());

    // Off-site references are left as written
    assert!(read(&out, "index.html").contains(&format!(r#"href="{external}""#)));
}

#[tokio::test]
async fn test_depth_limit() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    serve(&server, "/", "text/html", br#"<a href="/one">1</a>"#, 1).await;
    serve(&server, "/one", "text/html", br#"<a href="/two">2</a>"#, 1).await;
    serve(&server, "/two", "text/html", b"deep", 0).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 1)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.documents_saved, 2);
    let two = format!("{}/two", server.uri());
    assert_eq!(mirror.state().state_of(&two), PageState::Unseen);

    // Past the limit: the link stays pointed at the live site
    assert!(read(&out, "one/index.html").contains(r#"href="/two""#));
}

#[tokio::test]
async fn test_depth_zero_saves_root_only() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    serve(&server, "/", "text/html", br#"<img src="/a.png"><a href="/b">b</a>"#, 1).await;
    serve(&server, "/a.png", "image/png", b"a", 0).await;
    serve(&server, "/b", "text/html", b"b", 0).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 0)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.saved(), 1);
}

#[tokio::test]
async fn test_missing_resource_is_contained() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let index = br#"<html><head></head><body>
<img src="/missing.png"><img src="/present.png">
</body></html>"#;
    serve(&server, "/", "text/html", index, 1).await;
    serve(&server, "/present.png", "image/png", b"ok", 1).await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut mirror = Mirror::new(&create_test_config(&out, 2)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.resources_saved, 1);
    assert_eq!(
        stats.failed_urls,
        vec![format!("{}/missing.png", server.uri())]
    );
    assert!(!local(&out, "missing.png").exists());

    let home = read(&out, "index.html");
    assert!(home.contains(r#"src="/missing.png""#));
    assert!(home.contains(r#"src="present.png""#));
}

#[tokio::test]
async fn test_embedded_assets_point_at_saved_files() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();
    let base = server.uri();

    let index = format!(
        r#"<html><head><meta property="og:image" content="{base}/og.png"></head><body>
<video poster="/p.jpg"></video><object data="/o.svg"></object><div data-bg="/bg.webp"></div>
</body></html>"#
    );

    serve(&server, "/", "text/html", index.as_bytes(), 1).await;
    serve(&server, "/og.png", "image/png", b"og", 1).await;
    serve(&server, "/p.jpg", "image/jpeg", b"p", 1).await;
    serve(&server, "/o.svg", "image/svg+xml", b"<svg/>", 1).await;
    serve(&server, "/bg.webp", "image/webp", b"bg", 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 1)).unwrap();
    let stats = mirror.run(&format!("{base}/")).await.unwrap();
    assert_eq!(stats.saved(), 5);

    let index_path = local(&out, "index.html");
    let home = read(&out, "index.html");
    for (attr, file) in [
        ("content", "og.png"),
        ("poster", "p.jpg"),
        ("data", "o.svg"),
        ("data-bg", "bg.webp"),
    ] {
        assert!(home.contains(&format!(r#"{attr}="{file}""#)), "{home}");
        assert_resolves(&index_path, file);
    }
}

#[tokio::test]
async fn test_timeout_fails_only_that_url() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let index = br#"<html><head></head><body>
<img src="/slow.png"><img src="/fast.png">
</body></html>"#;
    serve(&server, "/", "text/html", index, 1).await;
    serve(&server, "/fast.png", "image/png", b"fast", 1).await;
    Mock::given(method("GET"))
        .and(path("/slow.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"slow".to_vec(), "image/png")
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let mut config = create_test_config(&out, 1);
    config.mirror.timeout_secs = 1;
    let mut mirror = Mirror::new(&config).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    let slow = format!("{}/slow.png", server.uri());
    let fast = format!("{}/fast.png", server.uri());
    assert_eq!(mirror.state().state_of(&slow), PageState::Failed);
    assert_eq!(mirror.state().state_of(&fast), PageState::Saved);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.saved(), 2);
    assert!(!local(&out, "slow.png").exists());
}

#[tokio::test]
async fn test_gzip_document_decoded() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(br#"<html><head></head><body><img src="/z.png"></body></html>"#)
        .unwrap();
    let compressed = encoder.finish().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(compressed, "text/html")
                .insert_header("content-encoding", "gzip"),
        )
        .expect(1)
        .mount(&server)
        .await;
    serve(&server, "/z.png", "image/png", b"z", 1).await;

    let mut mirror = Mirror::new(&create_test_config(&out, 1)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.saved(), 2);
    let home = read(&out, "index.html");
    assert!(home.contains(r#"<base href="./">"#));
    assert!(home.contains(r#"src="z.png""#));
}

#[tokio::test]
async fn test_failed_root_produces_empty_mirror() {
    let server = MockServer::start().await;
    let out = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut mirror = Mirror::new(&create_test_config(&out, 2)).unwrap();
    let stats = mirror.run(&format!("{}/", server.uri())).await.unwrap();

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.saved(), 0);
    assert!(!out.path().join(HOST_DIR).exists());
}

#[tokio::test]
async fn test_non_http_root_rejected() {
    let out = TempDir::new().unwrap();
    let mut mirror = Mirror::new(&create_test_config(&out, 2)).unwrap();

    let result = mirror.run("ftp://example.com/").await;
    assert!(matches!(result, Err(MirrorError::InvalidRootUrl { .. })));
}
