//! Integration tests for the HTTP routes.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use gomap::report::{parse_array, FunctionRecord, StructRecord};
use gomap::server::router;
use gomap::Config;

/// A base directory with `acme/geo` holding one Go package, plus a web dir.
fn setup() -> (TempDir, Arc<Config>) {
    let root = TempDir::new().unwrap();
    let pkg = root.path().join("src/acme/geo");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(
        pkg.join("geo.go"),
        r#"package geo

// Point is a location.
type Point struct {
    X, Y int
}

// Add sums two ints.
func Add(a, b int) (sum int) {
    return a + b
}

// Scale doubles x.
func (p *Point) Scale(x int) int {
    return x * 2
}
"#,
    )
    .unwrap();

    let broken = root.path().join("src/acme/broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("bad.go"), "package broken\n\nfunc (\n").unwrap();

    let web = root.path().join("web");
    fs::create_dir_all(&web).unwrap();
    fs::write(web.join("index.html"), "<html>gomap</html>").unwrap();

    let config = Config {
        base_dir: Some(root.path().join("src")),
        web_dir: web,
        ..Default::default()
    };
    (root, Arc::new(config))
}

async fn get(config: Arc<Config>, uri: &str) -> (StatusCode, String) {
    let response = router(config)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_map_route() {
    let (_root, config) = setup();
    let (status, body) = get(config, "/map?name=acme/geo").await;

    assert_eq!(status, StatusCode::OK);
    let records: Vec<FunctionRecord> = parse_array(&body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Add");
    assert_eq!(records[0].params, "a int,b int");
    assert_eq!(records[0].returns, "sum int");
}

#[tokio::test]
async fn test_map_struct_route() {
    let (_root, config) = setup();
    let (status, body) = get(config, "/map_struct?name=acme/geo").await;

    assert_eq!(status, StatusCode::OK);
    let records: Vec<StructRecord> = parse_array(&body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Point");
    assert_eq!(records[0].fields.len(), 2);
}

#[tokio::test]
async fn test_parse_failure_is_structured_error() {
    let (_root, config) = setup();
    let (status, body) = get(config, "/map?name=acme/broken").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["code"], 500);
    assert!(value["error"].as_str().unwrap().contains("bad.go"));
}

#[tokio::test]
async fn test_missing_package_is_error() {
    let (_root, config) = setup();
    let (status, _) = get(config, "/map_struct?name=acme/missing").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_path_escape_rejected() {
    let (_root, config) = setup();
    let (status, body) = get(config, "/map?name=../etc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["code"], 400);
}

#[tokio::test]
async fn test_static_files_served() {
    let (_root, config) = setup();
    let (status, body) = get(config, "/index.html").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<html>gomap</html>");
}

#[tokio::test]
async fn test_env_base_dir_read_per_request() {
    let (root, config) = setup();
    let config = Arc::new(Config {
        base_dir: None,
        base_env: "GOMAP_SERVER_TEST_ROOT".to_string(),
        ..(*config).clone()
    });

    std::env::set_var("GOMAP_SERVER_TEST_ROOT", root.path());
    let (status, _) = get(config.clone(), "/map?name=acme/geo").await;
    assert_eq!(status, StatusCode::OK);

    std::env::set_var("GOMAP_SERVER_TEST_ROOT", PathBuf::from("/nonexistent-gomap-root"));
    let (status, _) = get(config, "/map?name=acme/geo").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    std::env::remove_var("GOMAP_SERVER_TEST_ROOT");
}
