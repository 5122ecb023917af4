use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use webconsole::api::{AppState, router};
use webconsole::auth::digest::md5_hex;
use webconsole::auth::password_digest;
use webconsole::config::Config;
use webconsole::ramlog::RamLog;

/// Console config with one admin user; REST and JSONP as given.
fn create_test_config(rest: bool, jsonp: bool) -> Config {
    let config_toml = format!(
        r#"
[server]
bind_ip = "127.0.0.1"
port = 28017
rest = {rest}
jsonp = {jsonp}

[auth]
realm = "console"

[[auth.users]]
name = "admin"
password = "secret"
    "#
    );

    toml::from_str(&config_toml).expect("Failed to parse test config")
}

fn build_test_app(rest: bool, jsonp: bool) -> Router {
    let log = Arc::new(RamLog::new("test", 16));
    router(AppState::build(create_test_config(rest, jsonp), log))
}

fn get_from(uri: &str, origin: &str) -> Request<Body> {
    let mut request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();
    let origin: SocketAddr = origin.parse().unwrap();
    request.extensions_mut().insert(ConnectInfo(origin));
    request
}

fn local_get(uri: &str) -> Request<Body> {
    get_from(uri, "127.0.0.1:40000")
}

async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn content_type(response: &Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_status_document() {
    let app = build_test_app(false, false);

    let response = app.oneshot(local_get("/_status?repl=1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "application/json;charset=utf-8");
    let doc: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(doc["serverStatus"].is_object());
    assert!(doc["buildinfo"]["version"].is_string());
    assert_eq!(doc["serverStatus"]["repl"]["level"], 1);
}

#[tokio::test]
async fn test_remote_request_gets_digest_challenge() {
    let app = build_test_app(false, false);

    let response = app
        .oneshot(get_from("/_status", "192.168.1.20:40000"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let challenge = response
        .headers()
        .get(header::WWW_AUTHENTICATE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(
        challenge,
        r#"Digest realm="console", nonce="abc", algorithm=MD5, qop="auth""#
    );
    assert_eq!(body_string(response).await, "not allowed\n");
}

#[tokio::test]
async fn test_remote_request_with_valid_digest() {
    let app = build_test_app(false, false);

    let ha1 = password_digest("admin", "console", "secret");
    let ha2 = md5_hex("GET:/_status");
    let digest = md5_hex(&format!("{ha1}:abc:{ha2}"));
    let mut request = get_from("/_status", "192.168.1.20:40000");
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!(
            r#"Digest username="admin", realm="console", nonce="abc", uri="/_status", response="{digest}""#
        )
        .parse()
        .unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_commands_listing_requires_rest() {
    let response = build_test_app(false, false)
        .oneshot(local_get("/_commands"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(body_string(response).await.contains("use --rest to turn on"));

    let response = build_test_app(true, false)
        .oneshot(local_get("/_commands"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html;charset=utf-8");
    let body = body_string(response).await;
    assert!(body.contains("S:slave-ok  R:read-lock  W:write-lock  A:admin-only"));
    assert!(body.contains(r#"<a href="/ping?text=1">ping</a>"#));
}

#[tokio::test]
async fn test_web_command_as_text() {
    let app = build_test_app(true, false);

    let response = app.oneshot(local_get("/ping?text=1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/plain;charset=utf-8");
    let body = body_string(response).await;
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(doc["ok"], 1.0);
}

#[tokio::test]
async fn test_text_parameter_counts_by_presence() {
    for uri in ["/ping?text=0", "/ping?text=", "/ping?text=false"] {
        let response = build_test_app(true, false)
            .oneshot(local_get(uri))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(content_type(&response), "text/plain;charset=utf-8", "{uri}");
    }

    let response = build_test_app(true, false)
        .oneshot(local_get("/ping"))
        .await
        .unwrap();
    assert_eq!(content_type(&response), "application/json;charset=utf-8");
}

#[tokio::test]
async fn test_admin_only_command_is_not_a_url() {
    let app = build_test_app(true, false);

    let response = app.oneshot(local_get("/getLog")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favicon() {
    let response = build_test_app(false, false)
        .oneshot(local_get("/favicon.ico"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "no favicon\n");
}

#[tokio::test]
async fn test_home_page_lists_sections() {
    let response = build_test_app(false, false)
        .oneshot(local_get("/_home"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    let requests = body.find("<b>Requests</b>").unwrap();
    let log = body.find("<b>Log</b>").unwrap();
    assert!(requests < log);
}

#[tokio::test]
async fn test_jsonp_over_http() {
    let response = build_test_app(false, true)
        .oneshot(local_get("/_status?jsonp=show"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.starts_with("show({"));
    assert!(body.ends_with("})"));

    let response = build_test_app(false, false)
        .oneshot(local_get("/_status?jsonp=show"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_root_serves_bootstrap() {
    let response = build_test_app(false, false)
        .oneshot(local_get("/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html;charset=utf-8");
    assert!(body_string(response).await.contains("/_home"));
}
