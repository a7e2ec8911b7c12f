//! Router-level tests against a mocked Slack.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use spongemock_server::config::SlackSettings;
use spongemock_server::{AppState, ServerConfig, create_router};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_string, header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM: &str = "application/x-www-form-urlencoded";

fn app(slack: &MockServer, with_oauth: bool) -> Router {
    let (client_id, client_secret) = if with_oauth {
        (Some("client-id".to_string()), Some("client-secret".to_string()))
    } else {
        (None, None)
    };

    let config = ServerConfig {
        slack: SlackSettings {
            client_id,
            client_secret,
            api_base_url: format!("{}/api", slack.uri()),
            http_timeout_secs: 5,
        },
        ..Default::default()
    };
    create_router(AppState::new(config).expect("state"))
}

fn form_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, FORM)
        .body(Body::from(body))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn command_body(slack: &MockServer, text: &str) -> String {
    format!(
        "token=t&team_id=T1&channel_id=C1&user_id=U1&user_name=bob&command=%2Fmock&text={}&response_url={}",
        text,
        format!("{}/hook", slack.uri()).replace(':', "%3A").replace('/', "%2F")
    )
}

fn json_response(value: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(value.to_string(), "application/json")
}

async fn mount_oauth_success(slack: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/oauth.access"))
        .and(header_is(
            "authorization",
            "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=",
        ))
        .and(body_string("code=abc123"))
        .respond_with(json_response(serde_json::json!({
            "ok": true,
            "access_token": "xoxp-token",
            "team_name": "Acme",
            "team_id": "T1"
        })))
        .expect(1)
        .mount(slack)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .and(header_is("authorization", "Bearer xoxp-token"))
        .respond_with(json_response(serde_json::json!({
            "ok": true,
            "url": "https://acme.slack.com/"
        })))
        .expect(1)
        .mount(slack)
        .await;
}

#[tokio::test]
async fn test_slash_command_posts_mocked_reply() {
    let slack = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(header_is("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "response_type": "in_channel",
            "text": "HeY @user, HoW'S it GoinG?"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&slack)
        .await;

    let body = command_body(&slack, "hey+%40user%2C+how%27s+it+going%3F");
    let response = app(&slack, false)
        .oneshot(form_post("/slack/command", body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn test_root_path_accepts_commands() {
    let slack = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(serde_json::json!({
            "response_type": "in_channel",
            "text": "  TeSt  "
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&slack)
        .await;

    let body = command_body(&slack, "++test++");
    let response = app(&slack, false)
        .oneshot(form_post("/", body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_slash_command_malformed_body_is_400() {
    let slack = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(0)
        .mount(&slack)
        .await;

    let body = command_body(&slack, "100%zz");
    let response = app(&slack, false)
        .oneshot(form_post("/slack/command", body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("invalid percent escape"));
}

#[tokio::test]
async fn test_slash_command_missing_response_url_is_400() {
    let slack = MockServer::start().await;

    let response = app(&slack, false)
        .oneshot(form_post("/slack/command", "text=hello".to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "missing response_url");
}

#[tokio::test]
async fn test_slash_command_delivery_failure_still_acks() {
    let slack = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(410).set_body_string("expired_url"))
        .expect(1)
        .mount(&slack)
        .await;

    let body = command_body(&slack, "test");
    let response = app(&slack, false)
        .oneshot(form_post("/slack/command", body))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oauth_redirects_to_workspace() {
    let slack = MockServer::start().await;
    mount_oauth_success(&slack).await;

    let response = app(&slack, true)
        .oneshot(get("/slack/oauth?code=abc123&state=s"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://acme.slack.com/"
    );
}

#[tokio::test]
async fn test_oauth_reads_code_from_form_body() {
    let slack = MockServer::start().await;
    mount_oauth_success(&slack).await;

    let response = app(&slack, true)
        .oneshot(form_post("/auth", "code=abc123".to_string()))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://acme.slack.com/"
    );
}

#[tokio::test]
async fn test_oauth_missing_code_is_400() {
    let slack = MockServer::start().await;

    let response = app(&slack, true)
        .oneshot(get("/slack/oauth"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "missing code parameter");
}

#[tokio::test]
async fn test_oauth_declined_install_is_500() {
    let slack = MockServer::start().await;

    let response = app(&slack, true)
        .oneshot(get("/slack/oauth?error=access_denied"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "access_denied");
}

#[tokio::test]
async fn test_oauth_upstream_error_is_500_with_slack_message() {
    let slack = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/oauth.access"))
        .respond_with(json_response(serde_json::json!({
            "ok": true,
            "access_token": "xoxp-token"
        })))
        .mount(&slack)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth.test"))
        .respond_with(json_response(serde_json::json!({
            "ok": false,
            "error": "invalid_auth"
        })))
        .mount(&slack)
        .await;

    let response = app(&slack, true)
        .oneshot(get("/slack/oauth?code=abc123"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "invalid_auth");
}

#[tokio::test]
async fn test_oauth_without_credentials_is_500() {
    let slack = MockServer::start().await;

    let response = app(&slack, false)
        .oneshot(get("/slack/oauth?code=abc123"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "OAuth client credentials not configured"
    );
}

#[tokio::test]
async fn test_health_check() {
    let slack = MockServer::start().await;

    let response = app(&slack, false)
        .oneshot(get("/health"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
