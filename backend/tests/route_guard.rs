use std::sync::Arc;

use adapters::{MemorySessionBackend, Role, SessionInfo};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use backend::{build_app, AppState};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

const COOKIE: &str = "sb-access-token";

struct Harness {
    backend: Arc<MemorySessionBackend>,
    app: Router,
}

fn harness() -> Harness {
    let backend = Arc::new(MemorySessionBackend::new());
    let app = build_app(AppState::new(backend.clone(), COOKIE));
    Harness { backend, app }
}

async fn get(app: &Router, path: &str, token: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{COOKIE}={token}"));
    }
    app.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(response: &axum::response::Response) -> Option<&str> {
    response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn public_pages_need_no_session() {
    let h = harness();
    for path in [
        "/",
        "/auth/login",
        "/auth/register",
        "/auth/registration-success",
        "/auth/pending-approval",
    ] {
        let response = get(&h.app, path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
    }
    assert_eq!(h.backend.session_lookups(), 0);
}

#[tokio::test]
async fn bypassed_prefixes_skip_the_guard() {
    let h = harness();

    let response = get(&h.app, "/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    // No asset is served, but the guard must not redirect it either.
    let response = get(&h.app, "/_next/static/app.js", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(location(&response).is_none());

    assert_eq!(h.backend.session_lookups(), 0);
}

#[tokio::test]
async fn anonymous_requests_to_protected_paths_go_to_login() {
    let h = harness();
    for path in ["/dashboard", "/dashboard/cards", "/admin", "/admin/ad-planning", "/no/such/page"] {
        let response = get(&h.app, path, None).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&response), Some("/auth/login"), "{path}");
    }
}

#[tokio::test]
async fn unknown_token_goes_to_login() {
    let h = harness();
    let response = get(&h.app, "/dashboard", Some("forged")).await;
    assert_eq!(location(&response), Some("/auth/login"));
    assert_eq!(h.backend.session_lookups(), 1);
}

#[tokio::test]
async fn admin_is_sent_from_dashboard_to_admin() {
    let h = harness();
    h.backend.sign_in("admin", Role::Admin);

    let response = get(&h.app, "/dashboard/analytics", Some("admin")).await;
    assert_eq!(location(&response), Some("/admin"));

    let response = get(&h.app, "/admin", Some("admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn member_is_sent_from_admin_to_dashboard() {
    let h = harness();
    h.backend.sign_in("member", Role::Member("user".into()));

    let response = get(&h.app, "/admin/spot-confirmation", Some("member")).await;
    assert_eq!(location(&response), Some("/dashboard"));

    let response = get(&h.app, "/dashboard", Some("member")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn following_a_redirect_does_not_loop() {
    let h = harness();
    h.backend.sign_in("admin", Role::Admin);

    let first = get(&h.app, "/dashboard", Some("admin")).await;
    let target = location(&first).unwrap().to_string();
    let second = get(&h.app, &target, Some("admin")).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(location(&second).is_none());
}

#[tokio::test]
async fn backend_failure_fails_closed() {
    let h = harness();
    h.backend.sign_in("admin", Role::Admin);
    h.backend.set_failing(true);

    let response = get(&h.app, "/admin", Some("admin")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/auth/login"));

    // Public pages stay reachable during an outage.
    let response = get(&h.app, "/auth/login", Some("admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_without_profile_goes_to_login() {
    let h = harness();
    h.backend.insert_session("orphan", SessionInfo { user_id: Uuid::new_v4(), expires_at: None });

    let response = get(&h.app, "/dashboard", Some("orphan")).await;
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn bearer_header_is_accepted() {
    let h = harness();
    h.backend.sign_in("tok", Role::Member("user".into()));

    let request = Request::builder()
        .uri("/dashboard")
        .header(header::AUTHORIZATION, "Bearer tok")
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn session_endpoint_reports_liveness() {
    let h = harness();
    let user_id = h.backend.sign_in("tok", Role::Member("user".into()));

    let body = json_body(get(&h.app, "/api/auth/session", Some("tok")).await).await;
    assert_eq!(body["active"], true);
    assert_eq!(body["user_id"], user_id.to_string());

    let body = json_body(get(&h.app, "/api/auth/session", None).await).await;
    assert_eq!(body, serde_json::json!({ "active": false }));

    h.backend.set_failing(true);
    let response = get(&h.app, "/api/auth/session", Some("tok")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"], "authentication service unavailable");
}

#[tokio::test]
async fn profile_api_authorizes_itself() {
    let h = harness();
    h.backend.sign_in("tok", Role::Admin);
    h.backend.insert_session("orphan", SessionInfo { user_id: Uuid::new_v4(), expires_at: None });

    let response = get(&h.app, "/api/user/profile", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(location(&response).is_none());

    let response = get(&h.app, "/api/user/profile", Some("orphan")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&h.app, "/api/user/profile", Some("tok")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["status"], "approved");
}

#[tokio::test]
async fn profile_api_looks_the_session_up_once() {
    let h = harness();
    let user_id = h.backend.sign_in("tok", Role::Member("user".into()));

    let response = get(&h.app, "/api/user/profile", Some("tok")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(h.backend.session_lookups(), 1);
    let body = json_body(response).await;
    assert_eq!(body["id"], user_id.to_string());
    assert_eq!(body["role"], "user");
}
