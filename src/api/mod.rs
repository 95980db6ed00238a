// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::require_admin_session, SessionPolicy, SessionRecord},
    models::{
        AuthRequest, AuthResponse, AuthStatusResponse, DashboardResponse, LoginPageResponse,
        SessionInfoResponse,
    },
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod health;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/admin", get(admin::dashboard))
        .route("/admin/login", get(admin::login_page))
        .route(
            "/api/admin/auth",
            get(auth::auth_status).post(auth::auth_action),
        )
        .route("/api/admin/session", get(admin::session_info))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_admin_session,
        ))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        auth::auth_action,
        auth::auth_status,
        admin::login_page,
        admin::dashboard,
        admin::session_info
    ),
    components(
        schemas(
            AuthRequest,
            AuthResponse,
            AuthStatusResponse,
            LoginPageResponse,
            DashboardResponse,
            SessionInfoResponse,
            SessionRecord,
            SessionPolicy,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Admin login, logout and session check"),
        (name = "Admin", description = "Admin back office"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::bootstrap_state;
    use axum::{
        body::{to_bytes, Body},
        http::{
            header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
            Request, Response, StatusCode,
        },
    };
    use tower::ServiceExt;

    fn post_auth(body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/admin/auth")
            .header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// `name=value` pair from a `Set-Cookie` header.
    fn cookie_pair(response: &Response<Body>) -> String {
        let header = response
            .headers()
            .get(SET_COOKIE)
            .expect("Set-Cookie header")
            .to_str()
            .unwrap();
        header.split(';').next().unwrap().to_string()
    }

    async fn login(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(post_auth(r#"{"action":"login","password":"admin"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        cookie_pair(&response)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn bootstrap_login_then_auth_check() {
        let app = router(bootstrap_state(SessionPolicy::Validated));

        let response = app
            .clone()
            .oneshot(post_auth(r#"{"action":"login","password":"admin"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap().to_string();
        assert!(set_cookie.starts_with("admin_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));
        assert!(set_cookie.contains("Max-Age=86400"));
        assert!(!set_cookie.contains("Secure"));
        assert_eq!(json_body(response).await, serde_json::json!({"success": true}));

        let cookie = set_cookie.split(';').next().unwrap().to_string();
        let response = app
            .oneshot(get_request("/api/admin/auth", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"success": true, "authenticated": true})
        );
    }

    #[tokio::test]
    async fn wrong_password_returns_401_without_cookie() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app
            .oneshot(post_auth(r#"{"action":"login","password":"wrong"}"#, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert_eq!(json_body(response).await["error"], "Invalid password");
    }

    #[tokio::test]
    async fn missing_or_empty_password_returns_400() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        for body in [r#"{"action":"login"}"#, r#"{"action":"login","password":""}"#] {
            let response = app.clone().oneshot(post_auth(body, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(response.headers().get(SET_COOKIE).is_none());
            assert_eq!(json_body(response).await["error"], "Password is required");
        }
    }

    #[tokio::test]
    async fn unknown_action_and_bad_json_return_400() {
        let app = router(bootstrap_state(SessionPolicy::Validated));

        let response = app
            .clone()
            .oneshot(post_auth(r#"{"action":"reset"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid action");

        let response = app.oneshot(post_auth("{not json", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn auth_check_without_cookie_returns_401() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app.oneshot(get_request("/api/admin/auth", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"success": false, "authenticated": false})
        );
    }

    #[tokio::test]
    async fn logout_twice_succeeds_and_revokes() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let cookie = login(&app).await;

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_auth(r#"{"action":"logout"}"#, Some(&cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
            assert!(set_cookie.starts_with("admin_session=;"));
            assert!(set_cookie.contains("Max-Age=0"));
        }

        // The old token no longer opens the gate.
        let response = app
            .clone()
            .oneshot(get_request("/api/admin/auth", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Nor does the cleared cookie state.
        let response = app
            .oneshot(get_request("/api/admin/auth", Some("admin_session=")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn concurrent_logins_yield_independent_sessions() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let (first, second) = tokio::join!(login(&app), login(&app));
        assert_ne!(first, second);

        for cookie in [&first, &second] {
            let response = app
                .clone()
                .oneshot(get_request("/api/admin/auth", Some(cookie)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn stale_empty_cookie_does_not_mask_live_session() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let cookie = login(&app).await;

        let response = app
            .oneshot(get_request(
                "/api/admin/auth",
                Some(&format!("admin_session=; {cookie}")),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn logout_without_session_succeeds() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app
            .oneshot(post_auth(r#"{"action":"logout"}"#, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn admin_ui_redirects_to_login_without_session() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app.oneshot(get_request("/admin", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn login_page_is_public() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app.oneshot(get_request("/admin/login", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["authenticated"], false);
        assert_eq!(body["login_endpoint"], "/api/admin/auth");
    }

    #[tokio::test]
    async fn admin_ui_passes_with_session() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let cookie = login(&app).await;

        let response = app.oneshot(get_request("/admin", Some(&cookie))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["active_sessions"], 1);
        assert_eq!(body["session_policy"], "validated");
    }

    #[tokio::test]
    async fn admin_api_rejects_with_json_401() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app
            .oneshot(get_request("/api/admin/session", Some("admin_session=forged")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error_code"], "invalid_session");
    }

    #[tokio::test]
    async fn session_info_returns_record() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let cookie = login(&app).await;

        let response = app
            .oneshot(get_request("/api/admin/session", Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["session"]["session_id"].is_string());
        assert_eq!(body["active_sessions"], 1);
    }

    #[tokio::test]
    async fn presence_only_policy_trusts_any_cookie() {
        let app = router(bootstrap_state(SessionPolicy::PresenceOnly));
        let response = app
            .clone()
            .oneshot(get_request("/admin", Some("admin_session=forged")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/api/admin/session", Some("admin_session=forged")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await.get("session").is_none());
    }

    #[tokio::test]
    async fn health_reports_bootstrap_credential() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app.oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["checks"]["credential"], "bootstrap");
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(bootstrap_state(SessionPolicy::Validated));
        let response = app.oneshot(get_request("/health/live", None)).await.unwrap();
        assert!(response.headers().get("x-request-id").is_some());
    }
}
