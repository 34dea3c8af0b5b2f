mod test_utils;

use actix_web::{
    http::{header, Method, StatusCode},
    test, web, App,
};
use chrono::Duration;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use test_utils::*;
use uuid::Uuid;

use chosn_backend::{
    middlewares::auth::{is_public_route, AuthMiddleware},
    routes::configure_routes,
    settings::AppConfig,
    AppState,
};

fn app_state(config: &AppConfig) -> web::Data<AppState> {
    // Nothing below reaches the database, so the pool never connects.
    let pool = PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(1))
        .connect_lazy(&config.database_url)
        .expect("Failed to build lazy pool");
    web::Data::new(AppState::new(config, pool))
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .wrap(AuthMiddleware)
                .configure(configure_routes),
        )
        .await
    };
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_rt::test]
async fn home_is_public() {
    let state = app_state(&test_config());
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["api"], "/api/v1");
}

#[actix_rt::test]
async fn missing_token_is_rejected() {
    let state = app_state(&test_config());
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/me").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(body["details"], "Missing bearer token");
}

#[actix_rt::test]
async fn expired_token_is_rejected() {
    let state = app_state(&test_config());
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(-10));

    let req = test::TestRequest::get()
        .uri("/api/v1/matches")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"], "Token has expired");
}

#[actix_rt::test]
async fn token_signed_with_another_secret_is_rejected() {
    let mut config = test_config();
    config.jwt_secret = "a_completely_different_secret_value_0987654321".to_string();
    let state = app_state(&config);
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(10));

    let req = test::TestRequest::get()
        .uri("/api/v1/inbox")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["details"], "Invalid token");
}

#[actix_rt::test]
async fn admin_routes_require_the_admin_claim() {
    let state = app_state(&test_config());
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(10));

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/dashboard")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn public_developer_routes_validate_ids_without_a_token() {
    let state = app_state(&test_config());
    let app = test_app!(state);

    for uri in ["/api/v1/developers/not-a-uuid", "/api/v1/developers/not-a-uuid/card.svg"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid input: Invalid developer id");
    }
}

#[actix_rt::test]
async fn malformed_json_gets_a_json_error() {
    let state = app_state(&test_config());
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(10));

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/conversations/{}/messages", Uuid::new_v4()))
        .insert_header(bearer(&token))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"body\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid JSON payload");
}

#[actix_rt::test]
async fn skill_validation_without_github_token_is_unauthorized() {
    let state = app_state(&test_config());
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(10));

    let req = test::TestRequest::post()
        .uri("/api/v1/github/validate")
        .insert_header(bearer(&token))
        .set_json(serde_json::json!({ "save": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn github_connect_issues_a_state_bound_authorize_url() {
    let state = app_state(&test_config());
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(10));

    let req = test::TestRequest::post()
        .uri("/api/v1/github/connect")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let issued = body["state"].as_str().unwrap();
    assert!(body["authorize_url"].as_str().unwrap().contains(issued));
    assert_eq!(state.oauth_states.len(), 1);
}

#[actix_rt::test]
async fn callback_with_unknown_state_is_rejected() {
    let state = app_state(&test_config());
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/github/callback?code=abc&state=forged")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn event_streams_accept_the_token_as_a_query_parameter() {
    let state = app_state(&test_config());
    let app = test_app!(state);
    let token = mint_token(Uuid::new_v4(), false, Duration::minutes(10));

    // Passing auth leaves the bad id to be rejected by the handler.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/not-a-uuid/events?access_token={token}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Other routes ignore it.
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/conversations/not-a-uuid/messages?access_token={token}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn rate_limit_fails_open_without_redis() {
    let mut config = test_config();
    let state = app_state(&config);
    assert!(state.check_rate_limit("rate:messages:test", 1).await.is_ok());

    config.redis_url = Some("redis://127.0.0.1:1".to_string());
    let state = app_state(&config);
    for _ in 0..3 {
        assert!(state.check_rate_limit("rate:messages:test", 1).await.is_ok());
    }
}

#[actix_rt::test]
async fn public_route_allowlist() {
    let id = Uuid::new_v4();

    assert!(is_public_route("/", &Method::GET));
    assert!(is_public_route("/api/v1/developers", &Method::GET));
    assert!(is_public_route(&format!("/api/v1/developers/{id}"), &Method::GET));
    assert!(is_public_route(&format!("/api/v1/developers/{id}/card.svg"), &Method::GET));
    assert!(is_public_route("/api/v1/github/callback", &Method::GET));
    assert!(is_public_route("/api/v1/me", &Method::OPTIONS));

    assert!(!is_public_route("/api/v1/me", &Method::GET));
    assert!(!is_public_route("/api/v1/developers", &Method::POST));
    assert!(!is_public_route(&format!("/api/v1/developers/{id}/projects"), &Method::GET));
    assert!(!is_public_route("/api/v1/developers/", &Method::GET));
    assert!(!is_public_route("/api/v1/admin/health", &Method::GET));
}
