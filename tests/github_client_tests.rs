mod test_utils;

use std::{collections::HashMap, net::TcpListener, time::Duration};

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::json;
use test_utils::*;
use url::Url;
use uuid::Uuid;

use chosn_backend::{
    github::{
        client::{GitHubClient, GitHubError},
        oauth::{GitHubOAuth, OAuthStateStore, OAUTH_SCOPES},
    },
    repositories::github::GitHubApi,
};

const GOOD_TOKEN: &str = "gho_good";
const REVOKED_TOKEN: &str = "gho_revoked";

fn bearer(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn check_request(req: &HttpRequest) -> Option<HttpResponse> {
    if req.headers().get("user-agent").is_none() {
        return Some(HttpResponse::Forbidden().json(json!({"message": "User-Agent required"})));
    }
    match bearer(req).as_deref() {
        Some(GOOD_TOKEN) => None,
        Some(REVOKED_TOKEN) => Some(HttpResponse::Unauthorized().json(json!({"message": "Bad credentials"}))),
        _ => Some(HttpResponse::InternalServerError().finish()),
    }
}

async fn user(req: HttpRequest) -> HttpResponse {
    if let Some(rejection) = check_request(&req) {
        return rejection;
    }
    HttpResponse::Ok().json(json!({
        "id": 583231,
        "login": "octocat",
        "name": "The Octocat",
        "avatar_url": "https://avatars.githubusercontent.com/u/583231",
        "public_repos": 8,
        "followers": 120
    }))
}

async fn repos(req: HttpRequest, query: web::Query<HashMap<String, String>>) -> HttpResponse {
    if let Some(rejection) = check_request(&req) {
        return rejection;
    }
    if query.get("type").map(String::as_str) != Some("owner") {
        return HttpResponse::BadRequest().finish();
    }
    let repos: Vec<_> = (0..60)
        .map(|i| {
            json!({
                "name": format!("repo-{i}"),
                "language": "Rust",
                "size": 1200,
                "pushed_at": "2025-05-01T10:00:00Z",
                "fork": false
            })
        })
        .collect();
    HttpResponse::Ok().json(repos)
}

async fn access_token(form: web::Form<HashMap<String, String>>) -> HttpResponse {
    if form.get("client_secret").map(String::as_str) != Some("test-client-secret") {
        return HttpResponse::Ok().json(json!({"error": "incorrect_client_credentials"}));
    }
    match form.get("code").map(String::as_str) {
        Some("valid-code") => HttpResponse::Ok().json(json!({"access_token": GOOD_TOKEN, "token_type": "bearer"})),
        _ => HttpResponse::Ok().json(json!({
            "error": "bad_verification_code",
            "error_description": "The code passed is incorrect or expired."
        })),
    }
}

/// Serves a stand-in for the GitHub API and OAuth endpoints.
async fn spawn_fake_github() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake GitHub");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    let server = HttpServer::new(|| {
        App::new()
            .route("/user", web::get().to(user))
            .route("/user/repos", web::get().to(repos))
            .route("/login/oauth/access_token", web::post().to(access_token))
    })
    .listen(listener)
    .expect("Failed to start fake GitHub")
    .workers(1)
    .run();

    tokio::spawn(server);
    address
}

fn client_for(address: &str) -> GitHubClient {
    GitHubClient::with_client(reqwest::Client::new(), address, Duration::from_secs(2))
}

#[actix_rt::test]
async fn fetches_the_authenticated_user() {
    let address = spawn_fake_github().await;
    let client = client_for(&address);

    let user = client.get_authenticated_user(GOOD_TOKEN).await.unwrap();

    assert_eq!(user.login, "octocat");
    assert_eq!(user.public_repos, 8);
    assert_eq!(user.followers, 120);
}

#[actix_rt::test]
async fn repository_list_is_capped_at_fifty() {
    let address = spawn_fake_github().await;
    let client = client_for(&address);

    let repos = client.list_owned_repositories(GOOD_TOKEN).await.unwrap();

    assert_eq!(repos.len(), 50);
    assert_eq!(repos[0].language.as_deref(), Some("Rust"));
    assert!(repos[0].pushed_at.is_some());
}

#[actix_rt::test]
async fn rejected_token_maps_to_unauthorized() {
    let address = spawn_fake_github().await;
    let client = client_for(&address);

    let err = client.list_owned_repositories(REVOKED_TOKEN).await.unwrap_err();

    assert_eq!(err, GitHubError::Unauthorized);
}

#[actix_rt::test]
async fn server_errors_map_to_remote_unavailable() {
    let address = spawn_fake_github().await;
    let client = client_for(&address);

    let err = client.get_authenticated_user("gho_unknown").await.unwrap_err();

    assert!(matches!(err, GitHubError::RemoteUnavailable(msg) if msg.contains("500")));
}

#[actix_rt::test]
async fn unreachable_github_maps_to_remote_unavailable() {
    let client = client_for("http://127.0.0.1:9");

    let err = client.get_authenticated_user(GOOD_TOKEN).await.unwrap_err();

    assert!(matches!(err, GitHubError::RemoteUnavailable(_)));
}

#[actix_rt::test]
async fn blank_token_is_rejected_without_a_request() {
    let client = client_for("http://127.0.0.1:9");

    assert_eq!(
        client.list_owned_repositories("   ").await.unwrap_err(),
        GitHubError::Unauthorized
    );
}

#[test]
fn authorize_url_carries_client_scopes_and_state() {
    let oauth = GitHubOAuth::new(&test_config());

    let url = Url::parse(&oauth.authorize_url("abc123").unwrap()).unwrap();
    let query: HashMap<String, String> = url.query_pairs().into_owned().collect();

    assert_eq!(url.path(), "/login/oauth/authorize");
    assert_eq!(query.get("client_id").map(String::as_str), Some("test-client-id"));
    assert_eq!(query.get("scope").map(String::as_str), Some(OAUTH_SCOPES));
    assert_eq!(query.get("state").map(String::as_str), Some("abc123"));
    assert_eq!(
        query.get("redirect_uri").map(String::as_str),
        Some("http://localhost:3000/github/callback")
    );
}

#[test]
fn unconfigured_oauth_refuses_to_build_urls() {
    let mut config = test_config();
    config.github_client_id.clear();
    config.github_client_secret.clear();
    let oauth = GitHubOAuth::new(&config);

    assert!(!oauth.is_configured());
    assert_eq!(oauth.authorize_url("abc").unwrap_err(), GitHubError::NotConfigured);
}

#[test]
fn oauth_debug_output_hides_the_secret() {
    let oauth = GitHubOAuth::new(&test_config());

    assert!(!format!("{oauth:?}").contains("test-client-secret"));
}

#[actix_rt::test]
async fn code_exchange_returns_the_access_token() {
    let address = spawn_fake_github().await;
    let mut config = test_config();
    config.github_oauth_url = address;
    let oauth = GitHubOAuth::new(&config);

    let token = oauth.exchange_code("valid-code").await.unwrap();
    assert_eq!(token.as_str(), GOOD_TOKEN);

    let err = oauth.exchange_code("stale-code").await.unwrap_err();
    assert_eq!(err, GitHubError::Unauthorized);
}

#[test]
fn oauth_state_is_single_use() {
    let store = OAuthStateStore::default();
    let user_id = Uuid::new_v4();

    let state = store.issue(user_id);
    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(store.len(), 1);

    assert_eq!(store.consume(&state).unwrap(), user_id);
    assert_eq!(store.consume(&state).unwrap_err(), GitHubError::InvalidState);
    assert!(store.is_empty());
}

#[test]
fn unknown_state_is_rejected() {
    let store = OAuthStateStore::default();
    store.issue(Uuid::new_v4());

    assert_eq!(store.consume("forged").unwrap_err(), GitHubError::InvalidState);
    assert_eq!(store.len(), 1);
}

#[test]
fn expired_states_are_rejected_and_pruned() {
    let store = OAuthStateStore::with_ttl(Duration::from_millis(10));
    let first = store.issue(Uuid::new_v4());
    store.issue(Uuid::new_v4());

    std::thread::sleep(Duration::from_millis(30));

    assert_eq!(store.consume(&first).unwrap_err(), GitHubError::InvalidState);
    assert_eq!(store.prune_expired(), 1);
    assert!(store.is_empty());
}
