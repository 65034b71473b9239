//! ApiClient against a local axum stub of the backend.

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use speakup_core::config::ClientConfig;
use speakup_core::content::{CollectionSource, ContentRepository, Filter, LikeRepository, Story};
use speakup_core::session::{AuthApi, BearerToken, UnauthorizedHook};
use speakup_core::user::Credentials;
use speakup_core::{ErrorKind, SpeakupError};
use speakup_interaction::{ApiClient, RestAuthApi, RestContentRepository};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

const GOOD_TOKEN: &str = "good-token";

#[derive(Default)]
struct StubState {
    login_saw_authorization: AtomicBool,
}

#[derive(Default)]
struct RecordingHook {
    rejected: Mutex<Vec<String>>,
}

impl RecordingHook {
    fn rejected(&self) -> Vec<String> {
        self.rejected.lock().unwrap().clone()
    }
}

#[async_trait]
impl UnauthorizedHook for RecordingHook {
    async fn on_unauthorized(&self, rejected_token: &str) {
        self.rejected.lock().unwrap().push(rejected_token.to_string());
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

async fn profile(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match bearer(&headers).as_deref() {
        Some(GOOD_TOKEN) => (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"_id": "u1", "name": "Ann", "email": "ann@x.com"}})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Not authorized, token failed"})),
        ),
    }
}

async fn login(State(state): State<Arc<StubState>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if headers.contains_key("authorization") {
        state.login_saw_authorization.store(true, Ordering::SeqCst);
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Invalid credentials"})),
    )
}

async fn stories(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let category = params.get("category").cloned().unwrap_or_else(|| "general".into());
    let situation = params.get("q").cloned().unwrap_or_default();
    Json(json!({
        "success": true,
        "count": 1,
        "data": [{
            "_id": "s1",
            "situation": situation,
            "whatISaid": "I'd like a refund",
            "outcome": "Refunded",
            "feeling": "proud",
            "category": category,
            "likes": 2,
            "hasLiked": false
        }]
    }))
}

async fn story_detail(Path(_id): Path<String>) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"success": false, "message": "Story not found"})))
}

async fn like_story(Path(id): Path<String>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if bearer(&headers).as_deref() != Some(GOOD_TOKEN) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Not authorized"})));
    }
    (
        StatusCode::OK,
        Json(json!({"success": true, "data": {"likes": 3, "hasLiked": true, "action": "liked", "id": id}})),
    )
}

async fn spawn_stub() -> (String, Arc<StubState>) {
    let state = Arc::new(StubState::default());
    let app = Router::new()
        .route("/api/auth/profile", get(profile))
        .route("/api/auth/login", post(login))
        .route("/api/stories", get(stories))
        .route("/api/stories/{id}", get(story_detail))
        .route("/api/stories/{id}/like", post(like_story))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), state)
}

struct Harness {
    client: Arc<ApiClient>,
    token: Arc<BearerToken>,
    hook: Arc<RecordingHook>,
    stub: Arc<StubState>,
}

async fn harness() -> Harness {
    let (api_url, stub) = spawn_stub().await;
    let config = ClientConfig {
        api_url,
        ..ClientConfig::default()
    };
    let token = Arc::new(BearerToken::new());
    let client = Arc::new(ApiClient::new(&config, token.clone()).unwrap());
    let hook = Arc::new(RecordingHook::default());
    let weak: Weak<dyn UnauthorizedHook> = Arc::downgrade(&hook) as Weak<dyn UnauthorizedHook>;
    client.set_unauthorized_hook(weak);
    Harness {
        client,
        token,
        hook,
        stub,
    }
}

#[tokio::test]
async fn test_profile_sends_current_bearer_token() {
    let h = harness().await;
    h.token.set(Some(GOOD_TOKEN.into())).await;

    let identity = RestAuthApi::new(h.client.clone()).profile().await.unwrap();

    assert_eq!(identity.name, "Ann");
    assert!(h.hook.rejected().is_empty());
}

#[tokio::test]
async fn test_rejected_token_is_reported_to_hook() {
    let h = harness().await;
    h.token.set(Some("expired".into())).await;

    let err = RestAuthApi::new(h.client.clone()).profile().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(h.hook.rejected(), vec!["expired".to_string()]);
}

#[tokio::test]
async fn test_401_without_token_does_not_fire_hook() {
    let h = harness().await;

    let err = RestAuthApi::new(h.client.clone()).profile().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(h.hook.rejected().is_empty());
}

#[tokio::test]
async fn test_login_never_carries_token_or_fires_hook() {
    let h = harness().await;
    h.token.set(Some(GOOD_TOKEN.into())).await;

    let err = RestAuthApi::new(h.client.clone())
        .login(&Credentials::new("ann@x.com", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err, SpeakupError::unauthorized("Invalid credentials"));
    assert!(!h.stub.login_saw_authorization.load(Ordering::SeqCst));
    assert!(h.hook.rejected().is_empty());
}

#[tokio::test]
async fn test_collection_query_carries_filter() {
    let h = harness().await;
    let stories = RestContentRepository::<Story>::new(h.client.clone());

    let filter = Filter::all()
        .with_category(Some("billing"))
        .with_search(Some("refund"));
    let items = stories.fetch(&filter).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].category, "billing");
    assert_eq!(items[0].situation, "refund");
}

#[tokio::test]
async fn test_missing_entity_maps_to_not_found() {
    let h = harness().await;
    let stories = RestContentRepository::<Story>::new(h.client.clone());

    let err = stories.find_by_id("nope").await.unwrap_err();

    assert_eq!(err, SpeakupError::not_found("Story", "nope"));
}

#[tokio::test]
async fn test_like_returns_receipt() {
    let h = harness().await;
    h.token.set(Some(GOOD_TOKEN.into())).await;
    let stories = RestContentRepository::<Story>::new(h.client.clone());

    let receipt = stories.like("s1").await.unwrap();

    assert_eq!(receipt.likes, 3);
    assert_eq!(receipt.has_liked, Some(true));
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let config = ClientConfig {
        api_url: "http://127.0.0.1:9/api".into(),
        request_timeout_secs: 2,
        ..ClientConfig::default()
    };
    let client = Arc::new(ApiClient::new(&config, Arc::new(BearerToken::new())).unwrap());

    let err = RestAuthApi::new(client).profile().await.unwrap_err();

    assert!(err.is_network());
    assert!(err.is_retryable());
}
