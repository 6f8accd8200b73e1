//! Live HTTP checks: each test binds the router to an ephemeral port and
//! talks to it with reqwest.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use meal_wheel::Store;
use meal_wheel::config::Config;
use meal_wheel::server::{self, AppState};

struct TestServer {
    base: String,
    client: reqwest::Client,
    _dir: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(Config::default()).await
    }

    async fn start_with(config: Config) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("food-wheel.json")).unwrap();
        let state: Arc<AppState> = AppState::new(store, config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, server::router(state)).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            client: reqwest::Client::new(),
            _dir: dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn user(&self) -> String {
        let body: Value = self
            .client
            .get(self.url("/api/user"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["userId"].as_str().unwrap().to_owned()
    }

    async fn add(&self, user: &str, name: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/wheel"))
            .json(&json!({ "userId": user, "recipeName": name, "sourceType": "popular" }))
            .send()
            .await
            .unwrap()
    }

    async fn wheel(&self, user: &str) -> Vec<Value> {
        self.client
            .get(self.url("/api/wheel"))
            .query(&[("userId", user)])
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

#[tokio::test]
async fn user_id_is_stable() {
    let srv = TestServer::start().await;
    let a = srv.user().await;
    let b = srv.user().await;
    assert_eq!(a, b);
    assert!(!a.is_empty());
}

#[tokio::test]
async fn popular_catalog_sorted() {
    let srv = TestServer::start().await;
    let recipes: Vec<Value> = srv
        .client
        .get(srv.url("/api/recipes/popular"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(recipes.len(), 18);
    assert_eq!(recipes[0]["name"], "BBQ");
    assert!(recipes[0]["id"].is_u64());
}

#[tokio::test]
async fn add_list_remove() {
    let srv = TestServer::start().await;
    let user = srv.user().await;

    let resp = srv.add(&user, "  Pizza ").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["item"]["recipe_name"], "Pizza");
    assert_eq!(body["item"]["color"], "#FF6B6B");
    assert_eq!(body["item"]["source_type"], "popular");

    let resp = srv.add(&user, "Pizza").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Pizza"));

    let items = srv.wheel(&user).await;
    assert_eq!(items.len(), 1);

    for _ in 0..2 {
        let resp = srv
            .client
            .delete(srv.url("/api/wheel"))
            .query(&[("userId", user.as_str()), ("recipeName", "Pizza")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
    assert!(srv.wheel(&user).await.is_empty());
}

#[tokio::test]
async fn full_wheel_rejected() {
    let srv = TestServer::start().await;
    let user = srv.user().await;
    for i in 0..12 {
        assert_eq!(srv.add(&user, &format!("Dish {i}")).await.status(), StatusCode::OK);
    }
    let resp = srv.add(&user, "Dish 12").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Wheel can only have a maximum of 12 recipes");
}

#[tokio::test]
async fn missing_user_id_is_bad_request() {
    let srv = TestServer::start().await;
    let resp = srv.client.get(srv.url("/api/wheel")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "User ID required");

    let resp = srv
        .client
        .post(srv.url("/api/wheel"))
        .json(&json!({ "recipeName": "Pizza", "sourceType": "popular" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_source_type_is_bad_request() {
    let srv = TestServer::start().await;
    let resp = srv
        .client
        .post(srv.url("/api/wheel"))
        .json(&json!({ "userId": "u", "recipeName": "Pizza", "sourceType": "secret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn custom_recipe_create_and_list() {
    let srv = TestServer::start().await;
    let user = srv.user().await;

    let resp = srv
        .client
        .post(srv.url("/api/recipes/custom"))
        .json(&json!({ "userId": user, "name": "Pho" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let customs: Vec<Value> = srv
        .client
        .get(srv.url("/api/recipes/custom"))
        .query(&[("userId", user.as_str())])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(customs.len(), 1);
    assert_eq!(customs[0]["name"], "Pho");

    let items = srv.wheel(&user).await;
    assert_eq!(items[0]["source_type"], "custom");

    let resp = srv
        .client
        .post(srv.url("/api/recipes/custom"))
        .json(&json!({ "userId": user, "name": "Pho" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn spin_empty_then_busy() {
    let srv = TestServer::start().await;
    let user = srv.user().await;

    let resp = srv
        .client
        .post(srv.url("/api/wheel/spin"))
        .json(&json!({ "userId": user }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    srv.add(&user, "Pizza").await;
    srv.add(&user, "Sushi").await;

    let resp = srv
        .client
        .post(srv.url("/api/wheel/spin"))
        .json(&json!({ "userId": user }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let name = body["chosen"]["recipe_name"].as_str().unwrap();
    assert!(name == "Pizza" || name == "Sushi");
    assert!(body["targetRotation"].as_f64().unwrap() >= 1800.0);
    assert_eq!(body["durationMs"], 4000);
    assert!(body["index"].as_u64().unwrap() < 2);

    let resp = srv
        .client
        .post(srv.url("/api/wheel/spin"))
        .json(&json!({ "userId": user }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn spin_accepted_again_after_duration() {
    let mut config = Config::default();
    config.wheel.spin_duration_ms = 0;
    let srv = TestServer::start_with(config).await;
    srv.add("u", "Pizza").await;

    let mut last = 0.0;
    for _ in 0..2 {
        let body: Value = srv
            .client
            .post(srv.url("/api/wheel/spin"))
            .json(&json!({ "userId": "u" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let target = body["targetRotation"].as_f64().unwrap();
        assert!(target >= last + 1800.0);
        last = target;
    }
}

#[tokio::test]
async fn svg_endpoint() {
    let srv = TestServer::start().await;

    let resp = srv
        .client
        .get(srv.url("/api/wheel/svg"))
        .query(&[("userId", "u")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/svg+xml");
    assert!(resp.text().await.unwrap().contains("No recipes yet"));

    srv.add("u", "Pizza & Chips").await;
    let svg = srv
        .client
        .get(srv.url("/api/wheel/svg"))
        .query(&[("userId", "u")])
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(svg.contains("<title>Pizza &amp; Chips</title>"));
    assert!(svg.contains("#FF6B6B"));
}
