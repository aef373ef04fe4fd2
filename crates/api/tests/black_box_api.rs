use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;

use userhub_api::app::{build_app, AppServices};
use userhub_core::{User, UserId};
use userhub_infra::{InMemoryUserRepository, RepositoryError, UserRepository, UserStream};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(services: AppServices) -> Self {
        // Same router as prod, bound to an ephemeral port.
        let app = build_app(Arc::new(services));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Counts writes reaching the store.
#[derive(Default)]
struct CountingRepository {
    inner: InMemoryUserRepository,
    inserts: AtomicUsize,
}

#[async_trait]
impl UserRepository for CountingRepository {
    async fn insert(&self, user: User) -> Result<User, RepositoryError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(user).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.inner.find_by_id(id).await
    }

    fn find_all(&self) -> UserStream<'_> {
        self.inner.find_all()
    }

    async fn upsert(&self, user: User) -> Result<User, RepositoryError> {
        self.inner.upsert(user).await
    }

    async fn delete_by_id(&self, id: &UserId) -> Result<(), RepositoryError> {
        self.inner.delete_by_id(id).await
    }
}

/// Every operation fails as if the database were down.
struct BrokenRepository;

fn down() -> RepositoryError {
    RepositoryError::Backend("connection refused".to_string())
}

#[async_trait]
impl UserRepository for BrokenRepository {
    async fn insert(&self, _user: User) -> Result<User, RepositoryError> {
        Err(down())
    }

    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, RepositoryError> {
        Err(down())
    }

    fn find_all(&self) -> UserStream<'_> {
        Box::pin(tokio_stream::iter(vec![Err(down())]))
    }

    async fn upsert(&self, _user: User) -> Result<User, RepositoryError> {
        Err(down())
    }

    async fn delete_by_id(&self, _id: &UserId) -> Result<(), RepositoryError> {
        Err(down())
    }
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_request_never_reaches_the_store() {
    let repo = Arc::new(CountingRepository::default());
    let srv = TestServer::spawn(AppServices::with_repository(repo.clone())).await;

    let client = reqwest::Client::new();
    let res = client
        .post(srv.users_url())
        .json(&json!({ "name": "gabriel ", "email": "gabriel@gmail.com", "password": "123" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["fieldName"], "name");
    assert_eq!(repo.inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn user_lifecycle_create_list_update_delete() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(srv.users_url())
        .json(&json!({ "name": "gabriel", "email": "gabriel@gmail.com", "password": "123" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(res.text().await.unwrap().is_empty());

    // List
    let res = client.get(srv.users_url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let list: Vec<serde_json::Value> = res.json().await.unwrap();
    assert_eq!(list.len(), 1);
    let id = list[0]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    // Partial update
    let res = client
        .patch(format!("{}/{}", srv.users_url(), id))
        .json(&json!({ "name": "gabriel darlan" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let updated: serde_json::Value = res.json().await.unwrap();
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "gabriel darlan");
    assert_eq!(updated["email"], "gabriel@gmail.com");
    assert_eq!(updated["password"], "123");

    // Delete
    let res = client
        .delete(format!("{}/{}", srv.users_url(), id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/{}", srv.users_url(), id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body["message"].as_str().unwrap(),
        format!("Object not found. Id: {id}, Type: User")
    );
}

#[tokio::test]
async fn store_outage_is_internal_server_error() {
    let srv = TestServer::spawn(AppServices::with_repository(Arc::new(BrokenRepository))).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.users_url()).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], 500);
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["path"], "/users");
    assert!(!body["message"].as_str().unwrap().contains("connection refused"));

    let res = client
        .get(format!("{}/12345", srv.users_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn concurrent_creates_with_distinct_emails_all_succeed() {
    let srv = TestServer::spawn(AppServices::in_memory()).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let client = client.clone();
        let url = srv.users_url();
        tasks.push(tokio::spawn(async move {
            client
                .post(url)
                .json(&json!({ "name": format!("user{i}"), "email": format!("user{i}@x.io"), "password": "pw" }))
                .send()
                .await
                .unwrap()
                .status()
        }));
    }
    for t in tasks {
        assert_eq!(t.await.unwrap(), StatusCode::CREATED);
    }

    let list: Vec<serde_json::Value> = client
        .get(srv.users_url())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 16);
}
