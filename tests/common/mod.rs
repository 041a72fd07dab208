#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use slate::app::embed::PreviewPanes;
use slate::infra::iframely::RemoteResolver;
use slate::infra::store::PostStore;
use slate::{http, AppState};

// ---------------------------------------------------------------------------
// TestApp — one isolated instance per test, backed by a temp store file
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub state: AppState,
    data_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body_bytes).into_owned()
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_remote(None).await
    }

    pub async fn spawn_with_remote(remote: Option<Arc<dyn RemoteResolver>>) -> Self {
        let data_dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = PostStore::open(data_dir.path().join("posts.json"))
            .await
            .expect("failed to open store");

        let state = AppState {
            store,
            remote,
            panes: PreviewPanes::default(),
        };
        let router = http::router(state.clone());

        Self {
            router,
            state,
            data_dir,
        }
    }

    pub fn store_path(&self) -> std::path::PathBuf {
        self.data_dir.path().join("posts.json")
    }

    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("failed to build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates a post through the API and returns the response body.
    pub async fn seed_post(&self, draft: Value) -> Value {
        let resp = self.post_json("/posts", draft).await;
        assert_eq!(resp.status, StatusCode::OK, "seed failed: {}", resp.text());
        resp.json()
    }
}

// ---------------------------------------------------------------------------
// Draft builders
// ---------------------------------------------------------------------------

pub fn embed_draft(platform: &str, content: &str, date: &str) -> Value {
    json!({
        "platform": platform,
        "brand_name": "BAJI",
        "account_name": "@baji_official",
        "currency": "BDT",
        "creator_name": "Rafi",
        "posted_by": "Rafi",
        "media_type": "embed",
        "content": content,
        "date": date,
    })
}

pub fn screenshot_draft(platform: &str, redirect_link: &str, date: &str) -> Value {
    json!({
        "platform": platform,
        "brand_name": "JeetBuzz",
        "account_name": "@jeetbuzz",
        "currency": "BDT",
        "creator_name": "Nadia",
        "posted_by": "Nadia",
        "media_type": "screenshot",
        "screenshot": "data:image/png;base64,iVBORw0KGgo=",
        "redirect_link": redirect_link,
        "date": date,
    })
}

// ---------------------------------------------------------------------------
// Remote resolver stubs
// ---------------------------------------------------------------------------

/// Always answers with the same markup and counts how often it was asked.
pub struct FixedRemote {
    pub html: String,
    pub calls: AtomicUsize,
}

impl FixedRemote {
    pub fn new(html: &str) -> Arc<Self> {
        Arc::new(Self {
            html: html.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteResolver for FixedRemote {
    async fn resolve(&self, _url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.html.clone())
    }
}

/// Fails every lookup, as a dead or misconfigured service would.
pub struct FailingRemote;

#[async_trait]
impl RemoteResolver for FailingRemote {
    async fn resolve(&self, url: &str) -> Result<String> {
        Err(anyhow!("lookup failed for {url}"))
    }
}
