#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

use chefchecker::{
    build_app,
    config::{AppConfig, UploadConfig},
    db,
    storage::StorageClient,
    AppState,
};

pub const BOUNDARY: &str = "chefchecker-test-boundary";

/// Storage double that keeps objects in memory so tests can inspect them.
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn contains_url(&self, url: &str) -> bool {
        match self.key_for_url(url) {
            Some(key) => self.objects.lock().unwrap().contains_key(&key),
            None => false,
        }
    }
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn put_object(&self, key: &str, body: Bytes, _content_type: &str) -> Result<()> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("/uploads/{key}")
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix("/uploads/").map(str::to_string)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: SqlitePool,
    pub storage: Arc<MemoryStorage>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub async fn spawn_app() -> Result<TestApp> {
    let pool = db::connect_in_memory().await?;
    db::migrate(&pool).await?;

    let config = AppConfig {
        database_url: "sqlite::memory:".into(),
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        uploads: UploadConfig {
            dir: std::env::temp_dir().join("chefchecker-test-uploads"),
            url_prefix: "/uploads".into(),
            max_bytes: 3 * 1024 * 1024,
        },
    };

    let storage = Arc::new(MemoryStorage::default());
    let state = AppState::from_parts(
        pool.clone(),
        Arc::new(config),
        storage.clone() as Arc<dyn StorageClient>,
    );

    Ok(TestApp {
        router: build_app(state),
        db: pool,
        storage,
    })
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Result<TestResponse> {
        let res = self
            .router
            .clone()
            .oneshot(req)
            .await
            .context("router call failed")?;
        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(TestResponse {
            status,
            location,
            body,
        })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Request::get(uri).body(Body::empty())?).await
    }

    pub async fn delete(&self, uri: &str) -> Result<TestResponse> {
        self.send(Request::delete(uri).body(Body::empty())?).await
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> Result<TestResponse> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        self.send(req).await
    }

    pub async fn multipart(&self, method: Method, uri: &str, form: Multipart) -> Result<TestResponse> {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(form.finish()))?;
        self.send(req).await
    }

    /// Registers `name` with `<name>@example.com` / `password123` and returns the id.
    pub async fn register(&self, name: &str) -> Result<i64> {
        let res = self
            .json(
                Method::POST,
                "/api/auth/register",
                serde_json::json!({
                    "username": name,
                    "email": format!("{name}@example.com"),
                    "password": "password123",
                }),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "register failed: {:?}", res.body);
        res.body["id"].as_i64().context("register returned no id")
    }

    /// Creates a recipe owned by `user_id` and returns its id.
    pub async fn create_recipe(&self, user_id: i64, title: &str, extra: &[(&str, &str)]) -> Result<i64> {
        let mut form = Multipart::new()
            .text("user_id", &user_id.to_string())
            .text("title", title)
            .text("ingredients", "flour, water")
            .text("instructions", "mix and bake");
        for (name, value) in extra {
            form = form.text(name, value);
        }
        let res = self.multipart(Method::POST, "/api/recipes", form).await?;
        anyhow::ensure!(res.status == StatusCode::CREATED, "create failed: {:?}", res.body);
        res.body["recipeId"].as_i64().context("create returned no recipeId")
    }
}

/// Minimal multipart/form-data body builder.
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}
