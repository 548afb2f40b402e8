#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use greenline::{
    blob_store::MemoryBlobStore,
    build_app,
    config::{AdminSecret, AuthMode, Config, DEFAULT_MAX_UPLOAD_BYTES},
    get_random_free_port, init_db, serve,
};
use reqwest::{multipart, Response};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const ADMIN_PASSWORD: &str = "mow-the-lawn";
pub const SESSION_SECRET: &str = "test-session-secret";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub pool: SqlitePool,
    pub blobs: Arc<MemoryBlobStore>,
    /// Holds the database and its WAL files; removed on drop.
    _db_dir: TempDir,
}

pub fn test_config(auth_mode: AuthMode, database_url: String) -> Config {
    Config {
        database_url,
        admin_secret: Some(AdminSecret::Plain(ADMIN_PASSWORD.to_string())),
        session_secret: SESSION_SECRET.to_string(),
        auth_mode,
        blob_dir: "blobs".into(),
        public_blob_base_url: None,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        address: "127.0.0.1:0".parse().unwrap(),
        allowed_origins: vec![],
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(AuthMode::Presence).await
}

pub async fn spawn_app_with(auth_mode: AuthMode) -> TestApp {
    let db_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let database_url = format!("sqlite://{}", db_dir.path().join("greenline.db").display());
    let pool = init_db(&database_url).await.expect("Failed to set up database");
    let blobs = Arc::new(MemoryBlobStore::new());
    let config = Arc::new(test_config(auth_mode, database_url));

    let app = build_app(config, pool.clone(), blobs.clone());
    let listener = get_random_free_port().expect("Failed to bind test port");
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        serve(app, listener).await.expect("Server error");
    });

    TestApp {
        address,
        client: reqwest::Client::new(),
        pool,
        blobs,
        _db_dir: db_dir,
    }
}

pub fn post_body(title: &str, published: bool) -> Value {
    json!({
        "title": title,
        "content": "# Heading\n\nSome text.\n- item",
        "excerpt": "Short excerpt",
        "category": "tips",
        "tags": ["fall", "leaves"],
        "published": published,
    })
}

impl TestApp {
    pub fn db_dir(&self) -> &Path {
        self._db_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn login(&self, password: &str) -> Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "password": password }))
            .send()
            .await
            .unwrap()
    }

    pub async fn login_token(&self) -> String {
        let body: Value = self.login(ADMIN_PASSWORD).await.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn create_post(&self, auth: Option<&str>, body: &Value) -> Response {
        let mut request = self.client.post(self.url("/api/blog/posts")).json(body);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        request.send().await.unwrap()
    }

    /// Creates a post and returns `(id, slug)`.
    pub async fn seed_post(&self, title: &str, published: bool) -> (String, String) {
        let response = self
            .create_post(Some("Bearer anything"), &post_body(title, published))
            .await;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        (
            body["post"]["id"].as_str().unwrap().to_string(),
            body["post"]["slug"].as_str().unwrap().to_string(),
        )
    }

    pub async fn upload(
        &self,
        auth: Option<&str>,
        bytes: &[u8],
        file_name: &str,
        content_type: &str,
        post_id: Option<&str>,
    ) -> Response {
        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .unwrap();
        let mut form = multipart::Form::new().part("image", part);
        if let Some(post_id) = post_id {
            form = form.text("postId", post_id.to_string()).text("caption", "before");
        }
        let mut request = self.client.post(self.url("/api/images/upload")).multipart(form);
        if let Some(auth) = auth {
            request = request.header("Authorization", auth);
        }
        request.send().await.unwrap()
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<sqlx::Sqlite, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
