use std::path::Path;
use std::sync::Arc;

use docportal::server::{AppState, create_router};
use docportal::store::{SqliteStore, Store};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::task::JoinHandle;

pub struct TestServer {
    pub temp_dir: TempDir,
    pub base_url: String,
    pub client: reqwest::Client,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_limit(docportal::server::DEFAULT_MAX_UPLOAD_BYTES).await
    }

    /// Starts a server in this process on an ephemeral port.
    pub async fn start_with_limit(max_upload_bytes: usize) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let data_dir = temp_dir.path().to_path_buf();

        let store = SqliteStore::new(data_dir.join("portal.db")).expect("open store");
        store.initialize().expect("initialize schema");

        let state = Arc::new(
            AppState::new(Arc::new(store), data_dir).with_max_upload_bytes(max_upload_bytes),
        );
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("local addr").port();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            temp_dir,
            base_url: format!("http://127.0.0.1:{port}"),
            client: reqwest::Client::new(),
            handle: Some(handle),
        }
    }

    pub fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/register"))
            .json(&json!({"username": username, "password": password, "role": role}))
            .send()
            .await
            .expect("register request")
    }

    pub async fn login(&self, username: &str, password: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .json(&json!({"username": username, "password": password, "role": role}))
            .send()
            .await
            .expect("login request")
    }

    /// Registers an account and returns a bearer token for it.
    pub async fn token_for(&self, username: &str, role: &str) -> String {
        let resp = self.register(username, "secret", role).await;
        assert_eq!(resp.status(), 201, "register {username}");

        let resp = self.login(username, "secret", role).await;
        assert_eq!(resp.status(), 200, "login {username}");

        let body: Value = resp.json().await.expect("parse login response");
        body["data"]["token"]
            .as_str()
            .expect("token in login response")
            .to_string()
    }

    pub async fn upload(
        &self,
        token: &str,
        file_name: &str,
        data: &[u8],
        title: &str,
    ) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("title", title.to_string())
            .part("file", part);

        self.client
            .post(self.url("/documents"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .expect("upload request")
    }

    pub async fn list(&self, token: &str) -> Vec<Value> {
        let resp = self
            .client
            .get(self.url("/documents"))
            .bearer_auth(token)
            .send()
            .await
            .expect("list request");
        assert_eq!(resp.status(), 200);

        let body: Value = resp.json().await.expect("parse list response");
        body["data"].as_array().expect("document array").clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
