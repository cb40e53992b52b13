use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{delete, get, post},
};

use super::{accounts, documents};
use crate::portal::Portal;
use crate::store::Store;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

pub struct AppState {
    pub portal: Portal,
    /// Upper bound on a multipart upload body.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, data_dir: PathBuf) -> Self {
        Self {
            portal: Portal::new(store, &data_dir),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

fn api_router(max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        // Accounts and sessions
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/session", get(accounts::current_session))
        // Documents
        .route("/documents", get(documents::list_documents))
        .route(
            "/documents",
            post(documents::upload_document).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/documents/{id}", delete(documents::delete_document))
        .route("/documents/{id}/download", get(documents::download_document))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router(state.max_upload_bytes))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request as HttpRequest, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(temp: &TempDir) -> Router {
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        create_router(Arc::new(AppState::new(
            Arc::new(store),
            temp.path().to_path_buf(),
        )))
    }

    #[tokio::test]
    async fn test_health() {
        let temp = TempDir::new().unwrap();

        let response = app(&temp)
            .oneshot(HttpRequest::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_documents_require_session() {
        let temp = TempDir::new().unwrap();

        let response = app(&temp)
            .oneshot(
                HttpRequest::get("/api/v1/documents")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("www-authenticate"));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let temp = TempDir::new().unwrap();

        let response = app(&temp)
            .oneshot(
                HttpRequest::get("/api/v1/nothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
