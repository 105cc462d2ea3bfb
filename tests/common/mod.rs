//! Common test utilities for artifact-cache integration tests

use artifact_cache::{ArtifactService, Config, api::create_router};
use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Body every mock origin serves
#[allow(dead_code)]
pub const TEST_BODY: &[u8] = b"This is test data";

/// A production-wired server: reqwest transport, temp-dir storage, memory index
pub struct TestServer {
    pub app: Router,
    pub service: Arc<ArtifactService>,
    pub download_dir: TempDir,
}

impl TestServer {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let download_dir = tempfile::tempdir().expect("failed to create temp dir");

        let mut config = Config::default();
        config.storage.download_dir = download_dir.path().to_path_buf();
        config.fetch.timeout = timeout;
        config.fetch.connect_timeout = Duration::from_secs(2);
        config.validate().expect("test config must be valid");

        let config = Arc::new(config);
        let service =
            Arc::new(ArtifactService::from_config(&config).expect("failed to build service"));
        let app = create_router(service.clone(), config);

        Self {
            app,
            service,
            download_dir,
        }
    }

    /// GET `/<prefix>/<url-encoded artifact url>`
    pub async fn fetch(&self, prefix: &str, artifact_url: &str) -> Response {
        let uri = format!("/{}/{}", prefix, urlencoding::encode(artifact_url));
        self.get(&uri).await
    }

    pub async fn get(&self, uri: &str) -> Response {
        let request = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("failed to build request");
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    /// Files currently present in the download directory
    #[allow(dead_code)]
    pub fn stored_files(&self) -> Vec<std::path::PathBuf> {
        std::fs::read_dir(self.download_dir.path())
            .map(|entries| entries.filter_map(|e| e.ok().map(|e| e.path())).collect())
            .unwrap_or_default()
    }
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body")
        .to_vec()
}

#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).expect("body is not utf-8")
}

#[allow(dead_code)]
pub fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
