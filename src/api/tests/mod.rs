use super::*;
use crate::fetcher::{Fetcher, Transport};
use crate::index::{ArtifactIndex, MemoryIndex};
use crate::storage::TempDirSink;
use crate::test_helpers::{TestRig, create_test_service};
use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use std::time::Duration;
use tempfile::tempdir;
use tower::ServiceExt;


/// Router over a memory-backed service, plus the rig for inspection
fn create_test_app(transport: Arc<dyn Transport>) -> (Router, Arc<MemoryIndex>) {
    let TestRig { service, index, .. } = create_test_service(transport);
    let app = create_router(Arc::new(service), Arc::new(Config::default()));
    (app, index)
}

/// Router whose downloads land as files under a temp dir
fn create_disk_app(transport: Arc<dyn Transport>) -> (Router, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let index: Arc<dyn ArtifactIndex> = Arc::new(MemoryIndex::new());
    let fetcher = Fetcher::new(
        transport,
        Arc::new(TempDirSink::new(temp_dir.path())),
        Arc::clone(&index),
        Duration::from_secs(5),
    );
    let service = ArtifactService::new(index, fetcher);
    let app = create_router(Arc::new(service), Arc::new(Config::default()));
    (app, temp_dir)
}

async fn send(app: &Router, uri: &str) -> Response {
    send_request(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn send_request(app: &Router, request: Request) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn test_api_server_spawns() {
    let TestRig { service, .. } = create_test_service(crate::test_helpers::serving_transport());

    let mut config = Config::default();
    config.server.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);

    let api_handle = tokio::spawn({
        let service = Arc::new(service);
        let config = config.clone();
        async move { start_api_server(service, config).await }
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    // Still running means bind succeeded
    assert!(!api_handle.is_finished());
    api_handle.abort();
}

#[tokio::test]
async fn test_api_server_reports_bind_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let taken = listener.local_addr().unwrap();

    let TestRig { service, .. } = create_test_service(crate::test_helpers::serving_transport());
    let mut config = Config::default();
    config.server.bind_address = taken;

    let result = start_api_server(Arc::new(service), Arc::new(config)).await;

    assert!(matches!(result, Err(crate::Error::Io(_))));
}
