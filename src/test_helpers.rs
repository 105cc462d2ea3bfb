//! Shared test doubles for the fetcher, service and API tests.

use crate::error::{Error, Result};
use crate::fetcher::{Fetcher, RemoteResponse, Transport};
use crate::index::{ArtifactIndex, MemoryIndex};
use crate::service::ArtifactService;
use crate::storage::{ContentSink, MemorySink};
use crate::types::Artifact;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub(crate) const TEST_URL: &str = "intel.com/mkl.zip";
pub(crate) const TEST_BODY: &[u8] = b"This is test data";

/// Transport that answers every request with a closure, counting calls.
pub(crate) struct FnTransport<F> {
    handler: F,
    calls: AtomicUsize,
}

impl<F> FnTransport<F>
where
    F: Fn(&str) -> Result<RemoteResponse> + Send + Sync,
{
    pub(crate) fn new(handler: F) -> Self {
        Self {
            handler,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> Transport for FnTransport<F>
where
    F: Fn(&str) -> Result<RemoteResponse> + Send + Sync,
{
    async fn get(&self, url: &str) -> Result<RemoteResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.handler)(url)
    }
}

/// 200 response whose declared length matches the body.
pub(crate) fn ok_response(body: &'static [u8]) -> RemoteResponse {
    with_declared_length(body, Some(body.len() as u64))
}

/// 200 response with an arbitrary declared length.
pub(crate) fn with_declared_length(
    body: &'static [u8],
    content_length: Option<u64>,
) -> RemoteResponse {
    RemoteResponse {
        reason: None,
        status: reqwest::StatusCode::OK,
        content_length,
        body: stream::iter(vec![Ok(Bytes::from_static(body))]).boxed(),
    }
}

/// Response with the given status and an empty body.
pub(crate) fn status_response(status: reqwest::StatusCode) -> RemoteResponse {
    RemoteResponse {
        reason: None,
        status,
        content_length: None,
        body: stream::empty().boxed(),
    }
}

/// 200 response that sends one chunk and then never finishes.
pub(crate) fn stalled_response(first_chunk: &'static [u8]) -> RemoteResponse {
    RemoteResponse {
        reason: None,
        status: reqwest::StatusCode::OK,
        content_length: None,
        body: stream::iter(vec![Ok(Bytes::from_static(first_chunk))])
            .chain(stream::pending())
            .boxed(),
    }
}

/// Transport serving [`TEST_BODY`] for every URL.
pub(crate) fn serving_transport()
-> Arc<FnTransport<impl Fn(&str) -> Result<RemoteResponse> + Send + Sync>> {
    Arc::new(FnTransport::new(|_url: &str| Ok(ok_response(TEST_BODY))))
}

/// Index whose stores always fail and which never hits.
pub(crate) struct RejectingIndex;

impl ArtifactIndex for RejectingIndex {
    fn lookup(&self, _url: &str) -> Option<Artifact> {
        None
    }

    fn store(&self, url: &str, _artifact: Artifact) -> Result<()> {
        Err(Error::IndexStore {
            url: url.to_string(),
            reason: "index is read-only".to_string(),
        })
    }

    fn len(&self) -> usize {
        0
    }
}

/// Everything a service test needs to inspect after a request.
pub(crate) struct TestRig {
    pub(crate) service: ArtifactService,
    pub(crate) index: Arc<MemoryIndex>,
    pub(crate) sink: Arc<MemorySink>,
}

/// Service over a memory index and memory sink with the given transport.
pub(crate) fn create_test_service(transport: Arc<dyn Transport>) -> TestRig {
    create_test_service_with(transport, Arc::new(MemoryIndex::new()))
}

/// Same as [`create_test_service`] with a pre-built index.
pub(crate) fn create_test_service_with(
    transport: Arc<dyn Transport>,
    index: Arc<MemoryIndex>,
) -> TestRig {
    let sink = Arc::new(MemorySink::new());
    let sink_dyn: Arc<dyn ContentSink> = sink.clone();
    let index_dyn: Arc<dyn ArtifactIndex> = index.clone();
    let fetcher = Fetcher::new(
        transport,
        sink_dyn,
        Arc::clone(&index_dyn),
        Duration::from_secs(5),
    );

    TestRig {
        service: ArtifactService::new(index_dyn, fetcher),
        index,
        sink,
    }
}
