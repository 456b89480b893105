//! Scripted transport shared by the client and orchestrator tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName};
use reqwest::{Request, StatusCode};
use tokio::sync::Notify;
use url::Url;

use crate::auth::Authorization;
use crate::client::ChunkedUploadClient;
use crate::resolver::{ServerContext, ServiceEndpoint, StaticResolver};
use crate::transport::{HttpTransport, TransportError, TransportResponse};

pub(crate) struct Recorded {
    pub url: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

/// Records requests and answers them from a script.
///
/// `script[i]` answers the i-th request: `Ok(status)`, or `Err(message)`
/// for a connection failure. Requests past the script get 200.
pub(crate) struct MockTransport {
    pub script: Vec<Result<u16, String>>,
    pub requests: Mutex<Vec<Recorded>>,
    pub on_execute: Option<Box<dyn Fn(usize) + Send + Sync>>,
    /// Fails any request whose body contains this marker with status 500.
    pub reject_marker: Option<Vec<u8>>,
    /// Holds any request whose body contains the marker until notified.
    pub gate: Option<(Vec<u8>, Arc<Notify>)>,
}

impl MockTransport {
    pub fn ok() -> Self {
        Self::scripted(Vec::new())
    }

    pub fn scripted(script: Vec<Result<u16, String>>) -> Self {
        Self {
            script,
            requests: Mutex::new(Vec::new()),
            on_execute: None,
            reject_marker: None,
            gate: None,
        }
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpTransport for MockTransport {
    fn execute(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>> {
        Box::pin(async move {
            let header = |name: HeaderName| {
                request
                    .headers()
                    .get(name)
                    .map(|v| v.to_str().unwrap().to_string())
            };
            let recorded = Recorded {
                url: request.url().to_string(),
                content_type: header(CONTENT_TYPE),
                authorization: header(AUTHORIZATION),
                body: request
                    .body()
                    .and_then(|b| b.as_bytes())
                    .map(|b| b.to_vec())
                    .unwrap_or_default(),
            };
            let contains = |marker: &[u8]| {
                recorded
                    .body
                    .windows(marker.len())
                    .any(|w| w == marker)
            };
            let rejected = self.reject_marker.as_deref().is_some_and(contains);
            let gate = self
                .gate
                .as_ref()
                .filter(|(marker, _)| contains(marker))
                .map(|(_, notify)| Arc::clone(notify));
            let index = {
                let mut reqs = self.requests.lock().unwrap();
                reqs.push(recorded);
                reqs.len() - 1
            };
            if let Some(hook) = &self.on_execute {
                hook(index);
            }
            if let Some(notify) = gate {
                notify.notified().await;
            }
            let answer = if rejected {
                Ok(500)
            } else {
                self.script.get(index).cloned().unwrap_or(Ok(200))
            };
            match answer {
                Ok(code) => Ok(TransportResponse {
                    status: StatusCode::from_u16(code).unwrap(),
                    body: format!("status {code}"),
                }),
                Err(msg) => Err(TransportError::Connection(msg)),
            }
        })
    }
}

/// Client pointed at a fixed test endpoint.
pub(crate) fn client_for(
    transport: Arc<MockTransport>,
    auth: Arc<dyn Authorization>,
    chunk_size: usize,
) -> ChunkedUploadClient {
    let base = Url::parse("http://tfs.test/tfs/Coll").unwrap();
    let resolver = StaticResolver(ServiceEndpoint {
        base_uri: base.clone(),
        path: "VersionControl/v1.0/upload.ashx".into(),
    });
    let server = ServerContext::new(base);
    ChunkedUploadClient::new(&resolver, &server, auth, transport)
        .unwrap()
        .with_chunk_size(chunk_size)
}
