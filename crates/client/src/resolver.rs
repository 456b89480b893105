//! Upload endpoint resolution.

use serde::{Deserialize, Serialize};
use tfs_upload_protocol::constants::UPLOAD_SERVICE_PATH;
use url::Url;

/// Errors produced while resolving an endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// The server a client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerContext {
    /// Project collection URI, e.g. `https://tfs.example.com/tfs/DefaultCollection`.
    pub collection_uri: Url,
}

impl ServerContext {
    pub fn new(collection_uri: Url) -> Self {
        Self { collection_uri }
    }
}

/// A resolved service location: base URI plus a path relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub base_uri: Url,
    pub path: String,
}

impl ServiceEndpoint {
    /// Joins `path` under `base_uri`.
    ///
    /// The base is treated as a directory even without a trailing slash, so
    /// its last segment is kept.
    pub fn url(&self) -> Result<Url, ResolveError> {
        let mut base = self.base_uri.clone();
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        Ok(base.join(self.path.trim_start_matches('/'))?)
    }
}

/// Resolves the upload endpoint for a server.
///
/// Invoked once when an upload client is constructed.
pub trait EndpointResolver: Send + Sync {
    fn resolve(&self, server: &ServerContext) -> Result<ServiceEndpoint, ResolveError>;
}

/// Resolves the version-control upload handler under the collection URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadServiceResolver;

impl EndpointResolver for UploadServiceResolver {
    fn resolve(&self, server: &ServerContext) -> Result<ServiceEndpoint, ResolveError> {
        let scheme = server.collection_uri.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ResolveError::UnsupportedScheme(scheme.to_string()));
        }
        Ok(ServiceEndpoint {
            base_uri: server.collection_uri.clone(),
            path: UPLOAD_SERVICE_PATH.to_string(),
        })
    }
}

/// Always resolves to the same endpoint, regardless of server.
#[derive(Debug, Clone)]
pub struct StaticResolver(pub ServiceEndpoint);

impl EndpointResolver for StaticResolver {
    fn resolve(&self, _server: &ServerContext) -> Result<ServiceEndpoint, ResolveError> {
        Ok(self.0.clone())
    }
}
