//! HTTP transport used to dispatch chunk requests.
//!
//! Timeouts and connection pooling live here, not in the upload client.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Request, StatusCode};
use tracing::warn;

use crate::settings::UploadSettings;

/// Errors raised while sending a request or reading its response.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("connection error: {0}")]
    Connection(String),
}

/// Status and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Sends a fully built request and waits for its response.
pub trait HttpTransport: Send + Sync {
    fn execute(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>>;
}

/// [`HttpTransport`] backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the timeouts and user agent from `settings`.
    ///
    /// Redirects are not followed: a chunk answered with 3xx is reported
    /// with that status instead of replaying the redirect target.
    pub fn new(settings: &UploadSettings) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .connect_timeout(settings.connect_timeout())
            .user_agent(settings.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { http })
    }

    /// Wraps an existing client.
    ///
    /// The client should be built with `redirect::Policy::none()`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>> {
        Box::pin(async move {
            let resp = self.http.execute(request).await?;
            let status = resp.status();
            let body = match resp.text().await {
                Ok(body) => body,
                Err(e) if status.is_success() => return Err(e.into()),
                Err(e) => {
                    warn!(status = status.as_u16(), error = %e, "failed to read response body");
                    String::new()
                }
            };
            Ok(TransportResponse { status, body })
        })
    }
}
