//! Authorization hook applied to every outgoing chunk request.
//!
//! The upload client never interprets credentials: it hands each request to
//! an [`Authorization`] right before dispatch and propagates its failure
//! unchanged.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// Errors raised by an authorization strategy.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("credentials unavailable: {0}")]
    Unavailable(String),
}

/// Decorates an outgoing request with server credentials.
///
/// Called once per chunk, immediately before the request is sent.
pub trait Authorization: Send + Sync {
    fn authorize(&self, request: &mut Request) -> Result<(), AuthError>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthorization;

impl Authorization for NoAuthorization {
    fn authorize(&self, _request: &mut Request) -> Result<(), AuthError> {
        Ok(())
    }
}

/// HTTP Basic credentials.
#[derive(Clone)]
pub struct BasicAuthorization {
    header: HeaderValue,
}

impl BasicAuthorization {
    pub fn new(user: &str, password: &str) -> Result<Self, AuthError> {
        if user.contains(':') {
            return Err(AuthError::InvalidCredentials(
                "user name must not contain ':'".into(),
            ));
        }
        let encoded = STANDARD.encode(format!("{user}:{password}"));
        Ok(Self {
            header: sensitive_header(&format!("Basic {encoded}"))?,
        })
    }

    /// Personal access token sent as the password of an empty user.
    pub fn personal_access_token(token: &str) -> Result<Self, AuthError> {
        Self::new("", token)
    }
}

impl fmt::Debug for BasicAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthorization").finish_non_exhaustive()
    }
}

impl Authorization for BasicAuthorization {
    fn authorize(&self, request: &mut Request) -> Result<(), AuthError> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }
}

/// OAuth bearer token.
#[derive(Clone)]
pub struct BearerAuthorization {
    header: HeaderValue,
}

impl BearerAuthorization {
    pub fn new(token: &str) -> Result<Self, AuthError> {
        if token.is_empty() {
            return Err(AuthError::InvalidCredentials("empty bearer token".into()));
        }
        Ok(Self {
            header: sensitive_header(&format!("Bearer {token}"))?,
        })
    }
}

impl fmt::Debug for BearerAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerAuthorization").finish_non_exhaustive()
    }
}

impl Authorization for BearerAuthorization {
    fn authorize(&self, request: &mut Request) -> Result<(), AuthError> {
        request
            .headers_mut()
            .insert(AUTHORIZATION, self.header.clone());
        Ok(())
    }
}

fn sensitive_header(value: &str) -> Result<HeaderValue, AuthError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| AuthError::InvalidCredentials("not a valid header value".into()))?;
    header.set_sensitive(true);
    Ok(header)
}
