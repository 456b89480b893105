//! Command-line configuration.
//!
//! Stored as TOML:
//!
//! ```toml
//! collection_uri = "https://tfs.example.com/tfs/DefaultCollection"
//!
//! [credentials]
//! kind = "pat"
//! token = "..."
//!
//! [upload]
//! chunk_size = 524288
//! max_concurrent_files = 4
//! ```

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tfs_upload_client::{
    Authorization, BasicAuthorization, BearerAuthorization, NoAuthorization, ServerContext,
    UploadSettings,
};
use url::Url;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Collection URL, e.g. `https://host/tfs/DefaultCollection`.
    pub collection_uri: Url,

    #[serde(default)]
    pub credentials: Credentials,

    #[serde(default)]
    pub upload: UploadSettings,
}

/// Credentials used to authorize every chunk request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Credentials {
    #[default]
    None,
    Basic { user: String, password: String },
    /// Personal access token, sent as basic auth with an empty user.
    Pat { token: String },
    Bearer { token: String },
}

impl Credentials {
    /// Builds the authorization strategy for these credentials.
    pub fn authorization(&self) -> anyhow::Result<Arc<dyn Authorization>> {
        let authorization: Arc<dyn Authorization> = match self {
            Credentials::None => Arc::new(NoAuthorization),
            Credentials::Basic { user, password } => {
                Arc::new(BasicAuthorization::new(user, password)?)
            }
            Credentials::Pat { token } => Arc::new(BasicAuthorization::personal_access_token(token)?),
            Credentials::Bearer { token } => Arc::new(BearerAuthorization::new(token)?),
        };
        Ok(authorization)
    }
}

impl Config {
    /// Loads and validates the configuration at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.upload.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn server(&self) -> ServerContext {
        ServerContext::new(self.collection_uri.clone())
    }
}
