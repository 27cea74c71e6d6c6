use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const BUILTIN_CLIENT_CONFIG: &str = include_str!("data/client_config.json");
pub const CLIENT_CONFIG_PATH_ENV: &str = "ANACREON_CLIENT_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    base_url: String,
    request_timeout_ms: u64,
    refresh_fallback_secs: u64,
    user_agent: String,
}

impl ClientConfig {
    pub fn builtin() -> Arc<Self> {
        Arc::new(
            serde_json::from_str(BUILTIN_CLIENT_CONFIG)
                .expect("builtin client config should parse"),
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_file(path: &Path) -> Result<Self, ClientConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|source| ClientConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
        let config = ClientConfig::from_json_str(&contents)?;
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Endpoint root, always ending in `/`.
    pub fn base_url(&self) -> String {
        let trimmed = self.base_url.trim_end_matches('/');
        format!("{trimmed}/")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }

    /// Refresh period used until the server has told us when the next watch is.
    pub fn refresh_fallback(&self) -> Duration {
        Duration::from_secs(self.refresh_fallback_secs)
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://anacreon.kronosaur.com/api/".to_string(),
            request_timeout_ms: 30_000,
            refresh_fallback_secs: 60,
            user_agent: "anacreon-client/0.1".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientConfigError {
    #[error("failed to parse client config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read client config from {path:?}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfigMetadata {
    path: Option<PathBuf>,
}

impl ClientConfigMetadata {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// File the config was read from; `None` for the builtin copy.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Where the config came from, for logs.
    pub fn source(&self) -> String {
        self.path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "builtin".to_string())
    }
}

/// Reads the file named by `ANACREON_CLIENT_CONFIG_PATH`, falling back to the
/// builtin config when the variable is unset or the file is unusable.
pub fn load_client_config_from_env() -> (Arc<ClientConfig>, ClientConfigMetadata) {
    let Some(path) = env::var(CLIENT_CONFIG_PATH_ENV).ok().map(PathBuf::from) else {
        tracing::info!(target: "anacreon::config", "client_config.loaded=builtin");
        return (ClientConfig::builtin(), ClientConfigMetadata::new(None));
    };

    match ClientConfig::from_file(&path) {
        Ok(config) => {
            tracing::info!(
                target: "anacreon::config",
                path = %path.display(),
                "client_config.loaded=file"
            );
            (Arc::new(config), ClientConfigMetadata::new(Some(path)))
        }
        Err(err) => {
            tracing::warn!(
                target: "anacreon::config",
                path = %path.display(),
                error = %err,
                "client_config.load_failed"
            );
            tracing::info!(target: "anacreon::config", "client_config.loaded=builtin");
            (ClientConfig::builtin(), ClientConfigMetadata::new(None))
        }
    }
}
