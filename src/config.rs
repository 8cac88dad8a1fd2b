use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use anyhow::{Context, Result};

use crate::store::file::is_valid_key;

/// How generation requests are sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateMode {
    /// `POST` a JSON body `{"prompt": ...}`.
    Json,
    /// `POST` a multipart form with `image`, `prompt` and optional `style`.
    Multipart,
    /// Resolve locally after a delay without touching the network.
    Mock,
}

impl FromStr for GenerateMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(GenerateMode::Json),
            "multipart" => Ok(GenerateMode::Multipart),
            "mock" => Ok(GenerateMode::Mock),
            other => anyhow::bail!("unknown generate mode: {}", other),
        }
    }
}

/// Where the session record is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
    Redis,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreKind::Memory),
            "file" => Ok(StoreKind::File),
            "redis" => Ok(StoreKind::Redis),
            other => anyhow::bail!("unknown session store: {}", other),
        }
    }
}

/// The application's configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// The URL generation requests are posted to.
    pub generate_endpoint: String,
    /// How generation requests are sent.
    pub generate_mode: GenerateMode,
    /// Upper bound for one generation request. `None` waits forever.
    pub request_timeout: Option<Duration>,
    /// The delay of the mock generator.
    pub mock_delay: Duration,
    /// The image URL the mock generator resolves with.
    pub mock_image_url: String,
    /// The session store backend.
    pub session_store: StoreKind,
    /// The directory of the file store.
    pub data_dir: PathBuf,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The key the session record is stored under.
    pub session_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generate_endpoint: "http://localhost:5000/api/generate-image".to_string(),
            generate_mode: GenerateMode::Multipart,
            request_timeout: Some(Duration::from_secs(60)),
            mock_delay: Duration::from_millis(2000),
            mock_image_url: "https://example.com/dreamroom/mock.png".to_string(),
            session_store: StoreKind::File,
            data_dir: PathBuf::from(".dreamroom"),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            session_key: "user".to_string(),
        }
    }
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// Every variable is optional; unset ones fall back to [`Config::default`].
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let request_timeout_secs: u64 = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(v) => v.parse().context("Invalid REQUEST_TIMEOUT_SECS")?,
            Err(_) => 60,
        };

        let mock_delay_ms: u64 = match env::var("MOCK_DELAY_MS") {
            Ok(v) => v.parse().context("Invalid MOCK_DELAY_MS")?,
            Err(_) => 2000,
        };

        let session_key = env::var("SESSION_KEY").unwrap_or(defaults.session_key);
        validate_session_key(&session_key)?;

        Ok(Self {
            generate_endpoint: env::var("GENERATE_ENDPOINT")
                .unwrap_or(defaults.generate_endpoint),
            generate_mode: env::var("GENERATE_MODE")
                .unwrap_or_else(|_| "multipart".to_string())
                .parse()
                .context("Invalid GENERATE_MODE (expected json, multipart or mock)")?,
            request_timeout: (request_timeout_secs > 0)
                .then(|| Duration::from_secs(request_timeout_secs)),
            mock_delay: Duration::from_millis(mock_delay_ms),
            mock_image_url: env::var("MOCK_IMAGE_URL").unwrap_or(defaults.mock_image_url),
            session_store: env::var("SESSION_STORE")
                .unwrap_or_else(|_| "file".to_string())
                .parse()
                .context("Invalid SESSION_STORE (expected memory, file or redis)")?,
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            session_key,
        })
    }
}

/// The session key names a file under the file store, so it is held to the
/// store's key rule whichever backend is selected.
fn validate_session_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        anyhow::bail!("SESSION_KEY must not be empty");
    }
    if !is_valid_key(key) {
        anyhow::bail!("SESSION_KEY {:?} may only contain letters, digits, '_' and '-'", key);
    }
    Ok(())
}
