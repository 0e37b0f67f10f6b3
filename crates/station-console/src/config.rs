//! Runtime configuration: where the backend lives and where keys persist.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HOME: &str = ".station";

pub const BACKEND_URL_ENV: &str = "STATION_BACKEND_URL";
pub const HOME_ENV: &str = "STATION_HOME";

#[derive(Debug, Clone, PartialEq)]
pub struct StationConfig {
    pub backend_url: Url,
    pub home: PathBuf,
}

impl StationConfig {
    pub fn new(backend_url: &str, home: impl Into<PathBuf>) -> Result<Self> {
        let backend_url = Url::parse(backend_url.trim())
            .map_err(|e| anyhow!("Invalid backend URL '{}': {}", backend_url, e))?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Backend URL must use http or https, got '{}'",
                backend_url.scheme()
            ));
        }
        Ok(Self {
            backend_url,
            home: home.into(),
        })
    }

    /// Reads `STATION_BACKEND_URL` and `STATION_HOME`, after loading a `.env`
    /// file if one exists. Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(None, None)
    }

    /// Like [`StationConfig::from_env`], but an explicit value replaces the
    /// matching variable, which is then never read or validated.
    pub fn from_env_with(backend_url: Option<&str>, home: Option<PathBuf>) -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded environment from {}", path.display()),
            Err(e) => debug!("No .env file loaded: {}", e),
        }
        let backend_url = match backend_url {
            Some(url) => url.to_owned(),
            None => std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_owned()),
        };
        let home = home.unwrap_or_else(|| {
            PathBuf::from(std::env::var(HOME_ENV).unwrap_or_else(|_| DEFAULT_HOME.to_owned()))
        });
        Self::new(&backend_url, home)
    }
}
