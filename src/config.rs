use std::net::SocketAddr;
use std::path::Path;

use serde::Deserialize;

use crate::cache_control::{CacheConfig, CacheSettings};
use crate::error::{ApiError, Result};
use crate::provider::{ContentType, APPLICATION_JSON};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheSettings,
    pub provider: ProviderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Optional vendor JSON provider registered next to the bare default.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderConfig {
    pub vendor: Option<String>,
    pub version: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        // CONFIG_PATH wins over the built-in defaults
        if let Ok(config_path) = std::env::var("CONFIG_PATH") {
            return Self::from_file(&config_path);
        }

        Ok(Self::default())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ApiError::Config(e.to_string()))
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ApiError::Config(format!("invalid server address: {}", e)))
    }

    pub fn cache_config(&self) -> Result<CacheConfig> {
        CacheConfig::try_from(self.cache.clone())
    }

    /// Content type of the configured vendor provider, if any.
    pub fn vendor_content_type(&self) -> Option<ContentType> {
        let vendor = self.provider.vendor.as_ref()?;
        let content_type = ContentType::new(APPLICATION_JSON).with_vendor(vendor);
        Some(match &self.provider.version {
            Some(version) => content_type.with_version(version),
            None => content_type,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
