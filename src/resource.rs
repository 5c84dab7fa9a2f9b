use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::cache_control::CacheConfig;
use crate::error::{ApiError, Result};

/// A routable endpoint producing and consuming JSON-like values.
///
/// Encoding is left to the negotiated provider; a resource only deals in
/// [`Value`]s.
#[async_trait]
pub trait Resource: Send + Sync {
    fn name(&self) -> &str;

    fn can_handle(&self, path: &str) -> bool;

    /// Cache directives applied to successful `GET` responses.
    fn cache_config(&self) -> Option<&CacheConfig> {
        None
    }

    async fn get(&self) -> Result<Value>;

    async fn post(&self, _body: Value) -> Result<Value> {
        Err(ApiError::MethodNotAllowed("POST".into()))
    }
}

/// Reports service name and version at `/status`; echoes posted documents.
#[derive(Debug, Clone)]
pub struct StatusResource {
    service: String,
    version: String,
    cache: Option<CacheConfig>,
}

impl StatusResource {
    pub fn new(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            version: version.into(),
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }
}

#[async_trait]
impl Resource for StatusResource {
    fn name(&self) -> &str {
        "status"
    }

    fn can_handle(&self, path: &str) -> bool {
        path == "/status"
    }

    fn cache_config(&self) -> Option<&CacheConfig> {
        self.cache.as_ref()
    }

    async fn get(&self) -> Result<Value> {
        Ok(json!({
            "status": "ok",
            "name": self.service,
            "version": self.version,
        }))
    }

    async fn post(&self, body: Value) -> Result<Value> {
        debug!("Status resource received: {}", body);
        Ok(json!({ "received": body }))
    }
}
