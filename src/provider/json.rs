use bytes::Bytes;
use serde_json::Value;

use super::{ContentType, Provider};
use crate::error::Result;

pub const APPLICATION_JSON: &str = "application/json";

/// Encodes and decodes bodies with `serde_json`.
#[derive(Debug, Clone)]
pub struct JsonProvider {
    content_type: ContentType,
}

impl JsonProvider {
    pub fn new() -> Self {
        Self {
            content_type: ContentType::new(APPLICATION_JSON),
        }
    }

    /// A JSON provider registered under a vendor or versioned content type.
    pub fn with_content_type(content_type: ContentType) -> Self {
        Self { content_type }
    }
}

impl Default for JsonProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for JsonProvider {
    fn name(&self) -> &str {
        "json"
    }

    fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    fn encode(&self, value: &Value) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(value)?))
    }

    fn decode(&self, body: &[u8]) -> Result<Value> {
        Ok(serde_json::from_slice(body)?)
    }
}
