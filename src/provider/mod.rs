//! Content-type based provider lookup.
//!
//! Providers are registered once at startup under a [`ContentType`]. The
//! resulting [`ProviderRegistry`] is immutable and resolves a request's
//! content type to the most specific provider: exact vendor and version,
//! then vendor only, then the bare MIME type.

mod content_type;
mod json;
mod registry;

use bytes::Bytes;
use serde_json::Value;

use crate::error::Result;

pub use content_type::ContentType;
pub use json::{JsonProvider, APPLICATION_JSON};
pub use registry::{ProviderRegistry, ProviderRegistryBuilder};

pub trait Provider: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Content type written to responses encoded by this provider.
    fn content_type(&self) -> &ContentType;

    fn encode(&self, value: &Value) -> Result<Bytes>;

    fn decode(&self, body: &[u8]) -> Result<Value>;
}
