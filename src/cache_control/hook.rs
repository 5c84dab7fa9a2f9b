use hyper::header::{HeaderName, HeaderValue, CACHE_CONTROL};
use hyper::{HeaderMap, Response};
use tracing::debug;

use super::{compute_cache_header, CacheConfig};
use crate::error::{ApiError, Result};

/// Anything a response header can be written to.
pub trait SetHeader {
    fn set_header(&mut self, name: HeaderName, value: &str) -> Result<()>;
}

impl SetHeader for HeaderMap {
    fn set_header(&mut self, name: HeaderName, value: &str) -> Result<()> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidHeader(format!("{}: {}", name, e)))?;
        self.insert(name, value);
        Ok(())
    }
}

impl<B> SetHeader for Response<B> {
    fn set_header(&mut self, name: HeaderName, value: &str) -> Result<()> {
        self.headers_mut().set_header(name, value)
    }
}

/// Writes the `Cache-Control` header for `config`, replacing any earlier value.
///
/// Called by the routing layer once the handler has produced its response;
/// status and body are left alone.
pub fn apply_cache_header<T: SetHeader + ?Sized>(target: &mut T, config: &CacheConfig) -> Result<()> {
    let value = compute_cache_header(config);
    debug!("Setting Cache-Control: {}", value);
    target.set_header(CACHE_CONTROL, &value)
}

impl CacheConfig {
    pub fn apply<T: SetHeader + ?Sized>(&self, target: &mut T) -> Result<()> {
        apply_cache_header(target, self)
    }
}
