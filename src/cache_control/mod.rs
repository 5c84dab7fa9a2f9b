//! `Cache-Control` header construction.

mod config;
mod header;
mod hook;

pub use config::{CacheConfig, CacheConfigBuilder, CacheSettings};
pub use header::compute_cache_header;
pub use hook::{apply_cache_header, SetHeader};
