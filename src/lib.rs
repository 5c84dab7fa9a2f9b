pub mod cache_control;
pub mod config;
pub mod error;
pub mod logger;
pub mod provider;
pub mod resource;
pub mod server;
pub mod utils;

pub use config::Config;
pub use error::{ApiError, Result};

pub mod prelude {
    pub use crate::cache_control::{apply_cache_header, compute_cache_header, CacheConfig, SetHeader};
    pub use crate::provider::{ContentType, JsonProvider, Provider, ProviderRegistry};
    pub use crate::resource::{Resource, StatusResource};
    pub use crate::server::ApiServer;
}
