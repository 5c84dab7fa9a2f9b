use hyper::StatusCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Crate events plus the per-request events emitted under the `request` target.
pub const DEFAULT_FILTER: &str = "http_cache_negotiate=info,request=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_ids(true)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .try_init();

    if let Err(e) = result {
        warn!("Logger already initialised: {}", e);
    }
}

pub fn log_request(path: &str, status: StatusCode, duration: std::time::Duration) {
    info!(
        target: "request",
        path = %path,
        status = status.as_u16(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );
}
