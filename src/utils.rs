use hyper::header::{HeaderName, ACCEPT, CONTENT_TYPE};
use hyper::{Body, Request};

/// Splits a comma separated header value into trimmed, non-empty entries.
///
/// # Examples
/// ```
/// use http_cache_negotiate::utils::split_header_list;
///
/// let entries: Vec<_> = split_header_list("text/html, application/json;q=0.9,").collect();
/// assert_eq!(entries, vec!["text/html", "application/json;q=0.9"]);
/// ```
pub fn split_header_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

/// Returns a header as a string, if present and valid ASCII.
pub fn header_str<'a>(req: &'a Request<Body>, name: &HeaderName) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

pub fn accept_header(req: &Request<Body>) -> Option<&str> {
    header_str(req, &ACCEPT)
}

pub fn content_type_header(req: &Request<Body>) -> Option<&str> {
    header_str(req, &CONTENT_TYPE)
}

/// Strips the query string and any trailing slash from a request path.
pub fn normalize_path(path: &str) -> &str {
    let path = path.split('?').next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
