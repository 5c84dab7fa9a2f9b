use super::CacheConfig;

/// Renders `config` as a `Cache-Control` header value.
///
/// Tokens always come out in the same order: `max-age`, `s-max-age`,
/// `public`, `private`, `no-cache`, `no-store`, `must-revalidate`,
/// `proxy-revalidate`. Conflicting directives are passed through unchanged.
pub fn compute_cache_header(config: &CacheConfig) -> String {
    let mut params = Vec::with_capacity(8);
    params.push(format!("max-age={}", config.max_age.as_secs()));

    if let Some(s_max_age) = config.s_max_age.filter(|d| !d.is_zero()) {
        params.push(format!("s-max-age={}", s_max_age.as_secs()));
    }

    let flags = [
        (config.public, "public"),
        (config.private, "private"),
        (config.no_cache, "no-cache"),
        (config.no_store, "no-store"),
        (config.must_revalidate, "must-revalidate"),
        (config.proxy_revalidate, "proxy-revalidate"),
    ];
    params.extend(
        flags
            .iter()
            .filter(|(enabled, _)| *enabled)
            .map(|(_, token)| token.to_string()),
    );

    params.join(", ")
}
