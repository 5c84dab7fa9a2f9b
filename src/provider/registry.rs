use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::json::APPLICATION_JSON;
use super::{ContentType, JsonProvider, Provider};
use crate::error::{ApiError, Result};
use crate::utils::split_header_list;

/// Collects providers at startup; consumed by [`ProviderRegistryBuilder::build`].
pub struct ProviderRegistryBuilder {
    providers: HashMap<ContentType, Arc<dyn Provider>>,
    default_content_type: ContentType,
}

impl ProviderRegistryBuilder {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            default_content_type: ContentType::new(APPLICATION_JSON),
        }
    }

    pub fn register(mut self, content_type: ContentType, provider: Arc<dyn Provider>) -> Result<Self> {
        if self.providers.contains_key(&content_type) {
            return Err(ApiError::DuplicateProvider(content_type.to_string()));
        }
        info!("Registering provider {} for {}", provider.name(), content_type);
        self.providers.insert(content_type, provider);
        Ok(self)
    }

    /// Registers `provider` under the content type it reports itself.
    pub fn register_provider(self, provider: Arc<dyn Provider>) -> Result<Self> {
        let content_type = provider.content_type().clone();
        self.register(content_type, provider)
    }

    /// Registers [`JsonProvider`] as the bare `application/json` default.
    pub fn with_json_default(self) -> Result<Self> {
        self.register_provider(Arc::new(JsonProvider::new()))
    }

    /// Content type used when the client accepts anything.
    pub fn default_content_type(mut self, content_type: ContentType) -> Self {
        self.default_content_type = content_type;
        self
    }

    pub fn build(self) -> ProviderRegistry {
        debug!("Provider registry built with {} entries", self.providers.len());
        ProviderRegistry {
            providers: self.providers,
            default_content_type: self.default_content_type,
        }
    }
}

impl Default for ProviderRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable map from content type to provider.
///
/// Lookups fall back from the exact content type, to the vendor without a
/// version, to the bare MIME type. A vendor never resolves to another
/// vendor's provider.
pub struct ProviderRegistry {
    providers: HashMap<ContentType, Arc<dyn Provider>>,
    default_content_type: ContentType,
}

impl ProviderRegistry {
    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn resolve(&self, content_type: &ContentType) -> Result<Arc<dyn Provider>> {
        let candidates = [
            content_type.clone(),
            content_type.without_version(),
            content_type.bare(),
        ];

        for candidate in &candidates {
            if let Some(provider) = self.providers.get(candidate) {
                debug!(
                    "Resolved {} to provider {} via {}",
                    content_type,
                    provider.name(),
                    candidate
                );
                return Ok(provider.clone());
            }
        }

        debug!("No provider for {}", content_type);
        Err(ApiError::NoProvider(content_type.to_string()))
    }

    /// Parses a `Content-Type` header value and resolves it.
    pub fn map_provider(&self, value: &str) -> Result<Arc<dyn Provider>> {
        self.resolve(&ContentType::parse(value)?)
    }

    /// Picks a provider for an `Accept` header.
    ///
    /// Entries are tried in the order listed; q-values are not weighed, but
    /// an entry with `q=0` is skipped.
    /// Wildcards and a missing header select the default content type.
    pub fn negotiate(&self, accept: Option<&str>) -> Result<Arc<dyn Provider>> {
        let Some(accept) = accept.filter(|a| !a.trim().is_empty()) else {
            return self.resolve(&self.default_content_type);
        };

        for entry in split_header_list(accept) {
            if is_refused(entry) {
                debug!("Skipping refused Accept entry: {}", entry);
                continue;
            }
            let essence = entry.split(';').next().unwrap_or_default().trim();
            if essence == "*/*" || essence.ends_with("/*") {
                match self.resolve(&self.default_content_type) {
                    Ok(provider) if essence == "*/*" || self.default_matches_range(essence) => {
                        return Ok(provider)
                    }
                    _ => continue,
                }
            }

            match self.map_provider(entry) {
                Ok(provider) => return Ok(provider),
                Err(ApiError::InvalidContentType(_)) => {
                    warn!("Skipping malformed Accept entry: {}", entry);
                }
                Err(_) => {}
            }
        }

        Err(ApiError::NoProvider(accept.to_string()))
    }

    fn default_matches_range(&self, range: &str) -> bool {
        let kind = range.trim_end_matches("/*");
        self.default_content_type
            .mime_type()
            .split_once('/')
            .is_some_and(|(default_kind, _)| default_kind.eq_ignore_ascii_case(kind))
    }
}

/// An Accept entry carrying `q=0` marks its media range as not acceptable.
fn is_refused(entry: &str) -> bool {
    entry.split(';').skip(1).any(|param| {
        param.split_once('=').is_some_and(|(key, value)| {
            key.trim().eq_ignore_ascii_case("q")
                && value.trim().parse::<f32>().is_ok_and(|q| q == 0.0)
        })
    })
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<String> = self.providers.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("ProviderRegistry")
            .field("providers", &keys)
            .field("default_content_type", &self.default_content_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::Value;

    /// Provider that only reports its name, to tell registrations apart.
    struct NamedProvider {
        name: &'static str,
        content_type: ContentType,
    }

    impl NamedProvider {
        fn arc(name: &'static str, content_type: ContentType) -> Arc<dyn Provider> {
            Arc::new(Self { name, content_type })
        }
    }

    impl Provider for NamedProvider {
        fn name(&self) -> &str {
            self.name
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

    fn json() -> ContentType {
        ContentType::new("application/json")
    }

    fn registry() -> ProviderRegistry {
        let vendor = json().with_vendor("supercell");
        let versioned = vendor.clone().with_version("1.0");
        ProviderRegistry::builder()
            .with_json_default()
            .unwrap()
            .register(vendor.clone(), NamedProvider::arc("more-detailed", vendor))
            .unwrap()
            .register(versioned.clone(), NamedProvider::arc("versioned", versioned))
            .unwrap()
            .build()
    }

    #[test]
    fn test_default_json_provider() {
        let provider = registry().map_provider("application/json").unwrap();
        assert_eq!(provider.name(), "json");
    }

    #[test]
    fn test_specific_json_provider() {
        let provider = registry()
            .map_provider("application/vnd.supercell+json")
            .unwrap();
        assert_eq!(provider.name(), "more-detailed");
    }

    #[test]
    fn test_json_provider_with_version() {
        let provider = registry()
            .map_provider("application/vnd.supercell-v1.0+json")
            .unwrap();
        assert_eq!(provider.name(), "versioned");
    }

    #[test]
    fn test_mixed_case_version_resolves_exactly() {
        let provider = registry()
            .map_provider("application/VND.SUPERCELL-V1.0+JSON")
            .unwrap();
        assert_eq!(provider.name(), "versioned");
    }

    #[test]
    fn test_unknown_version_falls_back_to_vendor() {
        let provider = registry()
            .map_provider("application/vnd.supercell-v2.0+json")
            .unwrap();
        assert_eq!(provider.name(), "more-detailed");
    }

    #[test]
    fn test_unknown_vendor_falls_back_to_default() {
        let registry = registry();
        for value in ["application/vnd.acme+json", "application/vnd.acme-v1.0+json"] {
            assert_eq!(registry.map_provider(value).unwrap().name(), "json");
        }
    }

    #[test]
    fn test_unknown_vendor_without_default_fails() {
        let vendor = json().with_vendor("supercell");
        let registry = ProviderRegistry::builder()
            .register(vendor.clone(), NamedProvider::arc("more-detailed", vendor))
            .unwrap()
            .build();

        assert!(matches!(
            registry.map_provider("application/vnd.acme+json"),
            Err(ApiError::NoProvider(_))
        ));
    }

    #[test]
    fn test_unregistered_type_fails() {
        let result = registry().map_provider("text/csv");
        match result {
            Err(ApiError::NoProvider(ct)) => assert_eq!(ct, "text/csv"),
            other => panic!("unexpected result: {:?}", other.map(|p| p.name().to_string())),
        }
    }

    #[test]
    fn test_duplicate_registration() {
        let result = ProviderRegistry::builder()
            .with_json_default()
            .unwrap()
            .register(json(), NamedProvider::arc("other", json()));
        assert!(matches!(result, Err(ApiError::DuplicateProvider(_))));
    }

    #[test]
    fn test_negotiate() {
        let registry = registry();

        assert_eq!(registry.negotiate(None).unwrap().name(), "json");
        assert_eq!(registry.negotiate(Some("")).unwrap().name(), "json");
        assert_eq!(registry.negotiate(Some("*/*")).unwrap().name(), "json");
        assert_eq!(
            registry.negotiate(Some("application/*;q=0.9")).unwrap().name(),
            "json"
        );
        assert_eq!(
            registry
                .negotiate(Some("text/html, application/vnd.supercell-v1.0+json, */*;q=0.1"))
                .unwrap()
                .name(),
            "versioned"
        );
        assert_eq!(
            registry.negotiate(Some("garbage, application/json")).unwrap().name(),
            "json"
        );
    }

    #[test]
    fn test_negotiate_skips_zero_quality() {
        let registry = registry();
        assert_eq!(
            registry
                .negotiate(Some("application/vnd.supercell+json;q=0, application/json"))
                .unwrap()
                .name(),
            "json"
        );
        assert_eq!(
            registry
                .negotiate(Some("application/vnd.supercell+json; Q=0.000, */*"))
                .unwrap()
                .name(),
            "json"
        );
        assert!(matches!(
            registry.negotiate(Some("application/json;q=0")),
            Err(ApiError::NoProvider(_))
        ));
        // a non-zero weight is still acceptable
        assert_eq!(
            registry
                .negotiate(Some("application/vnd.supercell+json;q=0.1"))
                .unwrap()
                .name(),
            "more-detailed"
        );
    }

    #[test]
    fn test_negotiate_without_match() {
        let registry = registry();
        assert!(matches!(
            registry.negotiate(Some("text/html, image/*")),
            Err(ApiError::NoProvider(_))
        ));
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = Arc::new(registry());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry
                        .map_provider("application/vnd.supercell+json")
                        .map(|p| p.name().to_string())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), "more-detailed");
        }
    }
}
