use std::time::Duration;

use serde::Deserialize;

use crate::error::{ApiError, Result};

/// Caching directives rendered into a `Cache-Control` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub max_age: Duration,
    pub s_max_age: Option<Duration>,
    pub public: bool,
    pub private: bool,
    pub no_cache: bool,
    pub no_store: bool,
    pub must_revalidate: bool,
    pub proxy_revalidate: bool,
}

impl CacheConfig {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            s_max_age: None,
            public: false,
            private: false,
            no_cache: false,
            no_store: false,
            must_revalidate: true,
            proxy_revalidate: false,
        }
    }

    pub fn builder() -> CacheConfigBuilder {
        CacheConfigBuilder::default()
    }

    pub fn with_s_max_age(mut self, s_max_age: Duration) -> Self {
        self.s_max_age = Some(s_max_age);
        self
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn with_no_store(mut self, no_store: bool) -> Self {
        self.no_store = no_store;
        self
    }

    pub fn with_must_revalidate(mut self, must_revalidate: bool) -> Self {
        self.must_revalidate = must_revalidate;
        self
    }

    pub fn with_proxy_revalidate(mut self, proxy_revalidate: bool) -> Self {
        self.proxy_revalidate = proxy_revalidate;
        self
    }
}

/// Builder whose `max_age` is optional until `build` is called.
#[derive(Debug, Clone)]
pub struct CacheConfigBuilder {
    max_age: Option<Duration>,
    s_max_age: Option<Duration>,
    public: bool,
    private: bool,
    no_cache: bool,
    no_store: bool,
    must_revalidate: bool,
    proxy_revalidate: bool,
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self {
            max_age: None,
            s_max_age: None,
            public: false,
            private: false,
            no_cache: false,
            no_store: false,
            must_revalidate: true,
            proxy_revalidate: false,
        }
    }
}

impl CacheConfigBuilder {
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn s_max_age(mut self, s_max_age: Duration) -> Self {
        self.s_max_age = Some(s_max_age);
        self
    }

    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn no_cache(mut self, no_cache: bool) -> Self {
        self.no_cache = no_cache;
        self
    }

    pub fn no_store(mut self, no_store: bool) -> Self {
        self.no_store = no_store;
        self
    }

    pub fn must_revalidate(mut self, must_revalidate: bool) -> Self {
        self.must_revalidate = must_revalidate;
        self
    }

    pub fn proxy_revalidate(mut self, proxy_revalidate: bool) -> Self {
        self.proxy_revalidate = proxy_revalidate;
        self
    }

    pub fn build(self) -> Result<CacheConfig> {
        let max_age = self.max_age.ok_or(ApiError::MissingMaxAge)?;
        Ok(CacheConfig {
            max_age,
            s_max_age: self.s_max_age,
            public: self.public,
            private: self.private,
            no_cache: self.no_cache,
            no_store: self.no_store,
            must_revalidate: self.must_revalidate,
            proxy_revalidate: self.proxy_revalidate,
        })
    }
}

/// Cache directives as they appear in the `[cache]` section of the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Required once a `[cache]` section is written.
    #[serde(default)]
    pub max_age_secs: Option<u64>,
    pub s_max_age_secs: Option<u64>,
    pub public: bool,
    pub private: bool,
    pub no_cache: bool,
    pub no_store: bool,
    pub must_revalidate: bool,
    pub proxy_revalidate: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_age_secs: Some(600),
            s_max_age_secs: None,
            public: true,
            private: false,
            no_cache: false,
            no_store: false,
            must_revalidate: true,
            proxy_revalidate: false,
        }
    }
}

impl TryFrom<CacheSettings> for CacheConfig {
    type Error = ApiError;

    fn try_from(settings: CacheSettings) -> Result<Self> {
        let mut builder = CacheConfig::builder()
            .public(settings.public)
            .private(settings.private)
            .no_cache(settings.no_cache)
            .no_store(settings.no_store)
            .must_revalidate(settings.must_revalidate)
            .proxy_revalidate(settings.proxy_revalidate);

        if let Some(secs) = settings.max_age_secs {
            builder = builder.max_age(Duration::from_secs(secs));
        }
        if let Some(secs) = settings.s_max_age_secs {
            builder = builder.s_max_age(Duration::from_secs(secs));
        }
        builder.build()
    }
}
