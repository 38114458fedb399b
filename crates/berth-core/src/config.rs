//! Façade configuration

use berth_property::ParserOptions;
use std::time::Duration;

/// Configuration for the use-case façade
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Declaration parser configuration
    pub parser: ParserOptions,
    /// Whether platform shapes are validated on every write
    pub validate_platform_shape: bool,
    /// Maximum entries in the derived module-model cache
    pub model_cache_capacity: u64,
    /// Time-to-live of cached module models
    pub model_cache_ttl: Duration,
}

impl CoreConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With parser options
    #[inline]
    #[must_use]
    pub fn with_parser(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }

    /// With or without write-time platform shape validation
    #[inline]
    #[must_use]
    pub fn with_platform_shape_validation(mut self, enabled: bool) -> Self {
        self.validate_platform_shape = enabled;
        self
    }

    /// With a model cache capacity
    #[inline]
    #[must_use]
    pub fn with_model_cache_capacity(mut self, capacity: u64) -> Self {
        self.model_cache_capacity = capacity;
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            parser: ParserOptions::default(),
            validate_platform_shape: true,
            model_cache_capacity: 1024,
            model_cache_ttl: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_property::KeywordMatching;

    #[test]
    fn defaults_enable_shape_validation() {
        let config = CoreConfig::new();
        assert!(config.validate_platform_shape);
        assert_eq!(config.model_cache_capacity, 1024);
    }

    #[test]
    fn builder_overrides() {
        let config = CoreConfig::new()
            .with_platform_shape_validation(false)
            .with_model_cache_capacity(16)
            .with_parser(
                ParserOptions::new().with_keyword_matching(KeywordMatching::LegacyPrefix),
            );

        assert!(!config.validate_platform_shape);
        assert_eq!(config.model_cache_capacity, 16);
        assert_eq!(
            config.parser.keyword_matching,
            KeywordMatching::LegacyPrefix
        );
    }
}
