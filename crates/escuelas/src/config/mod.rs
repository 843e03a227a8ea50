//! Browsing session configuration.

use crate::{filter::MAP_POINT_CAP, locale::Language, page::PageSize};

/// Tunables for a browsing session.
#[derive(Debug, Clone)]
pub struct BrowseConfig {
    /// Hard maximum number of points handed to the map renderer.
    pub map_point_cap: usize,
    /// Page size used when the UI has not picked one yet.
    pub default_page_size: PageSize,
    /// Surface language for labels, warnings and export headers.
    pub language: Language,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            map_point_cap: MAP_POINT_CAP,
            default_page_size: PageSize::default(),
            language: Language::default(),
        }
    }
}

impl BrowseConfig {
    pub fn builder() -> BrowseConfigBuilder {
        BrowseConfigBuilder::new()
    }
}

/// Builder for creating browse configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct BrowseConfigBuilder {
    config: BrowseConfig,
}

impl BrowseConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: BrowseConfig::default(),
        }
    }

    /// Create a builder for constrained clients (fewer points on the map,
    /// smaller pages)
    pub fn lightweight() -> Self {
        let mut builder = Self::new();
        builder.config.map_point_cap = 2_000;
        builder.config.default_page_size = PageSize::Fifty;
        builder
    }

    /// Set the maximum number of points the map renderer receives
    pub fn map_point_cap(mut self, cap: usize) -> Self {
        self.config.map_point_cap = cap.max(1);
        self
    }

    /// Set the page size used before the UI picks one
    pub fn default_page_size(mut self, page_size: PageSize) -> Self {
        self.config.default_page_size = page_size;
        self
    }

    /// Set the surface language
    pub fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> BrowseConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BrowseConfig::default();
        assert_eq!(config.map_point_cap, MAP_POINT_CAP);
        assert_eq!(config.default_page_size, PageSize::Hundred);
        assert_eq!(config.language, Language::Es);
    }

    #[test]
    fn test_builder() {
        let config = BrowseConfig::builder()
            .map_point_cap(500)
            .default_page_size(PageSize::TwoHundred)
            .language(Language::En)
            .build();

        assert_eq!(config.map_point_cap, 500);
        assert_eq!(config.default_page_size, PageSize::TwoHundred);
        assert_eq!(config.language, Language::En);
    }

    #[test]
    fn test_cap_never_drops_to_zero() {
        let config = BrowseConfig::builder().map_point_cap(0).build();
        assert_eq!(config.map_point_cap, 1);
    }

    #[test]
    fn test_lightweight_preset() {
        let config = BrowseConfigBuilder::lightweight().build();
        assert_eq!(config.map_point_cap, 2_000);
        assert_eq!(config.default_page_size, PageSize::Fifty);
    }
}
