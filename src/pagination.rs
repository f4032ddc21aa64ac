//! This module defines the common functionality for paging transaction lists.

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to return per page when not specified in a
    /// request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

impl PaginationConfig {
    /// Resolve the page number from an optional query parameter.
    ///
    /// A missing or zero page falls back to [PaginationConfig::default_page].
    pub fn page_or_default(&self, page: Option<u64>) -> u64 {
        page.filter(|&page| page > 0).unwrap_or(self.default_page)
    }

    /// Resolve the page size from an optional query parameter.
    ///
    /// A missing or zero limit falls back to
    /// [PaginationConfig::default_page_size].
    pub fn limit_or_default(&self, limit: Option<u64>) -> u64 {
        limit
            .filter(|&limit| limit > 0)
            .unwrap_or(self.default_page_size)
    }
}

#[cfg(test)]
mod pagination_config_tests {
    use crate::pagination::PaginationConfig;

    #[test]
    fn missing_page_and_limit_use_defaults() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_or_default(None), 1);
        assert_eq!(config.limit_or_default(None), 10);
    }

    #[test]
    fn zero_page_and_limit_use_defaults() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_or_default(Some(0)), 1);
        assert_eq!(config.limit_or_default(Some(0)), 10);
    }

    #[test]
    fn explicit_page_and_limit_are_kept() {
        let config = PaginationConfig::default();

        assert_eq!(config.page_or_default(Some(3)), 3);
        assert_eq!(config.limit_or_default(Some(25)), 25);
    }
}
