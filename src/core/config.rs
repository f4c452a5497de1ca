use serde::{Deserialize, Serialize};
use crate::core::error::Result;
use crate::index::child_search::SearchStrategy;

/// Index construction and query configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bulk_load: bool,              // Backward-linear child search
    pub case_sensitive: bool,         // Exact-byte matching instead of case folding
    pub initial_capacity: usize,      // Pre-sizing for token/node/postings arenas
    pub max_nodes: usize,             // Node table limit
    pub max_tokens: usize,            // Token store limit
    pub max_token_length: usize,      // Longest token the index answers for
    pub result_cap: Option<usize>,    // OR estimate cap, defaults to universe size
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bulk_load: true,
            case_sensitive: false,
            initial_capacity: 1024,
            max_nodes: i32::MAX as usize,
            max_tokens: i32::MAX as usize,
            max_token_length: 255,
            result_cap: None,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_bulk_load(mut self, bulk_load: bool) -> Self {
        self.bulk_load = bulk_load;
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_limits(mut self, max_nodes: usize, max_tokens: usize) -> Self {
        self.max_nodes = max_nodes;
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_result_cap(mut self, cap: usize) -> Self {
        self.result_cap = Some(cap);
        self
    }

    /// Child search used by general insertion
    pub fn search_strategy(&self) -> SearchStrategy {
        if self.bulk_load {
            SearchStrategy::LinearBackward
        } else if self.case_sensitive {
            SearchStrategy::LinearForward
        } else {
            SearchStrategy::Binary
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = Config::from_json(r#"{"case_sensitive": true, "result_cap": 50}"#).unwrap();
        assert!(config.case_sensitive);
        assert!(config.bulk_load);
        assert_eq!(config.result_cap, Some(50));
        assert_eq!(config.max_token_length, 255);
    }

    #[test]
    fn strategy_follows_mode() {
        assert_eq!(Config::default().search_strategy(), SearchStrategy::LinearBackward);
        let general = Config::default().with_bulk_load(false);
        assert_eq!(general.clone().search_strategy(), SearchStrategy::Binary);
        assert_eq!(
            general.with_case_sensitive(true).search_strategy(),
            SearchStrategy::LinearForward
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Config::from_json("{bulk_load").unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Parse);
    }
}
