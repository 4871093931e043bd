//! Engine configuration from TOML or environment

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Default number of results per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default number of autocomplete suggestions
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Default snippet length in characters
pub const DEFAULT_SNIPPET_LENGTH: usize = 150;

/// Default number of PageRank iterations
pub const DEFAULT_PAGERANK_ITERATIONS: usize = 20;

/// Default PageRank damping factor
pub const DEFAULT_PAGERANK_DAMPING: f64 = 0.85;

/// Engine configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Results per page when the caller does not specify a limit
    #[serde(default = "EngineConfig::default_page_size")]
    pub page_size: usize,

    /// Autocomplete suggestions when the caller does not specify a limit
    #[serde(default = "EngineConfig::default_max_suggestions")]
    pub max_suggestions: usize,

    /// Maximum snippet length in characters
    #[serde(default = "EngineConfig::default_snippet_length")]
    pub snippet_length: usize,

    /// PageRank power iterations
    #[serde(default = "EngineConfig::default_pagerank_iterations")]
    pub pagerank_iterations: usize,

    /// PageRank damping factor, strictly between 0 and 1
    #[serde(default = "EngineConfig::default_pagerank_damping")]
    pub pagerank_damping: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            max_suggestions: Self::default_max_suggestions(),
            snippet_length: Self::default_snippet_length(),
            pagerank_iterations: Self::default_pagerank_iterations(),
            pagerank_damping: Self::default_pagerank_damping(),
        }
    }
}

impl EngineConfig {
    /// Default page size value
    fn default_page_size() -> usize {
        DEFAULT_PAGE_SIZE
    }

    /// Default suggestion count
    fn default_max_suggestions() -> usize {
        DEFAULT_MAX_SUGGESTIONS
    }

    /// Default snippet length
    fn default_snippet_length() -> usize {
        DEFAULT_SNIPPET_LENGTH
    }

    /// Default iteration count
    fn default_pagerank_iterations() -> usize {
        DEFAULT_PAGERANK_ITERATIONS
    }

    /// Default damping factor
    fn default_pagerank_damping() -> f64 {
        DEFAULT_PAGERANK_DAMPING
    }

    /// Load config from environment variables with fallback to defaults
    ///
    /// Environment variables:
    /// - `LEMOTEUR_PAGE_SIZE` - Results per page
    /// - `LEMOTEUR_MAX_SUGGESTIONS` - Autocomplete suggestions
    /// - `LEMOTEUR_SNIPPET_LENGTH` - Snippet length in characters
    /// - `LEMOTEUR_PAGERANK_ITERATIONS` - PageRank iterations
    /// - `LEMOTEUR_PAGERANK_DAMPING` - PageRank damping factor
    ///
    /// Unparseable values fall back to the default for that field.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("LEMOTEUR_PAGE_SIZE") {
            if let Ok(value) = raw.parse::<usize>() {
                config.page_size = value;
            }
        }

        if let Ok(raw) = std::env::var("LEMOTEUR_MAX_SUGGESTIONS") {
            if let Ok(value) = raw.parse::<usize>() {
                config.max_suggestions = value;
            }
        }

        if let Ok(raw) = std::env::var("LEMOTEUR_SNIPPET_LENGTH") {
            if let Ok(value) = raw.parse::<usize>() {
                config.snippet_length = value;
            }
        }

        if let Ok(raw) = std::env::var("LEMOTEUR_PAGERANK_ITERATIONS") {
            if let Ok(value) = raw.parse::<usize>() {
                config.pagerank_iterations = value;
            }
        }

        if let Ok(raw) = std::env::var("LEMOTEUR_PAGERANK_DAMPING") {
            if let Ok(value) = raw.parse::<f64>() {
                config.pagerank_damping = value;
            }
        }

        config
    }

    /// Load and validate config from a TOML file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            EngineError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate().map_err(EngineError::Config)?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Returns
    ///
    /// `Result<(), String>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("Page size must be greater than zero".to_string());
        }

        if self.max_suggestions == 0 {
            return Err("Max suggestions must be greater than zero".to_string());
        }

        if self.snippet_length == 0 {
            return Err("Snippet length must be greater than zero".to_string());
        }

        if self.pagerank_iterations == 0 {
            return Err("PageRank iterations must be greater than zero".to_string());
        }

        if self.pagerank_damping <= 0.0 || self.pagerank_damping >= 1.0 {
            return Err(format!(
                "PageRank damping must be strictly between 0 and 1, got {}",
                self.pagerank_damping
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_suggestions, DEFAULT_MAX_SUGGESTIONS);
        assert_eq!(config.snippet_length, DEFAULT_SNIPPET_LENGTH);
        assert_eq!(config.pagerank_iterations, DEFAULT_PAGERANK_ITERATIONS);
        assert_eq!(config.pagerank_damping, DEFAULT_PAGERANK_DAMPING);
    }

    #[test]
    fn test_config_from_env() {
        std::env::set_var("LEMOTEUR_PAGE_SIZE", "25");
        std::env::set_var("LEMOTEUR_PAGERANK_DAMPING", "0.5");
        std::env::set_var("LEMOTEUR_SNIPPET_LENGTH", "not-a-number");

        let config = EngineConfig::from_env();

        assert_eq!(config.page_size, 25);
        assert_eq!(config.pagerank_damping, 0.5);
        // Unparseable values keep the default.
        assert_eq!(config.snippet_length, DEFAULT_SNIPPET_LENGTH);

        // Clean up
        std::env::remove_var("LEMOTEUR_PAGE_SIZE");
        std::env::remove_var("LEMOTEUR_PAGERANK_DAMPING");
        std::env::remove_var("LEMOTEUR_SNIPPET_LENGTH");
    }

    #[test]
    fn test_config_validate_success() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validate_zero_page_size() {
        let config = EngineConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validate_damping_bounds() {
        for damping in [0.0, 1.0, -0.2, 1.5] {
            let config = EngineConfig {
                pagerank_damping: damping,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "damping {damping} should be rejected");
        }

        let config = EngineConfig {
            pagerank_damping: 0.99,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 3\npagerank_damping = 0.7").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.page_size, 3);
        assert_eq!(config.pagerank_damping, 0.7);
        // Missing keys fall back to defaults.
        assert_eq!(config.max_suggestions, DEFAULT_MAX_SUGGESTIONS);
    }

    #[test]
    fn test_config_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 0").unwrap();
        assert!(EngineConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/lemoteur.toml"));
        assert!(matches!(err, Err(EngineError::Config(_))));
    }
}
