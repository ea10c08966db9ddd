//! Configuration management.
//!
//! Settings load from an optional TOML file with environment-variable
//! overrides under the `BIBLIOGRAPHER_` prefix. API keys default to the
//! conventional environment variables of each service.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api_keys]
//! tavily = "tvly-..."
//! serpapi = "..."
//! exa = "..."
//!
//! [search]
//! max_results = 7
//! timeout_secs = 30
//!
//! [merge]
//! precedence = ["tavily", "google_scholar", "exa", "doaj_articles", "doaj_journals"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::merge::MergePolicy;
use crate::models::{SourceKind, DEFAULT_PRECEDENCE};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API keys for the external search services
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Merge policy settings
    #[serde(default)]
    pub merge: MergeConfig,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Tavily web search API key
    #[serde(default)]
    pub tavily: Option<String>,

    /// SerpApi key (Google Scholar proxy)
    #[serde(default)]
    pub serpapi: Option<String>,

    /// Exa.ai API key
    #[serde(default)]
    pub exa: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            tavily: std::env::var("TAVILY_API_KEY").ok(),
            serpapi: std::env::var("SERPAPI_API_KEY").ok(),
            exa: std::env::var("EXA_API_KEY").ok(),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results requested from each provider
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_max_results() -> usize {
    7
}

fn default_timeout_secs() -> u64 {
    30
}

/// Merge precedence configuration, least authoritative provider first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default = "default_precedence")]
    pub precedence: Vec<SourceKind>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            precedence: default_precedence(),
        }
    }
}

fn default_precedence() -> Vec<SourceKind> {
    DEFAULT_PRECEDENCE.to_vec()
}

impl MergeConfig {
    /// Build the merge policy this configuration describes.
    pub fn policy(&self) -> MergePolicy {
        MergePolicy::new(self.precedence.clone())
    }
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("BIBLIOGRAPHER").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Locate a config file: `./bibliographer.toml`, then the user config dir.
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("bibliographer.toml");
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("bibliographer").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.max_results, 7);
        assert_eq!(config.search.timeout_secs, 30);
        assert_eq!(config.merge.precedence.len(), 5);
        assert_eq!(config.merge.precedence[0], SourceKind::Tavily);
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
            [api_keys]
            tavily = "tvly-123"

            [search]
            max_results = 3

            [merge]
            precedence = ["doaj_articles", "tavily"]
            "#,
        )
        .unwrap();

        assert_eq!(config.api_keys.tavily.as_deref(), Some("tvly-123"));
        assert_eq!(config.search.max_results, 3);
        // Unset fields keep their defaults
        assert_eq!(config.search.timeout_secs, 30);
        assert_eq!(
            config.merge.precedence,
            vec![SourceKind::DoajArticles, SourceKind::Tavily]
        );
    }

    #[test]
    fn test_unknown_provider_id_parses_as_other() {
        let config: Config = toml::from_str(
            r#"
            [merge]
            precedence = ["tavily", "my_custom_source"]
            "#,
        )
        .unwrap();
        assert_eq!(
            config.merge.precedence[1],
            SourceKind::Other("my_custom_source".to_string())
        );
    }

    #[test]
    fn test_policy_ranks_from_config() {
        let config = MergeConfig {
            precedence: vec![SourceKind::DoajJournals, SourceKind::Tavily],
        };
        let policy = config.policy();
        assert!(policy.rank(&SourceKind::DoajJournals) < policy.rank(&SourceKind::Tavily));
        // Unlisted providers rank after listed ones
        assert_eq!(policy.rank(&SourceKind::Exa), 2);
    }
}
