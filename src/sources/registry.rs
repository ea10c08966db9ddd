//! Registry for managing search provider plugins.

use std::sync::Arc;

use super::{
    DoajArticlesProvider, DoajJournalsProvider, ExaProvider, Provider, ScholarProvider,
    TavilyProvider,
};
use crate::config::Config;
use crate::models::SourceKind;

bitflags::bitflags! {
    /// Capabilities that a provider can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ProviderCapabilities: u32 {
        const SEARCH = 1 << 0;
        /// Accepts the academic domain allow-list natively
        const DOMAIN_FILTER = 1 << 1;
        /// Returns structured bibliographic fields rather than free text
        const STRUCTURED_METADATA = 1 << 2;
    }
}

/// Registry of all active search providers.
///
/// Providers are held as injected instances (each owning its credentials
/// and HTTP client); there is no process-global provider state. Iteration
/// order is registration order, which has no bearing on merge results —
/// precedence is resolved by provider identity in the merge policy.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from configuration: key-less directory providers
    /// are always registered, keyed providers only when their API key is
    /// configured.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();

        if let Some(key) = &config.api_keys.tavily {
            registry.register(Arc::new(TavilyProvider::new(key.clone())));
        }
        if let Some(key) = &config.api_keys.serpapi {
            registry.register(Arc::new(ScholarProvider::new(key.clone())));
        }
        if let Some(key) = &config.api_keys.exa {
            registry.register(Arc::new(ExaProvider::new(key.clone())));
        }
        registry.register(Arc::new(DoajArticlesProvider::new()));
        registry.register(Arc::new(DoajJournalsProvider::new()));

        registry
    }

    /// Register a provider
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(provider);
    }

    /// Get a provider by kind
    pub fn get(&self, kind: &SourceKind) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| &p.kind() == kind)
    }

    /// All registered providers
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Provider>> {
        self.providers.iter()
    }

    /// Providers that support a specific capability
    pub fn with_capability(&self, capability: ProviderCapabilities) -> Vec<&Arc<dyn Provider>> {
        self.all()
            .filter(|p| p.capabilities().contains(capability))
            .collect()
    }

    /// Check if a provider is registered
    pub fn has(&self, kind: &SourceKind) -> bool {
        self.get(kind).is_some()
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
