// src/llm/registry.rs
//! Closed registry of deployment models.
//!
//! Each model needs both a credential and an endpoint before it counts as
//! available; availability can be queried without making a call.

use tracing::debug;

/// Deployment names the service knows about. The set is closed on purpose:
/// an unknown name is a caller error, not a configuration gap.
pub const MODEL_NAMES: [&str; 3] = ["4o", "gpt-4", "gpt-35-turbo"];

#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub name: String,
    pub api_key: String,
    pub endpoint: String,
}

impl ModelEntry {
    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.endpoint.is_empty()
    }
}

/// Credential/endpoint pairs for every known model.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
}

impl ModelRegistry {
    /// Load the registry from `AZURE_AI_API_KEY_*` / `AZURE_AI_ENDPOINT_*`.
    pub fn from_env() -> Self {
        let entry = |name: &str, suffix: &str| ModelEntry {
            name: name.to_string(),
            api_key: std::env::var(format!("AZURE_AI_API_KEY_{suffix}")).unwrap_or_default(),
            endpoint: std::env::var(format!("AZURE_AI_ENDPOINT_{suffix}")).unwrap_or_default(),
        };

        let registry = Self {
            entries: vec![
                entry("4o", "4O"),
                entry("gpt-4", "GPT4"),
                entry("gpt-35-turbo", "GPT35"),
            ],
        };
        debug!(available = ?registry.available_models(), "model registry loaded");
        registry
    }

    /// Build a registry from explicit entries (tests, alternate wiring).
    pub fn with_entries(entries: Vec<ModelEntry>) -> Self {
        Self { entries }
    }

    /// Look up a model's credentials, distinguishing "not a known model"
    /// from "known but unconfigured".
    pub fn resolve(&self, name: &str) -> Result<&ModelEntry, super::CompletionError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| super::CompletionError::UnknownModel(name.to_string()))?;
        if !entry.is_configured() {
            return Err(super::CompletionError::NotConfigured(name.to_string()));
        }
        Ok(entry)
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.resolve(name).is_ok()
    }

    /// Names of every model with both a credential and an endpoint.
    pub fn available_models(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.is_configured())
            .map(|e| e.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::CompletionError;

    fn test_registry() -> ModelRegistry {
        ModelRegistry::with_entries(vec![
            ModelEntry {
                name: "4o".into(),
                api_key: "key".into(),
                endpoint: "https://example.test/4o".into(),
            },
            ModelEntry {
                name: "gpt-4".into(),
                api_key: String::new(),
                endpoint: "https://example.test/gpt-4".into(),
            },
        ])
    }

    #[test]
    fn availability_needs_key_and_endpoint() {
        let registry = test_registry();
        assert!(registry.is_available("4o"));
        assert!(!registry.is_available("gpt-4"));
        assert_eq!(registry.available_models(), vec!["4o".to_string()]);
    }

    #[test]
    fn resolve_distinguishes_unknown_from_unconfigured() {
        let registry = test_registry();
        assert!(matches!(
            registry.resolve("gpt-99"),
            Err(CompletionError::UnknownModel(_))
        ));
        assert!(matches!(
            registry.resolve("gpt-4"),
            Err(CompletionError::NotConfigured(_))
        ));
        assert!(registry.resolve("4o").is_ok());
    }
}
