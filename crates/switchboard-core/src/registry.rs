//! Static strategy registry: source scoping plus token-to-factory binding.
//!
//! The registry is built exactly once at process initialization by explicit
//! [`RegistryBuilder`] calls and is read-only afterwards, so warm Lambda
//! invocations share it without synchronization.

use std::collections::HashMap;

use serde_json::Value;

use crate::source::InvocationSource;
use crate::strategy::Strategy;

/// Reserved event field naming the strategy to run. The sole cross-cutting
/// contract between event producers and the dispatcher.
pub const REQUEST_TYPE_FIELD: &str = "request_type";

/// Builds one strategy instance from a sanitized event.
pub type StrategyFactory = Box<dyn Fn(&Value) -> anyhow::Result<Box<dyn Strategy>> + Send + Sync>;

/// Process-wide table of registered strategies.
///
/// Two views over the same registrations: which tokens each
/// [`InvocationSource`] accepts, and which factory backs each token. A token
/// is bound to exactly one factory and is only dispatchable for the source
/// it was registered under.
pub struct StrategyRegistry {
    factories: HashMap<String, StrategyFactory>,
    sources: HashMap<InvocationSource, Vec<String>>,
}

impl StrategyRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder {
            registry: StrategyRegistry {
                factories: HashMap::new(),
                sources: HashMap::new(),
            },
        }
    }

    /// Whether any strategy is registered for `source`.
    pub fn has_source(&self, source: InvocationSource) -> bool {
        self.sources.contains_key(&source)
    }

    /// Tokens registered for `source`, empty when the source is unregistered.
    pub fn tokens_for(&self, source: InvocationSource) -> &[String] {
        self.sources
            .get(&source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `token` is dispatchable for `source`.
    pub fn is_registered_for(&self, source: InvocationSource, token: &str) -> bool {
        self.tokens_for(source).iter().any(|t| t == token)
    }

    /// The factory bound to `token`, across all sources.
    pub fn factory(&self, token: &str) -> Option<&StrategyFactory> {
        self.factories.get(token)
    }

    /// Number of registered tokens.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("tokens", &self.factories.keys().collect::<Vec<_>>())
            .field("sources", &self.sources)
            .finish()
    }
}

/// Chained registration of strategies, one call per (source, token, factory).
///
/// # Example
///
/// ```
/// use switchboard_core::{InvocationSource, Rejection, Strategy, StrategyRegistry};
/// use async_trait::async_trait;
/// use serde_json::{json, Value};
///
/// struct Ping;
///
/// #[async_trait]
/// impl Strategy for Ping {
///     fn validate(&self) -> Result<(), Rejection> {
///         Ok(())
///     }
///     async fn operate(&self) -> anyhow::Result<Value> {
///         Ok(json!({"pong": true}))
///     }
/// }
///
/// let registry = StrategyRegistry::builder()
///     .strategy(InvocationSource::DirectInvoke, "Ping", |_event| Ok(Box::new(Ping)))
///     .build();
/// assert!(registry.is_registered_for(InvocationSource::DirectInvoke, "Ping"));
/// ```
pub struct RegistryBuilder {
    registry: StrategyRegistry,
}

impl RegistryBuilder {
    /// Register `factory` under `token` for `source`.
    ///
    /// Panics when `token` is already registered: duplicate registration is
    /// a startup defect, not a runtime condition.
    pub fn strategy<F>(mut self, source: InvocationSource, token: &str, factory: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Box<dyn Strategy>> + Send + Sync + 'static,
    {
        let previous = self
            .registry
            .factories
            .insert(token.to_string(), Box::new(factory));
        assert!(
            previous.is_none(),
            "strategy token '{token}' registered twice"
        );
        self.registry
            .sources
            .entry(source)
            .or_default()
            .push(token.to_string());
        self
    }

    pub fn build(self) -> StrategyRegistry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::Rejection;
    use crate::test_utils::StubStrategy;
    use serde_json::json;

    fn two_source_registry() -> StrategyRegistry {
        StrategyRegistry::builder()
            .strategy(InvocationSource::AmazonConnect, "EchoConnect", |_| {
                Ok(Box::new(StubStrategy::succeeding(json!({"ok": true}))))
            })
            .strategy(InvocationSource::AmazonConnect, "RejectsEverything", |_| {
                Ok(Box::new(StubStrategy::rejecting(Rejection::new("no"))))
            })
            .strategy(InvocationSource::S3, "EchoS3", |_| {
                Ok(Box::new(StubStrategy::succeeding(json!({"ok": true}))))
            })
            .build()
    }

    // ==================== Registration Tests ====================

    #[test]
    fn test_registered_sources_and_tokens() {
        let registry = two_source_registry();
        assert!(registry.has_source(InvocationSource::AmazonConnect));
        assert!(registry.has_source(InvocationSource::S3));
        assert!(!registry.has_source(InvocationSource::EventBridge));
        assert_eq!(
            registry.tokens_for(InvocationSource::AmazonConnect),
            &["EchoConnect".to_string(), "RejectsEverything".to_string()]
        );
        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_tokens_are_scoped_to_their_source() {
        let registry = two_source_registry();
        assert!(registry.is_registered_for(InvocationSource::AmazonConnect, "EchoConnect"));
        // Valid token, wrong source: not dispatchable there.
        assert!(!registry.is_registered_for(InvocationSource::S3, "EchoConnect"));
        assert!(!registry.is_registered_for(InvocationSource::AmazonConnect, "EchoS3"));
    }

    #[test]
    fn test_unregistered_source_has_no_tokens() {
        let registry = two_source_registry();
        assert!(registry.tokens_for(InvocationSource::DirectInvoke).is_empty());
    }

    #[test]
    fn test_factory_lookup_and_construction() {
        let registry = two_source_registry();
        let factory = registry.factory("EchoConnect").unwrap();
        let strategy = factory(&json!({})).unwrap();
        assert!(strategy.validate().is_ok());
    }

    #[test]
    fn test_unknown_token_has_no_factory() {
        let registry = two_source_registry();
        assert!(registry.factory("DoesNotExist").is_none());
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn test_duplicate_token_registration_panics() {
        let _ = StrategyRegistry::builder()
            .strategy(InvocationSource::AmazonConnect, "Dup", |_| {
                Ok(Box::new(StubStrategy::succeeding(json!(1))))
            })
            .strategy(InvocationSource::S3, "Dup", |_| {
                Ok(Box::new(StubStrategy::succeeding(json!(2))))
            });
    }

    #[test]
    fn test_empty_registry() {
        let registry = StrategyRegistry::builder().build();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(!registry.has_source(InvocationSource::AmazonConnect));
    }
}
