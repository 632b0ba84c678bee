//! Read sources for analysis history.
//!
//! History is loaded through an ordered list of sources. The first source
//! that answers wins; if every source fails the result is an empty list.

use super::api::{ApiClient, Endpoint};
use super::ClientError;
use crate::models::Business;
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// Something that can produce a list of analyzed businesses.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<Business>, ClientError>;
}

/// A service endpoint answering with a `{ businesses: [...] }` envelope.
pub struct EndpointSource {
    client: ApiClient,
    endpoint: Endpoint,
    name: String,
}

impl EndpointSource {
    pub fn new(client: ApiClient, endpoint: Endpoint) -> Self {
        let name = endpoint.path();
        Self {
            client,
            endpoint,
            name,
        }
    }
}

#[async_trait]
impl DataSource for EndpointSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<Business>, ClientError> {
        self.client.fetch_businesses(&self.endpoint).await
    }
}

/// Result of walking the chain.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub businesses: Vec<Business>,
    /// Name of the source that answered; `None` if all of them failed.
    pub source: Option<String>,
}

/// Ordered list of sources tried until one succeeds.
#[derive(Default)]
pub struct FallbackChain {
    sources: Vec<Box<dyn DataSource>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl DataSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// `/history`, then `/mock-analysis` when `fallback_to_mock` is set.
    pub fn for_client(client: &ApiClient, fallback_to_mock: bool) -> Self {
        let chain = Self::new().with_source(EndpointSource::new(client.clone(), Endpoint::History));

        if fallback_to_mock {
            chain.with_source(EndpointSource::new(
                client.clone(),
                Endpoint::MockAnalysis,
            ))
        } else {
            chain
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Try each source in order, stopping at the first success.
    pub async fn load(&self) -> LoadOutcome {
        for source in &self.sources {
            debug!("Loading history from {}", source.name());

            match source.fetch().await {
                Ok(businesses) => {
                    info!(
                        "Loaded {} businesses from {}",
                        businesses.len(),
                        source.name()
                    );
                    return LoadOutcome {
                        businesses,
                        source: Some(source.name().to_string()),
                    };
                }
                Err(e) => warn!("{} unavailable: {}", source.name(), e),
            }
        }

        warn!("No history source answered, starting with an empty list");
        LoadOutcome::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticSource {
        name: String,
        names: Vec<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl StaticSource {
        fn new(name: &str, names: Vec<&'static str>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                name: name.to_string(),
                names,
                calls: calls.clone(),
            };
            (source, calls)
        }
    }

    #[async_trait]
    impl DataSource for StaticSource {
        fn name(&self) -> &str {
            &self.name
        }

        async fn fetch(&self) -> Result<Vec<Business>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .names
                .iter()
                .map(|name| Business {
                    name: name.to_string(),
                    ..Business::default()
                })
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl DataSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self) -> Result<Vec<Business>, ClientError> {
            Err(ClientError::Connect("http://localhost:0".to_string()))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let (primary, primary_calls) = StaticSource::new("primary", vec!["A", "B"]);
        let (secondary, secondary_calls) = StaticSource::new("secondary", vec!["C"]);
        let chain = FallbackChain::new()
            .with_source(primary)
            .with_source(secondary);

        let outcome = chain.load().await;
        assert_eq!(outcome.source.as_deref(), Some("primary"));
        assert_eq!(outcome.businesses.len(), 2);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_after_failure() {
        let (secondary, _) = StaticSource::new("secondary", vec!["Mock"]);
        let chain = FallbackChain::new()
            .with_source(FailingSource)
            .with_source(secondary);

        let outcome = chain.load().await;
        assert_eq!(outcome.source.as_deref(), Some("secondary"));
        assert_eq!(outcome.businesses[0].name, "Mock");
    }

    #[tokio::test]
    async fn test_all_failing_yields_empty() {
        let chain = FallbackChain::new()
            .with_source(FailingSource)
            .with_source(FailingSource);

        let outcome = chain.load().await;
        assert!(outcome.source.is_none());
        assert!(outcome.businesses.is_empty());
    }

    #[test]
    fn test_empty_chain() {
        let chain = FallbackChain::new();
        assert!(chain.is_empty());
        let outcome = tokio_test::block_on(chain.load());
        assert!(outcome.businesses.is_empty());
    }

    #[test]
    fn test_for_client_sources() {
        let client = ApiClient::new(Default::default()).unwrap();
        assert_eq!(FallbackChain::for_client(&client, true).len(), 2);
        assert_eq!(FallbackChain::for_client(&client, false).len(), 1);
    }
}
