use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::auth::config::{normalize_name, ServiceConfig};
use crate::auth::consumer::Consumer;
use crate::auth::error::{
    invalid_configuration, provider_not_registered, unknown_provider, SocialResult,
};
use crate::auth::provider::{Provider, ProviderBase};
use crate::http::{HttpClient, ReqwestHttpClient};
use crate::providers;

/// Builds a provider instance from its resolved configuration.
pub type ProviderFactory = Arc<dyn Fn(ProviderBase) -> Arc<dyn Provider> + Send + Sync>;

/// Facade over every configured provider.
///
/// Providers are created on first request and cached for the lifetime of the
/// service; repeated lookups of the same name (in any letter case) return the
/// same instance. Cloning a `Service` shares the cache.
#[derive(Clone)]
pub struct Service {
    inner: Arc<ServiceInner>,
}

struct ServiceInner {
    config: ServiceConfig,
    http_client: Arc<dyn HttpClient>,
    factories: HashMap<String, ProviderFactory>,
    instances: Mutex<HashMap<String, Arc<dyn Provider>>>,
}

impl Service {
    pub fn builder(config: ServiceConfig) -> ServiceBuilder {
        ServiceBuilder::new(config)
    }

    /// Creates a service with the built-in providers and the given client.
    pub fn new(config: ServiceConfig, http_client: Arc<dyn HttpClient>) -> Self {
        ServiceBuilder::new(config).assemble(http_client)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.inner.config
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        self.inner.http_client.clone()
    }

    /// Returns the provider registered under `name`, creating it on first use.
    ///
    /// Fails with `ProviderNotRegistered` when the configuration has no entry
    /// for `name` and with `UnknownProvider` when no implementation exists.
    pub fn get_provider(&self, name: &str) -> SocialResult<Arc<dyn Provider>> {
        let name = normalize_name(name);
        let settings = self
            .inner
            .config
            .provider(&name)
            .ok_or_else(|| provider_not_registered(&name))?;
        let factory = self
            .inner
            .factories
            .get(&name)
            .ok_or_else(|| unknown_provider(&name))?;

        let mut instances = self.instances_guard();
        if let Some(existing) = instances.get(&name) {
            return Ok(existing.clone());
        }

        if settings.application_id.is_empty() {
            return Err(invalid_configuration(format!(
                "Provider `{name}` has an empty applicationId"
            )));
        }
        let redirect_uri = self.inner.config.redirect_uri_for(&name)?;
        let base = ProviderBase::new(
            Consumer::new(
                settings.application_id.as_str(),
                settings.application_secret.as_str(),
            ),
            redirect_uri,
            self.inner.http_client.clone(),
        )
        .with_scope(settings.scope.iter().cloned())
        .with_fields(settings.fields.iter().cloned());

        let provider = factory(base);
        log::debug!("instantiated social provider {name}");
        instances.insert(name, provider.clone());
        Ok(provider)
    }

    /// Whether `name` is both configured and backed by an implementation.
    pub fn has_provider(&self, name: &str) -> bool {
        let name = normalize_name(name);
        self.inner.config.provider(&name).is_some() && self.inner.factories.contains_key(&name)
    }

    /// Configured provider names, lowercase and sorted.
    pub fn provider_names(&self) -> Vec<String> {
        self.inner
            .config
            .provider_names()
            .map(str::to_owned)
            .collect()
    }

    fn instances_guard(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn Provider>>> {
        self.inner
            .instances
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut factories: Vec<&String> = self.inner.factories.keys().collect();
        factories.sort();
        f.debug_struct("Service")
            .field("config", &self.inner.config)
            .field("implementations", &factories)
            .finish_non_exhaustive()
    }
}

/// Configures a [`Service`]: HTTP client and provider implementations.
///
/// The built-in adapters (`vk`, `facebook`, `github`, `google`) are registered
/// up front; [`ServiceBuilder::register_provider`] adds or replaces one.
pub struct ServiceBuilder {
    config: ServiceConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    factories: HashMap<String, ProviderFactory>,
}

impl ServiceBuilder {
    pub fn new(config: ServiceConfig) -> Self {
        let mut builder = Self {
            config,
            http_client: None,
            factories: HashMap::new(),
        };
        providers::register_builtin(&mut builder);
        builder
    }

    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn register_provider<F>(mut self, name: &str, factory: F) -> Self
    where
        F: Fn(ProviderBase) -> Arc<dyn Provider> + Send + Sync + 'static,
    {
        self.insert_factory(name, Arc::new(factory));
        self
    }

    pub(crate) fn insert_factory(&mut self, name: &str, factory: ProviderFactory) {
        self.factories.insert(normalize_name(name), factory);
    }

    /// Finishes the service, creating a [`ReqwestHttpClient`] when no client
    /// was supplied.
    pub fn build(mut self) -> SocialResult<Service> {
        let http_client: Arc<dyn HttpClient> = match self.http_client.take() {
            Some(client) => client,
            None => Arc::new(ReqwestHttpClient::new()?),
        };
        Ok(self.assemble(http_client))
    }

    fn assemble(self, http_client: Arc<dyn HttpClient>) -> Service {
        Service {
            inner: Arc::new(ServiceInner {
                config: self.config,
                http_client,
                factories: self.factories,
                instances: Mutex::new(HashMap::new()),
            }),
        }
    }
}
