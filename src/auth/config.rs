//! Host-supplied configuration for the provider registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::error::{invalid_configuration, SocialResult};

/// Placeholder replaced by the provider name in a service-wide redirect URI.
pub const PROVIDER_PLACEHOLDER: &str = "${provider}";

/// Per-provider settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub application_id: String,
    pub application_secret: String,
    #[serde(default)]
    pub scope: Vec<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
}

impl ProviderSettings {
    pub fn new(application_id: impl Into<String>, application_secret: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            application_secret: application_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_redirect_uri(mut self, value: impl Into<String>) -> Self {
        self.redirect_uri = Some(value.into());
        self
    }
}

/// Registry configuration: provider name → settings, plus an optional
/// redirect URI shared by providers that do not set their own.
///
/// Provider names are case-insensitive and stored lowercase.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default, alias = "provider", deserialize_with = "deserialize_providers")]
    providers: BTreeMap<String, ProviderSettings>,
}

fn deserialize_providers<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, ProviderSettings>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, ProviderSettings>::deserialize(deserializer)?;
    let mut providers = BTreeMap::new();
    for (name, settings) in raw {
        let normalized = normalize_name(&name);
        if providers.insert(normalized.clone(), settings).is_some() {
            return Err(serde::de::Error::custom(format!(
                "provider `{normalized}` is configured more than once"
            )));
        }
    }
    Ok(providers)
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> SocialResult<Self> {
        serde_json::from_str(raw)
            .map_err(|err| invalid_configuration(format!("Invalid service configuration: {err}")))
    }

    pub fn from_value(value: Value) -> SocialResult<Self> {
        serde_json::from_value(value)
            .map_err(|err| invalid_configuration(format!("Invalid service configuration: {err}")))
    }

    pub fn with_redirect_uri(mut self, value: impl Into<String>) -> Self {
        self.redirect_uri = Some(value.into());
        self
    }

    pub fn with_provider(mut self, name: &str, settings: ProviderSettings) -> Self {
        self.providers.insert(normalize_name(name), settings);
        self
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.get(&normalize_name(name))
    }

    /// Configured provider names, lowercase and sorted.
    pub fn provider_names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Resolves the redirect URI for `name`: the provider's own value wins,
    /// otherwise the shared one with [`PROVIDER_PLACEHOLDER`] substituted.
    pub fn redirect_uri_for(&self, name: &str) -> SocialResult<String> {
        let name = normalize_name(name);
        let own = self
            .providers
            .get(&name)
            .and_then(|settings| settings.redirect_uri.as_deref());
        match own.or(self.redirect_uri.as_deref()) {
            Some(uri) if !uri.is_empty() => Ok(uri.replace(PROVIDER_PLACEHOLDER, &name)),
            _ => Err(invalid_configuration(format!(
                "No redirect URI configured for provider `{name}`"
            ))),
        }
    }
}
