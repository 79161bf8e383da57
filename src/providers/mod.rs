//! Built-in provider adapters.
//!
//! Each adapter embeds a [`ProviderBase`] and supplies endpoints, flow
//! overrides and the mapping of its identity payload onto [`crate::auth::User`].

mod facebook;
mod github;
mod google;
mod vk;

use std::sync::Arc;

use serde_json::Value;

use crate::auth::error::{invalid_access_token, provider_error, SocialError};
use crate::auth::{Provider, ProviderBase, ServiceBuilder};
use crate::http::HttpResponse;

pub use facebook::FacebookProvider;
pub use github::GitHubProvider;
pub use google::GoogleProvider;
pub use vk::VkProvider;

pub(crate) fn register_builtin(builder: &mut ServiceBuilder) {
    builder.insert_factory(
        VkProvider::NAME,
        Arc::new(|base: ProviderBase| -> Arc<dyn Provider> { Arc::new(VkProvider::new(base)) }),
    );
    builder.insert_factory(
        FacebookProvider::NAME,
        Arc::new(|base: ProviderBase| -> Arc<dyn Provider> {
            Arc::new(FacebookProvider::new(base))
        }),
    );
    builder.insert_factory(
        GitHubProvider::NAME,
        Arc::new(|base: ProviderBase| -> Arc<dyn Provider> { Arc::new(GitHubProvider::new(base)) }),
    );
    builder.insert_factory(
        GoogleProvider::NAME,
        Arc::new(|base: ProviderBase| -> Arc<dyn Provider> { Arc::new(GoogleProvider::new(base)) }),
    );
}

/// Maps a failed identity response of a REST-style API (status code carries
/// the outcome) to an error. 401 means the token was rejected.
pub(crate) fn identity_status_error(provider: &str, response: &HttpResponse) -> SocialError {
    let payload: Value = serde_json::from_str(response.body()).unwrap_or(Value::Null);
    let message = ["error_description", "message", "error"]
        .iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
        .unwrap_or_else(|| {
            format!(
                "{provider} identity request failed with HTTP {}",
                response.status_code()
            )
        });

    log::warn!(
        "identity request to {provider} answered HTTP {}",
        response.status_code()
    );
    if response.status_code() == 401 {
        invalid_access_token(message)
    } else {
        provider_error(message)
    }
}
