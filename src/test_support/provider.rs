use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::error::SocialResult;
use crate::auth::oauth2::TokenRequestPlacement;
use crate::auth::{AccessToken, Consumer, Provider, ProviderBase, User};
use crate::http::HttpClient;

/// Provider with fixed endpoints (`https://p/auth`, `https://p/token`) whose
/// identity is derived from the token alone.
#[derive(Debug)]
pub struct TestProvider {
    base: ProviderBase,
    separator: &'static str,
    placement: TokenRequestPlacement,
}

impl TestProvider {
    pub fn new(base: ProviderBase) -> Self {
        Self {
            base,
            separator: " ",
            placement: TokenRequestPlacement::Query,
        }
    }

    pub fn with_separator(mut self, separator: &'static str) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_placement(mut self, placement: TokenRequestPlacement) -> Self {
        self.placement = placement;
        self
    }
}

#[async_trait]
impl Provider for TestProvider {
    fn base(&self) -> &ProviderBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        "test"
    }

    fn authorize_uri(&self) -> &str {
        "https://p/auth"
    }

    fn request_token_uri(&self) -> &str {
        "https://p/token"
    }

    fn scope_separator(&self) -> &str {
        self.separator
    }

    fn token_request_placement(&self) -> TokenRequestPlacement {
        self.placement
    }

    async fn get_identity(&self, token: &AccessToken) -> SocialResult<User> {
        Ok(User::new(format!("user-of-{}", token.token())))
    }
}

/// Builds a [`TestProvider`] for consumer `APP`/`SEC` redirecting to `https://x/cb`.
pub fn test_provider(
    client: Arc<impl HttpClient + 'static>,
    scope: &[&str],
    fields: &[&str],
) -> TestProvider {
    let base = ProviderBase::new(Consumer::new("APP", "SEC"), "https://x/cb", client)
        .with_scope(scope.iter().copied())
        .with_fields(fields.iter().copied());
    TestProvider::new(base)
}
