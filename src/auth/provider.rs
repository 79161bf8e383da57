use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::consumer::Consumer;
use crate::auth::error::SocialResult;
use crate::auth::oauth2::{self, state, TokenRequestPlacement};
use crate::auth::token::AccessToken;
use crate::auth::user::User;
use crate::http::{HttpClient, HttpMethod};

pub const DEFAULT_SCOPE_SEPARATOR: &str = " ";
pub const FIELDS_SEPARATOR: &str = ",";

/// Configuration shared by every provider adapter.
///
/// Adapters embed a `ProviderBase` and expose it through [`Provider::base`].
/// It is built once by the [`crate::auth::Service`] and not mutated afterwards.
#[derive(Clone)]
pub struct ProviderBase {
    consumer: Consumer,
    redirect_url: String,
    scope: Vec<String>,
    fields: Vec<String>,
    http_client: Arc<dyn HttpClient>,
}

impl ProviderBase {
    pub fn new(
        consumer: Consumer,
        redirect_url: impl Into<String>,
        http_client: Arc<dyn HttpClient>,
    ) -> Self {
        Self {
            consumer,
            redirect_url: redirect_url.into(),
            scope: Vec::new(),
            fields: Vec::new(),
            http_client,
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

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn http_client(&self) -> &dyn HttpClient {
        self.http_client.as_ref()
    }
}

impl fmt::Debug for ProviderBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderBase")
            .field("consumer", &self.consumer)
            .field("redirect_url", &self.redirect_url)
            .field("scope", &self.scope)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Contract every social network adapter fulfils.
///
/// Adapters supply their endpoints, name and [`Provider::get_identity`]; the
/// OAuth2 authorization-code flow comes from the default methods, which
/// delegate to the free functions in [`crate::auth::oauth2`]. Overriding
/// [`Provider::parse_token`], [`Provider::request_http_method`],
/// [`Provider::token_request_placement`] or [`Provider::scope_separator`]
/// adapts the flow to a provider's quirks.
///
/// Providers hold no per-login state, so one instance serves concurrent logins.
#[async_trait]
pub trait Provider: fmt::Debug + Send + Sync {
    fn base(&self) -> &ProviderBase;

    /// Short stable identifier used by the registry (lowercase).
    fn name(&self) -> &'static str;

    fn authorize_uri(&self) -> &str;

    fn request_token_uri(&self) -> &str;

    fn scope_separator(&self) -> &str {
        DEFAULT_SCOPE_SEPARATOR
    }

    /// HTTP method used for the token request.
    fn request_http_method(&self) -> HttpMethod {
        HttpMethod::Post
    }

    fn token_request_placement(&self) -> TokenRequestPlacement {
        TokenRequestPlacement::Query
    }

    fn consumer(&self) -> &Consumer {
        self.base().consumer()
    }

    fn redirect_url(&self) -> &str {
        self.base().redirect_url()
    }

    fn scope(&self) -> &[String] {
        self.base().scope()
    }

    fn fields(&self) -> &[String] {
        self.base().fields()
    }

    fn scope_inline(&self) -> String {
        self.scope().join(self.scope_separator())
    }

    fn fields_inline(&self) -> String {
        self.fields().join(FIELDS_SEPARATOR)
    }

    /// Parameters every authorization URL starts with, before scope and fields.
    fn auth_url_parameters(&self) -> Vec<(String, String)> {
        oauth2::default_auth_url_parameters(self)
    }

    fn make_auth_url(&self) -> String {
        oauth2::make_auth_url(self, None)
    }

    /// Same as [`Provider::make_auth_url`] with an added `state` parameter.
    fn make_auth_url_with_state(&self, state: &str) -> String {
        oauth2::make_auth_url(self, Some(state))
    }

    /// Turns the token endpoint's body into an [`AccessToken`].
    fn parse_token(&self, body: &str) -> SocialResult<AccessToken> {
        oauth2::parse_form_token(body)
    }

    async fn get_access_token(&self, code: &str) -> SocialResult<AccessToken> {
        oauth2::exchange_code(self, code).await
    }

    /// Completes the login from the parameters of the provider's callback.
    async fn get_access_token_by_request_parameters(
        &self,
        params: &HashMap<String, String>,
    ) -> SocialResult<AccessToken> {
        let code = oauth2::code_from_parameters(params)?;
        self.get_access_token(code).await
    }

    /// Like [`Provider::get_access_token_by_request_parameters`], rejecting
    /// callbacks whose `state` differs from `expected_state`.
    async fn get_access_token_by_request_parameters_with_state(
        &self,
        params: &HashMap<String, String>,
        expected_state: &str,
    ) -> SocialResult<AccessToken> {
        oauth2::reject_provider_error(params)?;
        state::verify_state(params, expected_state)?;
        self.get_access_token_by_request_parameters(params).await
    }

    async fn get_identity(&self, token: &AccessToken) -> SocialResult<User>;
}
