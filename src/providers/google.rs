use async_trait::async_trait;
use serde_json::Value;

use crate::auth::error::{provider_error, SocialResult};
use crate::auth::oauth2::{self, TokenRequestPlacement, UNEXPECTED_RESPONSE};
use crate::auth::user::{id_from_value, string_field};
use crate::auth::{AccessToken, Provider, ProviderBase, User};
use crate::http::HttpRequest;

use super::identity_status_error;

/// Google adapter.
///
/// Google only accepts token-request credentials in the request body and
/// requires `response_type=code` on the authorization URL.
#[derive(Debug)]
pub struct GoogleProvider {
    base: ProviderBase,
}

impl GoogleProvider {
    pub const NAME: &'static str = "google";
    pub const AUTHORIZE_URI: &'static str = "https://accounts.google.com/o/oauth2/v2/auth";
    pub const REQUEST_TOKEN_URI: &'static str = "https://oauth2.googleapis.com/token";
    pub const USERINFO_URI: &'static str = "https://www.googleapis.com/oauth2/v3/userinfo";

    pub fn new(base: ProviderBase) -> Self {
        Self { base }
    }
}

#[async_trait]
impl Provider for GoogleProvider {
    fn base(&self) -> &ProviderBase {
        &self.base
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn authorize_uri(&self) -> &str {
        Self::AUTHORIZE_URI
    }

    fn request_token_uri(&self) -> &str {
        Self::REQUEST_TOKEN_URI
    }

    fn token_request_placement(&self) -> TokenRequestPlacement {
        TokenRequestPlacement::Body
    }

    fn auth_url_parameters(&self) -> Vec<(String, String)> {
        let mut params = oauth2::default_auth_url_parameters(self);
        params.push(("response_type".to_string(), "code".to_string()));
        params
    }

    fn parse_token(&self, body: &str) -> SocialResult<AccessToken> {
        oauth2::parse_json_token(body)
    }

    async fn get_identity(&self, token: &AccessToken) -> SocialResult<User> {
        let request = HttpRequest::get(Self::USERINFO_URI).with_bearer_token(token.token());
        let response = self.base.http_client().request(request).await?;
        if !response.is_success() {
            return Err(identity_status_error(Self::NAME, &response));
        }

        let payload: Value = response.json()?;
        let id = payload
            .get("sub")
            .and_then(id_from_value)
            .ok_or_else(|| provider_error(UNEXPECTED_RESPONSE))?;

        Ok(User {
            id,
            name: string_field(&payload, "name"),
            email: string_field(&payload, "email"),
            avatar: string_field(&payload, "picture"),
            locale: string_field(&payload, "locale"),
            raw: payload,
        })
    }
}
