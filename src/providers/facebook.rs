use async_trait::async_trait;
use serde_json::Value;

use crate::auth::error::{invalid_access_token, provider_error, SocialResult};
use crate::auth::oauth2::{self, encode, UNEXPECTED_RESPONSE};
use crate::auth::user::{id_from_value, string_field};
use crate::auth::{AccessToken, Provider, ProviderBase, User};
use crate::http::{HttpMethod, HttpRequest};

/// Graph API error code for expired or invalid tokens.
const GRAPH_OAUTH_EXCEPTION: i64 = 190;
const DEFAULT_PROFILE_FIELDS: &str = "id,name,email,picture.type(large),locale";

/// Facebook (Graph API) adapter.
#[derive(Debug)]
pub struct FacebookProvider {
    base: ProviderBase,
}

impl FacebookProvider {
    pub const NAME: &'static str = "facebook";
    pub const AUTHORIZE_URI: &'static str = "https://www.facebook.com/v18.0/dialog/oauth";
    pub const REQUEST_TOKEN_URI: &'static str =
        "https://graph.facebook.com/v18.0/oauth/access_token";
    pub const PROFILE_URI: &'static str = "https://graph.facebook.com/v18.0/me";

    pub fn new(base: ProviderBase) -> Self {
        Self { base }
    }
}

#[async_trait]
impl Provider for FacebookProvider {
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

    fn scope_separator(&self) -> &str {
        ","
    }

    fn request_http_method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    fn parse_token(&self, body: &str) -> SocialResult<AccessToken> {
        oauth2::parse_json_token(body)
    }

    async fn get_identity(&self, token: &AccessToken) -> SocialResult<User> {
        let fields = if self.fields().is_empty() {
            DEFAULT_PROFILE_FIELDS.to_string()
        } else {
            self.fields_inline()
        };
        let query = encode::build_query(&[
            ("access_token".to_string(), token.token().to_string()),
            ("fields".to_string(), fields),
        ]);
        let url = encode::append_query(Self::PROFILE_URI, &query);

        let response = self.base.http_client().request(HttpRequest::get(url)).await?;
        let payload: Value = response.json()?;

        if let Some(error) = oauth2::error_member(&payload) {
            let message = string_field(error, "message")
                .unwrap_or_else(|| UNEXPECTED_RESPONSE.to_string());
            return match error.get("code").and_then(Value::as_i64) {
                Some(GRAPH_OAUTH_EXCEPTION) => Err(invalid_access_token(message)),
                _ => Err(provider_error(message)),
            };
        }

        let id = payload
            .get("id")
            .and_then(id_from_value)
            .ok_or_else(|| provider_error(UNEXPECTED_RESPONSE))?;

        Ok(User {
            id,
            name: string_field(&payload, "name"),
            email: string_field(&payload, "email"),
            avatar: payload
                .pointer("/picture/data/url")
                .and_then(Value::as_str)
                .map(str::to_owned),
            locale: string_field(&payload, "locale"),
            raw: payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Consumer, SocialErrorCode};
    use crate::test_support::MockHttpClient;
    use std::sync::Arc;

    fn provider(client: Arc<MockHttpClient>) -> FacebookProvider {
        FacebookProvider::new(
            ProviderBase::new(Consumer::new("APP", "SEC"), "https://x/cb", client)
                .with_scope(["email", "public_profile"]),
        )
    }

    #[tokio::test(flavor = "current_thread")]
    async fn json_token_error_surfaces_provider_message() {
        let client = MockHttpClient::new();
        client.push_response(
            400,
            r#"{"error":{"message":"This authorization code has expired.","type":"OAuthException","code":100}}"#,
        );
        let err = provider(client).get_access_token("old").await.unwrap_err();
        assert_eq!(err.code, SocialErrorCode::ProviderError);
        assert_eq!(err.message(), "This authorization code has expired.");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn identity_reads_picture_and_locale() {
        let client = MockHttpClient::new();
        client.push_response(
            200,
            r#"{"id":"10150","name":"Mark","email":"m@fb.com","locale":"en_US",
                "picture":{"data":{"url":"https://fb/p.jpg"}}}"#,
        );
        let facebook = provider(client.clone());

        let user = facebook.get_identity(&AccessToken::new("t")).await.unwrap();
        assert_eq!(user.id, "10150");
        assert_eq!(user.locale.as_deref(), Some("en_US"));
        assert_eq!(user.avatar.as_deref(), Some("https://fb/p.jpg"));

        let url = &client.requests()[0].url;
        assert!(url.starts_with("https://graph.facebook.com/v18.0/me?access_token=t&fields="));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn expired_token_is_rejected() {
        let client = MockHttpClient::new();
        client.push_response(
            400,
            r#"{"error":{"message":"Error validating access token","type":"OAuthException","code":190}}"#,
        );
        let err = provider(client)
            .get_identity(&AccessToken::new("expired"))
            .await
            .unwrap_err();
        assert_eq!(err.code, SocialErrorCode::InvalidAccessToken);
    }
}
