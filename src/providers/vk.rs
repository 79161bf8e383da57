use async_trait::async_trait;
use serde_json::Value;

use crate::auth::error::{invalid_access_token, provider_error, SocialResult};
use crate::auth::oauth2::{self, encode, UNEXPECTED_RESPONSE};
use crate::auth::user::{id_from_value, string_field};
use crate::auth::{AccessToken, Provider, ProviderBase, User};
use crate::http::{HttpMethod, HttpRequest};

/// VK API error code for an invalid or expired access token.
const VK_AUTHORIZATION_FAILED: i64 = 5;
const DEFAULT_PROFILE_FIELDS: &str = "photo_200,screen_name";

/// VK (vk.com) adapter.
///
/// The token endpoint is queried with `GET` and answers with JSON that also
/// carries the user id and, when the `email` scope was granted, the e-mail.
#[derive(Debug)]
pub struct VkProvider {
    base: ProviderBase,
}

impl VkProvider {
    pub const NAME: &'static str = "vk";
    pub const AUTHORIZE_URI: &'static str = "https://oauth.vk.com/authorize";
    pub const REQUEST_TOKEN_URI: &'static str = "https://oauth.vk.com/access_token";
    pub const API_URI: &'static str = "https://api.vk.com/method/";
    pub const API_VERSION: &'static str = "5.131";

    pub fn new(base: ProviderBase) -> Self {
        Self { base }
    }

    fn profile_fields(&self) -> String {
        if self.fields().is_empty() {
            DEFAULT_PROFILE_FIELDS.to_string()
        } else {
            self.fields_inline()
        }
    }
}

#[async_trait]
impl Provider for VkProvider {
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
        let mut params = vec![
            ("v".to_string(), Self::API_VERSION.to_string()),
            ("access_token".to_string(), token.token().to_string()),
            ("fields".to_string(), self.profile_fields()),
        ];
        if let Some(user_id) = token.user_id() {
            params.push(("user_ids".to_string(), user_id.to_string()));
        }
        let url = encode::append_query(
            &format!("{}users.get", Self::API_URI),
            &encode::build_query(&params),
        );

        let response = self.base.http_client().request(HttpRequest::get(url)).await?;
        let payload: Value = response.json()?;

        if let Some(error) = oauth2::error_member(&payload) {
            let message = error
                .get("error_msg")
                .and_then(Value::as_str)
                .unwrap_or(UNEXPECTED_RESPONSE)
                .to_string();
            return match error.get("error_code").and_then(Value::as_i64) {
                Some(VK_AUTHORIZATION_FAILED) => Err(invalid_access_token(message)),
                _ => Err(provider_error(message)),
            };
        }

        let profile = payload
            .pointer("/response/0")
            .ok_or_else(|| provider_error(UNEXPECTED_RESPONSE))?;
        let id = profile
            .get("id")
            .and_then(id_from_value)
            .ok_or_else(|| provider_error(UNEXPECTED_RESPONSE))?;

        let full_name = [
            string_field(profile, "first_name"),
            string_field(profile, "last_name"),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

        Ok(User {
            id,
            name: Some(full_name).filter(|name| !name.is_empty()),
            email: token.email().map(str::to_owned),
            avatar: string_field(profile, "photo_200"),
            locale: None,
            raw: profile.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Consumer, SocialErrorCode};
    use crate::test_support::MockHttpClient;
    use std::sync::Arc;

    fn provider(client: Arc<MockHttpClient>) -> VkProvider {
        VkProvider::new(
            ProviderBase::new(Consumer::new("APP", "SEC"), "https://x/cb", client)
                .with_scope(["email", "friends"]),
        )
    }

    #[test]
    fn auth_url_joins_scope_with_commas() {
        let url = provider(MockHttpClient::new()).make_auth_url();
        assert_eq!(
            url,
            "https://oauth.vk.com/authorize?client_id=APP&redirect_uri=https%3A%2F%2Fx%2Fcb\
             &scope=email%2Cfriends"
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn token_exchange_uses_get_and_reads_json() {
        let client = MockHttpClient::new();
        client.push_response(
            200,
            r#"{"access_token":"vk-token","expires_in":86400,"user_id":1,"email":"d@vk.com"}"#,
        );
        let vk = provider(client.clone());

        let token = vk.get_access_token("code").await.unwrap();
        assert_eq!(token.token(), "vk-token");
        assert_eq!(token.user_id(), Some("1"));
        assert_eq!(token.email(), Some("d@vk.com"));

        let request = &client.requests()[0];
        assert_eq!(request.method, HttpMethod::Get);
        assert!(request.url.starts_with("https://oauth.vk.com/access_token?client_id=APP"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn identity_is_normalized() {
        let client = MockHttpClient::new();
        client.push_response(
            200,
            r#"{"response":[{"id":1,"first_name":"Pavel","last_name":"Durov",
                "photo_200":"https://vk.com/p.jpg","screen_name":"durov"}]}"#,
        );
        let vk = provider(client.clone());
        let token = AccessToken::new("t").with_user_id("1").with_email("d@vk.com");

        let user = vk.get_identity(&token).await.unwrap();
        assert_eq!(user.id, "1");
        assert_eq!(user.name.as_deref(), Some("Pavel Durov"));
        assert_eq!(user.email.as_deref(), Some("d@vk.com"));
        assert_eq!(user.avatar.as_deref(), Some("https://vk.com/p.jpg"));
        assert_eq!(user.raw_field("screen_name"), Some(&Value::from("durov")));

        let url = &client.requests()[0].url;
        assert!(url.starts_with("https://api.vk.com/method/users.get?v=5.131&access_token=t"));
        assert!(url.ends_with("&user_ids=1"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn null_error_member_does_not_fail_identity() {
        let client = MockHttpClient::new();
        client.push_response(200, r#"{"error":null,"response":[{"id":7,"first_name":"Ann"}]}"#);
        let user = provider(client)
            .get_identity(&AccessToken::new("t"))
            .await
            .unwrap();
        assert_eq!(user.id, "7");
        assert_eq!(user.name.as_deref(), Some("Ann"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn rejected_token_maps_to_invalid_access_token() {
        let client = MockHttpClient::new();
        client.push_response(
            200,
            r#"{"error":{"error_code":5,"error_msg":"User authorization failed: invalid access_token (4)."}}"#,
        );
        let err = provider(client)
            .get_identity(&AccessToken::new("bad"))
            .await
            .unwrap_err();
        assert_eq!(err.code, SocialErrorCode::InvalidAccessToken);
        assert!(err.message().starts_with("User authorization failed"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn other_api_errors_keep_their_message() {
        let client = MockHttpClient::new();
        client.push_response(
            200,
            r#"{"error":{"error_code":6,"error_msg":"Too many requests per second"}}"#,
        );
        let err = provider(client)
            .get_identity(&AccessToken::new("t"))
            .await
            .unwrap_err();
        assert_eq!(err.code, SocialErrorCode::ProviderError);
        assert_eq!(err.message(), "Too many requests per second");
    }
}
