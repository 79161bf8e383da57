use async_trait::async_trait;
use serde_json::Value;

use crate::auth::error::{provider_error, SocialResult};
use crate::auth::oauth2::UNEXPECTED_RESPONSE;
use crate::auth::user::{id_from_value, string_field};
use crate::auth::{AccessToken, Provider, ProviderBase, User};
use crate::http::HttpRequest;

use super::identity_status_error;

/// GitHub adapter. The token endpoint answers form-encoded by default, so the
/// stock parser is kept.
#[derive(Debug)]
pub struct GitHubProvider {
    base: ProviderBase,
}

impl GitHubProvider {
    pub const NAME: &'static str = "github";
    pub const AUTHORIZE_URI: &'static str = "https://github.com/login/oauth/authorize";
    pub const REQUEST_TOKEN_URI: &'static str = "https://github.com/login/oauth/access_token";
    pub const USER_URI: &'static str = "https://api.github.com/user";

    pub fn new(base: ProviderBase) -> Self {
        Self { base }
    }
}

#[async_trait]
impl Provider for GitHubProvider {
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

    async fn get_identity(&self, token: &AccessToken) -> SocialResult<User> {
        let request = HttpRequest::get(Self::USER_URI)
            .with_header("Authorization", format!("token {}", token.token()))
            .with_header("Accept", "application/vnd.github+json");
        let response = self.base.http_client().request(request).await?;
        if !response.is_success() {
            return Err(identity_status_error(Self::NAME, &response));
        }

        let payload: Value = response.json()?;
        let id = payload
            .get("id")
            .and_then(id_from_value)
            .ok_or_else(|| provider_error(UNEXPECTED_RESPONSE))?;

        Ok(User {
            id,
            name: string_field(&payload, "name").or_else(|| string_field(&payload, "login")),
            email: string_field(&payload, "email"),
            avatar: string_field(&payload, "avatar_url"),
            locale: None,
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

    fn provider(client: Arc<MockHttpClient>) -> GitHubProvider {
        GitHubProvider::new(ProviderBase::new(
            Consumer::new("APP", "SEC"),
            "https://x/cb",
            client,
        ))
    }

    #[tokio::test(flavor = "current_thread")]
    async fn form_encoded_token_is_parsed() {
        let client = MockHttpClient::new();
        client.push_response(200, "access_token=gho_16C7e42F&scope=repo%2Cgist&token_type=bearer");
        let token = provider(client).get_access_token("c").await.unwrap();
        assert_eq!(token.token(), "gho_16C7e42F");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn identity_falls_back_to_login_and_sends_token_header() {
        let client = MockHttpClient::new();
        client.push_response(
            200,
            r#"{"login":"octocat","id":583231,"name":null,"avatar_url":"https://gh/a.png"}"#,
        );
        let github = provider(client.clone());

        let user = github.get_identity(&AccessToken::new("gho_x")).await.unwrap();
        assert_eq!(user.id, "583231");
        assert_eq!(user.name.as_deref(), Some("octocat"));
        assert_eq!(user.email, None);
        assert_eq!(user.avatar.as_deref(), Some("https://gh/a.png"));

        let request = &client.requests()[0];
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "token gho_x".to_string())));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unauthorized_identity_rejects_token() {
        let client = MockHttpClient::new();
        client.push_response(401, r#"{"message":"Bad credentials"}"#);
        let err = provider(client)
            .get_identity(&AccessToken::new("revoked"))
            .await
            .unwrap_err();
        assert_eq!(err.code, SocialErrorCode::InvalidAccessToken);
        assert_eq!(err.message(), "Bad credentials");
    }
}
