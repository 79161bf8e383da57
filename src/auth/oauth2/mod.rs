//! OAuth2 authorization-code flow engine.
//!
//! These functions implement the behaviour behind the default methods of
//! [`Provider`]. Adapters that override a method can still call the matching
//! function here to reuse the stock behaviour.

pub mod encode;
pub mod state;

use std::collections::HashMap;

use serde_json::Value;

use crate::auth::error::{
    invalid_access_token, invalid_argument, provider_error, SocialResult,
};
use crate::auth::provider::Provider;
use crate::auth::token::AccessToken;
use crate::auth::user::id_from_value;
use crate::http::HttpRequest;

pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
pub const UNEXPECTED_RESPONSE: &str = "Provider API returned an unexpected response";

/// Where the token request carries its parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenRequestPlacement {
    /// Parameters in the query string of the token URI, empty body.
    #[default]
    Query,
    /// Parameters as an `application/x-www-form-urlencoded` body.
    Body,
}

pub fn default_auth_url_parameters<P: Provider + ?Sized>(provider: &P) -> Vec<(String, String)> {
    vec![
        ("client_id".to_string(), provider.consumer().key().to_string()),
        ("redirect_uri".to_string(), provider.redirect_url().to_string()),
    ]
}

/// Builds the URL the user agent is sent to for consent.
///
/// Parameter order is `auth_url_parameters()`, then `scope`, `fields` and
/// `state` when present.
pub fn make_auth_url<P: Provider + ?Sized>(provider: &P, state: Option<&str>) -> String {
    let mut params = provider.auth_url_parameters();
    if !provider.scope().is_empty() {
        params.push(("scope".to_string(), provider.scope_inline()));
    }
    if !provider.fields().is_empty() {
        params.push(("fields".to_string(), provider.fields_inline()));
    }
    if let Some(state) = state {
        params.push(("state".to_string(), state.to_string()));
    }
    encode::append_query(provider.authorize_uri(), &encode::build_query(&params))
}

pub fn token_request_parameters<P: Provider + ?Sized>(
    provider: &P,
    code: &str,
) -> Vec<(String, String)> {
    let consumer = provider.consumer();
    vec![
        ("client_id".to_string(), consumer.key().to_string()),
        ("client_secret".to_string(), consumer.secret().to_string()),
        ("code".to_string(), code.to_string()),
        (
            "grant_type".to_string(),
            GRANT_TYPE_AUTHORIZATION_CODE.to_string(),
        ),
        ("redirect_uri".to_string(), provider.redirect_url().to_string()),
    ]
}

pub fn build_token_request<P: Provider + ?Sized>(provider: &P, code: &str) -> HttpRequest {
    let params = token_request_parameters(provider, code);
    let method = provider.request_http_method();
    match provider.token_request_placement() {
        TokenRequestPlacement::Query => HttpRequest::new(
            method,
            encode::append_query(provider.request_token_uri(), &encode::build_query(&params)),
        ),
        TokenRequestPlacement::Body => {
            HttpRequest::new(method, provider.request_token_uri()).with_form(params)
        }
    }
}

/// Exchanges an authorization code for an access token.
///
/// The response body is handed to [`Provider::parse_token`] whatever the
/// status; providers report failures in the body.
pub async fn exchange_code<P: Provider + ?Sized>(
    provider: &P,
    code: &str,
) -> SocialResult<AccessToken> {
    if code.is_empty() {
        return Err(invalid_argument("Parameter `code` must be a non-empty string"));
    }

    log::debug!("exchanging authorization code with provider {}", provider.name());
    let request = build_token_request(provider, code);
    let response = provider.base().http_client().request(request).await?;
    if !response.is_success() {
        log::warn!(
            "token endpoint of provider {} answered HTTP {}",
            provider.name(),
            response.status_code()
        );
    }

    provider.parse_token(response.body())
}

/// Default token parser for `application/x-www-form-urlencoded` bodies.
pub fn parse_form_token(body: &str) -> SocialResult<AccessToken> {
    let values = encode::parse_query(body);
    let Some(token) = values.get("access_token") else {
        log::debug!("token response has no access_token attribute");
        return Err(invalid_access_token(UNEXPECTED_RESPONSE));
    };

    let mut access_token = AccessToken::new(token.as_str());
    if let Some(seconds) = values
        .get("expires_in")
        .or_else(|| values.get("expires"))
        .and_then(|raw| raw.parse::<u64>().ok())
    {
        access_token = access_token.with_expires_in(seconds);
    }
    if let Some(refresh) = values.get("refresh_token").filter(|value| !value.is_empty()) {
        access_token = access_token.with_refresh_token(refresh.as_str());
    }
    if let Some(scope) = values.get("scope").filter(|value| !value.is_empty()) {
        access_token = access_token.with_scope(scope.as_str());
    }
    Ok(access_token)
}

/// Token parser for providers whose token endpoint answers with JSON.
pub fn parse_json_token(body: &str) -> SocialResult<AccessToken> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        log::debug!("token response is not valid JSON: {err}");
        invalid_access_token(UNEXPECTED_RESPONSE)
    })?;

    if let Some(error) = error_member(&value) {
        return Err(provider_error(describe_error(&value, error)));
    }

    let token = value
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| invalid_access_token(UNEXPECTED_RESPONSE))?;

    let mut access_token = AccessToken::new(token);
    if let Some(seconds) = value
        .get("expires_in")
        .or_else(|| value.get("expires"))
        .and_then(seconds_from_value)
    {
        access_token = access_token.with_expires_in(seconds);
    }
    if let Some(refresh) = value.get("refresh_token").and_then(Value::as_str) {
        access_token = access_token.with_refresh_token(refresh);
    }
    if let Some(scope) = value
        .get("scope")
        .and_then(Value::as_str)
        .filter(|scope| !scope.is_empty())
    {
        access_token = access_token.with_scope(scope);
    }
    if let Some(user_id) = value.get("user_id").and_then(id_from_value) {
        access_token = access_token.with_user_id(user_id);
    }
    if let Some(email) = value.get("email").and_then(Value::as_str) {
        access_token = access_token.with_email(email);
    }
    Ok(access_token)
}

fn seconds_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

/// Returns the payload's `error` member when it actually reports a failure.
///
/// `null`, `false` and empty strings are treated as absent.
pub fn error_member(payload: &Value) -> Option<&Value> {
    payload.get("error").filter(|error| match error {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    })
}

/// Picks the most descriptive message out of an OAuth2 error payload.
fn describe_error(payload: &Value, error: &Value) -> String {
    if let Some(description) = payload.get("error_description").and_then(Value::as_str) {
        return description.to_string();
    }
    match error {
        Value::String(code) => code.clone(),
        Value::Object(map) => map
            .get("message")
            .or_else(|| map.get("error_msg"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

/// Fails when the callback reports that the user or provider aborted the login.
pub fn reject_provider_error(params: &HashMap<String, String>) -> SocialResult<()> {
    if let Some(error) = params.get("error") {
        let message = params
            .get("error_description")
            .filter(|description| !description.is_empty())
            .unwrap_or(error);
        return Err(provider_error(message.as_str()));
    }
    Ok(())
}

/// Extracts the authorization code from callback parameters.
pub fn code_from_parameters(params: &HashMap<String, String>) -> SocialResult<&str> {
    reject_provider_error(params)?;
    match params.get("code") {
        Some(code) if !code.is_empty() => Ok(code.as_str()),
        _ => Err(invalid_argument("Callback parameters are missing `code`")),
    }
}
