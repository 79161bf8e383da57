//! Transport boundary used by providers.
//!
//! Providers never talk to the network directly; they describe a request with
//! [`HttpRequest`] and hand it to a shared [`HttpClient`]. HTTP-level failures
//! (non-2xx statuses) come back as ordinary [`HttpResponse`] values so the
//! OAuth2 flow engine and the provider adapters decide what they mean.

mod native;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::auth::error::{provider_error, SocialResult};

pub use native::ReqwestHttpClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request description.
///
/// `form` holds `application/x-www-form-urlencoded` body parameters and may be
/// empty, in which case no body is sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub form: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            form: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_form(mut self, form: Vec<(String, String)>) -> Self {
        self.form = form;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer_token(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON, reporting malformed payloads as provider errors.
    pub fn json<T: DeserializeOwned>(&self) -> SocialResult<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            provider_error(format!(
                "Provider returned a malformed JSON payload (HTTP {}): {err}",
                self.status
            ))
        })
    }
}

/// Minimal transport contract shared by every provider.
///
/// Implementations must be safe for concurrent use; a single client is shared
/// across all providers of a [`crate::auth::Service`]. Network failures are
/// reported as [`crate::auth::SocialErrorCode::Transport`].
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: HttpRequest) -> SocialResult<HttpResponse>;
}
