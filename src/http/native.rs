use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};

use crate::auth::error::{
    internal_error, invalid_argument, transport_error, SocialError, SocialResult,
};

use super::{HttpClient, HttpMethod, HttpRequest, HttpResponse};

const USER_AGENT: &str = concat!("social-connect/", env!("CARGO_PKG_VERSION"));

/// [`HttpClient`] backed by `reqwest`.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
    http: Client,
    timeout: Option<Duration>,
}

impl ReqwestHttpClient {
    pub fn new() -> SocialResult<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| internal_error(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { http, timeout: None })
    }

    /// Wraps an already configured `reqwest` client.
    pub fn with_client(http: Client) -> Self {
        Self { http, timeout: None }
    }

    /// Applies `timeout` to every request issued through this client.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_headers(headers: &[(String, String)]) -> SocialResult<HeaderMap> {
    let mut map = HeaderMap::new();
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|err| invalid_argument(format!("invalid header name `{key}`: {err}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| invalid_argument(format!("invalid header value for `{key}`: {err}")))?;
        map.append(name, header_value);
    }
    Ok(map)
}

fn map_reqwest_error(err: reqwest::Error) -> SocialError {
    if err.is_timeout() {
        return transport_error(format!("request timed out: {err}"));
    }
    if err.is_connect() {
        return transport_error(format!("failed to connect: {err}"));
    }
    if err.is_builder() {
        return invalid_argument(format!("malformed request: {err}"));
    }
    transport_error(format!("request failed: {err}"))
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn request(&self, request: HttpRequest) -> SocialResult<HttpResponse> {
        let HttpRequest {
            method,
            url,
            form,
            headers,
        } = request;

        let mut builder = self
            .http
            .request(to_reqwest_method(method), url.as_str())
            .headers(build_headers(&headers)?);
        if !form.is_empty() {
            builder = builder.form(&form);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|err| {
            transport_error(format!("failed to read response body from {url}: {err}"))
        })?;

        Ok(HttpResponse::new(status, body))
    }
}
