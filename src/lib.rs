//! # social-connect
//!
//! Social login for Rust services: one OAuth2 authorization-code flow shared
//! by every provider, a small adapter per social network, and a registry that
//! builds configured providers on demand.
//!
//! ```ignore
//! use std::collections::HashMap;
//! use social_connect::auth::{Service, ServiceConfig};
//!
//! # async fn run(callback: HashMap<String, String>) -> social_connect::auth::SocialResult<()> {
//! let config = ServiceConfig::from_json_str(r#"{
//!     "redirectUri": "https://example.com/auth/${provider}/callback",
//!     "provider": {
//!         "vk": { "applicationId": "123", "applicationSecret": "s3cr3t", "scope": ["email"] }
//!     }
//! }"#)?;
//! let service = Service::builder(config).build()?;
//! let vk = service.get_provider("vk")?;
//!
//! // 1. redirect the browser
//! let consent_url = vk.make_auth_url();
//!
//! // 2. on the callback, exchange the code and load the profile
//! let token = vk.get_access_token_by_request_parameters(&callback).await?;
//! let user = vk.get_identity(&token).await?;
//! println!("{} logged in as {:?}", user.id, user.name);
//! # Ok(())
//! # }
//! ```
//!
//! Custom networks implement [`auth::Provider`] and are added with
//! [`auth::ServiceBuilder::register_provider`]. HTTP goes through the
//! [`http::HttpClient`] trait; [`http::ReqwestHttpClient`] is the default.

pub mod auth;
pub mod http;
pub mod providers;

#[cfg(test)]
pub mod test_support;
