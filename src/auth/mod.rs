//! Provider contract, OAuth2 flow engine and provider registry.
//!
//! A [`Service`] is built from a [`ServiceConfig`] and hands out cached
//! [`Provider`] instances by name. Each provider drives the OAuth2
//! authorization-code flow: [`Provider::make_auth_url`] for the consent
//! redirect, [`Provider::get_access_token_by_request_parameters`] for the
//! callback and [`Provider::get_identity`] for the profile.

pub mod config;
mod consumer;
pub mod error;
pub mod oauth2;
mod provider;
mod service;
mod token;
pub(crate) mod user;

#[doc(inline)]
pub use config::{ProviderSettings, ServiceConfig, PROVIDER_PLACEHOLDER};

#[doc(inline)]
pub use consumer::Consumer;

#[doc(inline)]
pub use error::{SocialError, SocialErrorCode, SocialResult};

#[doc(inline)]
pub use oauth2::state::generate_state;

#[doc(inline)]
pub use oauth2::TokenRequestPlacement;

#[doc(inline)]
pub use provider::{Provider, ProviderBase, DEFAULT_SCOPE_SEPARATOR, FIELDS_SEPARATOR};

#[doc(inline)]
pub use service::{ProviderFactory, Service, ServiceBuilder};

#[doc(inline)]
pub use token::AccessToken;

#[doc(inline)]
pub use user::User;
