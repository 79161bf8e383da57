//! Test utilities shared across crate-level unit tests.

pub mod http;
pub mod provider;

pub use http::{start_mock_server, MockHttpClient};
pub use provider::{test_provider, TestProvider};
