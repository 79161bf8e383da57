use std::fmt::{Display, Formatter};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SocialErrorCode {
    InvalidArgument,
    ProviderNotRegistered,
    UnknownProvider,
    Transport,
    InvalidAccessToken,
    ProviderError,
    InvalidState,
    InvalidConfiguration,
    Internal,
}

impl SocialErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialErrorCode::InvalidArgument => "social/invalid-argument",
            SocialErrorCode::ProviderNotRegistered => "social/provider-not-registered",
            SocialErrorCode::UnknownProvider => "social/unknown-provider",
            SocialErrorCode::Transport => "social/transport",
            SocialErrorCode::InvalidAccessToken => "social/invalid-access-token",
            SocialErrorCode::ProviderError => "social/provider-error",
            SocialErrorCode::InvalidState => "social/invalid-state",
            SocialErrorCode::InvalidConfiguration => "social/invalid-configuration",
            SocialErrorCode::Internal => "social/internal",
        }
    }
}

/// Error returned by every fallible operation of the crate.
///
/// The `code` classifies the failure; the message is preserved verbatim so
/// provider-supplied descriptions reach the caller untouched.
#[derive(Clone, Debug)]
pub struct SocialError {
    pub code: SocialErrorCode,
    message: String,
}

impl SocialError {
    pub fn new(code: SocialErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for SocialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for SocialError {}

pub type SocialResult<T> = Result<T, SocialError>;

pub fn invalid_argument(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::InvalidArgument, message)
}

pub fn provider_not_registered(name: &str) -> SocialError {
    SocialError::new(
        SocialErrorCode::ProviderNotRegistered,
        format!("Provider `{name}` is not configured"),
    )
}

pub fn unknown_provider(name: &str) -> SocialError {
    SocialError::new(
        SocialErrorCode::UnknownProvider,
        format!("No implementation is registered for provider `{name}`"),
    )
}

pub fn transport_error(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::Transport, message)
}

pub fn invalid_access_token(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::InvalidAccessToken, message)
}

pub fn provider_error(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::ProviderError, message)
}

pub fn invalid_state(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::InvalidState, message)
}

pub fn invalid_configuration(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::InvalidConfiguration, message)
}

pub fn internal_error(message: impl Into<String>) -> SocialError {
    SocialError::new(SocialErrorCode::Internal, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_code() {
        let err = invalid_access_token("Provider API returned an unexpected response");
        assert_eq!(
            err.to_string(),
            "Provider API returned an unexpected response (social/invalid-access-token)"
        );
        assert_eq!(err.message(), "Provider API returned an unexpected response");
    }

    #[test]
    fn registry_errors_name_the_provider() {
        let err = provider_not_registered("vk");
        assert_eq!(err.code, SocialErrorCode::ProviderNotRegistered);
        assert!(err.message().contains("vk"));

        let err = unknown_provider("myspace");
        assert_eq!(err.code_str(), "social/unknown-provider");
        assert!(err.message().contains("myspace"));
    }
}
