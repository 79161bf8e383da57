use chrono::{DateTime, Duration, Utc};

/// Bearer credential obtained from a provider's token endpoint.
///
/// Only the token string is guaranteed; the remaining attributes are filled in
/// when the provider's response carries them. Values are fixed once the token
/// has been built.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    expires_in: Option<u64>,
    expires_at: Option<DateTime<Utc>>,
    scope: Option<String>,
    refresh_token: Option<String>,
    user_id: Option<String>,
    email: Option<String>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_in: None,
            expires_at: None,
            scope: None,
            refresh_token: None,
            user_id: None,
            email: None,
        }
    }

    /// Records the lifetime in seconds; `0` means the token does not expire.
    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self.expires_at = i64::try_from(seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| Utc::now().checked_add_signed(lifetime));
        self
    }

    /// Records the scope the provider actually granted, as the provider wrote it.
    pub fn with_scope(mut self, value: impl Into<String>) -> Self {
        self.scope = Some(value.into());
        self
    }

    pub fn with_refresh_token(mut self, value: impl Into<String>) -> Self {
        self.refresh_token = Some(value.into());
        self
    }

    pub fn with_user_id(mut self, value: impl Into<String>) -> Self {
        self.user_id = Some(value.into());
        self
    }

    pub fn with_email(mut self, value: impl Into<String>) -> Self {
        self.email = Some(value.into());
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Provider-side user id, for providers that return it with the token (VK).
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|deadline| Utc::now() >= deadline)
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .finish()
    }
}
