use cellsmith_core::CellsmithError;
use thiserror::Error;

/// Why the auth provider refused to send a sign-in link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderFailure {
    /// Human-readable, shown to the user verbatim.
    pub message: String,
}

impl ProviderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ProviderFailure> for CellsmithError {
    fn from(failure: ProviderFailure) -> Self {
        CellsmithError::ProviderFailure(failure.message)
    }
}

pub type ProviderOutcome = Result<(), ProviderFailure>;

/// Backend that emails passwordless sign-in links.
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Ask the provider to email a magic link to `email`.
    async fn request_sign_in_link(&self, email: &str) -> ProviderOutcome;
}
