//! Magic-link sign-in form.
//!
//! [`SignInForm`] is the synchronous state machine:
//!
//! ```text
//! Idle ──submit──▶ Submitting ──ok──▶ Submitted ──retry──▶ Idle (email cleared)
//!   ▲                  │
//!   │                  └──err(msg)──▶ Failed(msg) ──submit──▶ Submitting
//! ```
//!
//! [`SignInFlow`] drives it against an [`AuthProvider`] on the Tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use cellsmith_core::{CellsmithError, Result};
use regex::Regex;
use tokio::task::JoinHandle;

use crate::auth::{AuthProvider, ProviderOutcome};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SignInPhase {
    #[default]
    Idle,
    /// A provider call is outstanding. The form is locked.
    Submitting,
    Submitted,
    Failed(String),
}

/// What the UI should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInView<'a> {
    /// "Check your email" screen with a way back to the form.
    Confirmation { email: &'a str },
    Form {
        email: &'a str,
        submit_enabled: bool,
        error: Option<&'a str>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    email: String,
    phase: SignInPhase,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
    })
}

/// Loose `local@domain.tld` check. The provider does the real validation.
pub fn is_plausible_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

impl SignInForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phase(&self) -> &SignInPhase {
        &self.phase
    }

    /// Update the email field. Ignored (returns false) while the form is locked or hidden.
    pub fn set_email(&mut self, email: impl Into<String>) -> bool {
        match self.phase {
            SignInPhase::Idle | SignInPhase::Failed(_) => {
                self.email = email.into();
                true
            }
            SignInPhase::Submitting | SignInPhase::Submitted => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.phase, SignInPhase::Idle | SignInPhase::Failed(_))
            && !self.email.trim().is_empty()
    }

    /// Move to `Submitting`, returning the address the provider should be called with.
    pub fn submit(&mut self) -> Result<String> {
        match self.phase {
            SignInPhase::Idle | SignInPhase::Failed(_) => {}
            SignInPhase::Submitting => {
                return Err(CellsmithError::invalid(
                    "a sign-in request is already in flight",
                ))
            }
            SignInPhase::Submitted => {
                return Err(CellsmithError::invalid(
                    "sign-in link already sent; retry first",
                ))
            }
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(CellsmithError::invalid("email is required"));
        }
        if !is_plausible_email(email) {
            return Err(CellsmithError::invalid(format!(
                "'{email}' is not a valid email address"
            )));
        }

        self.email = email.to_string();
        self.phase = SignInPhase::Submitting;
        tracing::debug!("sign-in: submitting");
        Ok(self.email.clone())
    }

    /// Apply the provider's answer. Returns false if no request was in flight.
    pub fn resolve(&mut self, outcome: ProviderOutcome) -> bool {
        if self.phase != SignInPhase::Submitting {
            tracing::warn!("sign-in: ignoring provider outcome in {:?}", self.phase);
            return false;
        }
        self.phase = match outcome {
            Ok(()) => {
                tracing::info!("sign-in: magic link sent");
                SignInPhase::Submitted
            }
            Err(failure) => {
                tracing::info!("sign-in: provider rejected request: {}", failure);
                SignInPhase::Failed(failure.message)
            }
        };
        true
    }

    /// "Try again" from the confirmation screen.
    pub fn retry(&mut self) -> Result<()> {
        if self.phase != SignInPhase::Submitted {
            return Err(CellsmithError::invalid(
                "retry is only available after a link was sent",
            ));
        }
        self.email.clear();
        self.phase = SignInPhase::Idle;
        tracing::debug!("sign-in: back to idle");
        Ok(())
    }

    pub fn view(&self) -> SignInView<'_> {
        match &self.phase {
            SignInPhase::Submitted => SignInView::Confirmation { email: &self.email },
            phase => SignInView::Form {
                email: &self.email,
                submit_enabled: self.can_submit(),
                error: match phase {
                    SignInPhase::Failed(message) => Some(message.as_str()),
                    _ => None,
                },
            },
        }
    }
}

/// A [`SignInForm`] wired to an auth provider.
///
/// Dropping the flow while a request is outstanding is fine: the late outcome is discarded.
pub struct SignInFlow {
    form: Arc<Mutex<SignInForm>>,
    provider: Arc<dyn AuthProvider>,
}

impl SignInFlow {
    pub fn new(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            form: Arc::new(Mutex::new(SignInForm::new())),
            provider,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SignInForm> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current form state, for rendering.
    pub fn snapshot(&self) -> SignInForm {
        self.lock().clone()
    }

    pub fn phase(&self) -> SignInPhase {
        self.lock().phase().clone()
    }

    pub fn set_email(&self, email: impl Into<String>) -> bool {
        self.lock().set_email(email)
    }

    pub fn can_submit(&self) -> bool {
        self.lock().can_submit()
    }

    pub fn retry(&self) -> Result<()> {
        self.lock().retry()
    }

    /// Start a sign-in request. Must be called from within a Tokio runtime.
    ///
    /// Exactly one provider call is spawned per successful submit. The handle
    /// completes once the outcome has been applied (or discarded).
    pub fn submit(&self) -> Result<JoinHandle<()>> {
        let email = self.lock().submit()?;
        let form = Arc::downgrade(&self.form);
        let provider = Arc::clone(&self.provider);

        Ok(tokio::spawn(async move {
            let outcome = provider.request_sign_in_link(&email).await;
            match form.upgrade() {
                Some(form) => {
                    form.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .resolve(outcome);
                }
                None => tracing::debug!("sign-in: form dropped before provider answered"),
            }
        }))
    }
}
