//! Cellsmith Cloud: account sign-in.
//!
//! Users sign in with a magic link: they type an email, Supabase mails them a
//! one-time link, and clicking it opens an authenticated session in the
//! add-in. This crate holds the provider seam ([`AuthProvider`]), the Supabase
//! implementation, and the sign-in form state machine.

pub mod auth;
pub mod signin;
pub mod supabase;

pub use auth::{AuthProvider, ProviderFailure, ProviderOutcome};
pub use signin::{SignInFlow, SignInForm, SignInPhase, SignInView};
pub use supabase::SupabaseAuth;
