use cellsmith_core::{CellsmithError, Result, Settings};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::auth::{AuthProvider, ProviderFailure, ProviderOutcome};

/// Supabase GoTrue client for magic-link sign-in.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: Client,
    base_url: String,
    anon_key: String,
    redirect_to: Option<String>,
}

#[derive(Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            redirect_to: None,
        }
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_redirect(mut self, redirect_to: impl Into<String>) -> Self {
        self.redirect_to = Some(redirect_to.into());
        self
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let anon_key = settings.anon_key().ok_or_else(|| {
            CellsmithError::Config(format!(
                "No Supabase anon key configured (set {})",
                settings.auth.anon_key_env
            ))
        })?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.auth.timeout_secs))
            .build()?;
        let auth = Self::new(settings.supabase_url(), anon_key).with_client(http);
        Ok(match &settings.auth.redirect_to {
            Some(url) => auth.with_redirect(url.clone()),
            None => auth,
        })
    }

    fn otp_url(&self) -> String {
        format!("{}/auth/v1/otp", self.base_url)
    }
}

#[async_trait::async_trait]
impl AuthProvider for SupabaseAuth {
    async fn request_sign_in_link(&self, email: &str) -> ProviderOutcome {
        let mut request = self
            .http
            .post(self.otp_url())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&OtpRequest {
                email,
                create_user: true,
            });
        if let Some(redirect_to) = &self.redirect_to {
            request = request.query(&[("redirect_to", redirect_to)]);
        }

        let resp = request.send().await.map_err(|e| {
            tracing::warn!("Supabase OTP request failed: {}", e);
            ProviderFailure::new(e.to_string())
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ProviderFailure::new(error_message(status.as_u16(), &body)))
    }
}

/// Pull the user-facing message out of a GoTrue error body.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            ["msg", "error_description", "message", "error"]
                .iter()
                .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|msg| !msg.trim().is_empty())
        .unwrap_or_else(|| format!("sign-in request failed with status {status}"))
}
