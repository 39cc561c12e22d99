use std::sync::Arc;

use anyhow::{Context, Result};
use cellsmith_cloud::{AuthProvider, SignInFlow, SignInPhase};
use cellsmith_core::pricing::{plan, plans};
use cellsmith_core::{BillingInterval, PlanId};

use crate::render::{render_plan, render_plans, render_sign_in};

/// `cellsmith plans`
pub fn plans_command(interval: BillingInterval, json: bool) -> Result<String> {
    if json {
        let all: Vec<_> = plans().collect();
        return Ok(serde_json::to_string_pretty(&all)?);
    }
    Ok(render_plans(interval)?)
}

/// `cellsmith plan <id>`
pub fn plan_command(id: &str, interval: BillingInterval, json: bool) -> Result<String> {
    let id: PlanId = id.parse()?;
    if json {
        return Ok(serde_json::to_string_pretty(plan(id))?);
    }
    Ok(render_plan(plan(id), interval)?)
}

/// Outcome of `cellsmith signin`.
#[derive(Debug, Clone)]
pub struct SignInReport {
    pub rendered: String,
    pub phase: SignInPhase,
}

impl SignInReport {
    pub fn succeeded(&self) -> bool {
        self.phase == SignInPhase::Submitted
    }
}

/// `cellsmith signin <email>`: one submit, wait for the provider, render the result.
pub async fn signin_command(provider: Arc<dyn AuthProvider>, email: &str) -> Result<SignInReport> {
    let flow = SignInFlow::new(provider);
    flow.set_email(email);

    let pending = flow.submit()?;
    pending
        .await
        .context("sign-in task did not complete")?;

    let form = flow.snapshot();
    tracing::debug!("signin finished in {:?}", form.phase());
    Ok(SignInReport {
        rendered: render_sign_in(&form.view()),
        phase: form.phase().clone(),
    })
}
