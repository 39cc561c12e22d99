use std::sync::{Arc, Mutex};

use cellsmith_cli::render::{render_plan, render_sign_in};
use cellsmith_cli::{plan_command, plans_command, signin_command};
use cellsmith_cloud::{AuthProvider, ProviderFailure, ProviderOutcome, SignInPhase, SignInView};
use cellsmith_core::pricing::plan;
use cellsmith_core::{BillingInterval, CellsmithError, PlanId};

struct FixedProvider {
    outcome: ProviderOutcome,
    calls: Mutex<Vec<String>>,
}

impl FixedProvider {
    fn new(outcome: ProviderOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl AuthProvider for FixedProvider {
    async fn request_sign_in_link(&self, email: &str) -> ProviderOutcome {
        self.calls.lock().unwrap().push(email.to_string());
        self.outcome.clone()
    }
}

// ========================================================================
// Plan Rendering Tests (render.rs)
// ========================================================================

#[test]
fn test_pro_card_monthly() {
    let card = render_plan(plan(PlanId::Pro), BillingInterval::Monthly).unwrap();
    assert!(card.starts_with("Pro  ★ Most popular\n"));
    assert!(card.contains("  $29/mo\n"));
    assert!(card.contains("Limits: 500 queries/mo, 100 GPT-4 queries/mo"));
    assert!(card.contains("[ Upgrade to Pro ]"));
}

#[test]
fn test_team_card_yearly_shows_savings() {
    let card = render_plan(plan(PlanId::Team), BillingInterval::Yearly).unwrap();
    assert!(card.contains("  $990/yr  (save $198 / 17%)\n"));
    assert!(!card.contains("Most popular"));
}

#[test]
fn test_free_card_yearly_falls_back_to_monthly() {
    let card = render_plan(plan(PlanId::Free), BillingInterval::Yearly).unwrap();
    assert!(card.contains("  $0/mo\n"));
    assert!(!card.contains("save"));
}

#[test]
fn test_features_render_in_order() {
    let card = render_plan(plan(PlanId::Pro), BillingInterval::Monthly).unwrap();
    let features = plan(PlanId::Pro).features;
    let positions: Vec<usize> = features
        .iter()
        .map(|f| card.find(f).expect("feature rendered"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_plans_command_lists_all_tiers() {
    let out = plans_command(BillingInterval::Monthly, false).unwrap();
    let free = out.find("Free\n").unwrap();
    let pro = out.find("Pro  ★").unwrap();
    let team = out.find("Team\n").unwrap();
    assert!(free < pro && pro < team);
}

#[test]
fn test_plans_command_json() {
    let out = plans_command(BillingInterval::Monthly, true).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["free", "pro", "team"]);
}

#[test]
fn test_plan_command_unknown_id() {
    let err = plan_command("enterprise", BillingInterval::Monthly, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CellsmithError>(),
        Some(CellsmithError::NotFound(_))
    ));
}

#[test]
fn test_plan_command_json_single_plan() {
    let out = plan_command("TEAM", BillingInterval::Monthly, true).unwrap();
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["limits"]["queries"], 5000);
}

// ========================================================================
// Sign-In Rendering Tests (render.rs)
// ========================================================================

#[test]
fn test_render_empty_form_disables_submit() {
    let out = render_sign_in(&SignInView::Form {
        email: "",
        submit_enabled: false,
        error: None,
    });
    assert!(out.contains("(disabled)"));
    assert!(!out.contains("Error:"));
}

#[test]
fn test_render_error_is_verbatim() {
    let out = render_sign_in(&SignInView::Form {
        email: "ana@example.com",
        submit_enabled: true,
        error: Some("Signups not allowed for this instance"),
    });
    assert!(out.contains("Error: Signups not allowed for this instance\n"));
    assert!(!out.contains("(disabled)"));
}

// ========================================================================
// Sign-In Command Tests (commands.rs)
// ========================================================================

#[tokio::test]
async fn test_signin_command_success() {
    let provider = FixedProvider::new(Ok(()));
    let report = signin_command(provider.clone(), " ana@example.com ").await.unwrap();

    assert!(report.succeeded());
    assert!(report.rendered.contains("We sent a sign-in link to ana@example.com."));
    assert_eq!(*provider.calls.lock().unwrap(), vec!["ana@example.com".to_string()]);
}

#[tokio::test]
async fn test_signin_command_failure_renders_message() {
    let provider = FixedProvider::new(Err(ProviderFailure::new("Email rate limit exceeded")));
    let report = signin_command(provider, "ana@example.com").await.unwrap();

    assert!(!report.succeeded());
    assert_eq!(
        report.phase,
        SignInPhase::Failed("Email rate limit exceeded".to_string())
    );
    assert!(report.rendered.contains("Error: Email rate limit exceeded"));
}

#[tokio::test]
async fn test_signin_command_rejects_bad_email_without_calling_provider() {
    let provider = FixedProvider::new(Ok(()));
    let err = signin_command(provider.clone(), "nope").await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<CellsmithError>(),
        Some(CellsmithError::InvalidArgument(_))
    ));
    assert!(provider.calls.lock().unwrap().is_empty());
}
