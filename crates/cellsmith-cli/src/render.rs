use cellsmith_cloud::SignInView;
use cellsmith_core::pricing::{format_price, plan_savings, plans};
use cellsmith_core::{BillingInterval, Plan, Result};

/// One plan card. Plans without a yearly price fall back to their monthly price.
pub fn render_plan(plan: &Plan, interval: BillingInterval) -> Result<String> {
    let mut out = String::new();

    out.push_str(plan.name);
    if plan.popular {
        out.push_str("  ★ Most popular");
    }
    out.push('\n');

    let (amount, shown_interval) = match plan.price_for(interval) {
        Some(amount) => (amount, interval),
        None => (plan.monthly_price, BillingInterval::Monthly),
    };
    let price = format_price(i64::from(amount), shown_interval)?;
    out.push_str(&format!("  {}{}", price, shown_interval.suffix()));
    if shown_interval == BillingInterval::Yearly {
        if let Some(savings) = plan_savings(plan) {
            let savings = savings?;
            if savings.amount > 0 {
                let saved = format_price(savings.amount, shown_interval)?;
                out.push_str(&format!("  (save {} / {}%)", saved, savings.percent));
            }
        }
    }
    out.push('\n');

    out.push_str(&format!("  {}\n", plan.description));
    out.push_str(&format!(
        "  Limits: {} queries/mo, {} GPT-4 queries/mo\n",
        plan.limits.queries, plan.limits.gpt4_queries
    ));
    for feature in plan.features {
        out.push_str(&format!("  ✓ {feature}\n"));
    }
    out.push_str(&format!("  [ {} ]\n", plan.call_to_action));

    Ok(out)
}

/// Every plan card, separated by blank lines.
pub fn render_plans(interval: BillingInterval) -> Result<String> {
    let cards = plans()
        .map(|plan| render_plan(plan, interval))
        .collect::<Result<Vec<_>>>()?;
    Ok(cards.join("\n"))
}

pub fn render_sign_in(view: &SignInView<'_>) -> String {
    match view {
        SignInView::Confirmation { email } => format!(
            "Check your email\n  We sent a sign-in link to {email}.\n  Wrong address? Try again with `cellsmith signin <email>`.\n"
        ),
        SignInView::Form {
            email,
            submit_enabled,
            error,
        } => {
            let mut out = format!("Email: {email}\n");
            if *submit_enabled {
                out.push_str("[ Send magic link ]\n");
            } else {
                out.push_str("[ Send magic link ] (disabled)\n");
            }
            if let Some(message) = error {
                out.push_str(&format!("Error: {message}\n"));
            }
            out
        }
    }
}
