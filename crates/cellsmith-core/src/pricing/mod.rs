mod catalog;
mod format;

pub use catalog::{
    plan, plans, popular_plan, validate_catalog, BillingInterval, Plan, PlanId, PlanLimits,
};
pub use format::{format_price, yearly_savings, YearlySavings};

/// Yearly savings for a plan, or `None` when the plan has no yearly price.
pub fn plan_savings(plan: &Plan) -> Option<crate::error::Result<YearlySavings>> {
    plan.yearly_price
        .map(|yearly| yearly_savings(i64::from(plan.monthly_price), i64::from(yearly)))
}
