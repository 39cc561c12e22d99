use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CellsmithError, Result};

/// Cellsmith subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanId {
    /// Try-it-out tier, no payment required.
    #[default]
    Free,
    /// Individual analysts.
    Pro,
    /// Shared workbooks and pooled GPT-4 quota.
    Team,
}

impl PlanId {
    /// Every plan, in the order pricing pages list them.
    pub const ALL: [PlanId; 3] = [PlanId::Free, PlanId::Pro, PlanId::Team];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Team => "team",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Free => 0,
            Self::Pro => 1,
            Self::Team => 2,
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = CellsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "team" => Ok(Self::Team),
            other => Err(CellsmithError::not_found(format!("plan '{other}'"))),
        }
    }
}

/// Billing cadence shown next to a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    #[default]
    Monthly,
    Yearly,
}

impl BillingInterval {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Monthly => "/mo",
            Self::Yearly => "/yr",
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monthly => f.write_str("monthly"),
            Self::Yearly => f.write_str("yearly"),
        }
    }
}

impl FromStr for BillingInterval {
    type Err = CellsmithError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            other => Err(CellsmithError::invalid(format!(
                "unknown billing interval '{other}'"
            ))),
        }
    }
}

/// Monthly usage quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanLimits {
    pub queries: u32,
    /// Subset of `queries` that may use the GPT-4 model. Zero disables it.
    pub gpt4_queries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: &'static str,
    /// Whole US dollars.
    pub monthly_price: u32,
    /// Whole US dollars billed once a year. `None` for the free tier.
    pub yearly_price: Option<u32>,
    pub description: &'static str,
    /// Rendered top to bottom.
    pub features: &'static [&'static str],
    pub limits: PlanLimits,
    pub call_to_action: &'static str,
    pub popular: bool,
}

impl Plan {
    pub fn price_for(&self, interval: BillingInterval) -> Option<u32> {
        match interval {
            BillingInterval::Monthly => Some(self.monthly_price),
            BillingInterval::Yearly => self.yearly_price,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.monthly_price > 0
    }
}

static PLANS: [Plan; 3] = [
    Plan {
        id: PlanId::Free,
        name: "Free",
        monthly_price: 0,
        yearly_price: None,
        description: "Try AI formulas on your own spreadsheets",
        features: &[
            "10 AI queries per month",
            "Formula generation and explanation",
            "Works in Excel desktop and web",
            "Community support",
        ],
        limits: PlanLimits {
            queries: 10,
            gpt4_queries: 0,
        },
        call_to_action: "Get Started",
        popular: false,
    },
    Plan {
        id: PlanId::Pro,
        name: "Pro",
        monthly_price: 29,
        yearly_price: Some(290),
        description: "For analysts who live in spreadsheets",
        features: &[
            "500 AI queries per month",
            "100 GPT-4 queries per month",
            "Data cleanup and table summaries",
            "VBA and Office Script generation",
            "Priority email support",
        ],
        limits: PlanLimits {
            queries: 500,
            gpt4_queries: 100,
        },
        call_to_action: "Upgrade to Pro",
        popular: true,
    },
    Plan {
        id: PlanId::Team,
        name: "Team",
        monthly_price: 99,
        yearly_price: Some(990),
        description: "Shared AI workflows for finance and ops teams",
        features: &[
            "5,000 AI queries per month",
            "GPT-4 on every query",
            "Shared prompt library",
            "Centralized billing and seat management",
            "Dedicated onboarding",
        ],
        limits: PlanLimits {
            queries: 5000,
            gpt4_queries: 5000,
        },
        call_to_action: "Contact Sales",
        popular: false,
    },
];

/// Look up a plan. The key is a closed enum, so this cannot fail.
pub fn plan(id: PlanId) -> &'static Plan {
    &PLANS[id.index()]
}

/// All plans in display order.
pub fn plans() -> impl Iterator<Item = &'static Plan> {
    PLANS.iter()
}

/// The plan highlighted on pricing pages, if any.
pub fn popular_plan() -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.popular)
}

/// Check the data conventions the catalog is expected to follow.
pub fn validate_catalog() -> Result<()> {
    let mut popular = 0;

    for plan in plans() {
        if plan.features.is_empty() {
            return Err(CellsmithError::invalid(format!(
                "plan '{}' has no features",
                plan.id
            )));
        }
        if plan.limits.gpt4_queries > plan.limits.queries {
            return Err(CellsmithError::invalid(format!(
                "plan '{}' allows more GPT-4 queries than queries",
                plan.id
            )));
        }
        if let Some(yearly) = plan.yearly_price {
            if u64::from(yearly) > u64::from(plan.monthly_price) * 12 {
                return Err(CellsmithError::invalid(format!(
                    "plan '{}' yearly price exceeds twelve monthly payments",
                    plan.id
                )));
            }
        }
        if plan.popular {
            popular += 1;
        }
    }

    if popular > 1 {
        return Err(CellsmithError::invalid(format!(
            "{popular} plans are marked popular"
        )));
    }

    Ok(())
}
