pub mod config;
pub mod error;
pub mod pricing;

// Re-export key types
pub use config::Settings;
pub use error::{CellsmithError, Result};
pub use pricing::{BillingInterval, Plan, PlanId, PlanLimits, YearlySavings};
