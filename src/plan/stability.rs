//! Append-only stability check.
//!
//! Allocations are stable only while the provision order is append-only and
//! the configuration is unchanged. Comparing a fresh plan with the previously
//! saved one catches accidental reordering before anything is re-created.

use log::{info, warn};
use serde_json::Value;

use super::types::NetworkPlan;
use crate::error::PlanError;

/// Outcome of comparing a new plan against a saved one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StabilityReport {
    /// Regions identical in both plans
    pub unchanged: Vec<String>,
    /// Regions only in the new plan
    pub added: Vec<String>,
    /// Regions only in the saved plan
    pub missing: Vec<String>,
}

/// Check every region of `previous` that is still planned is byte-identical
/// in `current`.
///
/// Regions that disappeared (for example because the account lost access)
/// are reported, not treated as drift: their blocks are still reserved.
pub fn verify_append_only(previous: &Value, current: &NetworkPlan) -> Result<StabilityReport, PlanError> {
    let previous_regions = previous.as_object().ok_or(PlanError::InvalidPreviousPlan)?;
    let current_regions: serde_json::Map<String, Value> =
        serde_json::from_value(serde_json::to_value(current)?)?;

    let mut report = StabilityReport::default();
    for (region, planned) in previous_regions {
        match current_regions.get(region) {
            Some(now) if now == planned => report.unchanged.push(region.clone()),
            Some(_) => {
                return Err(PlanError::AllocationDrift {
                    region: region.clone(),
                })
            }
            None => {
                warn!("[{}] Region was planned before but is not planned now", region);
                report.missing.push(region.clone());
            }
        }
    }

    for region in &current.regions {
        if !previous_regions.contains_key(&region.region) {
            info!("[{}] New region appended to the plan", region.region);
            report.added.push(region.region.clone());
        }
    }

    Ok(report)
}
