//! Plan validation utilities.
//!
//! This module provides post-condition checks run over a finished plan.

use ipnetwork::Ipv4Network;

use crate::error::PlanError;
use crate::plan::NetworkPlan;

/// Verify that no two networks in `networks` share an address.
///
/// Sorts by first address and compares neighbours, so the check is
/// O(n log n) in the number of networks.
///
/// # Examples
/// ```
/// use ipnetwork::Ipv4Network;
/// use vpcplan::utils::validation::validate_non_overlapping;
///
/// let ok: Vec<Ipv4Network> = vec!["10.2.0.0/24".parse().unwrap(), "10.2.1.0/24".parse().unwrap()];
/// assert!(validate_non_overlapping(&ok).is_ok());
///
/// let bad: Vec<Ipv4Network> = vec!["10.2.0.0/16".parse().unwrap(), "10.2.1.0/24".parse().unwrap()];
/// assert!(validate_non_overlapping(&bad).is_err());
/// ```
pub fn validate_non_overlapping(networks: &[Ipv4Network]) -> Result<(), PlanError> {
    let mut ranges: Vec<(u32, u32, Ipv4Network)> = networks
        .iter()
        .map(|net| (u32::from(net.network()), u32::from(net.broadcast()), *net))
        .collect();
    ranges.sort_by_key(|(start, end, _)| (*start, *end));

    for pair in ranges.windows(2) {
        let (_, prev_end, prev) = pair[0];
        let (next_start, _, next) = pair[1];
        if next_start <= prev_end {
            return Err(PlanError::OverlappingAllocation {
                first: prev,
                second: next,
            });
        }
    }

    Ok(())
}

/// Check the global non-overlap invariants of a plan.
///
/// Zone subnets (assigned and unused, across every region) must be disjoint,
/// and so must the region blocks.
pub fn validate_plan(plan: &NetworkPlan) -> Result<(), PlanError> {
    let subnets = plan.zone_subnets();
    let blocks = plan.vpc_blocks();
    validate_non_overlapping(&subnets)?;
    validate_non_overlapping(&blocks)?;

    log::debug!(
        "Validated {} zone subnets and {} region blocks as non-overlapping",
        subnets.len(),
        blocks.len()
    );
    Ok(())
}
