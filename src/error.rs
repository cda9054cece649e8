//! Planning errors.
//!
//! Every failure the planner can hit is a typed [`PlanError`] variant. Only
//! [`PlanError::RegionUnavailable`] is recoverable: the orchestrator skips the
//! region and keeps its address blocks reserved. Everything else aborts the run.

use ipnetwork::Ipv4Network;

use crate::config::ValidationError;

/// Errors produced while building a network plan
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error("Requested {demanded} region blocks but the supernet only provides {available}")]
    CapacityExceeded { demanded: usize, available: usize },

    #[error("[{region}] Region is not available in the zone directory")]
    RegionUnavailable { region: String },

    #[error("[{region}] Zone name count ({names}) does not match zone id count ({ids})")]
    ZoneCountMismatch {
        region: String,
        names: usize,
        ids: usize,
    },

    #[error("[{region}] Zone id '{zone_id}' has an unsupported ordinal (only 1-9 are supported)")]
    UnsupportedZoneOrdinal { region: String, zone_id: String },

    #[error("[{region}] Zone id '{zone_id}' does not end in a zone ordinal")]
    MalformedZoneId { region: String, zone_id: String },

    #[error("[{region}] Zone ids '{first}' and '{second}' share ordinal {ordinal}")]
    DuplicateZoneOrdinal {
        region: String,
        ordinal: u8,
        first: String,
        second: String,
    },

    #[error(
        "[{region}] Ran out of subnets while allocating category '{category}': \
         needed {needed}, only {available} fit in the region's blocks \
         (reduce subnet categories, raise zone_subnet_prefix, or raise max_blocks_per_region)"
    )]
    AllocationExhausted {
        region: String,
        category: String,
        needed: usize,
        available: usize,
    },

    #[error("Allocation {first} overlaps {second}")]
    OverlappingAllocation {
        first: Ipv4Network,
        second: Ipv4Network,
    },

    #[error("[{region}] Allocation changed compared to the previous plan")]
    AllocationDrift { region: String },

    #[error("Previous plan is not a JSON object keyed by region")]
    InvalidPreviousPlan,

    #[error("Plan serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CIDR error: {0}")]
    Cidr(#[from] ipnetwork::IpNetworkError),
}

impl PlanError {
    /// Whether planning can continue without the affected region
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PlanError::RegionUnavailable { .. })
    }
}
