//! Network plan construction.
//!
//! - `types`: the emitted plan structure and its JSON form
//! - `region`: per-region subnet planning and secondary block trimming
//! - `stability`: append-only comparison against a saved plan

pub mod region;
pub mod stability;
pub mod types;

pub use region::{secondary_usage, RegionSubnetPlanner};
pub use stability::{verify_append_only, StabilityReport};
pub use types::{CategoryAssignment, NetworkPlan, RegionPlan, SecondaryUsage, SubnetTable, VpcBlocks};
