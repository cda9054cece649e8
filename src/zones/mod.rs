//! Availability zone handling.
//!
//! This module contains the zone directory consumed from discovery and the
//! ordinal normalization that reserves address space for zone gaps.

pub mod directory;
pub mod ordinal;

// Re-export key types and functions for easier access
pub use directory::{RegionZones, ZoneDirectory};
pub use ordinal::{normalize_zones, parse_zone_ordinal, NormalizedZones, SlotKind, ZoneSlot};
