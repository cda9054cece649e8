//! IP address space management.
//!
//! This module carves the global supernet into region-level blocks and
//! provides the CIDR arithmetic used to subdivide those blocks into zone
//! subnets.

pub mod address_space;
pub mod cidr;

// Re-export commonly used types
pub use address_space::{BlockOrder, CapacityReport, GlobalAddressSpace, RegionBlockSet};
pub use cidr::{overlaps, subdivide};
