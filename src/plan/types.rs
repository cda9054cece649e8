//! Network plan type definitions.
//!
//! These types are the single output of a planning pass. Their JSON form is
//! what downstream template rendering consumes, so every map is emitted in
//! planning order: regions in provision order, categories in configured
//! order, zones in ordinal order.

use ipnetwork::Ipv4Network;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::config::UNUSED_KEY;

// ============================================================================
// Subnet Types
// ============================================================================

/// Subnets handed out for one category, one per real zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAssignment {
    pub category: String,
    /// (zone id, subnet) in ordinal order
    pub zones: Vec<(String, Ipv4Network)>,
}

impl CategoryAssignment {
    pub fn subnet_for(&self, zone_id: &str) -> Option<Ipv4Network> {
        self.zones
            .iter()
            .find(|(id, _)| id == zone_id)
            .map(|(_, subnet)| *subnet)
    }
}

impl Serialize for CategoryAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.zones.iter().map(|(zone, subnet)| (zone, subnet)))
    }
}

/// Per-category subnet assignment plus the region's unused zone subnets.
///
/// Serialized as `{ <category>: { <zoneId>: <cidr> }, "_unused": [<cidr>] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetTable {
    pub categories: Vec<CategoryAssignment>,
    pub unused: Vec<Ipv4Network>,
}

impl SubnetTable {
    pub fn category(&self, name: &str) -> Option<&CategoryAssignment> {
        self.categories.iter().find(|c| c.category == name)
    }

    /// Every assigned subnet, in allocation order
    pub fn assigned(&self) -> impl Iterator<Item = &Ipv4Network> {
        self.categories
            .iter()
            .flat_map(|c| c.zones.iter().map(|(_, subnet)| subnet))
    }
}

impl Serialize for SubnetTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len() + 1))?;
        for assignment in &self.categories {
            map.serialize_entry(&assignment.category, assignment)?;
        }
        map.serialize_entry(UNUSED_KEY, &self.unused)?;
        map.end()
    }
}

// ============================================================================
// VPC Block Types
// ============================================================================

/// How far into the secondary blocks a region's allocations reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryUsage {
    /// Every allocation fits in the primary block
    PrimaryOnly,
    /// Secondary blocks `0..=index` hold allocations
    Through(usize),
    /// The topmost secondary block holds allocations
    All,
}

/// Region VPC blocks split by whether any allocation touches them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcBlocks {
    pub primary: Ipv4Network,
    pub secondary: Vec<Ipv4Network>,
    #[serde(rename = "_unused")]
    pub unused: Vec<Ipv4Network>,
    #[serde(skip)]
    pub usage: SecondaryUsage,
}

impl VpcBlocks {
    pub fn blocks(&self) -> impl Iterator<Item = &Ipv4Network> {
        std::iter::once(&self.primary)
            .chain(self.secondary.iter())
            .chain(self.unused.iter())
    }
}

// ============================================================================
// Plan Types
// ============================================================================

/// Plan for a single region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionPlan {
    #[serde(skip)]
    pub region: String,
    pub subnets: SubnetTable,
    pub vpc: VpcBlocks,
    #[serde(rename = "zoneIds")]
    pub zone_ids: Vec<String>,
}

/// Plan for every available region, in provision order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkPlan {
    pub regions: Vec<RegionPlan>,
    /// Regions in the provision order that were not available; their blocks
    /// stay reserved
    pub skipped: Vec<String>,
}

impl NetworkPlan {
    pub fn region(&self, name: &str) -> Option<&RegionPlan> {
        self.regions.iter().find(|r| r.region == name)
    }

    /// Every zone-level subnet: assignments and unused pools of all regions
    pub fn zone_subnets(&self) -> Vec<Ipv4Network> {
        self.regions
            .iter()
            .flat_map(|r| r.subnets.assigned().chain(r.subnets.unused.iter()))
            .copied()
            .collect()
    }

    /// Every region-level block of all planned regions
    pub fn vpc_blocks(&self) -> Vec<Ipv4Network> {
        self.regions
            .iter()
            .flat_map(|r| r.vpc.blocks())
            .copied()
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for NetworkPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.regions.iter().map(|r| (&r.region, r)))
    }
}
