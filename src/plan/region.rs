//! Per-region subnet planning.
//!
//! A region's blocks are concatenated (primary first) and split into one flat
//! sequence of zone-sized subnets. A cursor walks that sequence handing out
//! one subnet per (category, ordinal) pair, categories in configured order and
//! ordinals ascending, so each category owns a contiguous run of addresses.

use ipnetwork::Ipv4Network;
use log::{debug, info};

use super::types::{CategoryAssignment, RegionPlan, SecondaryUsage, SubnetTable, VpcBlocks};
use crate::error::PlanError;
use crate::ip::{overlaps, subdivide, RegionBlockSet};
use crate::zones::NormalizedZones;

/// Plans subnets for one region from its reserved blocks
#[derive(Debug)]
pub struct RegionSubnetPlanner<'a> {
    blocks: &'a RegionBlockSet,
    zone_subnet_prefix: u8,
    categories: &'a [String],
}

impl<'a> RegionSubnetPlanner<'a> {
    pub fn new(blocks: &'a RegionBlockSet, zone_subnet_prefix: u8, categories: &'a [String]) -> Self {
        Self {
            blocks,
            zone_subnet_prefix,
            categories,
        }
    }

    /// Flat zone-subnet sequence across all of the region's blocks
    fn zone_subnets(&self) -> Result<Vec<Ipv4Network>, PlanError> {
        let mut subnets = Vec::new();
        for block in self.blocks.blocks() {
            subnets.extend(subdivide(block, self.zone_subnet_prefix)?);
        }
        Ok(subnets)
    }

    pub fn plan(&self, zones: &NormalizedZones) -> Result<RegionPlan, PlanError> {
        let region = &self.blocks.region;
        let subnets = self.zone_subnets()?;
        let needed = self.categories.len() * zones.slots.len();

        let mut cursor = 0;
        let mut last_subnet = None;
        let mut categories = Vec::with_capacity(self.categories.len());

        for category in self.categories {
            let mut assigned = Vec::new();
            for slot in &zones.slots {
                let subnet = *subnets.get(cursor).ok_or_else(|| PlanError::AllocationExhausted {
                    region: region.clone(),
                    category: category.clone(),
                    needed,
                    available: subnets.len(),
                })?;
                cursor += 1;

                if slot.is_real() {
                    assigned.push((slot.zone_id.clone(), subnet));
                    last_subnet = Some(subnet);
                } else {
                    debug!("[{}] Reserved {} for placeholder zone {}", region, subnet, slot.zone_id);
                }
            }
            categories.push(CategoryAssignment {
                category: category.clone(),
                zones: assigned,
            });
        }

        let vpc = self.vpc_blocks(last_subnet);
        if !vpc.secondary.is_empty() {
            info!("[{}] Using {} secondary blocks", region, vpc.secondary.len());
        }

        Ok(RegionPlan {
            region: region.clone(),
            subnets: SubnetTable {
                categories,
                unused: subnets[cursor..].to_vec(),
            },
            vpc,
            zone_ids: zones.real_zone_ids(),
        })
    }

    fn vpc_blocks(&self, last_subnet: Option<Ipv4Network>) -> VpcBlocks {
        let secondary = &self.blocks.secondary;
        let usage = secondary_usage(secondary, last_subnet);
        let in_use = match usage {
            SecondaryUsage::PrimaryOnly => 0,
            SecondaryUsage::Through(index) => index + 1,
            SecondaryUsage::All => secondary.len(),
        };

        VpcBlocks {
            primary: self.blocks.primary,
            secondary: secondary[..in_use].to_vec(),
            unused: secondary[in_use..].to_vec(),
            usage,
        }
    }
}

/// Find how many secondary blocks the highest allocation reaches.
///
/// Scans from the topmost secondary block down; the first one overlapping
/// `last_subnet` is the boundary.
pub fn secondary_usage(secondary: &[Ipv4Network], last_subnet: Option<Ipv4Network>) -> SecondaryUsage {
    let Some(last) = last_subnet else {
        return SecondaryUsage::PrimaryOnly;
    };

    match secondary.iter().rposition(|block| overlaps(block, &last)) {
        None => SecondaryUsage::PrimaryOnly,
        Some(index) if index + 1 == secondary.len() => SecondaryUsage::All,
        Some(index) => SecondaryUsage::Through(index),
    }
}
