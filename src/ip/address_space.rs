//! Global address space partitioning.
//!
//! The supernet is split into a flat, ordered sequence of fixed-size region
//! blocks. Each region in the provision order receives the next
//! `max_blocks_per_region` blocks, so a region's addresses depend only on its
//! position in that order and on the account offset.

use ipnetwork::Ipv4Network;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::cidr::{addresses_in_prefix, nth_subnet, subnet_count};
use crate::config::Config;
use crate::error::PlanError;

/// Order in which candidate region blocks are handed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockOrder {
    /// Strict ascending order. The only mode safe for real networks.
    #[default]
    Sequential,
    /// CHAOS/TEST ONLY: candidate blocks are shuffled with a seeded RNG.
    /// Allocations change whenever the seed or provision order changes.
    Shuffled { seed: u64 },
}

/// The blocks reserved for one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBlockSet {
    pub region: String,
    pub primary: Ipv4Network,
    pub secondary: Vec<Ipv4Network>,
}

impl RegionBlockSet {
    /// Primary block followed by the secondaries, in order
    pub fn blocks(&self) -> impl Iterator<Item = &Ipv4Network> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }
}

/// Headroom figures for a configuration, for operator logging
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityReport {
    pub start_offset: usize,
    pub highest_offset: usize,
    pub available_blocks: usize,
    pub remaining_blocks: usize,
    pub blocks_per_region: usize,
    pub remaining_vpcs: f64,
    pub remaining_accounts: f64,
    pub highest_block: Option<Ipv4Network>,
    pub zone_subnets_per_vpc: usize,
    pub zone_subnet_prefix: u8,
    pub addresses_per_subnet: u64,
    pub addresses_per_vpc: u64,
}

impl CapacityReport {
    pub fn log(&self) {
        if let Some(block) = self.highest_block {
            info!(
                "Highest region block reserved: {} (offset {}, first offset {})",
                block, self.highest_offset, self.start_offset
            );
        }
        info!(
            "{} region blocks remaining (room for {:.2} more VPCs at {} blocks each)",
            self.remaining_blocks, self.remaining_vpcs, self.blocks_per_region
        );
        info!(
            "Configuration can repeat into {:.2} more accounts",
            self.remaining_accounts
        );
        info!(
            "Each VPC holds {} /{} subnets ({} addresses per subnet, {} addresses per VPC)",
            self.zone_subnets_per_vpc,
            self.zone_subnet_prefix,
            self.addresses_per_subnet,
            self.addresses_per_vpc
        );
    }
}

/// Region block sequence for one configuration
#[derive(Debug, Clone)]
pub struct GlobalAddressSpace {
    supernet: Ipv4Network,
    block_prefix: u8,
    start_offset: usize,
    blocks_per_region: usize,
    max_regions: usize,
    available_blocks: usize,
    demanded_blocks: usize,
    zone_subnet_prefix: u8,
    zone_subnets_per_vpc: usize,
    /// Shuffled candidate indices; `None` means sequential
    shuffled: Option<Vec<usize>>,
}

impl GlobalAddressSpace {
    /// First block index handed out for the configured account
    pub fn start_offset(config: &Config) -> usize {
        config.reserved_blocks.saturating_add(
            config
                .account_offset
                .saturating_mul(config.max_regions)
                .saturating_mul(config.max_blocks_per_region),
        )
    }

    /// Build the block sequence, failing before any block is handed out if the
    /// configured demand exceeds the supernet
    pub fn new(config: &Config, order: BlockOrder) -> Result<Self, PlanError> {
        let start_offset = Self::start_offset(config);
        let regions = config.max_regions.max(config.provision_order.len());
        let demanded_blocks =
            start_offset.saturating_add(regions.saturating_mul(config.max_blocks_per_region));
        let available_blocks = subnet_count(&config.supernet, config.region_block_prefix);

        if demanded_blocks > available_blocks {
            return Err(PlanError::CapacityExceeded {
                demanded: demanded_blocks,
                available: available_blocks,
            });
        }

        let shuffled = match order {
            BlockOrder::Sequential => None,
            BlockOrder::Shuffled { seed } => {
                warn!("Shuffling region blocks with seed {} (chaos mode, never use for real networks)", seed);
                let mut candidates: Vec<usize> = (start_offset..available_blocks).collect();
                let mut rng = StdRng::seed_from_u64(seed);
                candidates.shuffle(&mut rng);
                Some(candidates)
            }
        };

        Ok(Self {
            supernet: config.supernet,
            block_prefix: config.region_block_prefix,
            start_offset,
            blocks_per_region: config.max_blocks_per_region,
            max_regions: config.max_regions,
            available_blocks,
            demanded_blocks,
            zone_subnet_prefix: config.zone_subnet_prefix,
            zone_subnets_per_vpc: config.zone_subnets_per_region(),
            shuffled,
        })
    }

    /// The `position`-th candidate block after the start offset
    fn candidate(&self, position: usize) -> Result<Ipv4Network, PlanError> {
        let index = match &self.shuffled {
            Some(candidates) => *candidates
                .get(position)
                .ok_or(ipnetwork::IpNetworkError::InvalidPrefix)?,
            None => self.start_offset + position,
        };
        Ok(nth_subnet(&self.supernet, self.block_prefix, index)?)
    }

    /// Blocks reserved for the region at `index` in the provision order
    pub fn blocks_for(&self, region: &str, index: usize) -> Result<RegionBlockSet, PlanError> {
        let first = index * self.blocks_per_region;
        let mut blocks = (first..first + self.blocks_per_region)
            .map(|position| self.candidate(position))
            .collect::<Result<Vec<_>, _>>()?;

        let secondary = blocks.split_off(1);
        Ok(RegionBlockSet {
            region: region.to_string(),
            primary: blocks[0],
            secondary,
        })
    }

    /// Reserve blocks for every region in the provision order, in order
    pub fn assign(&self, provision_order: &[String]) -> Result<Vec<RegionBlockSet>, PlanError> {
        provision_order
            .iter()
            .enumerate()
            .map(|(index, region)| self.blocks_for(region, index))
            .collect()
    }

    pub fn capacity_report(&self) -> CapacityReport {
        let remaining_blocks = self.available_blocks - self.demanded_blocks;
        let zone_subnets_per_vpc = self.zone_subnets_per_vpc;
        let addresses_per_subnet = addresses_in_prefix(self.zone_subnet_prefix);
        let highest_block = match self.demanded_blocks.checked_sub(1) {
            Some(index) if index >= self.start_offset && self.shuffled.is_none() => {
                nth_subnet(&self.supernet, self.block_prefix, index).ok()
            }
            _ => None,
        };

        CapacityReport {
            start_offset: self.start_offset,
            highest_offset: self.demanded_blocks,
            available_blocks: self.available_blocks,
            remaining_blocks,
            blocks_per_region: self.blocks_per_region,
            remaining_vpcs: remaining_blocks as f64 / self.blocks_per_region as f64,
            remaining_accounts: remaining_blocks as f64
                / (self.max_regions * self.blocks_per_region) as f64,
            highest_block,
            zone_subnets_per_vpc,
            zone_subnet_prefix: self.zone_subnet_prefix,
            addresses_per_subnet,
            addresses_per_vpc: addresses_per_subnet * zone_subnets_per_vpc as u64,
        }
    }
}
