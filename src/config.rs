use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::Ipv4Addr;

/// AWS hard limit on CIDR blocks attached to one VPC
pub const MAX_VPC_CIDR_BLOCKS: usize = 50;

/// Largest VPC block AWS accepts
pub const MIN_VPC_BLOCK_PREFIX: u8 = 16;

/// Smallest VPC block or subnet AWS accepts
pub const MAX_SUBNET_PREFIX: u8 = 28;

/// Key used for unallocated capacity in the emitted plan
pub const UNUSED_KEY: &str = "_unused";

/// Default region provision order.
///
/// ONLY APPEND NEW REGIONS. Blocks are allocated by position in this list, so
/// reordering or removing an entry moves every network after it.
const DEFAULT_PROVISION_ORDER: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-north-1",
    "eu-west-1",
    "eu-west-2",
    "eu-west-3",
    "eu-central-1",
    "eu-south-1",
    "ap-south-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-east-1",
    "sa-east-1",
];

/// Planner configuration.
///
/// One immutable value per run; every planning function borrows it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Global supernet every block is carved from
    #[serde(default = "default_supernet")]
    pub supernet: Ipv4Network,
    /// Prefix length of region-level (VPC) blocks
    #[serde(default = "default_region_block_prefix")]
    pub region_block_prefix: u8,
    /// Leading region blocks of the supernet that are never handed out
    #[serde(default = "default_reserved_blocks")]
    pub reserved_blocks: usize,
    /// Highest number of regions this account will ever provision
    #[serde(default = "default_max_regions")]
    pub max_regions: usize,
    /// Blocks reserved per region (one primary, the rest secondary)
    #[serde(default = "default_max_blocks_per_region")]
    pub max_blocks_per_region: usize,
    /// Prefix length of each zone subnet
    #[serde(default = "default_zone_subnet_prefix")]
    pub zone_subnet_prefix: u8,
    /// Position of this account in a peering group
    #[serde(default)]
    pub account_offset: usize,
    /// Subnet categories provisioned in every zone, in allocation order
    #[serde(default = "default_subnet_categories")]
    pub subnet_categories: Vec<String>,
    /// Append-only region list
    #[serde(default = "default_provision_order")]
    pub provision_order: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let supernet_prefix = self.supernet.prefix();

        if self.region_block_prefix < supernet_prefix {
            return Err(ValidationError::InvalidPrefix(format!(
                "region_block_prefix /{} is larger than the supernet {}",
                self.region_block_prefix, self.supernet
            )));
        }
        if !(MIN_VPC_BLOCK_PREFIX..=MAX_SUBNET_PREFIX).contains(&self.region_block_prefix) {
            return Err(ValidationError::InvalidPrefix(format!(
                "region_block_prefix must be between /{} and /{}, got /{}",
                MIN_VPC_BLOCK_PREFIX, MAX_SUBNET_PREFIX, self.region_block_prefix
            )));
        }
        if self.zone_subnet_prefix < self.region_block_prefix || self.zone_subnet_prefix > MAX_SUBNET_PREFIX {
            return Err(ValidationError::InvalidPrefix(format!(
                "zone_subnet_prefix must be between /{} and /{}, got /{}",
                self.region_block_prefix, MAX_SUBNET_PREFIX, self.zone_subnet_prefix
            )));
        }

        if self.max_blocks_per_region == 0 || self.max_blocks_per_region > MAX_VPC_CIDR_BLOCKS {
            return Err(ValidationError::InvalidLimits(format!(
                "max_blocks_per_region must be between 1 and {}, got {}",
                MAX_VPC_CIDR_BLOCKS, self.max_blocks_per_region
            )));
        }
        if self.max_regions == 0 {
            return Err(ValidationError::InvalidLimits(
                "max_regions must be at least 1".to_string(),
            ));
        }

        Self::validate_categories(&self.subnet_categories)?;
        self.validate_provision_order()?;

        Ok(())
    }

    fn validate_categories(categories: &[String]) -> Result<(), ValidationError> {
        if categories.is_empty() {
            return Err(ValidationError::InvalidCategories(
                "subnet_categories cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for category in categories {
            if category.is_empty() {
                return Err(ValidationError::InvalidCategories(
                    "subnet category names cannot be empty".to_string(),
                ));
            }
            if category == UNUSED_KEY {
                return Err(ValidationError::InvalidCategories(format!(
                    "'{}' is reserved for unallocated subnets",
                    UNUSED_KEY
                )));
            }
            if !seen.insert(category.as_str()) {
                return Err(ValidationError::InvalidCategories(format!(
                    "duplicate subnet category '{}'",
                    category
                )));
            }
        }

        Ok(())
    }

    fn validate_provision_order(&self) -> Result<(), ValidationError> {
        if self.provision_order.len() > self.max_regions {
            return Err(ValidationError::InvalidProvisionOrder(format!(
                "{} regions configured but max_regions is {}",
                self.provision_order.len(),
                self.max_regions
            )));
        }

        let mut seen = HashSet::new();
        for region in &self.provision_order {
            if !seen.insert(region.as_str()) {
                return Err(ValidationError::InvalidProvisionOrder(format!(
                    "region '{}' appears more than once",
                    region
                )));
            }
        }

        Ok(())
    }

    /// Number of zone subnets that fit in one region's blocks
    pub fn zone_subnets_per_region(&self) -> usize {
        let per_block = 1usize << (self.zone_subnet_prefix - self.region_block_prefix);
        per_block * self.max_blocks_per_region
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid prefix configuration: {0}")]
    InvalidPrefix(String),
    #[error("Invalid limit configuration: {0}")]
    InvalidLimits(String),
    #[error("Invalid subnet categories: {0}")]
    InvalidCategories(String),
    #[error("Invalid provision order: {0}")]
    InvalidProvisionOrder(String),
}

fn default_supernet() -> Ipv4Network {
    Ipv4Network::new(Ipv4Addr::new(10, 0, 0, 0), 8).expect("Invalid default supernet")
}

fn default_region_block_prefix() -> u8 {
    16
}

fn default_reserved_blocks() -> usize {
    2
}

fn default_max_regions() -> usize {
    25
}

fn default_max_blocks_per_region() -> usize {
    5
}

fn default_zone_subnet_prefix() -> u8 {
    19
}

fn default_subnet_categories() -> Vec<String> {
    vec!["public".to_string(), "internal".to_string()]
}

fn default_provision_order() -> Vec<String> {
    DEFAULT_PROVISION_ORDER.iter().map(|r| r.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supernet: default_supernet(),
            region_block_prefix: default_region_block_prefix(),
            reserved_blocks: default_reserved_blocks(),
            max_regions: default_max_regions(),
            max_blocks_per_region: default_max_blocks_per_region(),
            zone_subnet_prefix: default_zone_subnet_prefix(),
            account_offset: 0,
            subnet_categories: default_subnet_categories(),
            provision_order: default_provision_order(),
            log_level: None,
        }
    }
}
