//! # vpcplan - Global VPC address planner
//!
//! This library computes a deterministic, globally non-overlapping IP address
//! plan for a multi-region cloud network.
//!
//! ## Overview
//!
//! One supernet (by default `10.0.0.0/8`) is carved into fixed-size region
//! blocks. Every region in an append-only provision order receives the same
//! number of blocks, chosen purely by its position in that order. Each
//! region's blocks are then split into zone subnets, one per availability
//! zone per subnet category.
//!
//! ## Key Features
//!
//! - **Deterministic**: identical inputs produce byte-identical plans
//! - **Append-only stable**: appending a region never moves existing allocations
//! - **Gap reservation**: missing zone ordinals still consume address space,
//!   so zones that appear later slot in without renumbering
//! - **Secondary block trimming**: only the secondary blocks actually touched
//!   by an allocation are reported as in use
//! - **Account offsets**: several accounts in a peering group can share one
//!   provision order without colliding
//!
//! ## Architecture
//!
//! - `config`: Type-safe configuration structures and YAML parsing
//! - `config_loader`: Configuration, zone directory and saved plan loading
//! - `ip`: Global address space partitioning and CIDR helpers
//! - `zones`: Zone directory and zone ordinal normalization
//! - `plan`: Per-region subnet planning, plan types and stability checks
//! - `orchestrator`: A full planning pass over every region
//! - `utils`: Post-condition validation
//!
//! ## Example Usage
//!
//! ```rust
//! use vpcplan::config::Config;
//! use vpcplan::ip::BlockOrder;
//! use vpcplan::orchestrator::plan_network;
//! use vpcplan::zones::{RegionZones, ZoneDirectory};
//!
//! let config = Config {
//!     max_blocks_per_region: 2,
//!     zone_subnet_prefix: 24,
//!     provision_order: vec!["region-a".to_string()],
//!     ..Config::default()
//! };
//!
//! let mut directory = ZoneDirectory::new();
//! directory.insert(
//!     "region-a",
//!     RegionZones::new(["region-a1", "region-a2"], ["region-a-az1", "region-a-az2"]),
//! );
//!
//! let plan = plan_network(&config, &directory, BlockOrder::Sequential)?;
//! let region = plan.region("region-a").unwrap();
//! assert_eq!(region.vpc.primary.to_string(), "10.2.0.0/16");
//! # Ok::<(), vpcplan::error::PlanError>(())
//! ```
//!
//! ## Error Handling
//!
//! Planning functions return [`error::PlanError`]. Only a region missing from
//! the zone directory is recovered from; every other error aborts the run
//! rather than producing a partial plan. File loading and the CLI use
//! `color_eyre` for error reporting with context.

pub mod config;
pub mod config_loader;
pub mod error;
pub mod ip;
pub mod orchestrator;
pub mod plan;
pub mod utils;
pub mod zones;
