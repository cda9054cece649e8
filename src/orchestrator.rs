//! Plan orchestrator.
//!
//! This module coordinates a full planning pass: configuration checks, region
//! block reservation, per-region subnet planning and assembly of the final
//! plan in provision order.

use color_eyre::eyre::WrapErr;
use log::{info, warn};
use rayon::prelude::*;
use std::path::Path;

use crate::config::Config;
use crate::error::PlanError;
use crate::ip::{BlockOrder, GlobalAddressSpace, RegionBlockSet};
use crate::plan::{NetworkPlan, RegionPlan, RegionSubnetPlanner};
use crate::utils::validation::validate_plan;
use crate::zones::{normalize_zones, ZoneDirectory};

/// Plan one region from its reserved blocks
fn plan_region(config: &Config, directory: &ZoneDirectory, blocks: &RegionBlockSet) -> Result<RegionPlan, PlanError> {
    let zones = directory.region(&blocks.region)?;
    let zone_ids = zones.sorted_zone_ids(&blocks.region)?;
    let normalized = normalize_zones(&blocks.region, &zone_ids)?;

    RegionSubnetPlanner::new(blocks, config.zone_subnet_prefix, &config.subnet_categories).plan(&normalized)
}

/// Build the network plan for every region in the provision order.
///
/// Fails before any block is handed out when the configuration is invalid or
/// exceeds the supernet. Regions missing from `directory` are skipped with a
/// warning and keep their reserved blocks; every other error aborts the run.
pub fn plan_network(config: &Config, directory: &ZoneDirectory, order: BlockOrder) -> Result<NetworkPlan, PlanError> {
    config.validate()?;

    info!(
        "Planning with max_regions={} configured_regions={} max_blocks_per_region={}",
        config.max_regions,
        config.provision_order.len(),
        config.max_blocks_per_region
    );
    info!(
        "Planning with zone_subnet_prefix=/{} account_offset={} subnet_categories={:?}",
        config.zone_subnet_prefix, config.account_offset, config.subnet_categories
    );

    let space = GlobalAddressSpace::new(config, order)?;
    space.capacity_report().log();

    // Every region keeps its blocks, available or not
    let reserved = space.assign(&config.provision_order)?;

    let results: Vec<Result<RegionPlan, PlanError>> = reserved
        .par_iter()
        .map(|blocks| plan_region(config, directory, blocks))
        .collect();

    let mut plan = NetworkPlan::default();
    for (blocks, result) in reserved.iter().zip(results) {
        match result {
            Ok(region_plan) => plan.regions.push(region_plan),
            Err(e) if e.is_recoverable() => {
                warn!("[{}] Skipping region because not available in account!", blocks.region);
                plan.skipped.push(blocks.region.clone());
            }
            Err(e) => return Err(e),
        }
    }

    validate_plan(&plan)?;

    info!(
        "Planned {} regions ({} skipped)",
        plan.regions.len(),
        plan.skipped.len()
    );
    Ok(plan)
}

/// Write a plan as pretty JSON
pub fn write_plan(plan: &NetworkPlan, output_path: &Path) -> color_eyre::eyre::Result<()> {
    let json = plan.to_json_pretty().wrap_err("Failed to serialize network plan")?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .wrap_err_with(|| format!("Failed to create output directory '{}'", parent.display()))?;
        }
    }
    std::fs::write(output_path, json)
        .wrap_err_with(|| format!("Failed to write plan to '{}'", output_path.display()))?;

    info!("[{}] Saved network plan", output_path.display());
    Ok(())
}
