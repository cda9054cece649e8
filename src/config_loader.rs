use crate::config::Config;
use crate::zones::ZoneDirectory;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Load and parse configuration from a YAML file
///
/// Runs before the logger is initialized, so it does not log; the caller
/// reports the path once logging is up.
pub fn load_config(config_path: &Path) -> Result<Config> {
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open config file '{}'", config_path.display()))?;

    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse config file '{}'", config_path.display()))?;

    config.validate()?;

    Ok(config)
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub max_regions: Option<usize>,
    pub max_blocks_per_region: Option<usize>,
    pub zone_subnet_prefix: Option<u8>,
    pub account_offset: Option<usize>,
    pub subnet_categories: Option<Vec<String>>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &ConfigOverrides) -> Result<()> {
    if let Some(max_regions) = overrides.max_regions {
        info!("Overriding max_regions: {} -> {}", config.max_regions, max_regions);
        config.max_regions = max_regions;
    }
    if let Some(max_blocks) = overrides.max_blocks_per_region {
        info!(
            "Overriding max_blocks_per_region: {} -> {}",
            config.max_blocks_per_region, max_blocks
        );
        config.max_blocks_per_region = max_blocks;
    }
    if let Some(prefix) = overrides.zone_subnet_prefix {
        info!("Overriding zone_subnet_prefix: /{} -> /{}", config.zone_subnet_prefix, prefix);
        config.zone_subnet_prefix = prefix;
    }
    if let Some(offset) = overrides.account_offset {
        info!("Overriding account_offset: {} -> {}", config.account_offset, offset);
        config.account_offset = offset;
    }
    if let Some(categories) = &overrides.subnet_categories {
        info!("Overriding subnet_categories: {:?} -> {:?}", config.subnet_categories, categories);
        config.subnet_categories = categories.clone();
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

/// Load the region to zone directory from the discovery cache
pub fn load_zone_directory(path: &Path) -> Result<ZoneDirectory> {
    info!("[{}] Loading cached zone directory...", path.display());

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read zone directory '{}'", path.display()))?;
    let directory: ZoneDirectory = serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse zone directory '{}'", path.display()))?;

    if directory.is_empty() {
        warn!("[{}] Zone directory lists no regions, every region will be skipped", path.display());
    } else {
        info!("Zone directory lists {} regions", directory.len());
    }

    Ok(directory)
}

/// Load a previously saved plan for the stability check
pub fn load_previous_plan(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read previous plan '{}'", path.display()))?;
    serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse previous plan '{}'", path.display()))
}
