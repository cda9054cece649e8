use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use vpcplan::config::Config;
use vpcplan::config_loader::{self, ConfigOverrides};
use vpcplan::ip::BlockOrder;
use vpcplan::orchestrator::{plan_network, write_plan};
use vpcplan::plan::verify_append_only;

/// Generate a non-overlapping subnet plan for all zones in all regions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the planner configuration YAML file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cached region to zone directory (JSON)
    #[arg(short, long, default_value = "cache.myregions.json")]
    zones: PathBuf,

    /// Output path for the planned network (JSON)
    #[arg(short, long, default_value = "planned.myregions.json")]
    output: PathBuf,

    /// Highest number of regions ever provisioned
    #[arg(long)]
    max_regions: Option<usize>,

    /// Region blocks reserved per VPC
    #[arg(long)]
    max_blocks_per_region: Option<usize>,

    /// Prefix length of each zone subnet
    #[arg(long)]
    zone_subnet_prefix: Option<u8>,

    /// Position of this account in a peering group
    #[arg(long)]
    account_offset: Option<usize>,

    /// Subnet categories to provision in every zone, in allocation order
    #[arg(long, value_delimiter = ',')]
    subnet_categories: Option<Vec<String>>,

    /// Previously saved plan; fail if any existing region's allocation changed
    #[arg(long)]
    previous: Option<PathBuf>,

    /// CHAOS/TEST ONLY: shuffle region blocks with this seed
    #[arg(long, hide = true)]
    chaos_shuffle_seed: Option<u64>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_regions: self.max_regions,
            max_blocks_per_region: self.max_blocks_per_region,
            zone_subnet_prefix: self.zone_subnet_prefix,
            account_offset: self.account_offset,
            subnet_categories: self.subnet_categories.clone(),
        }
    }

    /// Logger filter used when RUST_LOG is unset
    fn default_log_filter(config: &Config) -> String {
        config.log_level.clone().unwrap_or_else(|| "info".to_string())
    }

    fn block_order(&self) -> BlockOrder {
        match self.chaos_shuffle_seed {
            Some(seed) => BlockOrder::Shuffled { seed },
            None => BlockOrder::Sequential,
        }
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => config_loader::load_config(path)?,
        None => Config::default(),
    };

    // Initialize logging; RUST_LOG wins over the config file's log_level
    let default_level = Args::default_log_filter(&config);
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Starting vpcplan");
    match &args.config {
        Some(path) => info!("Loaded configuration from: {:?}", path),
        None => info!("No configuration file given, using defaults"),
    }

    config_loader::apply_overrides(&mut config, &args.overrides())?;

    let directory = config_loader::load_zone_directory(&args.zones)?;

    let plan = plan_network(&config, &directory, args.block_order())
        .wrap_err("Network planning failed")?;

    if let Some(previous_path) = &args.previous {
        let previous = config_loader::load_previous_plan(previous_path)?;
        let report = verify_append_only(&previous, &plan)
            .wrap_err("New plan is not an append-only extension of the previous plan")?;
        info!(
            "Stability check passed: {} unchanged, {} added, {} missing",
            report.unchanged.len(),
            report.added.len(),
            report.missing.len()
        );
    }

    write_plan(&plan, &args.output)?;

    info!("Planning completed successfully");
    Ok(())
}
