//! Validate command - Build a stack in memory and summarize it.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{default_config, load_stack};

#[derive(Args)]
pub struct ValidateArgs {
    /// Stack file (YAML, JSON or TOML)
    #[arg(short, long, default_value_os_t = default_config())]
    config: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("Validating stack file {:?}", args.config);

    let (config, stack) = load_stack(&args.config)?;

    if args.json {
        let summaries: serde_json::Map<String, serde_json::Value> = stack
            .networks
            .iter()
            .map(|n| Ok((n.id.clone(), serde_json::to_value(stack.summary(&n.id))?)))
            .collect::<Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("📋 Stack {} ({})", config.name, config.region);
    for declaration in &config.networks {
        let summary = stack.summary(&declaration.id);
        println!("   🌐 {} {}", declaration.id, declaration.spec.cidr);
        println!(
            "      subnets: {}  route tables: {}  NAT gateways: {}  routes: {}",
            summary.subnets, summary.route_tables, summary.nat_gateways, summary.routes
        );

        let tgw_without_public = declaration.spec.transit_gateway.is_some()
            && declaration.spec.public_subnets.is_empty();
        if tgw_without_public {
            println!("      ⚠️  Transit Gateway attachment has no subnets (no public subnets)");
        }
    }

    println!();
    println!("✅ All networks valid ({} resources)", stack.graph.len());
    Ok(())
}
