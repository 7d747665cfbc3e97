//! List command - Print every declared resource in order.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{default_config, load_stack};

#[derive(Args)]
pub struct ListArgs {
    /// Stack file (YAML, JSON or TOML)
    #[arg(short, long, default_value_os_t = default_config())]
    config: PathBuf,

    /// Only list resources of this network
    #[arg(short, long)]
    network: Option<String>,
}

pub fn execute(args: ListArgs) -> Result<()> {
    let (_, stack) = load_stack(&args.config)?;

    let resources = match &args.network {
        Some(id) => {
            if stack.network(id).is_none() {
                anyhow::bail!("Network not found: {}", id);
            }
            stack.resources_of(id)
        }
        None => stack.graph.resources(),
    };

    let width = resources
        .iter()
        .map(|r| r.logical_id.len())
        .max()
        .unwrap_or(0);
    for resource in resources {
        println!(
            "{:<width$}  {}",
            resource.logical_id,
            resource.kind().cfn_type()
        );
    }

    Ok(())
}
