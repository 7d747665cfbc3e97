//! Synth command - Write templates for a stack.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use smith_vpc::{IacProvider, Synthesizer};

use super::{default_config, load_stack};

#[derive(Args)]
pub struct SynthArgs {
    /// Stack file (YAML, JSON or TOML)
    #[arg(short, long, default_value_os_t = default_config())]
    config: PathBuf,

    /// Output directory
    #[arg(short, long, default_value = "smith.out")]
    out: PathBuf,

    /// Template flavour (cloudformation, terraform)
    #[arg(short, long, default_value = "cloudformation")]
    provider: IacProvider,

    /// Write CloudFormation as YAML instead of JSON
    #[arg(long)]
    yaml: bool,
}

pub fn execute(args: SynthArgs) -> Result<()> {
    info!("Synthesizing {:?} as {}", args.config, args.provider);

    let (_, stack) = load_stack(&args.config)?;

    let written = Synthesizer::new(args.provider)
        .yaml(args.yaml)
        .write(&args.out, &stack)
        .with_context(|| format!("Failed to write IaC output to {:?}", args.out))?;

    println!(
        "✅ Synthesized stack {} ({} resources)",
        stack.name,
        stack.graph.len()
    );
    for path in written {
        println!("   📄 {}", path.display());
    }

    Ok(())
}
