//! CLI command definitions.
//!
//! Each subcommand loads a stack configuration, builds its networks and
//! reports or writes the result.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use smith_vpc::{Stack, StackConfig};

pub mod list;
pub mod synth;
pub mod validate;

/// Stacksmiths - VPC topology synthesizer
#[derive(Parser)]
#[command(name = "smith")]
#[command(version, about = "Stacksmiths - VPC topology synthesizer")]
#[command(long_about = r#"
Stacksmiths builds VPC topologies (public/private subnets, Internet and NAT
gateways, peering and Transit Gateway routes) from a stack file and writes
them as CloudFormation or Terraform.

COMMANDS:
  synth     → Write templates for a stack
  validate  → Build a stack in memory and print a summary
  list      → List every declared resource in order

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  5 - IaC error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synthesize templates for a stack
    Synth(synth::SynthArgs),

    /// Validate a stack file
    Validate(validate::ValidateArgs),

    /// List declared resources
    List(list::ListArgs),
}

/// Load a stack file and build all of its networks.
pub(crate) fn load_stack(config_path: &Path) -> Result<(StackConfig, Stack)> {
    if !config_path.exists() {
        anyhow::bail!("Config file not found: {:?}", config_path);
    }

    let config = StackConfig::from_file(config_path)
        .with_context(|| format!("Failed to read stack config {:?}", config_path))?;
    let stack = Stack::synth(&config)
        .with_context(|| format!("Failed to build stack {}", config.name))?;
    Ok((config, stack))
}

/// Default stack file when `--config` is omitted.
pub(crate) fn default_config() -> PathBuf {
    PathBuf::from("stack.yaml")
}
