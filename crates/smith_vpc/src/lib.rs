//! # smith_vpc
//!
//! Network topology assembly for Stacksmiths.
//!
//! This crate turns a declarative network description into the full set of
//! VPC resources (gateways, subnets, route tables, routes, associations,
//! peering and Transit Gateway attachment) and synthesizes them as
//! CloudFormation or Terraform.
//!
//! ## Features
//!
//! - Public subnets share one route table with a single Internet Gateway route
//! - Each private subnet gets its own route table and, when public subnets
//!   exist, a NAT gateway placed round-robin across them
//! - Peering and Transit Gateway routes fan out to every route table
//! - Several networks per stack, with peering by network id
//!
//! ## Example
//!
//! ```rust,no_run
//! use smith_vpc::{NetworkSpec, NetworkTopologyBuilder, ResourceGraph};
//!
//! let spec = NetworkSpec::new("10.0.0.0/16")
//!     .with_public_subnet("10.0.1.0/24", "ap-southeast-2a")
//!     .with_private_subnet("10.0.2.0/24", "ap-southeast-2a");
//!
//! let mut graph = ResourceGraph::new();
//! let result = NetworkTopologyBuilder::new("BasicVpc")
//!     .build(&mut graph, &spec)
//!     .unwrap();
//!
//! println!("VPC {}", result.network.logical_id());
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod provider;
pub mod resource;
pub mod stack;
pub mod synth;
pub mod template;
pub mod terraform;

pub use builder::{BuildResult, NetworkTopologyBuilder};
pub use config::{NetworkDeclaration, StackConfig};
pub use engine::{ResourceEngine, ResourceGraph};
pub use error::{VpcError, VpcResult};
pub use models::{NetworkSpec, PeeringSpec, SubnetSpec, TgwSpec};
pub use provider::IacProvider;
pub use resource::{Handle, Resource, ResourceKind, ResourceProps, RouteTarget, Value, DEFAULT_ROUTE_CIDR};
pub use stack::{NetworkSummary, Stack, SynthesizedNetwork};
pub use synth::Synthesizer;
pub use template::CloudFormationTemplate;
pub use terraform::TerraformRenderer;
