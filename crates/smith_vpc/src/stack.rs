//! Stack assembly: every network of a config built into one resource graph.

use std::ops::Range;

use serde::Serialize;
use tracing::info;

use crate::builder::{BuildResult, NetworkTopologyBuilder};
use crate::config::StackConfig;
use crate::engine::ResourceGraph;
use crate::error::{VpcError, VpcResult};
use crate::resource::{Resource, ResourceKind, ResourceProps, DEFAULT_ROUTE_CIDR};

/// One built network and the slice of the graph it declared.
#[derive(Debug, Clone)]
pub struct SynthesizedNetwork {
    pub id: String,
    pub result: BuildResult,
    span: Range<usize>,
}

/// Resource counts for one network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub resources: usize,
    pub subnets: usize,
    pub route_tables: usize,
    pub nat_gateways: usize,
    pub default_routes: usize,
    pub routes: usize,
}

/// A stack whose networks have been declared.
#[derive(Debug)]
pub struct Stack {
    pub name: String,
    pub region: String,
    pub graph: ResourceGraph,
    /// Built networks in config order.
    pub networks: Vec<SynthesizedNetwork>,
}

impl Stack {
    /// Build every network of `config` in order.
    ///
    /// A network may peer with one declared earlier by using its id as the
    /// peer network id.
    pub fn synth(config: &StackConfig) -> VpcResult<Self> {
        if let Some(duplicate) = config.duplicate_ids().first() {
            return Err(VpcError::DuplicateResource(duplicate.to_string()));
        }
        Self::check_peer_order(config)?;

        info!(
            "Synthesizing stack {} with {} networks",
            config.name,
            config.networks.len()
        );

        let mut graph = ResourceGraph::new();
        let mut networks = Vec::with_capacity(config.networks.len());
        for declaration in &config.networks {
            let start = graph.len();
            let result =
                NetworkTopologyBuilder::new(&declaration.id).build(&mut graph, &declaration.spec)?;
            networks.push(SynthesizedNetwork {
                id: declaration.id.clone(),
                result,
                span: start..graph.len(),
            });
        }

        Ok(Self {
            name: config.name.clone(),
            region: config.region.clone(),
            graph,
            networks,
        })
    }

    /// A peer named by sibling id must be built first, otherwise it would be
    /// emitted as a literal provider id.
    fn check_peer_order(config: &StackConfig) -> VpcResult<()> {
        for (position, declaration) in config.networks.iter().enumerate() {
            let Some(peering) = &declaration.spec.peering else {
                continue;
            };
            let declared_later = config.networks[position + 1..]
                .iter()
                .any(|n| n.id == peering.peer_network_id);
            if declared_later {
                return Err(VpcError::Validation(format!(
                    "Network {} peers with {}, which is declared later in the stack",
                    declaration.id, peering.peer_network_id
                )));
            }
        }
        Ok(())
    }

    pub fn network(&self, id: &str) -> Option<&BuildResult> {
        self.networks
            .iter()
            .find(|n| n.id == id)
            .map(|n| &n.result)
    }

    /// Resources declared by one network, in declaration order.
    pub fn resources_of(&self, id: &str) -> &[Resource] {
        match self.networks.iter().find(|n| n.id == id) {
            Some(network) => &self.graph.resources()[network.span.clone()],
            None => &[],
        }
    }

    pub fn summary(&self, id: &str) -> NetworkSummary {
        let resources = self.resources_of(id);
        let count = |kind: ResourceKind| resources.iter().filter(|r| r.kind() == kind).count();

        NetworkSummary {
            resources: resources.len(),
            subnets: count(ResourceKind::Subnet),
            route_tables: count(ResourceKind::RouteTable),
            nat_gateways: count(ResourceKind::NatGateway),
            default_routes: resources
                .iter()
                .filter(|r| {
                    matches!(&r.props, ResourceProps::Route { destination_cidr_block, .. }
                        if destination_cidr_block == DEFAULT_ROUTE_CIDR)
                })
                .count(),
            routes: count(ResourceKind::Route),
        }
    }
}
