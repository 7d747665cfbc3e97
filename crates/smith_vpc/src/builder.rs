//! Network topology assembly.
//!
//! Turns a [`NetworkSpec`] into gateway, subnet, route table, route and
//! association declarations on a [`ResourceEngine`]. Declaration order is
//! fixed: NAT placement and the single public default route depend on subnet
//! indices.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::ResourceEngine;
use crate::error::VpcResult;
use crate::models::NetworkSpec;
use crate::resource::{Handle, ResourceProps, RouteTarget, Value, DEFAULT_ROUTE_CIDR};

/// Handles exposed to sibling constructs after a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub network: Handle,
    pub public_subnets: Vec<Handle>,
    pub private_route_tables: Vec<Handle>,
}

/// Builds one network under a construct id.
///
/// The construct id prefixes every logical id, so several networks can share
/// one engine.
pub struct NetworkTopologyBuilder {
    construct_id: String,
}

impl NetworkTopologyBuilder {
    pub fn new(construct_id: impl Into<String>) -> Self {
        Self {
            construct_id: construct_id.into(),
        }
    }

    pub fn construct_id(&self) -> &str {
        &self.construct_id
    }

    /// Logical id for a named resource inside this construct.
    pub fn logical_id(&self, name: &str) -> String {
        format!("{}{}", self.construct_id, name)
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    /// Declare every resource for `spec` on `engine`.
    ///
    /// Validation runs before the first declaration, so a rejected spec leaves
    /// the engine untouched.
    pub fn build<E>(&self, engine: &mut E, spec: &NetworkSpec) -> VpcResult<BuildResult>
    where
        E: ResourceEngine + ?Sized,
    {
        spec.validate()?;

        info!(
            "Building network {} ({}) with {} public and {} private subnets",
            self.construct_id,
            spec.cidr,
            spec.public_subnets.len(),
            spec.private_subnets.len()
        );

        let vpc = engine.declare(
            &self.logical_id("CustomVpc"),
            ResourceProps::Vpc {
                cidr_block: spec.cidr.clone(),
                enable_dns_hostnames: spec.enable_dns_hostnames,
                enable_dns_support: spec.enable_dns_support,
            },
        )?;
        engine.export(&self.construct_id, &vpc);

        let public_route_table = if spec.has_public_subnets() {
            let igw = engine.declare(
                &self.logical_id("InternetGateway"),
                ResourceProps::InternetGateway,
            )?;
            engine.declare(
                &self.logical_id("IGWAttachment"),
                ResourceProps::VpcGatewayAttachment {
                    vpc_id: vpc.reference(),
                    internet_gateway_id: igw.reference(),
                },
            )?;
            let route_table = engine.declare(
                &self.logical_id("PublicRouteTable"),
                ResourceProps::RouteTable {
                    vpc_id: vpc.reference(),
                },
            )?;
            Some((igw, route_table))
        } else {
            None
        };

        let mut public_subnets = Vec::with_capacity(spec.public_subnets.len());
        if let Some((igw, route_table)) = &public_route_table {
            for (index, subnet) in spec.public_subnets.iter().enumerate() {
                let n = index + 1;
                let handle = engine.declare(
                    &self.logical_id(&format!("PublicSubnet-{n}")),
                    ResourceProps::Subnet {
                        vpc_id: vpc.reference(),
                        cidr_block: subnet.cidr.clone(),
                        availability_zone: subnet.availability_zone.clone(),
                        map_public_ip_on_launch: true,
                    },
                )?;

                // One default route covers every subnet sharing the table.
                if index == 0 {
                    engine.declare(
                        &self.logical_id("PublicRoute"),
                        ResourceProps::Route {
                            route_table_id: route_table.reference(),
                            destination_cidr_block: DEFAULT_ROUTE_CIDR.to_string(),
                            target: RouteTarget::InternetGateway(igw.reference()),
                        },
                    )?;
                }

                engine.declare(
                    &self.logical_id(&format!("PublicSubnetRouteTableAssoc-{n}")),
                    ResourceProps::SubnetRouteTableAssociation {
                        route_table_id: route_table.reference(),
                        subnet_id: handle.reference(),
                    },
                )?;

                public_subnets.push(handle);
            }
        }

        let mut private_route_tables = Vec::with_capacity(spec.private_subnets.len());
        for (index, subnet) in spec.private_subnets.iter().enumerate() {
            let n = index + 1;
            let handle = engine.declare(
                &self.logical_id(&format!("PrivateSubnet-{n}")),
                ResourceProps::Subnet {
                    vpc_id: vpc.reference(),
                    cidr_block: subnet.cidr.clone(),
                    availability_zone: subnet.availability_zone.clone(),
                    map_public_ip_on_launch: false,
                },
            )?;

            let route_table = engine.declare(
                &self.logical_id(&format!("PrivateRouteTable-{n}")),
                ResourceProps::RouteTable {
                    vpc_id: vpc.reference(),
                },
            )?;

            if !public_subnets.is_empty() {
                let host = &public_subnets[index % public_subnets.len()];
                let eip = engine.declare(&self.logical_id(&format!("EIP-{n}")), ResourceProps::Eip)?;
                let nat = engine.declare(
                    &self.logical_id(&format!("NatGateway-{n}")),
                    ResourceProps::NatGateway {
                        subnet_id: host.reference(),
                        allocation_id: eip.attr("AllocationId"),
                    },
                )?;
                engine.declare(
                    &self.logical_id(&format!("PrivateRoute-{n}")),
                    ResourceProps::Route {
                        route_table_id: route_table.reference(),
                        destination_cidr_block: DEFAULT_ROUTE_CIDR.to_string(),
                        target: RouteTarget::NatGateway(nat.reference()),
                    },
                )?;
            }

            engine.declare(
                &self.logical_id(&format!("PrivateSubnetRouteTableAssoc-{n}")),
                ResourceProps::SubnetRouteTableAssociation {
                    route_table_id: route_table.reference(),
                    subnet_id: handle.reference(),
                },
            )?;

            private_route_tables.push(route_table);
        }

        // Public table first, then private tables in creation order.
        let all_route_tables: Vec<&Handle> = public_route_table
            .iter()
            .map(|(_, rt)| rt)
            .chain(private_route_tables.iter())
            .collect();

        if let Some(peering) = &spec.peering {
            let peer_vpc_id = engine.resolve(&peering.peer_network_id);
            let connection = engine.declare(
                &self.logical_id("VpcPeeringConnection"),
                ResourceProps::VpcPeeringConnection {
                    vpc_id: vpc.reference(),
                    peer_vpc_id,
                },
            )?;

            for (index, route_table) in all_route_tables.iter().enumerate() {
                engine.declare(
                    &self.logical_id(&format!("PeeringRoute-{}", index + 1)),
                    ResourceProps::Route {
                        route_table_id: route_table.reference(),
                        destination_cidr_block: peering.peer_cidr.clone(),
                        target: RouteTarget::PeeringConnection(connection.reference()),
                    },
                )?;
            }
        }

        if let Some(tgw) = &spec.transit_gateway {
            if public_subnets.is_empty() {
                warn!(
                    "Network {} attaches to transit gateway {} without public subnets; the attachment has no subnets",
                    self.construct_id, tgw.transit_gateway_id
                );
            }

            let gateway = Value::literal(&tgw.transit_gateway_id);
            engine.declare(
                &self.logical_id("TransitGatewayAttachment"),
                ResourceProps::TransitGatewayAttachment {
                    transit_gateway_id: gateway.clone(),
                    vpc_id: vpc.reference(),
                    subnet_ids: public_subnets.iter().map(Handle::reference).collect(),
                },
            )?;

            // The `x` separator survives sanitizing, so table 1 spoke 11 and
            // table 11 spoke 1 get distinct ids.
            for (index, route_table) in all_route_tables.iter().enumerate() {
                for (route_index, spoke_cidr) in tgw.spoke_cidrs.iter().enumerate() {
                    engine.declare(
                        &self.logical_id(&format!(
                            "TransitGatewayRoute-{}x{}",
                            index + 1,
                            route_index + 1
                        )),
                        ResourceProps::Route {
                            route_table_id: route_table.reference(),
                            destination_cidr_block: spoke_cidr.clone(),
                            target: RouteTarget::TransitGateway(gateway.clone()),
                        },
                    )?;
                }
            }
        }

        Ok(BuildResult {
            network: vpc,
            public_subnets,
            private_route_tables,
        })
    }
}
