//! Network configuration models.

use serde::{Deserialize, Serialize};

use crate::error::{VpcError, VpcResult};

fn default_true() -> bool {
    true
}

/// A single subnet definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSpec {
    /// CIDR block for the subnet
    pub cidr: String,
    /// Availability zone the subnet lives in
    pub availability_zone: String,
}

impl SubnetSpec {
    pub fn new(cidr: impl Into<String>, availability_zone: impl Into<String>) -> Self {
        Self {
            cidr: cidr.into(),
            availability_zone: availability_zone.into(),
        }
    }
}

/// Peering with an existing network in the same account and region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeeringSpec {
    #[serde(alias = "peerVpcId")]
    pub peer_network_id: String,
    pub peer_cidr: String,
}

impl PeeringSpec {
    pub fn new(peer_network_id: impl Into<String>, peer_cidr: impl Into<String>) -> Self {
        Self {
            peer_network_id: peer_network_id.into(),
            peer_cidr: peer_cidr.into(),
        }
    }
}

/// Attachment to an existing Transit Gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TgwSpec {
    #[serde(alias = "tgwId")]
    pub transit_gateway_id: String,
    /// CIDRs of the other networks reachable through the gateway.
    #[serde(default, alias = "spokeVpcCidrs")]
    pub spoke_cidrs: Vec<String>,
}

impl TgwSpec {
    pub fn new<I, S>(transit_gateway_id: impl Into<String>, spoke_cidrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            transit_gateway_id: transit_gateway_id.into(),
            spoke_cidrs: spoke_cidrs.into_iter().map(Into::into).collect(),
        }
    }
}

/// Declarative description of one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub public_subnets: Vec<SubnetSpec>,
    #[serde(default)]
    pub private_subnets: Vec<SubnetSpec>,
    #[serde(default = "default_true")]
    pub enable_dns_hostnames: bool,
    #[serde(default = "default_true")]
    pub enable_dns_support: bool,
    #[serde(default, alias = "vpcPeering", skip_serializing_if = "Option::is_none")]
    pub peering: Option<PeeringSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transit_gateway: Option<TgwSpec>,
}

impl NetworkSpec {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr: cidr.into(),
            public_subnets: Vec::new(),
            private_subnets: Vec::new(),
            enable_dns_hostnames: true,
            enable_dns_support: true,
            peering: None,
            transit_gateway: None,
        }
    }

    pub fn with_public_subnet(mut self, cidr: impl Into<String>, az: impl Into<String>) -> Self {
        self.public_subnets.push(SubnetSpec::new(cidr, az));
        self
    }

    pub fn with_private_subnet(mut self, cidr: impl Into<String>, az: impl Into<String>) -> Self {
        self.private_subnets.push(SubnetSpec::new(cidr, az));
        self
    }

    pub fn with_dns(mut self, hostnames: bool, support: bool) -> Self {
        self.enable_dns_hostnames = hostnames;
        self.enable_dns_support = support;
        self
    }

    pub fn with_peering(mut self, peering: PeeringSpec) -> Self {
        self.peering = Some(peering);
        self
    }

    pub fn with_transit_gateway(mut self, tgw: TgwSpec) -> Self {
        self.transit_gateway = Some(tgw);
        self
    }

    pub fn has_public_subnets(&self) -> bool {
        !self.public_subnets.is_empty()
    }

    /// Check the construction invariants.
    ///
    /// Only presence is checked here. CIDR syntax, overlap between subnets and
    /// containment in the network range are left to the provider.
    pub fn validate(&self) -> VpcResult<()> {
        if self.cidr.trim().is_empty() {
            return Err(VpcError::Validation(
                "CIDR block must be specified".to_string(),
            ));
        }

        if self.public_subnets.is_empty() && self.private_subnets.is_empty() {
            return Err(VpcError::Validation(
                "At least one public or private subnet must be specified".to_string(),
            ));
        }

        Ok(())
    }
}
