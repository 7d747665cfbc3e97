//! Resource declarations produced by the topology builder.
//!
//! Resources reference each other through [`Value::Ref`] and [`Value::Attr`],
//! which are resolved to provider identifiers only when a template is
//! synthesized.

use serde::{Deserialize, Serialize};

/// Destination of the default route.
pub const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// A property value: either a literal or a reference to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Literal(String),
    /// Primary identifier of a declared resource.
    Ref(String),
    /// Named attribute of a declared resource.
    Attr { id: String, attribute: String },
}

impl Value {
    pub fn literal(value: impl Into<String>) -> Self {
        Value::Literal(value.into())
    }

    /// Logical id this value points at, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Value::Literal(_) => None,
            Value::Ref(id) | Value::Attr { id, .. } => Some(id),
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Value::Literal(s) => Some(s),
            _ => None,
        }
    }
}

/// Kinds of resources the builder can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vpc,
    InternetGateway,
    VpcGatewayAttachment,
    RouteTable,
    Route,
    Subnet,
    SubnetRouteTableAssociation,
    Eip,
    NatGateway,
    VpcPeeringConnection,
    TransitGatewayAttachment,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::InternetGateway => "internet_gateway",
            ResourceKind::VpcGatewayAttachment => "vpc_gateway_attachment",
            ResourceKind::RouteTable => "route_table",
            ResourceKind::Route => "route",
            ResourceKind::Subnet => "subnet",
            ResourceKind::SubnetRouteTableAssociation => "subnet_route_table_association",
            ResourceKind::Eip => "eip",
            ResourceKind::NatGateway => "nat_gateway",
            ResourceKind::VpcPeeringConnection => "vpc_peering_connection",
            ResourceKind::TransitGatewayAttachment => "transit_gateway_attachment",
        }
    }

    /// CloudFormation resource type.
    pub fn cfn_type(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "AWS::EC2::VPC",
            ResourceKind::InternetGateway => "AWS::EC2::InternetGateway",
            ResourceKind::VpcGatewayAttachment => "AWS::EC2::VPCGatewayAttachment",
            ResourceKind::RouteTable => "AWS::EC2::RouteTable",
            ResourceKind::Route => "AWS::EC2::Route",
            ResourceKind::Subnet => "AWS::EC2::Subnet",
            ResourceKind::SubnetRouteTableAssociation => "AWS::EC2::SubnetRouteTableAssociation",
            ResourceKind::Eip => "AWS::EC2::EIP",
            ResourceKind::NatGateway => "AWS::EC2::NatGateway",
            ResourceKind::VpcPeeringConnection => "AWS::EC2::VPCPeeringConnection",
            ResourceKind::TransitGatewayAttachment => "AWS::EC2::TransitGatewayAttachment",
        }
    }

    /// Terraform AWS provider resource type.
    pub fn tf_type(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "aws_vpc",
            ResourceKind::InternetGateway => "aws_internet_gateway",
            ResourceKind::VpcGatewayAttachment => "aws_internet_gateway_attachment",
            ResourceKind::RouteTable => "aws_route_table",
            ResourceKind::Route => "aws_route",
            ResourceKind::Subnet => "aws_subnet",
            ResourceKind::SubnetRouteTableAssociation => "aws_route_table_association",
            ResourceKind::Eip => "aws_eip",
            ResourceKind::NatGateway => "aws_nat_gateway",
            ResourceKind::VpcPeeringConnection => "aws_vpc_peering_connection",
            ResourceKind::TransitGatewayAttachment => "aws_ec2_transit_gateway_vpc_attachment",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a route sends its traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    InternetGateway(Value),
    NatGateway(Value),
    PeeringConnection(Value),
    TransitGateway(Value),
}

impl RouteTarget {
    pub fn value(&self) -> &Value {
        match self {
            RouteTarget::InternetGateway(v)
            | RouteTarget::NatGateway(v)
            | RouteTarget::PeeringConnection(v)
            | RouteTarget::TransitGateway(v) => v,
        }
    }
}

/// Typed properties for each resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceProps {
    Vpc {
        cidr_block: String,
        enable_dns_hostnames: bool,
        enable_dns_support: bool,
    },
    InternetGateway,
    VpcGatewayAttachment {
        vpc_id: Value,
        internet_gateway_id: Value,
    },
    RouteTable {
        vpc_id: Value,
    },
    Route {
        route_table_id: Value,
        destination_cidr_block: String,
        target: RouteTarget,
    },
    Subnet {
        vpc_id: Value,
        cidr_block: String,
        availability_zone: String,
        map_public_ip_on_launch: bool,
    },
    SubnetRouteTableAssociation {
        route_table_id: Value,
        subnet_id: Value,
    },
    Eip,
    NatGateway {
        subnet_id: Value,
        allocation_id: Value,
    },
    VpcPeeringConnection {
        vpc_id: Value,
        peer_vpc_id: Value,
    },
    TransitGatewayAttachment {
        transit_gateway_id: Value,
        vpc_id: Value,
        subnet_ids: Vec<Value>,
    },
}

impl ResourceProps {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceProps::Vpc { .. } => ResourceKind::Vpc,
            ResourceProps::InternetGateway => ResourceKind::InternetGateway,
            ResourceProps::VpcGatewayAttachment { .. } => ResourceKind::VpcGatewayAttachment,
            ResourceProps::RouteTable { .. } => ResourceKind::RouteTable,
            ResourceProps::Route { .. } => ResourceKind::Route,
            ResourceProps::Subnet { .. } => ResourceKind::Subnet,
            ResourceProps::SubnetRouteTableAssociation { .. } => {
                ResourceKind::SubnetRouteTableAssociation
            }
            ResourceProps::Eip => ResourceKind::Eip,
            ResourceProps::NatGateway { .. } => ResourceKind::NatGateway,
            ResourceProps::VpcPeeringConnection { .. } => ResourceKind::VpcPeeringConnection,
            ResourceProps::TransitGatewayAttachment { .. } => {
                ResourceKind::TransitGatewayAttachment
            }
        }
    }

    /// Every value held by these properties, in field order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            ResourceProps::Vpc { .. } | ResourceProps::InternetGateway | ResourceProps::Eip => {
                Vec::new()
            }
            ResourceProps::VpcGatewayAttachment {
                vpc_id,
                internet_gateway_id,
            } => vec![vpc_id, internet_gateway_id],
            ResourceProps::RouteTable { vpc_id } => vec![vpc_id],
            ResourceProps::Route {
                route_table_id,
                target,
                ..
            } => vec![route_table_id, target.value()],
            ResourceProps::Subnet { vpc_id, .. } => vec![vpc_id],
            ResourceProps::SubnetRouteTableAssociation {
                route_table_id,
                subnet_id,
            } => vec![route_table_id, subnet_id],
            ResourceProps::NatGateway {
                subnet_id,
                allocation_id,
            } => vec![subnet_id, allocation_id],
            ResourceProps::VpcPeeringConnection {
                vpc_id,
                peer_vpc_id,
            } => vec![vpc_id, peer_vpc_id],
            ResourceProps::TransitGatewayAttachment {
                transit_gateway_id,
                vpc_id,
                subnet_ids,
            } => {
                let mut values = vec![transit_gateway_id, vpc_id];
                values.extend(subnet_ids.iter());
                values
            }
        }
    }

    /// Logical ids of the resources these properties depend on.
    pub fn dependencies(&self) -> Vec<&str> {
        self.values().into_iter().filter_map(Value::target).collect()
    }
}

/// Handle to a declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle {
    logical_id: String,
    kind: ResourceKind,
}

impl Handle {
    pub fn new(logical_id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind,
        }
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Reference to the resource's primary identifier.
    pub fn reference(&self) -> Value {
        Value::Ref(self.logical_id.clone())
    }

    /// Reference to one of the resource's attributes.
    pub fn attr(&self, attribute: impl Into<String>) -> Value {
        Value::Attr {
            id: self.logical_id.clone(),
            attribute: attribute.into(),
        }
    }
}

/// A declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub logical_id: String,
    pub props: ResourceProps,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.props.kind()
    }

    pub fn handle(&self) -> Handle {
        Handle::new(self.logical_id.clone(), self.kind())
    }
}
