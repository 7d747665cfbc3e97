//! CloudFormation template rendering.

use serde_json::{json, Map, Value as JsonValue};

use crate::builder::BuildResult;
use crate::error::VpcResult;
use crate::resource::{Handle, Resource, ResourceProps, RouteTarget, Value};
use crate::stack::Stack;

/// Renders a synthesized stack as a CloudFormation template.
pub struct CloudFormationTemplate;

impl CloudFormationTemplate {
    /// Build the template document.
    pub fn render(stack: &Stack) -> JsonValue {
        let mut resources = Map::new();
        for resource in stack.graph.resources() {
            resources.insert(resource.logical_id.clone(), Self::resource(resource));
        }

        let mut outputs = Map::new();
        for network in &stack.networks {
            Self::network_outputs(&mut outputs, &network.id, &network.result);
        }

        let mut template = Map::new();
        template.insert("AWSTemplateFormatVersion".into(), json!("2010-09-09"));
        template.insert(
            "Description".into(),
            json!(format!("Network stack {}", stack.name)),
        );
        template.insert("Resources".into(), JsonValue::Object(resources));
        if !outputs.is_empty() {
            template.insert("Outputs".into(), JsonValue::Object(outputs));
        }
        JsonValue::Object(template)
    }

    pub fn to_json(stack: &Stack) -> VpcResult<String> {
        Ok(serde_json::to_string_pretty(&Self::render(stack))?)
    }

    pub fn to_yaml(stack: &Stack) -> VpcResult<String> {
        Ok(serde_yaml::to_string(&Self::render(stack))?)
    }

    fn value(value: &Value) -> JsonValue {
        match value {
            Value::Literal(s) => json!(s),
            Value::Ref(id) => json!({ "Ref": id }),
            Value::Attr { id, attribute } => json!({ "Fn::GetAtt": [id, attribute] }),
        }
    }

    fn resource(resource: &Resource) -> JsonValue {
        let properties = match &resource.props {
            ResourceProps::Vpc {
                cidr_block,
                enable_dns_hostnames,
                enable_dns_support,
            } => Some(json!({
                "CidrBlock": cidr_block,
                "EnableDnsHostnames": enable_dns_hostnames,
                "EnableDnsSupport": enable_dns_support,
            })),
            ResourceProps::InternetGateway => None,
            ResourceProps::VpcGatewayAttachment {
                vpc_id,
                internet_gateway_id,
            } => Some(json!({
                "VpcId": Self::value(vpc_id),
                "InternetGatewayId": Self::value(internet_gateway_id),
            })),
            ResourceProps::RouteTable { vpc_id } => Some(json!({ "VpcId": Self::value(vpc_id) })),
            ResourceProps::Route {
                route_table_id,
                destination_cidr_block,
                target,
            } => {
                let (key, target_value) = match target {
                    RouteTarget::InternetGateway(v) => ("GatewayId", v),
                    RouteTarget::NatGateway(v) => ("NatGatewayId", v),
                    RouteTarget::PeeringConnection(v) => ("VpcPeeringConnectionId", v),
                    RouteTarget::TransitGateway(v) => ("TransitGatewayId", v),
                };
                let mut props = Map::new();
                props.insert("RouteTableId".into(), Self::value(route_table_id));
                props.insert("DestinationCidrBlock".into(), json!(destination_cidr_block));
                props.insert(key.into(), Self::value(target_value));
                Some(JsonValue::Object(props))
            }
            ResourceProps::Subnet {
                vpc_id,
                cidr_block,
                availability_zone,
                map_public_ip_on_launch,
            } => Some(json!({
                "VpcId": Self::value(vpc_id),
                "CidrBlock": cidr_block,
                "AvailabilityZone": availability_zone,
                "MapPublicIpOnLaunch": map_public_ip_on_launch,
            })),
            ResourceProps::SubnetRouteTableAssociation {
                route_table_id,
                subnet_id,
            } => Some(json!({
                "RouteTableId": Self::value(route_table_id),
                "SubnetId": Self::value(subnet_id),
            })),
            ResourceProps::Eip => Some(json!({ "Domain": "vpc" })),
            ResourceProps::NatGateway {
                subnet_id,
                allocation_id,
            } => Some(json!({
                "SubnetId": Self::value(subnet_id),
                "AllocationId": Self::value(allocation_id),
            })),
            ResourceProps::VpcPeeringConnection {
                vpc_id,
                peer_vpc_id,
            } => Some(json!({
                "VpcId": Self::value(vpc_id),
                "PeerVpcId": Self::value(peer_vpc_id),
            })),
            ResourceProps::TransitGatewayAttachment {
                transit_gateway_id,
                vpc_id,
                subnet_ids,
            } => Some(json!({
                "TransitGatewayId": Self::value(transit_gateway_id),
                "VpcId": Self::value(vpc_id),
                "SubnetIds": subnet_ids.iter().map(Self::value).collect::<Vec<_>>(),
            })),
        };

        let mut body = Map::new();
        body.insert("Type".into(), json!(resource.kind().cfn_type()));
        if let Some(properties) = properties {
            body.insert("Properties".into(), properties);
        }
        JsonValue::Object(body)
    }

    fn network_outputs(outputs: &mut Map<String, JsonValue>, id: &str, result: &BuildResult) {
        let prefix: String = id.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

        outputs.insert(
            format!("{prefix}VpcId"),
            json!({
                "Description": format!("VPC id of {id}"),
                "Value": Self::value(&result.network.reference()),
            }),
        );

        let lists: [(&str, &str, &[Handle]); 2] = [
            ("PublicSubnetIds", "Public subnet ids", &result.public_subnets),
            (
                "PrivateRouteTableIds",
                "Private route table ids",
                &result.private_route_tables,
            ),
        ];
        for (suffix, description, handles) in lists {
            if handles.is_empty() {
                continue;
            }
            let refs: Vec<_> = handles.iter().map(|h| Self::value(&h.reference())).collect();
            outputs.insert(
                format!("{prefix}{suffix}"),
                json!({
                    "Description": format!("{description} of {id}"),
                    "Value": { "Fn::Join": [",", refs] },
                }),
            );
        }
    }
}
