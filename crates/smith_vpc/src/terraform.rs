//! Terraform (HCL) rendering.

use crate::builder::BuildResult;
use crate::engine::ResourceGraph;
use crate::resource::{Handle, Resource, ResourceProps, RouteTarget, Value};
use crate::stack::Stack;

/// Convert a logical id such as `HubVpcPublicSubnet1` to `hub_vpc_public_subnet1`.
pub fn snake_case(logical_id: &str) -> String {
    let mut out = String::with_capacity(logical_id.len() + 8);
    let mut prev_lower = false;
    for c in logical_id.chars().filter(|c| c.is_ascii_alphanumeric()) {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = true;
        }
    }
    out
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Renders a synthesized stack as Terraform configuration files.
pub struct TerraformRenderer<'a> {
    stack: &'a Stack,
}

impl<'a> TerraformRenderer<'a> {
    pub fn new(stack: &'a Stack) -> Self {
        Self { stack }
    }

    fn graph(&self) -> &ResourceGraph {
        &self.stack.graph
    }

    /// Terraform address of a declared resource, e.g. `aws_vpc.hub_vpc_custom_vpc`.
    fn address(&self, logical_id: &str) -> String {
        let tf_type = self
            .graph()
            .get(logical_id)
            .map(|r| r.kind().tf_type())
            .unwrap_or("data");
        format!("{}.{}", tf_type, snake_case(logical_id))
    }

    fn value(&self, value: &Value) -> String {
        match value {
            Value::Literal(s) => quote(s),
            Value::Ref(id) => format!("{}.id", self.address(id)),
            Value::Attr { id, attribute } => {
                format!("{}.{}", self.address(id), snake_case(attribute))
            }
        }
    }

    fn list(&self, values: &[Value]) -> String {
        let items: Vec<_> = values.iter().map(|v| self.value(v)).collect();
        format!("[{}]", items.join(", "))
    }

    /// `versions.tf` contents.
    pub fn versions_tf(&self) -> String {
        r#"# Terraform and provider version constraints

terraform {
  required_version = ">= 1.6.0"

  required_providers {
    aws = {
      source  = "hashicorp/aws"
      version = "~> 5.0"
    }
  }
}
"#
        .to_string()
    }

    /// `provider.tf` contents.
    pub fn provider_tf(&self) -> String {
        format!(
            r#"# Provider configuration

provider "aws" {{
  region = {region}
}}
"#,
            region = quote(&self.stack.region)
        )
    }

    /// `main.tf` contents: one block per declared resource.
    pub fn main_tf(&self) -> String {
        let mut content = format!(
            "# Network resources for stack {}\n# Generated by smith - do not edit manually.\n",
            self.stack.name
        );
        for resource in self.graph().resources() {
            content.push('\n');
            content.push_str(&self.resource_block(resource));
        }
        content
    }

    fn resource_block(&self, resource: &Resource) -> String {
        let attributes: Vec<(&str, String)> = match &resource.props {
            ResourceProps::Vpc {
                cidr_block,
                enable_dns_hostnames,
                enable_dns_support,
            } => vec![
                ("cidr_block", quote(cidr_block)),
                ("enable_dns_hostnames", enable_dns_hostnames.to_string()),
                ("enable_dns_support", enable_dns_support.to_string()),
            ],
            ResourceProps::InternetGateway => Vec::new(),
            ResourceProps::VpcGatewayAttachment {
                vpc_id,
                internet_gateway_id,
            } => vec![
                ("internet_gateway_id", self.value(internet_gateway_id)),
                ("vpc_id", self.value(vpc_id)),
            ],
            ResourceProps::RouteTable { vpc_id } => vec![("vpc_id", self.value(vpc_id))],
            ResourceProps::Route {
                route_table_id,
                destination_cidr_block,
                target,
            } => {
                let target_attr = match target {
                    RouteTarget::InternetGateway(v) => ("gateway_id", self.value(v)),
                    RouteTarget::NatGateway(v) => ("nat_gateway_id", self.value(v)),
                    RouteTarget::PeeringConnection(v) => ("vpc_peering_connection_id", self.value(v)),
                    RouteTarget::TransitGateway(v) => ("transit_gateway_id", self.value(v)),
                };
                vec![
                    ("route_table_id", self.value(route_table_id)),
                    ("destination_cidr_block", quote(destination_cidr_block)),
                    target_attr,
                ]
            }
            ResourceProps::Subnet {
                vpc_id,
                cidr_block,
                availability_zone,
                map_public_ip_on_launch,
            } => vec![
                ("vpc_id", self.value(vpc_id)),
                ("cidr_block", quote(cidr_block)),
                ("availability_zone", quote(availability_zone)),
                ("map_public_ip_on_launch", map_public_ip_on_launch.to_string()),
            ],
            ResourceProps::SubnetRouteTableAssociation {
                route_table_id,
                subnet_id,
            } => vec![
                ("subnet_id", self.value(subnet_id)),
                ("route_table_id", self.value(route_table_id)),
            ],
            ResourceProps::Eip => vec![("domain", quote("vpc"))],
            ResourceProps::NatGateway {
                subnet_id,
                allocation_id,
            } => vec![
                ("allocation_id", self.value(allocation_id)),
                ("subnet_id", self.value(subnet_id)),
            ],
            ResourceProps::VpcPeeringConnection {
                vpc_id,
                peer_vpc_id,
            } => vec![
                ("vpc_id", self.value(vpc_id)),
                ("peer_vpc_id", self.value(peer_vpc_id)),
            ],
            ResourceProps::TransitGatewayAttachment {
                transit_gateway_id,
                vpc_id,
                subnet_ids,
            } => vec![
                ("transit_gateway_id", self.value(transit_gateway_id)),
                ("vpc_id", self.value(vpc_id)),
                ("subnet_ids", self.list(subnet_ids)),
            ],
        };

        let width = attributes.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut block = format!(
            "resource {} {} {{\n",
            quote(resource.kind().tf_type()),
            quote(&snake_case(&resource.logical_id))
        );
        for (key, value) in &attributes {
            block.push_str(&format!("  {key:<width$} = {value}\n"));
        }
        if resource_taggable(&resource.props) {
            if !attributes.is_empty() {
                block.push('\n');
            }
            block.push_str(&format!(
                "  tags = {{\n    Name = {}\n  }}\n",
                quote(&resource.logical_id)
            ));
        }
        block.push_str("}\n");
        block
    }

    /// `outputs.tf` contents exposing each network's handles.
    pub fn outputs_tf(&self) -> String {
        let mut content = String::from("# Network handles for downstream stacks\n");
        for network in &self.stack.networks {
            content.push_str(&self.network_outputs(&network.id, &network.result));
        }
        content
    }

    fn network_outputs(&self, id: &str, result: &BuildResult) -> String {
        let name = snake_case(id);
        let refs = |handles: &[Handle]| {
            let values: Vec<_> = handles.iter().map(Handle::reference).collect();
            self.list(&values)
        };

        format!(
            r#"
output "{name}_vpc_id" {{
  description = "VPC id of {id}"
  value       = {vpc}
}}

output "{name}_public_subnet_ids" {{
  description = "Public subnet ids of {id}"
  value       = {public}
}}

output "{name}_private_route_table_ids" {{
  description = "Private route table ids of {id}"
  value       = {private}
}}
"#,
            vpc = self.value(&result.network.reference()),
            public = refs(result.public_subnets.as_slice()),
            private = refs(result.private_route_tables.as_slice()),
        )
    }

    /// All files as `(file name, contents)` pairs.
    pub fn files(&self) -> Vec<(&'static str, String)> {
        vec![
            ("versions.tf", self.versions_tf()),
            ("provider.tf", self.provider_tf()),
            ("main.tf", self.main_tf()),
            ("outputs.tf", self.outputs_tf()),
        ]
    }
}

fn resource_taggable(props: &ResourceProps) -> bool {
    matches!(
        props,
        ResourceProps::Vpc { .. }
            | ResourceProps::InternetGateway
            | ResourceProps::RouteTable { .. }
            | ResourceProps::Subnet { .. }
            | ResourceProps::Eip
            | ResourceProps::NatGateway { .. }
            | ResourceProps::VpcPeeringConnection { .. }
            | ResourceProps::TransitGatewayAttachment { .. }
    )
}
