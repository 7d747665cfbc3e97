//! Resource engine abstraction and the in-memory resource graph.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{VpcError, VpcResult};
use crate::resource::{Handle, Resource, ResourceKind, ResourceProps, RouteTarget, Value};

/// Capabilities the topology builder needs from a declarative engine.
#[cfg_attr(test, mockall::automock)]
pub trait ResourceEngine {
    /// Declare a resource and receive a handle to it.
    fn declare(&mut self, logical_id: &str, props: ResourceProps) -> VpcResult<Handle>;

    /// Publish a handle under a name so later constructs can find it.
    fn export(&mut self, name: &str, handle: &Handle);

    /// Resolve an identifier to a value usable in resource properties.
    ///
    /// Exported names resolve to a reference, anything else is taken as a
    /// literal provider identifier.
    fn resolve(&self, identifier: &str) -> Value;
}

/// Ordered, in-memory resource graph.
///
/// Declarations must come parent-first: a resource may only reference
/// resources that were declared before it.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    resources: Vec<Resource>,
    index: HashMap<String, usize>,
    exports: HashMap<String, Handle>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// All resources in declaration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, logical_id: &str) -> Option<&Resource> {
        self.index.get(logical_id).map(|&i| &self.resources[i])
    }

    pub fn of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.kind() == kind)
    }

    pub fn count(&self, kind: ResourceKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Routes declared in the given route table, in declaration order.
    pub fn routes_in<'a>(
        &'a self,
        route_table: &'a Handle,
    ) -> impl Iterator<Item = (&'a str, &'a RouteTarget)> + 'a {
        self.resources.iter().filter_map(move |r| match &r.props {
            ResourceProps::Route {
                route_table_id,
                destination_cidr_block,
                target,
            } if route_table_id.target() == Some(route_table.logical_id()) => {
                Some((destination_cidr_block.as_str(), target))
            }
            _ => None,
        })
    }

    pub fn exported(&self, name: &str) -> Option<&Handle> {
        self.exports.get(name)
    }
}

impl ResourceEngine for ResourceGraph {
    fn declare(&mut self, logical_id: &str, props: ResourceProps) -> VpcResult<Handle> {
        if self.index.contains_key(logical_id) {
            return Err(VpcError::DuplicateResource(logical_id.to_string()));
        }

        if let Some(missing) = props
            .dependencies()
            .into_iter()
            .find(|dep| !self.index.contains_key(*dep))
        {
            return Err(VpcError::DanglingReference {
                resource: logical_id.to_string(),
                target: missing.to_string(),
            });
        }

        let resource = Resource {
            logical_id: logical_id.to_string(),
            props,
        };
        let handle = resource.handle();
        debug!("Declared {} {}", handle.kind(), logical_id);

        self.index.insert(logical_id.to_string(), self.resources.len());
        self.resources.push(resource);
        Ok(handle)
    }

    fn export(&mut self, name: &str, handle: &Handle) {
        self.exports.insert(name.to_string(), handle.clone());
    }

    fn resolve(&self, identifier: &str) -> Value {
        match self.exports.get(identifier) {
            Some(handle) => handle.reference(),
            None => {
                if !identifier.starts_with("vpc-") {
                    warn!(
                        "{} is neither a declared network nor a provider VPC id; using it literally",
                        identifier
                    );
                }
                Value::literal(identifier)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpc_props() -> ResourceProps {
        ResourceProps::Vpc {
            cidr_block: "10.0.0.0/16".into(),
            enable_dns_hostnames: true,
            enable_dns_support: true,
        }
    }

    #[test]
    fn test_declare_keeps_order() {
        let mut graph = ResourceGraph::new();
        let vpc = graph.declare("Vpc", vpc_props()).unwrap();
        graph
            .declare("Rt", ResourceProps::RouteTable { vpc_id: vpc.reference() })
            .unwrap();

        let ids: Vec<_> = graph.resources().iter().map(|r| r.logical_id.as_str()).collect();
        assert_eq!(ids, vec!["Vpc", "Rt"]);
        assert_eq!(graph.count(ResourceKind::RouteTable), 1);
    }

    #[test]
    fn test_duplicate_logical_id_rejected() {
        let mut graph = ResourceGraph::new();
        graph.declare("Vpc", vpc_props()).unwrap();
        let err = graph.declare("Vpc", vpc_props()).unwrap_err();
        assert!(matches!(err, VpcError::DuplicateResource(id) if id == "Vpc"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_reference_to_undeclared_resource_rejected() {
        let mut graph = ResourceGraph::new();
        let err = graph
            .declare(
                "Rt",
                ResourceProps::RouteTable {
                    vpc_id: Value::Ref("Missing".into()),
                },
            )
            .unwrap_err();

        assert!(matches!(err, VpcError::DanglingReference { target, .. } if target == "Missing"));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_resolve_prefers_exports() {
        let mut graph = ResourceGraph::new();
        let vpc = graph.declare("VpcBCustomVpc", vpc_props()).unwrap();
        graph.export("VpcB", &vpc);

        assert_eq!(graph.resolve("VpcB"), Value::Ref("VpcBCustomVpc".into()));
        assert_eq!(graph.resolve("vpc-12345"), Value::literal("vpc-12345"));
    }
}
