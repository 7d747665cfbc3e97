//! Integration tests for network topology assembly.

use std::path::{Path, PathBuf};

use smith_vpc::{
    CloudFormationTemplate, Handle, NetworkSpec, NetworkTopologyBuilder, PeeringSpec,
    ResourceGraph, ResourceKind, ResourceProps, RouteTarget, Stack, StackConfig, TgwSpec, Value,
    DEFAULT_ROUTE_CIDR,
};

fn demo(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn build(id: &str, spec: &NetworkSpec) -> (ResourceGraph, smith_vpc::BuildResult) {
    let mut graph = ResourceGraph::new();
    let result = NetworkTopologyBuilder::new(id).build(&mut graph, spec).unwrap();
    (graph, result)
}

fn routes(graph: &ResourceGraph, table: &Handle) -> Vec<(String, RouteTarget)> {
    graph
        .routes_in(table)
        .map(|(cidr, target)| (cidr.to_string(), target.clone()))
        .collect()
}

fn all_route_tables(graph: &ResourceGraph) -> Vec<Handle> {
    graph.of_kind(ResourceKind::RouteTable).map(|r| r.handle()).collect()
}

fn ha_spec() -> NetworkSpec {
    NetworkSpec::new("192.168.0.0/16")
        .with_public_subnet("192.168.1.0/24", "ap-southeast-2a")
        .with_public_subnet("192.168.2.0/24", "ap-southeast-2b")
        .with_private_subnet("192.168.3.0/24", "ap-southeast-2a")
        .with_private_subnet("192.168.4.0/24", "ap-southeast-2b")
}

/// Basic network: one public, one private subnet.
#[test]
fn test_simple_vpc_with_igw_and_nat() {
    let spec = NetworkSpec::new("10.0.0.0/16")
        .with_public_subnet("10.0.1.0/24", "ap-southeast-2a")
        .with_private_subnet("10.0.2.0/24", "ap-southeast-2a");
    let (graph, result) = build("TestVpc", &spec);

    assert_eq!(graph.count(ResourceKind::Vpc), 1);
    assert_eq!(graph.count(ResourceKind::InternetGateway), 1);
    assert_eq!(graph.count(ResourceKind::VpcGatewayAttachment), 1);
    assert_eq!(graph.count(ResourceKind::RouteTable), 2);
    assert_eq!(graph.count(ResourceKind::NatGateway), 1);
    assert_eq!(graph.count(ResourceKind::Eip), 1);

    let public_table = Handle::new("TestVpcPublicRouteTable", ResourceKind::RouteTable);
    assert_eq!(
        routes(&graph, &public_table),
        vec![(
            DEFAULT_ROUTE_CIDR.to_string(),
            RouteTarget::InternetGateway(Value::Ref("TestVpcInternetGateway".into()))
        )]
    );

    assert_eq!(
        routes(&graph, &result.private_route_tables[0]),
        vec![(
            DEFAULT_ROUTE_CIDR.to_string(),
            RouteTarget::NatGateway(Value::Ref("TestVpcNatGateway1".into()))
        )]
    );

    match &graph.get("TestVpcNatGateway1").unwrap().props {
        ResourceProps::NatGateway { subnet_id, .. } => {
            assert_eq!(subnet_id, &result.public_subnets[0].reference());
        }
        other => panic!("unexpected props {:?}", other),
    }
}

#[test]
fn test_subnet_addressing_flags() {
    let (graph, _) = build("Ha", &ha_spec());

    let flags: Vec<_> = graph
        .of_kind(ResourceKind::Subnet)
        .map(|r| match &r.props {
            ResourceProps::Subnet {
                cidr_block,
                map_public_ip_on_launch,
                ..
            } => (cidr_block.as_str(), *map_public_ip_on_launch),
            _ => unreachable!(),
        })
        .collect();

    assert_eq!(
        flags,
        vec![
            ("192.168.1.0/24", true),
            ("192.168.2.0/24", true),
            ("192.168.3.0/24", false),
            ("192.168.4.0/24", false),
        ]
    );
}

#[test]
fn test_public_route_table_has_single_default_route() {
    let spec = NetworkSpec::new("10.0.0.0/16")
        .with_public_subnet("10.0.1.0/24", "az-a")
        .with_public_subnet("10.0.2.0/24", "az-b")
        .with_public_subnet("10.0.3.0/24", "az-c");
    let (graph, result) = build("Pub", &spec);

    assert_eq!(graph.count(ResourceKind::InternetGateway), 1);
    assert_eq!(graph.count(ResourceKind::RouteTable), 1);
    assert_eq!(graph.count(ResourceKind::SubnetRouteTableAssociation), 3);
    assert_eq!(result.public_subnets.len(), 3);
    assert!(result.private_route_tables.is_empty());

    let tables = all_route_tables(&graph);
    let defaults = routes(&graph, &tables[0])
        .into_iter()
        .filter(|(cidr, _)| cidr == DEFAULT_ROUTE_CIDR)
        .count();
    assert_eq!(defaults, 1);
}

#[test]
fn test_high_availability_nat_per_private_subnet() {
    let (graph, result) = build("HighAvailabilityVpc", &ha_spec());

    assert_eq!(graph.count(ResourceKind::NatGateway), 2);
    assert_eq!(result.private_route_tables.len(), 2);

    for (j, table) in result.private_route_tables.iter().enumerate() {
        let nat_id = format!("HighAvailabilityVpcNatGateway{}", j + 1);
        assert_eq!(
            routes(&graph, table),
            vec![(
                DEFAULT_ROUTE_CIDR.to_string(),
                RouteTarget::NatGateway(Value::Ref(nat_id.clone()))
            )]
        );

        match &graph.get(&nat_id).unwrap().props {
            ResourceProps::NatGateway { subnet_id, .. } => {
                assert_eq!(subnet_id, &result.public_subnets[j % 2].reference());
            }
            other => panic!("unexpected props {:?}", other),
        }
    }
}

#[test]
fn test_private_only_network_is_isolated() {
    let spec = NetworkSpec::new("172.16.0.0/16")
        .with_private_subnet("172.16.1.0/24", "ap-southeast-2a")
        .with_private_subnet("172.16.2.0/24", "ap-southeast-2b");
    let (graph, result) = build("PrivateVpc", &spec);

    assert_eq!(graph.count(ResourceKind::InternetGateway), 0);
    assert_eq!(graph.count(ResourceKind::NatGateway), 0);
    assert_eq!(graph.count(ResourceKind::Eip), 0);
    assert_eq!(graph.count(ResourceKind::Route), 0);
    assert_eq!(graph.count(ResourceKind::RouteTable), 2);
    assert!(result.public_subnets.is_empty());
    assert_eq!(result.private_route_tables.len(), 2);
}

#[test]
fn test_dns_flags_applied_to_vpc() {
    let spec = NetworkSpec::new("10.0.0.0/16")
        .with_private_subnet("10.0.1.0/24", "az-a")
        .with_dns(false, true);
    let (graph, result) = build("Dns", &spec);

    assert_eq!(
        graph.get(result.network.logical_id()).unwrap().props,
        ResourceProps::Vpc {
            cidr_block: "10.0.0.0/16".into(),
            enable_dns_hostnames: false,
            enable_dns_support: true,
        }
    );
}

#[test]
fn test_peering_route_in_every_route_table() {
    let spec = ha_spec().with_peering(PeeringSpec::new("vpc-12345", "10.1.0.0/16"));
    let (graph, _) = build("VpcAWithPeering", &spec);

    assert_eq!(graph.count(ResourceKind::VpcPeeringConnection), 1);
    let connection = Value::Ref("VpcAWithPeeringVpcPeeringConnection".into());

    let tables = all_route_tables(&graph);
    assert_eq!(tables.len(), 3);
    let mut peering_routes = 0;
    for table in &tables {
        let matching: Vec<_> = routes(&graph, table)
            .into_iter()
            .filter(|(cidr, target)| {
                cidr == "10.1.0.0/16"
                    && target == &RouteTarget::PeeringConnection(connection.clone())
            })
            .collect();
        assert_eq!(matching.len(), 1, "table {}", table.logical_id());
        peering_routes += matching.len();
    }
    assert_eq!(peering_routes, tables.len());

    // Public table first, then private tables in creation order.
    let route_ids: Vec<_> = (1..=3)
        .map(|t| format!("VpcAWithPeeringPeeringRoute{t}"))
        .collect();
    let order: Vec<_> = route_ids
        .iter()
        .map(|id| match &graph.get(id).unwrap().props {
            ResourceProps::Route { route_table_id, .. } => route_table_id.clone(),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(
        order,
        vec![
            Value::Ref("VpcAWithPeeringPublicRouteTable".into()),
            Value::Ref("VpcAWithPeeringPrivateRouteTable1".into()),
            Value::Ref("VpcAWithPeeringPrivateRouteTable2".into()),
        ]
    );
}

#[test]
fn test_peering_without_public_subnets_uses_private_tables_only() {
    let spec = NetworkSpec::new("10.0.0.0/16")
        .with_private_subnet("10.0.1.0/24", "az-a")
        .with_peering(PeeringSpec::new("vpc-1", "10.9.0.0/16"));
    let (graph, _) = build("Iso", &spec);

    assert_eq!(graph.count(ResourceKind::RouteTable), 1);
    assert_eq!(graph.count(ResourceKind::Route), 1);
}

#[test]
fn test_transit_gateway_routes_per_spoke_and_table() {
    let spec = ha_spec().with_transit_gateway(TgwSpec::new(
        "tgw-12345678",
        ["10.1.0.0/16", "10.2.0.0/16"],
    ));
    let (graph, result) = build("HubVpc", &spec);

    let attachment = graph.get("HubVpcTransitGatewayAttachment").unwrap();
    match &attachment.props {
        ResourceProps::TransitGatewayAttachment {
            transit_gateway_id,
            vpc_id,
            subnet_ids,
        } => {
            assert_eq!(transit_gateway_id, &Value::literal("tgw-12345678"));
            assert_eq!(vpc_id, &result.network.reference());
            let expected: Vec<_> = result.public_subnets.iter().map(Handle::reference).collect();
            assert_eq!(subnet_ids, &expected);
        }
        other => panic!("unexpected props {:?}", other),
    }

    for table in all_route_tables(&graph) {
        let spokes: Vec<_> = routes(&graph, &table)
            .into_iter()
            .filter(|(_, target)| matches!(target, RouteTarget::TransitGateway(_)))
            .map(|(cidr, _)| cidr)
            .collect();
        assert_eq!(spokes, vec!["10.1.0.0/16", "10.2.0.0/16"]);
    }
    assert!(graph.get("HubVpcTransitGatewayRoute-3x2").is_none());
    assert!(graph.get("HubVpcTransitGatewayRoute3x2").is_some());
}

#[test]
fn test_duplicate_spoke_cidrs_are_not_deduplicated() {
    let spec = NetworkSpec::new("10.0.0.0/16")
        .with_public_subnet("10.0.1.0/24", "az-a")
        .with_transit_gateway(TgwSpec::new("tgw-1", ["10.1.0.0/16", "10.1.0.0/16"]));
    let (graph, _) = build("Dup", &spec);

    let tgw_routes = graph
        .of_kind(ResourceKind::Route)
        .filter(|r| {
            matches!(&r.props, ResourceProps::Route { target: RouteTarget::TransitGateway(_), .. })
        })
        .count();
    assert_eq!(tgw_routes, 2);
}

#[test]
fn test_validation_failure_leaves_graph_empty() {
    let mut graph = ResourceGraph::new();
    let builder = NetworkTopologyBuilder::new("Bad");

    assert!(builder
        .build(&mut graph, &NetworkSpec::new("10.0.0.0/16"))
        .unwrap_err()
        .is_validation());
    assert!(builder
        .build(&mut graph, &NetworkSpec::new("  ").with_public_subnet("10.0.1.0/24", "az-a"))
        .unwrap_err()
        .is_validation());
    assert!(graph.is_empty());
}

#[test]
fn test_two_builds_in_one_graph_do_not_collide() {
    let spec = NetworkSpec::new("10.0.0.0/16").with_private_subnet("10.0.1.0/24", "az-a");
    let mut graph = ResourceGraph::new();

    NetworkTopologyBuilder::new("A").build(&mut graph, &spec).unwrap();
    NetworkTopologyBuilder::new("B").build(&mut graph, &spec).unwrap();
    let err = NetworkTopologyBuilder::new("A").build(&mut graph, &spec).unwrap_err();

    assert!(matches!(err, smith_vpc::VpcError::DuplicateResource(_)));
    assert_eq!(graph.count(ResourceKind::Vpc), 2);
}

#[test]
fn test_demo_stacks_synthesize() {
    for name in [
        "basic-vpc.yaml",
        "high-availability.yaml",
        "private-vpc.yaml",
        "vpc-peering.yaml",
        "transit-gateway.yaml",
    ] {
        let config = StackConfig::from_file(&demo(name)).unwrap();
        let stack = Stack::synth(&config).unwrap();
        assert_eq!(stack.networks.len(), config.networks.len(), "{name}");

        let template = CloudFormationTemplate::render(&stack);
        let resources = template["Resources"].as_object().unwrap();
        assert_eq!(resources.len(), stack.graph.len(), "{name}");
    }
}

#[test]
fn test_demo_peering_references_sibling_network() {
    let config = StackConfig::from_file(&demo("vpc-peering.yaml")).unwrap();
    let stack = Stack::synth(&config).unwrap();

    let template = CloudFormationTemplate::render(&stack);
    let props = &template["Resources"]["VpcAWithPeeringVpcPeeringConnection"]["Properties"];
    assert_eq!(props["PeerVpcId"], serde_json::json!({ "Ref": "VpcBCustomVpc" }));
}

#[test]
fn test_demo_transit_gateway_summary() {
    let config = StackConfig::from_file(&demo("transit-gateway.yaml")).unwrap();
    let stack = Stack::synth(&config).unwrap();

    let hub = stack.summary("HubVpc");
    assert_eq!(hub.route_tables, 3);
    assert_eq!(hub.nat_gateways, 2);
    // 1 IGW default + 2 NAT defaults + 3 tables x 2 spokes
    assert_eq!(hub.routes, 9);

    let spoke = stack.summary("SpokeVpcA");
    assert_eq!(spoke.routes, 2);
}
