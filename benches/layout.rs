use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vpc_topology::builder::build_graph;
use vpc_topology::config::Config;
use vpc_topology::layout::{DagreSolver, LayoutStrategy, compute_layout};
use vpc_topology::model::{Asset, NetworkModel, PortAssets, Protocol, Vpc, VpcConnection};

const REGIONS: [&str; 4] = ["us-east-1", "us-west-1", "eu-central-1", "ap-south-1"];

fn synthetic_network(connections: usize, targets: usize) -> NetworkModel {
    let vpcs = REGIONS
        .iter()
        .enumerate()
        .map(|(i, region)| Vpc {
            vpc_id: format!("vpc-{i}"),
            name: format!("net-{i}"),
            region: region.to_string(),
            account_id: format!("{}", 100 + i % 2),
        })
        .collect();

    let mut vpc_connections = Vec::with_capacity(connections);
    for i in 0..connections {
        let mut conn = VpcConnection {
            account_id: format!("{}", 100 + i % 2),
            vpc_id: format!("vpc-{}", i % REGIONS.len()),
            network_interface_id: format!("eni-{i:05}"),
            resource_name: Some(format!("host-{i}")),
            ..Default::default()
        };
        for (k, port) in ["443", "5432", "53"].iter().enumerate() {
            let protocol = if *port == "53" { Protocol::Udp } else { Protocol::Tcp };
            let target = (i * 7 + k * 3) % targets.max(1);
            conn.baseline.private_outbound.ports.get_mut(protocol).insert(
                port.to_string(),
                PortAssets {
                    assets: vec![Asset {
                        address_ip: format!("10.0.{}.{}", target / 250, target % 250),
                        resource_name: Some(format!("svc-{target}")),
                        resource_type: None,
                    }],
                },
            );
        }
        vpc_connections.push(conn);
    }

    NetworkModel {
        vpcs,
        vpc_connections,
    }
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    for size in [50usize, 500, 2000] {
        let model = synthetic_network(size, size / 4 + 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &model, |b, model| {
            b.iter(|| build_graph(black_box(model)))
        });
    }
    group.finish();
}

fn bench_layouts(c: &mut Criterion) {
    let config = Config::default();
    let mut group = c.benchmark_group("layout");
    for size in [20usize, 100] {
        let model = synthetic_network(size, size / 2 + 1);
        let graph = build_graph(&model);
        group.bench_with_input(BenchmarkId::new("grid", size), &size, |b, _| {
            b.iter(|| {
                compute_layout(black_box(&graph), &model, &config, LayoutStrategy::Grid, &DagreSolver)
                    .expect("grid layout should succeed")
            })
        });
        group.bench_with_input(BenchmarkId::new("hierarchical", size), &size, |b, _| {
            b.iter(|| {
                compute_layout(
                    black_box(&graph),
                    &model,
                    &config,
                    LayoutStrategy::Hierarchical,
                    &DagreSolver,
                )
                .expect("hierarchical layout should succeed")
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_layouts);
criterion_main!(benches);
