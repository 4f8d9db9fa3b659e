use std::{collections::HashMap, f64::consts::PI, fs};

use graphsim::{
    edge::EdgeDescriptor,
    graph::{GraphModel, BETWEENNESS_KEY, CLOSENESS_KEY, DEGREE_KEY},
    layout::{LayoutConfig, LayoutEngine, LayoutState},
    node::NodeDescriptor,
    normalize::Normalization,
    viewport::Viewport,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct Fixture {
    nodes: Vec<FixtureNode>,
    edges: Vec<FixtureEdge>,
}

#[derive(Deserialize)]
struct FixtureNode {
    name: String,
    #[serde(default)]
    numbers: HashMap<String, f64>,
    #[serde(default)]
    strings: HashMap<String, String>,
}

#[derive(Deserialize)]
struct FixtureEdge {
    source: String,
    target: String,
    force: Option<f64>,
    width: Option<f64>,
    #[serde(default)]
    numbers: HashMap<String, f64>,
}

fn load(name: &str) -> GraphModel {
    let path = format!("{}/testdata/{name}.json", env!("CARGO_MANIFEST_DIR"));
    let json = fs::read_to_string(path).unwrap();
    let fixture: Fixture = serde_json::from_str(&json).unwrap();

    let nodes = fixture
        .nodes
        .into_iter()
        .map(|node| NodeDescriptor {
            name: node.name,
            numbers: node.numbers,
            strings: node.strings,
        })
        .collect();

    let edges = fixture
        .edges
        .into_iter()
        .map(|edge| {
            let mut descriptor = EdgeDescriptor::new(edge.source, edge.target);
            descriptor.force = edge.force.unwrap_or(descriptor.force);
            descriptor.width = edge.width.unwrap_or(descriptor.width);
            descriptor.numbers = edge.numbers;
            descriptor
        })
        .collect();

    GraphModel::new(nodes, edges).unwrap()
}

#[test]
fn star_centrality() {
    let mut graph = load("star");
    let hub = graph.index_of("hub").unwrap();

    let degree = graph.degree_centrality(true).unwrap();
    assert_eq!(degree[hub], 1.0);
    assert!(degree.iter().enumerate().all(|(i, d)| i == hub || *d == 0.25));

    let closeness = graph.closeness_centrality(false).unwrap();
    assert_eq!(closeness[hub], 4.0);
    assert!(closeness
        .iter()
        .enumerate()
        .all(|(i, c)| i == hub || *c == 2.5));

    // Each of the six leaf pairs routes through the hub.
    let betweenness = graph.betweenness_centrality().unwrap();
    assert_eq!(betweenness.scores[hub], 6.0);
    assert!(!betweenness.truncated);

    let stored = graph.node(hub).unwrap();
    assert_eq!(stored.number(DEGREE_KEY), 1.0);
    assert_eq!(stored.number(CLOSENESS_KEY), 4.0);
    assert_eq!(stored.number(BETWEENNESS_KEY), 6.0);
}

#[test]
fn star_promotions() {
    let mut graph = load("star");

    graph.promote_node_attribute("load").unwrap();
    let hub = graph.index_of("hub").unwrap();
    let leaf = graph.index_of("leaf-1").unwrap();
    assert!((graph.node(hub).unwrap().value() - (1.0 / PI).sqrt()).abs() < 1e-12);
    assert_eq!(graph.node(leaf).unwrap().value(), 0.0);

    graph.promote_edge_force("latency").unwrap();
    let forces: Vec<f64> = graph.edges().iter().map(|edge| edge.force).collect();
    assert_eq!(forces, vec![0.0, 0.5, 1.0, 0.5]);

    graph.set_normalization(Normalization::Never);
    graph.promote_edge_width("latency").unwrap();
    let widths: Vec<f64> = graph.edges().iter().map(|edge| edge.width).collect();
    assert_eq!(widths, vec![5.0, 15.0, 25.0, 15.0]);

    assert_eq!(
        graph.distinct_values_for_key("region"),
        vec!["core", "edge", "remote"]
    );
}

#[test]
fn bridge_betweenness() {
    let mut graph = load("bridge");

    // Both bridge endpoints sit on the paths between the two triangles.
    assert_eq!(
        graph.betweenness_centrality().unwrap().scores,
        vec![0.0, 0.0, 6.0, 6.0, 0.0, 0.0]
    );

    let closeness = graph.closeness_centrality(true).unwrap();
    assert!(closeness[2] > closeness[0]);
    assert_eq!(closeness[2], closeness[3]);
}

#[test]
fn bridge_edge_attributes() {
    let graph = load("bridge");
    let bridge = &graph.edges()[3];

    assert_eq!(bridge.force, 0.5);
    assert_eq!(bridge.width, 3.0);
    assert_eq!(graph.edges()[0].force, 1.0);
}

#[test]
fn bridge_layout() {
    let mut graph = load("bridge");
    let config = LayoutConfig::default();
    let viewport = Viewport::new(640.0, 480.0).unwrap();
    let mut engine = LayoutEngine::new(&mut graph, viewport, &config).unwrap();

    assert_eq!(
        engine.run_to_convergence(&mut graph, &config, 1_000),
        LayoutState::Converged
    );

    // Everything maps into the viewport and back.
    let mapper = engine.mapper(graph.max_value());
    for node in graph.nodes() {
        let on_screen = mapper.to_viewport(node.position);
        assert!(on_screen.x >= -1e-9 && on_screen.x <= 640.0 + 1e-9);
        assert!(on_screen.y >= -1e-9 && on_screen.y <= 480.0 + 1e-9);
        assert!((mapper.to_simulation(on_screen) - node.position).norm() < 1e-9);
    }
}

#[test]
fn paused_then_resumed() {
    let mut graph = load("star");
    let config = LayoutConfig::default();
    let mut engine =
        LayoutEngine::new(&mut graph, Viewport::new(500.0, 500.0).unwrap(), &config).unwrap();

    engine.step(&mut graph, &config);
    let temperature = engine.temperature();

    let paused = config.clone().with_physics_active(false);
    assert_eq!(
        engine.run_to_convergence(&mut graph, &paused, 10),
        LayoutState::Paused
    );
    assert_eq!(engine.temperature(), temperature);

    assert_eq!(
        engine.run_to_convergence(&mut graph, &config, 1_000),
        LayoutState::Converged
    );
}
