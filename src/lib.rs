//! Graphsim is a small toolkit for laying out undirected graphs with a spring embedder and for
//! scoring their nodes by centrality.
//!
//! # Basic usage
//!
//! The library is centered around the [`GraphModel`](graph::GraphModel) structure, built once
//! from [`NodeDescriptor`](node::NodeDescriptor) and [`EdgeDescriptor`](edge::EdgeDescriptor)
//! instances. Centrality scores are computed on the model and stored in its nodes' attribute
//! tables, while a [`LayoutEngine`](layout::LayoutEngine) moves the nodes around one step at a
//! time.
//!
//! ```rust
//! use graphsim::edge::EdgeDescriptor;
//! use graphsim::graph::{GraphModel, BETWEENNESS_KEY};
//! use graphsim::layout::{LayoutConfig, LayoutEngine, LayoutState};
//! use graphsim::node::NodeDescriptor;
//! use graphsim::viewport::Viewport;
//!
//! // Construct the model, a line of three nodes.
//! let mut graph = GraphModel::new(
//!     ["a", "b", "c"].into_iter().map(NodeDescriptor::new).collect(),
//!     vec![EdgeDescriptor::new("a", "b"), EdgeDescriptor::new("b", "c")],
//! )?;
//!
//! // Score the nodes and size them after their betweenness.
//! let betweenness = graph.betweenness_centrality()?;
//! assert_eq!(betweenness.scores, vec![0.0, 1.0, 0.0]);
//! graph.promote_node_attribute(BETWEENNESS_KEY)?;
//!
//! // Lay the graph out, a scheduler would usually call `step` once per frame.
//! let config = LayoutConfig::default();
//! let mut engine = LayoutEngine::new(&mut graph, Viewport::new(800.0, 600.0)?, &config)?;
//! while engine.step(&mut graph, &config) == LayoutState::Running {}
//!
//! // Map the result into the viewport, leaving room for the largest node.
//! let mapper = engine.mapper(graph.max_value());
//! let on_screen = mapper.to_viewport(graph.node(1)?.position);
//! assert!(on_screen.x >= 0.0 && on_screen.x <= 800.0);
//! # Ok::<(), graphsim::error::Error>(())
//! ```

mod betweenness;
mod closeness;
pub mod edge;
pub mod error;
pub mod graph;
pub mod layout;
pub mod node;
pub mod normalize;
pub mod viewport;
