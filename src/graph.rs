//! A module for working with graphs.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    ops::Sub,
};

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::{
    betweenness::compute_betweenness,
    closeness::compute_closeness,
    edge::{Edge, EdgeDescriptor},
    error::{Error, Result},
    node::{Node, NodeDescriptor},
    normalize::{radius_scale, unit_scale, Normalization},
};

/// Attribute key under which degree centrality is stored.
pub const DEGREE_KEY: &str = "Degree Centrality";
/// Attribute key under which closeness centrality is stored.
pub const CLOSENESS_KEY: &str = "Closeness Centrality";
/// Attribute key under which betweenness centrality is stored.
pub const BETWEENNESS_KEY: &str = "Betweenness Centrality";
/// Attribute key under which eigenvector centrality is stored.
pub const EIGENVECTOR_KEY: &str = "Eigenvector Centrality";

/// Default ceiling on the number of shortest paths enumerated per ordered pair of nodes.
pub const DEFAULT_MAX_PATHS_PER_PAIR: usize = 10_000;

/// The outcome of a betweenness computation.
#[derive(Clone, Debug, PartialEq)]
pub struct Betweenness {
    /// Scores in node index order.
    pub scores: Vec<f64>,
    /// Set when some pair had more shortest paths than the ceiling allowed, the scores then only
    /// account for the paths that were enumerated.
    pub truncated: bool,
}

/// An undirected graph of attributed nodes and edges.
///
/// Nodes keep the order they were declared in; that order is the index used by every
/// computation and by the matrix views.
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    normalization: Normalization,
    /// Raised after any mutation, cleared by [`GraphModel::take_modified`].
    modified: bool,
    listener: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for GraphModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphModel")
            .field("nodes", &self.nodes)
            .field("edges", &self.edges)
            .field("normalization", &self.normalization)
            .field("modified", &self.modified)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl GraphModel {
    /// Builds a model from node and edge descriptors and derives the adjacency of every node.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::edge::EdgeDescriptor;
    /// use graphsim::graph::GraphModel;
    /// use graphsim::node::NodeDescriptor;
    ///
    /// let graph = GraphModel::new(
    ///     vec![NodeDescriptor::new("a"), NodeDescriptor::new("b")],
    ///     vec![EdgeDescriptor::new("a", "b")],
    /// )?;
    ///
    /// assert_eq!(graph.neighbors(0)?, &[1]);
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn new(nodes: Vec<NodeDescriptor>, edges: Vec<EdgeDescriptor>) -> Result<Self> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.name.clone(), i).is_some() {
                return Err(Error::DuplicateNode {
                    name: node.name.clone(),
                });
            }
        }

        let lookup = |name: &str| {
            index.get(name).copied().ok_or_else(|| Error::UnknownNode {
                name: name.to_owned(),
            })
        };

        let edges = edges
            .into_iter()
            .map(|edge| {
                let source = lookup(&edge.source)?;
                let target = lookup(&edge.target)?;

                Ok(Edge::new(source, target, edge.force, edge.width, edge.numbers))
            })
            .collect::<Result<Vec<Edge>>>()?;

        let mut nodes: Vec<Node> = nodes.into_iter().map(Node::from_descriptor).collect();

        // Adjacency is derived once from the edge set. Loops are ignored and parallel edges only
        // count once.
        for edge in edges.iter().filter(|edge| !edge.is_loop()) {
            let (u, v) = (edge.source(), edge.target());

            if !nodes[u].adjacency.contains(&v) {
                nodes[u].adjacency.push(v);
                nodes[v].adjacency.push(u);
            }
        }

        log::debug!(
            "built graph model with {} nodes and {} edges",
            nodes.len(),
            edges.len()
        );

        Ok(Self {
            nodes,
            edges,
            normalization: Normalization::default(),
            modified: true,
            listener: None,
        })
    }

    /// Sets the normalization policy used by the keyed promotions.
    pub fn with_normalization(mut self, normalization: impl Into<Normalization>) -> Self {
        self.normalization = normalization.into();
        self
    }

    /// Returns the normalization policy used by the keyed promotions.
    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Replaces the normalization policy, values already promoted are left as they are.
    pub fn set_normalization(&mut self, normalization: impl Into<Normalization>) {
        self.normalization = normalization.into();
        self.mark_modified();
    }

    /// Returns the nodes in index order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the edges in the order they were declared.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the node count of the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edge count of the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the node at `index`.
    pub fn node(&self, index: usize) -> Result<&Node> {
        self.nodes.get(index).ok_or(Error::NodeOutOfBounds {
            index,
            len: self.nodes.len(),
        })
    }

    /// Returns the index of the node with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name() == name)
    }

    /// Returns the indices of the nodes adjacent to the node at `index`.
    pub fn neighbors(&self, index: usize) -> Result<&[usize]> {
        self.node(index).map(Node::adjacency)
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges.
    ///
    /// Only distinct, non-loop connections count, so the result matches the adjacency.
    pub fn density(&self) -> f64 {
        let vc = self.node_count() as f64;
        let ec = self.nodes.iter().map(Node::degree).sum::<usize>() as f64 / 2.0;

        // Calculate the total number of possible edges given a vertex count.
        let pec = vc * (vc - 1.0) / 2.0;
        ec / pec
    }

    /// Returns the largest derived node value, or `0.0` for an empty graph.
    pub fn max_value(&self) -> f64 {
        self.nodes.iter().map(Node::value).fold(0.0, f64::max)
    }

    //
    // Attributes
    //

    /// Stores a numeric attribute on a node.
    pub fn set_number(&mut self, index: usize, key: impl Into<String>, value: f64) -> Result<()> {
        self.node_mut(index)?.numbers.insert(key.into(), value);
        self.mark_modified();
        Ok(())
    }

    /// Stores a string attribute on a node.
    pub fn set_string(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.node_mut(index)?.strings.insert(key.into(), value.into());
        self.mark_modified();
        Ok(())
    }

    /// Marks a node as held (or released) by the user.
    pub fn set_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        self.node_mut(index)?.selected = selected;
        self.mark_modified();
        Ok(())
    }

    /// Sets every node's value from its numeric attribute at `key`, scaled according to the
    /// normalization policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::f64::consts::PI;
    ///
    /// use graphsim::graph::GraphModel;
    /// use graphsim::node::NodeDescriptor;
    ///
    /// let mut graph = GraphModel::new(
    ///     vec![
    ///         NodeDescriptor::new("a").with_number("w", 4.0),
    ///         NodeDescriptor::new("b").with_number("w", 4.0),
    ///     ],
    ///     vec![],
    /// )?;
    /// graph.promote_node_attribute("w")?;
    ///
    /// // Identical values can't be told apart, every node gets the neutral radius.
    /// assert_eq!(graph.node(0)?.value(), (0.5 / PI).sqrt());
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn promote_node_attribute(&mut self, key: &str) -> Result<()> {
        self.ensure_not_empty()?;

        let values: Vec<f64> = self.nodes.iter().map(|node| node.number(key)).collect();
        let scaled = radius_scale(&values, self.normalization);

        for (node, value) in self.nodes.iter_mut().zip(scaled) {
            node.value = value;
        }

        self.mark_modified();
        Ok(())
    }

    /// Sets every edge's force from its numeric attribute at `key`, scaled into `[0, 1]`
    /// according to the normalization policy.
    pub fn promote_edge_force(&mut self, key: &str) -> Result<()> {
        let scaled = self.scaled_edge_values(key)?;

        for (edge, force) in self.edges.iter_mut().zip(scaled) {
            edge.force = force;
        }

        self.mark_modified();
        Ok(())
    }

    /// Sets every edge's width from its numeric attribute at `key`, scaled into `[0, 1]`
    /// according to the normalization policy.
    pub fn promote_edge_width(&mut self, key: &str) -> Result<()> {
        let scaled = self.scaled_edge_values(key)?;

        for (edge, width) in self.edges.iter_mut().zip(scaled) {
            edge.width = width;
        }

        self.mark_modified();
        Ok(())
    }

    /// Returns the distinct string values held under `key`, in the order they are first seen.
    /// Nodes without the key are skipped.
    pub fn distinct_values_for_key(&self, key: &str) -> Vec<String> {
        let mut seen = HashSet::new();

        self.nodes
            .iter()
            .filter_map(|node| node.strings.get(key))
            .filter(|value| seen.insert(value.as_str()))
            .cloned()
            .collect()
    }

    //
    // Change signal
    //

    /// Registers the callback invoked after every mutation, replacing any previous one.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut() + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Returns whether the model changed since the flag was last taken.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Returns and clears the modified flag.
    pub fn take_modified(&mut self) -> bool {
        std::mem::take(&mut self.modified)
    }

    pub(crate) fn mark_modified(&mut self) {
        self.modified = true;

        if let Some(listener) = self.listener.as_mut() {
            listener();
        }
    }

    //
    // Matrices
    //

    /// Constructs the adjacency matrix for this graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::dmatrix;
    /// use graphsim::edge::EdgeDescriptor;
    /// use graphsim::graph::GraphModel;
    /// use graphsim::node::NodeDescriptor;
    ///
    /// let graph = GraphModel::new(
    ///     vec![NodeDescriptor::new("a"), NodeDescriptor::new("b")],
    ///     vec![EdgeDescriptor::new("a", "b")],
    /// )?;
    ///
    /// assert_eq!(
    ///     graph.adjacency_matrix(),
    ///     dmatrix![0.0, 1.0;
    ///              1.0, 0.0]
    /// );
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn adjacency_matrix(&self) -> DMatrix<f64> {
        let n = self.node_count();
        let mut matrix = DMatrix::<f64>::zeros(n, n);

        // The adjacency lists are symmetric, so are the resulting rows and columns.
        for (i, node) in self.nodes.iter().enumerate() {
            for j in node.adjacency() {
                matrix[(i, *j)] = 1.0;
            }
        }

        matrix
    }

    /// Constructs the degree matrix for this graph.
    pub fn degree_matrix(&self) -> DMatrix<f64> {
        let degrees: Vec<f64> = self.nodes.iter().map(|node| node.degree() as f64).collect();

        DMatrix::from_diagonal(&DVector::from_vec(degrees))
    }

    /// Constructs the laplacian matrix for this graph.
    pub fn laplacian_matrix(&self) -> DMatrix<f64> {
        self.degree_matrix().sub(&self.adjacency_matrix())
    }

    //
    // Centrality
    //

    /// Computes the degree centrality (neighbour count) of every node and stores it under
    /// [`DEGREE_KEY`]. The normalized form divides by `n - 1`.
    pub fn degree_centrality(&mut self, normalize: bool) -> Result<Vec<f64>> {
        self.ensure_not_empty()?;

        let divisor = self.divisor(normalize);
        let scores: Vec<f64> = self
            .nodes
            .iter()
            .map(|node| node.degree() as f64 / divisor)
            .collect();

        self.store(DEGREE_KEY, &scores);
        Ok(scores)
    }

    /// Computes the closeness of every node as the sum of `1 / level` over all nodes reached by a
    /// breadth-first traversal, and stores it under [`CLOSENESS_KEY`]. The normalized form divides
    /// by `n - 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::edge::EdgeDescriptor;
    /// use graphsim::graph::GraphModel;
    /// use graphsim::node::NodeDescriptor;
    ///
    /// let mut graph = GraphModel::new(
    ///     ["a", "b", "c"].into_iter().map(NodeDescriptor::new).collect(),
    ///     vec![EdgeDescriptor::new("a", "b"), EdgeDescriptor::new("b", "c")],
    /// )?;
    ///
    /// assert_eq!(graph.closeness_centrality(false)?, vec![1.5, 2.0, 1.5]);
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn closeness_centrality(&mut self, normalize: bool) -> Result<Vec<f64>> {
        self.ensure_not_empty()?;

        let divisor = self.divisor(normalize);
        let scores: Vec<f64> = compute_closeness(&self.indices())
            .into_iter()
            .map(|sum| sum / divisor)
            .collect();

        self.store(CLOSENESS_KEY, &scores);
        Ok(scores)
    }

    /// Computes betweenness with the default path ceiling, see
    /// [`GraphModel::betweenness_centrality_bounded`].
    pub fn betweenness_centrality(&mut self) -> Result<Betweenness> {
        self.betweenness_centrality_bounded(DEFAULT_MAX_PATHS_PER_PAIR)
    }

    /// Computes the betweenness of every node and stores it under [`BETWEENNESS_KEY`].
    ///
    /// For each ordered pair `(s, t)` all shortest paths are enumerated (at most `max_paths` of
    /// them) and every interior node of a path receives `0.5 / |paths|`. As both `(s, t)` and
    /// `(t, s)` are visited, an undirected pair hands out one full credit in total. The scores
    /// aren't normalized.
    ///
    /// A ceiling of `0` is raised to `1`, every connected pair keeps at least one path.
    pub fn betweenness_centrality_bounded(&mut self, max_paths: usize) -> Result<Betweenness> {
        self.ensure_not_empty()?;

        let max_paths = max_paths.max(1);
        let (scores, truncated) = compute_betweenness(&self.indices(), max_paths);
        if truncated {
            log::warn!(
                "betweenness truncated, some pairs have more than {} shortest paths",
                max_paths
            );
        }

        self.store(BETWEENNESS_KEY, &scores);
        Ok(Betweenness { scores, truncated })
    }

    /// Computes the eigenvector centrality (the relative importance of each node) and stores it
    /// under [`EIGENVECTOR_KEY`].
    ///
    /// The principal eigenvector of the adjacency matrix is scaled so its components sum to `n`.
    pub fn eigenvector_centrality(&mut self) -> Result<Vec<f64>> {
        self.ensure_not_empty()?;

        let n = self.node_count() as f64;
        let pairs = sorted_eigenvalue_vector_pairs(self.adjacency_matrix(), false);

        let connected = self.nodes.iter().any(|node| node.degree() > 0);
        let scores: Vec<f64> = match pairs.first() {
            Some((_, vector)) if connected && vector.sum() != 0.0 => {
                let sum = vector.sum() / n;
                vector.unscale(sum).iter().copied().collect()
            }
            // No edges, every node is equally (un)important.
            _ => vec![0.0; self.node_count()],
        };

        self.store(EIGENVECTOR_KEY, &scores);
        Ok(scores)
    }

    /// Returns the algebraic connectivity (Fiedler value) of the graph, the second-smallest
    /// eigenvalue of the laplacian. It is zero exactly when the graph is disconnected.
    pub fn algebraic_connectivity(&self) -> Result<f64> {
        self.ensure_not_empty()?;

        let pairs = sorted_eigenvalue_vector_pairs(self.laplacian_matrix(), true);

        Ok(pairs.get(1).map(|(value, _)| *value).unwrap_or_default())
    }

    //
    // Private
    //

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    fn node_mut(&mut self, index: usize) -> Result<&mut Node> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(Error::NodeOutOfBounds { index, len })
    }

    pub(crate) fn ensure_not_empty(&self) -> Result<()> {
        if self.nodes.is_empty() {
            Err(Error::EmptyGraph)
        } else {
            Ok(())
        }
    }

    /// The adjacency lists in index order, the input to the traversal based computations.
    fn indices(&self) -> Vec<Vec<usize>> {
        self.nodes
            .iter()
            .map(|node| node.adjacency.clone())
            .collect()
    }

    fn divisor(&self, normalize: bool) -> f64 {
        if normalize {
            self.node_count().saturating_sub(1).max(1) as f64
        } else {
            1.0
        }
    }

    fn store(&mut self, key: &str, scores: &[f64]) {
        for (node, score) in self.nodes.iter_mut().zip(scores) {
            node.numbers.insert(key.to_owned(), *score);
        }

        log::debug!("stored {} scores under '{}'", scores.len(), key);
        self.mark_modified();
    }

    fn scaled_edge_values(&self, key: &str) -> Result<Vec<f64>> {
        self.ensure_not_empty()?;

        let values: Vec<f64> = self.edges.iter().map(|edge| edge.number(key)).collect();

        Ok(unit_scale(&values, self.normalization))
    }
}

//
// Helpers
//

/// Computes the eigenvalues and corresponding eigenvectors from the supplied symmetric matrix.
fn sorted_eigenvalue_vector_pairs(
    matrix: DMatrix<f64>,
    ascending: bool,
) -> Vec<(f64, DVector<f64>)> {
    // The decomposition requires a matrix with at least a dim of 1x1.
    if matrix.is_empty() {
        return vec![];
    }

    let eigen = SymmetricEigen::new(matrix);

    let mut pairs: Vec<(f64, DVector<f64>)> = eigen
        .eigenvalues
        .iter()
        .zip(eigen.eigenvectors.column_iter())
        .map(|(value, vector)| (*value, vector.clone_owned()))
        .collect();

    pairs.sort_unstable_by(|(a, _), (b, _)| {
        if ascending {
            a.total_cmp(b)
        } else {
            b.total_cmp(a)
        }
    });

    pairs
}
