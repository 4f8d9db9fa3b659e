//! A module for working with edges.

use std::collections::HashMap;

use crate::node::DEFAULT_KEY;

/// Describes an edge between two named nodes before the model is built.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDescriptor {
    pub source: String,
    pub target: String,
    pub force: f64,
    pub width: f64,
    pub numbers: HashMap<String, f64>,
}

impl EdgeDescriptor {
    /// Creates a descriptor with unit force and width.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::edge::EdgeDescriptor;
    ///
    /// let edge = EdgeDescriptor::new("a", "b").with_number("traffic", 12.0);
    ///
    /// assert_eq!(edge.force, 1.0);
    /// assert_eq!(edge.width, 1.0);
    /// ```
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            force: 1.0,
            width: 1.0,
            numbers: HashMap::new(),
        }
    }

    /// Sets the spring strength multiplier.
    pub fn with_force(mut self, force: f64) -> Self {
        self.force = force;
        self
    }

    /// Sets the rendering weight.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Adds a numeric attribute.
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.numbers.insert(key.into(), value);
        self
    }
}

/// A pair of node indices representing a graph edge. Edges don't have a direction, despite the
/// `source`-`target` nomenclature used.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
    /// Spring strength multiplier used by the layout.
    pub force: f64,
    /// Rendering weight.
    pub width: f64,
    pub(crate) numbers: HashMap<String, f64>,
}

impl Edge {
    pub(crate) fn new(
        source: usize,
        target: usize,
        force: f64,
        width: f64,
        mut numbers: HashMap<String, f64>,
    ) -> Self {
        numbers.insert(DEFAULT_KEY.to_owned(), 1.0);

        Self {
            source,
            target,
            force,
            width,
            numbers,
        }
    }

    /// Returns the index of the first node forming the edge.
    pub fn source(&self) -> usize {
        self.source
    }

    /// Returns the index of the second node forming the edge.
    pub fn target(&self) -> usize {
        self.target
    }

    /// Returns whether the edge touches the given node.
    pub fn contains(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }

    /// Returns whether both edges join the same pair of nodes, in either direction.
    pub fn same_endpoints(&self, other: &Edge) -> bool {
        let (a, b) = (self.source, self.target);
        let (c, d) = (other.source, other.target);

        a == d && b == c || a == c && b == d
    }

    /// Returns whether both ends of the edge are the same node.
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns the numeric attribute stored under `key`, or `0.0` if there is none.
    pub fn number(&self, key: &str) -> f64 {
        self.numbers.get(key).copied().unwrap_or_default()
    }

    /// Returns the numeric attribute table, including the reserved `Default` key.
    pub fn numbers(&self) -> &HashMap<String, f64> {
        &self.numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(source: usize, target: usize) -> Edge {
        Edge::new(source, target, 1.0, 1.0, HashMap::new())
    }

    #[test]
    fn new() {
        let edge = Edge::new(0, 1, 2.0, 3.0, HashMap::from([("w".to_owned(), 5.0)]));

        assert_eq!(edge.source(), 0);
        assert_eq!(edge.target(), 1);
        assert_eq!(edge.force, 2.0);
        assert_eq!(edge.width, 3.0);
        assert_eq!(edge.number("w"), 5.0);
        assert_eq!(edge.number(DEFAULT_KEY), 1.0);
    }

    #[test]
    fn unknown_key() {
        assert_eq!(edge(0, 1).number("missing"), 0.0);
    }

    #[test]
    fn contains() {
        let edge = edge(0, 1);

        assert!(edge.contains(0));
        assert!(edge.contains(1));
        assert!(!edge.contains(2));
    }

    #[test]
    fn same_endpoints() {
        assert!(edge(0, 1).same_endpoints(&edge(0, 1)));
        assert!(edge(0, 1).same_endpoints(&edge(1, 0)));
        assert!(!edge(0, 1).same_endpoints(&edge(0, 2)));
    }

    #[test]
    fn is_loop() {
        assert!(edge(2, 2).is_loop());
        assert!(!edge(1, 2).is_loop());
    }
}
