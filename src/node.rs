//! A module for working with nodes.

use std::{collections::HashMap, f64::consts::PI};

use nalgebra::Vector2;

/// The key every node and edge carries in its attribute tables.
pub const DEFAULT_KEY: &str = "Default";

/// The group every node belongs to before any string attribute is assigned.
pub const DEFAULT_GROUP: &str = "None";

/// The numeric `Default` value of a node, the radius of a circle with unit area.
pub fn default_node_value() -> f64 {
    (1.0 / PI).sqrt()
}

/// Describes a node before it becomes part of a [`GraphModel`](crate::graph::GraphModel).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDescriptor {
    pub name: String,
    pub numbers: HashMap<String, f64>,
    pub strings: HashMap<String, String>,
}

impl NodeDescriptor {
    /// Creates a descriptor with empty attribute tables.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::node::NodeDescriptor;
    ///
    /// let node = NodeDescriptor::new("a")
    ///     .with_number("weight", 2.0)
    ///     .with_string("team", "blue");
    ///
    /// assert_eq!(node.numbers.get("weight"), Some(&2.0));
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a numeric attribute.
    pub fn with_number(mut self, key: impl Into<String>, value: f64) -> Self {
        self.numbers.insert(key.into(), value);
        self
    }

    /// Adds a string attribute.
    pub fn with_string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

/// A vertex in the model, carrying its simulation state and keyed attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    name: String,
    /// Position in simulation space.
    pub position: Vector2<f64>,
    /// Scratch displacement accumulated during a layout step.
    pub displacement: Vector2<f64>,
    /// Set while the node is held by the user, the layout won't move it.
    pub selected: bool,
    pub(crate) value: f64,
    pub(crate) numbers: HashMap<String, f64>,
    pub(crate) strings: HashMap<String, String>,
    pub(crate) adjacency: Vec<usize>,
}

impl Node {
    pub(crate) fn from_descriptor(descriptor: NodeDescriptor) -> Self {
        let NodeDescriptor {
            name,
            mut numbers,
            mut strings,
        } = descriptor;

        // The reserved keys always win over caller supplied values.
        numbers.insert(DEFAULT_KEY.to_owned(), default_node_value());
        strings.insert(DEFAULT_KEY.to_owned(), DEFAULT_GROUP.to_owned());

        Self {
            name,
            position: Vector2::zeros(),
            displacement: Vector2::zeros(),
            selected: false,
            value: default_node_value(),
            numbers,
            strings,
            adjacency: Vec::new(),
        }
    }

    /// Returns the name the node was declared with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the derived value driving the rendered radius.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns the numeric attribute stored under `key`, or `0.0` if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use graphsim::graph::GraphModel;
    /// use graphsim::node::NodeDescriptor;
    ///
    /// let graph = GraphModel::new(vec![NodeDescriptor::new("a").with_number("w", 3.0)], vec![])?;
    /// let node = graph.node(0)?;
    ///
    /// assert_eq!(node.number("w"), 3.0);
    /// assert_eq!(node.number("missing"), 0.0);
    /// # Ok::<(), graphsim::error::Error>(())
    /// ```
    pub fn number(&self, key: &str) -> f64 {
        self.numbers.get(key).copied().unwrap_or_default()
    }

    /// Returns the string attribute stored under `key`, or `""` if there is none.
    pub fn string(&self, key: &str) -> &str {
        self.strings.get(key).map(String::as_str).unwrap_or("")
    }

    /// Returns whether a numeric attribute is stored under `key`.
    pub fn has_number(&self, key: &str) -> bool {
        self.numbers.contains_key(key)
    }

    /// Returns whether a string attribute is stored under `key`.
    pub fn has_string(&self, key: &str) -> bool {
        self.strings.contains_key(key)
    }

    /// Returns the numeric attribute table, including the reserved `Default` key.
    pub fn numbers(&self) -> &HashMap<String, f64> {
        &self.numbers
    }

    /// Returns the string attribute table, including the reserved `Default` key.
    pub fn strings(&self) -> &HashMap<String, String> {
        &self.strings
    }

    /// Returns the indices of the adjacent nodes, in the order the edges were declared.
    pub fn adjacency(&self) -> &[usize] {
        &self.adjacency
    }

    /// Returns the number of adjacent nodes.
    pub fn degree(&self) -> usize {
        self.adjacency.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_defaults() {
        let node = Node::from_descriptor(NodeDescriptor::new("a"));

        assert_eq!(node.number(DEFAULT_KEY), (1.0 / PI).sqrt());
        assert_eq!(node.string(DEFAULT_KEY), DEFAULT_GROUP);
        assert_eq!(node.value(), default_node_value());
    }

    #[test]
    fn reserved_defaults_override_descriptor() {
        let descriptor = NodeDescriptor::new("a")
            .with_number(DEFAULT_KEY, 42.0)
            .with_string(DEFAULT_KEY, "mine");
        let node = Node::from_descriptor(descriptor);

        assert_eq!(node.number(DEFAULT_KEY), default_node_value());
        assert_eq!(node.string(DEFAULT_KEY), DEFAULT_GROUP);
    }

    #[test]
    fn unknown_keys_use_sentinels() {
        let node = Node::from_descriptor(NodeDescriptor::new("a"));

        assert_eq!(node.number("nope"), 0.0);
        assert_eq!(node.string("nope"), "");
        assert!(!node.has_number("nope"));
        assert!(!node.has_string("nope"));
    }

    #[test]
    fn starts_at_origin_without_neighbours() {
        let node = Node::from_descriptor(NodeDescriptor::new("a"));

        assert_eq!(node.name(), "a");
        assert_eq!(node.position, Vector2::zeros());
        assert_eq!(node.displacement, Vector2::zeros());
        assert!(!node.selected);
        assert_eq!(node.degree(), 0);
    }
}
