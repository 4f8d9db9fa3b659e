//! Errors raised by the graph model and the layout engine.

/// The error type for model construction, centrality and layout operations.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The operation needs at least one node.
    #[error("the graph has no nodes")]
    EmptyGraph,

    /// An edge descriptor names a node that isn't part of the model.
    #[error("edge references unknown node '{name}'")]
    UnknownNode { name: String },

    /// Two node descriptors share the same name.
    #[error("node '{name}' is declared more than once")]
    DuplicateNode { name: String },

    /// A node index past the end of the node sequence.
    #[error("node index {index} is out of bounds for a graph of {len} nodes")]
    NodeOutOfBounds { index: usize, len: usize },

    /// A viewport with a zero, negative or non-finite dimension.
    #[error("viewport dimensions must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
