use thiserror::Error;

/// Errors raised while building or advancing a [`crate::graph::Graph`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The activity vector no longer matches the node count.
    #[error("activity has {actual} entries but the graph has {expected} nodes")]
    InvalidState { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, AutomatonError>;
