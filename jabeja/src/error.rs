//! Crate-wide error type.

use std::io;

use thiserror::Error;

use crate::graph::NodeId;

/// Everything that can stop a run. None of these are recovered from.
#[derive(Debug, Error)]
pub enum Error {
    /// Unrecognized enumeration value or an out-of-range parameter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A node refers to a neighbor that is not part of the graph.
    #[error("node {node} lists neighbor {neighbor}, which is not in the graph")]
    GraphIntegrity { node: NodeId, neighbor: NodeId },

    #[error("node {0} was supplied more than once")]
    DuplicateNode(NodeId),

    #[error("node {0} not found")]
    NotFound(NodeId),

    /// Malformed graph file; `line` is 1-based.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
