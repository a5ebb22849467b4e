//! Error types for Arborist.
//!
//! This module provides a unified error handling approach using `thiserror`.
//! A vetoed selection change is not an error: operations report it as `Ok(false)`.

use crate::tree::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Arborist operations.
pub type Result<T> = std::result::Result<T, ArboristError>;

/// Which end of a range a failed lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeEndpoint {
    /// The node the range starts from (usually the last selected node).
    First,
    /// The node the range extends to.
    Last,
}

impl std::fmt::Display for RangeEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeEndpoint::First => f.write_str("first"),
            RangeEndpoint::Last => f.write_str("last"),
        }
    }
}

/// Errors that can occur in Arborist.
#[derive(Debug, Error)]
pub enum ArboristError {
    /// A node handle refers to a node that is no longer realized.
    #[error("Node {node} is not realized")]
    StaleNode {
        /// The stale handle.
        node: NodeId,
    },

    /// A range endpoint is not part of the reachable, enabled tree.
    #[error("The {endpoint} range node {node} is not part of the visible, enabled tree")]
    RangeEndpointNotFound {
        /// The handle that could not be located.
        node: NodeId,
        /// Which endpoint it was.
        endpoint: RangeEndpoint,
    },

    /// A realize position is outside the parent's children.
    #[error("Cannot realize at position {index}: parent has {len} realized children")]
    InvalidPosition {
        /// Requested position.
        index: usize,
        /// Number of realized siblings.
        len: usize,
    },

    /// The selection strategy was disposed and can no longer be used.
    #[error("Selection strategy has been disposed")]
    SelectionDisposed,

    /// A selection mode name could not be parsed.
    #[error("Unknown selection mode: {name} (expected single, multiple or none)")]
    UnknownSelectionMode {
        /// The rejected name.
        name: String,
    },

    /// An outline file line could not be parsed.
    #[error("Outline parse error on line {line}: {message}")]
    OutlineParse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Failed to open a file.
    #[error("Failed to open file: {path}")]
    FileOpen {
        /// The file path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to access clipboard.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl ArboristError {
    /// Create a StaleNode error.
    pub fn stale(node: NodeId) -> Self {
        Self::StaleNode { node }
    }

    /// Create a RangeEndpointNotFound error.
    pub fn endpoint_not_found(node: NodeId, endpoint: RangeEndpoint) -> Self {
        Self::RangeEndpointNotFound { node, endpoint }
    }

    /// Create a FileOpen error.
    pub fn file_open(path: PathBuf, source: std::io::Error) -> Self {
        Self::FileOpen { path, source }
    }

    /// Create an OutlineParse error.
    pub fn outline_parse(line: usize, message: impl Into<String>) -> Self {
        Self::OutlineParse {
            line,
            message: message.into(),
        }
    }
}
