//! Generator error type.
//!
//! Every failure surfaces during generation, never while a finished
//! `Topology` is being consumed.  Each variant names the identifier(s)
//! involved so a bad parameter or table row can be located directly.
//! [`TopologyError::kind`] folds the variants into the three coarse
//! categories callers usually branch on.

use thiserror::Error;

use crate::SignalGroup;

/// Coarse classification of a [`TopologyError`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ErrorKind {
    /// Invalid structural parameter or declaration.
    Configuration,
    /// A later builder references something an earlier builder never produced.
    Integrity,
    /// Route probabilities for an entry edge are malformed.
    RouteWeight,
}

/// The error type shared by all `tg-*` generation stages.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("node {0:?} not found")]
    MissingNode(String),

    #[error("edge {0:?} not found")]
    MissingEdge(String),

    #[error("duplicate {what} identifier {id:?}")]
    DuplicateId { what: &'static str, id: String },

    #[error("edge {edge:?} does not touch node {node:?}")]
    NotIncident { edge: String, node: String },

    #[error("route {route} of entry {entry:?} breaks between {from:?} and {to:?}")]
    Discontiguous {
        entry: String,
        route: usize,
        from:  String,
        to:    String,
    },

    #[error("entry edge {0:?} does not start at a boundary node")]
    NotEntry(String),

    #[error("route {route} of entry {entry:?} ends on {edge:?}, which does not leave the network")]
    NotExit { entry: String, route: usize, edge: String },

    #[error("route movement {from:?} → {to:?} has no connection at node {node:?}")]
    MissingMovement { node: String, from: String, to: String },

    #[error("route probabilities for entry {entry:?} sum to {sum}, expected 1")]
    RouteWeight { entry: String, sum: f64 },

    #[error("route {route} of entry {entry:?} has probability {p}, expected (0, 1]")]
    Probability { entry: String, route: usize, p: f64 },

    #[error("{a} and {b} both feed edge {edge:?} at node {node:?} but are not declared conflicting")]
    UndeclaredConflict {
        node: String,
        edge: String,
        a:    SignalGroup,
        b:    SignalGroup,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TopologyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TopologyError::MissingNode(_)
            | TopologyError::MissingEdge(_)
            | TopologyError::DuplicateId { .. }
            | TopologyError::NotIncident { .. }
            | TopologyError::Discontiguous { .. }
            | TopologyError::NotEntry(_)
            | TopologyError::NotExit { .. }
            | TopologyError::MissingMovement { .. } => ErrorKind::Integrity,
            TopologyError::RouteWeight { .. } | TopologyError::Probability { .. } => {
                ErrorKind::RouteWeight
            }
            TopologyError::Config(_)
            | TopologyError::UndeclaredConflict { .. }
            | TopologyError::Parse(_)
            | TopologyError::Io(_) => ErrorKind::Configuration,
        }
    }
}

/// Shorthand result type for all `tg-*` crates.
pub type TopologyResult<T> = Result<T, TopologyError>;
