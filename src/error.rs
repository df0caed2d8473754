//! Error types for rig setup.
//!
//! Setup failures never abort the host: components that hit one log it and stay inactive until
//! they are reinitialized. Per-frame degenerate input is skipped or clamped and never surfaces here.

use std::fmt;

use crate::utils::allocator::NodeId;

/// Reasons a simulator or controller could not be activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupError {
    /// The skeleton provider handed over no usable nodes.
    NoNodes,
    /// Nodes were present but no chain of at least two members could be built.
    NoValidChains,
    /// A blend controller was attached without any physics-capable node.
    NoPhysicsBodies,
    /// A node handle no longer refers to a live skeleton node.
    StaleNode(NodeId),
    /// A node's world transform contains NaN or infinite components.
    InvalidTransform(NodeId),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoNodes => write!(f, "no skeletal nodes found"),
            Self::NoValidChains => write!(f, "could not build any node chains"),
            Self::NoPhysicsBodies => write!(f, "no physics-capable nodes to blend"),
            Self::StaleNode(node) => write!(f, "node {node} no longer exists"),
            Self::InvalidTransform(node) => write!(f, "node {node} has a non-finite transform"),
        }
    }
}

impl std::error::Error for SetupError {}

/// Convenient Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;
