//! Error types for the runtime.
//!
//! - [`HostError`] - host-tree contract violations
//! - [`FragmentError`] - failures raised by a fragment's `mount` or `patch`
//! - [`RuntimeError`] - the public error returned by `init`, `flush` and `tick`
//!
//! Hydration mismatches are not errors: the claimer falls back to creating a
//! fresh node.

use thiserror::Error;

use crate::component::ComponentId;
use crate::host::NodeId;

/// A host-tree operation was asked to do something the tree cannot express.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The anchor passed to `insert_before` is not a child of the target.
    #[error("anchor {anchor:?} is not a child of {parent:?}")]
    AnchorNotChild { parent: NodeId, anchor: NodeId },

    /// `remove_child` was called with a node whose parent is someone else.
    #[error("{child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Inserting the node would make it its own ancestor.
    #[error("inserting {node:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, node: NodeId },
}

/// Error surfaced by compiled fragment logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error(transparent)]
    Host(#[from] HostError),

    /// A child component mounted by this fragment failed.
    #[error(transparent)]
    Child(Box<RuntimeError>),

    #[error("{0}")]
    Message(String),
}

impl FragmentError {
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<RuntimeError> for FragmentError {
    fn from(err: RuntimeError) -> Self {
        Self::Child(Box::new(err))
    }
}

/// Errors returned by the component runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A component's update failed during a flush. The scheduler has already
    /// been reset to idle when this is returned.
    #[error("update of component {component} ({name}) failed")]
    Update {
        component: ComponentId,
        name: &'static str,
        #[source]
        source: FragmentError,
    },

    /// Mounting a component's fragment into the host tree failed.
    #[error("mounting component {component} ({name}) failed")]
    Mount {
        component: ComponentId,
        name: &'static str,
        #[source]
        source: FragmentError,
    },

    /// A lifecycle or context function ran with no component initializing.
    #[error("{0} called outside component initialization")]
    OutsideInitialization(&'static str),

    /// A child component was created with no target and no parent to inherit
    /// a root from.
    #[error("component {0} has neither a target nor a parent component")]
    NoRoot(&'static str),

    #[error(transparent)]
    Host(#[from] HostError),
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
