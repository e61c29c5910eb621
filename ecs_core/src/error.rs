//! Error kinds raised by the runtime.
//!
//! Every precondition violation surfaces as one of these variants; the
//! runtime never recovers from its own errors.

use thiserror::Error;

use crate::entities::EntityId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EcsError>;

/// Contract violations surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcsError {
    /// No component (or index) answers the requested name.
    #[error("{target} has no attribute `{attribute}`")]
    AttributeNotFound { target: String, attribute: String },

    /// An entity already carries a component of this concrete type.
    #[error("entity {entity} already has a {component} component")]
    DuplicateComponent {
        entity: EntityId,
        component: &'static str,
    },

    /// A property value had the wrong shape for the component reading it.
    #[error("property `{property}` of {component} expects {expected}")]
    InvalidProperty {
        component: &'static str,
        property: String,
        expected: &'static str,
    },

    /// Overrides handed to an assemblage that no component type claimed.
    #[error("unknown initial properties: {}", .names.join(", "))]
    UnknownInitialProperty { names: Vec<String> },

    /// A manager was asked to register an entity lacking its component.
    #[error("entity {entity} has no {component} component")]
    ComponentMissing {
        entity: EntityId,
        component: &'static str,
    },

    #[error("{world} does not contain entity {entity}")]
    NotAMember { world: String, entity: EntityId },

    #[error("{name} is not a type of System")]
    NotASystemType { name: String },

    #[error("world already contains a System of type {name}")]
    DuplicateSystem { name: &'static str },

    #[error("world has no System of type {name}")]
    UnknownSystem { name: String },

    /// The system is checked out by an in-flight call on the same world.
    #[error("system {name} is already running")]
    SystemBusy { name: &'static str },

    #[error("hook on `{method}` must run before, after, or both")]
    MissingTiming { method: String },

    #[error("{name} is not a callable hook")]
    NotCallable { name: String },

    #[error("callback is not subscribed to event `{event}`")]
    NotSubscribed { event: String },
}

impl EcsError {
    pub(crate) fn attribute_not_found(target: impl ToString, attribute: impl Into<String>) -> Self {
        EcsError::AttributeNotFound {
            target: target.to_string(),
            attribute: attribute.into(),
        }
    }
}
