//! Assemblages - reusable factories for entities of a fixed shape.

use tracing::trace;

use crate::entities::{Component, ComponentType, Entity, Properties};
use crate::error::{EcsError, Result};

/// Produces entities carrying a fixed combination of component types.
///
/// Each registered type keeps its own stored overrides. Overrides passed to
/// [`make`](Self::make) are handed out in registration order: the first type
/// whose `initial_properties` names an override claims it, and later types
/// never see it.
#[derive(Debug, Clone, Default)]
pub struct Assemblage {
    components: Vec<(ComponentType, Properties)>,
}

impl Assemblage {
    /// Create an empty assemblage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from component types with no stored overrides.
    pub fn from_types(types: impl IntoIterator<Item = ComponentType>) -> Self {
        let mut assemblage = Self::new();
        for component_type in types {
            assemblage.add_component_type(component_type, Properties::new());
        }
        assemblage
    }

    /// Register `C`. Re-registering a type replaces its stored overrides.
    pub fn add_component<C: Component>(&mut self, overrides: Properties) -> &mut Self {
        self.add_component_type(ComponentType::of::<C>(), overrides)
    }

    /// Builder-style [`add_component`](Self::add_component).
    pub fn with_component<C: Component>(mut self, overrides: Properties) -> Self {
        self.add_component::<C>(overrides);
        self
    }

    /// Register a type known only at runtime, such as one looked up in a catalog.
    pub fn add_component_type(&mut self, component_type: ComponentType, overrides: Properties) -> &mut Self {
        match self.components.iter_mut().find(|(t, _)| *t == component_type) {
            Some((_, stored)) => *stored = overrides,
            None => self.components.push((component_type, overrides)),
        }
        self
    }

    /// Registered types, in registration order.
    pub fn component_types(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.components.iter().map(|(t, _)| *t)
    }

    /// Stored overrides for one registered type.
    pub fn overrides(&self, component_type: &ComponentType) -> Option<&Properties> {
        self.components
            .iter()
            .find(|(t, _)| t == component_type)
            .map(|(_, p)| p)
    }

    /// Number of registered component types.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Construct a fresh entity.
    ///
    /// Fails with [`EcsError::UnknownInitialProperty`] (names sorted) before
    /// anything is constructed when an override is not claimed by any type.
    pub fn make(&self, overrides: Properties) -> Result<Entity> {
        let mut remaining = overrides;
        let mut plan = Vec::with_capacity(self.components.len());

        for (component_type, stored) in &self.components {
            let mut properties = stored.clone();
            for name in component_type.initial_properties() {
                if let Some(value) = remaining.remove(name) {
                    properties.insert(*name, value);
                }
            }
            plan.push((component_type, properties));
        }

        if !remaining.is_empty() {
            return Err(EcsError::UnknownInitialProperty {
                names: remaining.names().map(str::to_string).collect(),
            });
        }

        let mut entity = Entity::new();
        for (component_type, properties) in plan {
            entity.attach_boxed(component_type.construct(&properties)?)?;
        }
        trace!(entity = %entity.id(), components = self.components.len(), "assembled entity");
        Ok(entity)
    }
}
