//! Entities and the components attached to them.

mod capabilities;
mod components;
mod value;

pub use capabilities::*;
pub use components::*;
pub use value::*;

use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use uuid::Uuid;

use crate::error::{EcsError, Result};

/// Unique identifier for all entities. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An identity plus the components attached to it.
///
/// At most one component of any concrete type is attached at a time;
/// components keep the order they were attached in, which is also the order
/// attribute lookups search them.
pub struct Entity {
    id: EntityId,
    components: Vec<Box<dyn Component>>,
}

impl Entity {
    /// Create a bare entity with a fresh identifier.
    pub fn new() -> Self {
        Self {
            id: EntityId::new(),
            components: Vec::new(),
        }
    }

    /// The entity's immutable identifier.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Attach a component. Fails if one of the same type is already attached.
    pub fn attach<C: Component>(&mut self, component: C) -> Result<()> {
        self.attach_boxed(Box::new(component))
    }

    /// Builder-style [`attach`](Self::attach).
    pub fn with<C: Component>(mut self, component: C) -> Result<Self> {
        self.attach(component)?;
        Ok(self)
    }

    /// Attach an already boxed component, as built by a [`ComponentType`].
    pub fn attach_boxed(&mut self, component: Box<dyn Component>) -> Result<()> {
        let type_id = (*component).as_any().type_id();
        if self.has_component_type(type_id) {
            return Err(EcsError::DuplicateComponent {
                entity: self.id,
                component: component.component_name(),
            });
        }
        self.components.push(component);
        Ok(())
    }

    /// Remove and return the component of type `C`.
    pub fn detach<C: Component>(&mut self) -> Result<C> {
        let idx = self
            .position(TypeId::of::<C>())
            .ok_or_else(|| self.missing::<C>())?;
        let boxed = self.components.remove(idx).into_any();
        match boxed.downcast::<C>() {
            Ok(component) => Ok(*component),
            Err(_) => Err(self.missing::<C>()),
        }
    }

    /// The attached component of type `C`.
    ///
    /// Fails with [`EcsError::AttributeNotFound`] when none is attached.
    pub fn get_component<C: Component>(&self) -> Result<&C> {
        self.components
            .iter()
            .find_map(|c| (**c).as_any().downcast_ref::<C>())
            .ok_or_else(|| self.missing::<C>())
    }

    /// Mutable [`get_component`](Self::get_component).
    pub fn get_component_mut<C: Component>(&mut self) -> Result<&mut C> {
        let Some(idx) = self.position(TypeId::of::<C>()) else {
            return Err(self.missing::<C>());
        };
        let id = self.id;
        (*self.components[idx])
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or_else(|| EcsError::attribute_not_found(id, ComponentType::of::<C>().name()))
    }

    /// Whether a component of type `C` is attached.
    pub fn has_component<C: Component>(&self) -> bool {
        self.has_component_type(TypeId::of::<C>())
    }

    pub fn has_component_type(&self, type_id: TypeId) -> bool {
        self.position(type_id).is_some()
    }

    /// Type-erased access used by managers.
    pub fn component_by_type(&self, type_id: TypeId) -> Option<&dyn Component> {
        self.position(type_id).map(|idx| &*self.components[idx])
    }

    /// Type ids of the attached components, in attach order.
    pub fn component_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.components.iter().map(|c| (**c).as_any().type_id())
    }

    /// Attached components, in attach order.
    pub fn components(&self) -> impl Iterator<Item = &dyn Component> + '_ {
        self.components.iter().map(|c| &**c)
    }

    /// Short names of the attached components, in attach order.
    pub fn component_names(&self) -> Vec<&'static str> {
        self.components.iter().map(|c| c.component_name()).collect()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Value of the first component (attach order) exposing `name`.
    pub fn attribute(&self, name: &str) -> Result<Value> {
        self.components
            .iter()
            .find_map(|c| c.property(name))
            .ok_or_else(|| EcsError::attribute_not_found(self, name))
    }

    /// Write `value` through to the first component exposing `name`.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let id = self.id;
        match self
            .components
            .iter_mut()
            .find(|c| c.property(name).is_some())
        {
            Some(component) => component.set_property(name, value.into()),
            None => Err(EcsError::attribute_not_found(id, name)),
        }
    }

    /// First component (attach order) viewable as `T`.
    pub fn get_trait<T: ?Sized + 'static>(&self, capabilities: &Capabilities) -> Result<&T> {
        self.components
            .iter()
            .find_map(|c| capabilities.view::<T>(&**c))
            .ok_or_else(|| EcsError::attribute_not_found(self, std::any::type_name::<T>()))
    }

    /// Mutable [`get_trait`](Self::get_trait).
    pub fn get_trait_mut<T: ?Sized + 'static>(&mut self, capabilities: &Capabilities) -> Result<&mut T> {
        let id = self.id;
        let Some(idx) = self
            .components
            .iter()
            .position(|c| capabilities.provides::<T>((**c).as_any().type_id()))
        else {
            return Err(EcsError::attribute_not_found(id, std::any::type_name::<T>()));
        };
        capabilities
            .view_mut::<T>(&mut *self.components[idx])
            .ok_or_else(|| EcsError::attribute_not_found(id, std::any::type_name::<T>()))
    }

    fn position(&self, type_id: TypeId) -> Option<usize> {
        self.components
            .iter()
            .position(|c| (**c).as_any().type_id() == type_id)
    }

    fn missing<C: Component>(&self) -> EcsError {
        EcsError::attribute_not_found(self, ComponentType::of::<C>().name())
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}) - [{}]", self.id, self.component_names().join(", "))
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &self.components)
            .finish()
    }
}
