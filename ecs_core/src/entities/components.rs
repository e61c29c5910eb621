//! The component contract and its type registry entry.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{Properties, Value};
use crate::error::{EcsError, Result};

/// Upcast helper so trait objects can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A plain data holder attached to an [`Entity`](super::Entity).
///
/// Components expose their state as named properties so that assemblages,
/// managers and attribute pass-through can reach it without knowing the
/// concrete type.
pub trait Component: AsAny + fmt::Debug {
    /// Property names an assemblage may supply when constructing this type.
    fn initial_properties() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// Construct from initial values. Missing names take the defaults.
    fn from_properties(properties: &Properties) -> Result<Self>
    where
        Self: Sized;

    /// Current value of a named property, if this component exposes it.
    fn property(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Overwrite a named property.
    fn set_property(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(EcsError::attribute_not_found(self.component_name(), name))
    }

    fn component_name(&self) -> &'static str {
        short_type_name(std::any::type_name_of_val(self))
    }
}

/// Registry entry describing a concrete component type.
///
/// Identity is the [`TypeId`]; the rest is what dynamic surfaces (aspects,
/// assemblages, managers, the catalog) need to talk about the type.
#[derive(Clone, Copy)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
    initial_properties: &'static [&'static str],
    construct: fn(&Properties) -> Result<Box<dyn Component>>,
}

impl ComponentType {
    /// Registry entry for `C`.
    pub fn of<C: Component>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: short_type_name(std::any::type_name::<C>()),
            initial_properties: C::initial_properties(),
            construct: construct_boxed::<C>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Short type name, e.g. `Alive`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn initial_properties(&self) -> &'static [&'static str] {
        self.initial_properties
    }

    /// Whether `property` is one of this type's initial properties.
    pub fn declares(&self, property: &str) -> bool {
        self.initial_properties.contains(&property)
    }

    /// Build a boxed component from initial values.
    pub fn construct(&self, properties: &Properties) -> Result<Box<dyn Component>> {
        (self.construct)(properties)
    }
}

fn construct_boxed<C: Component>(properties: &Properties) -> Result<Box<dyn Component>> {
    Ok(Box::new(C::from_properties(properties)?))
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ComponentType {}

impl Hash for ComponentType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// `my_crate::module::Alive` -> `Alive`. Generic arguments are kept as is.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
