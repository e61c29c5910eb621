//! Systems - behavior bound to an aspect, plus method interception hooks.
//!
//! A system lives inside its [`World`] and is handed the world on every
//! call. Methods that should be observable by hooks are routed through
//! [`World::call`], which runs the before hooks, the body, then the after
//! hooks for that `(system, method)` pair.

mod hooks;

pub use hooks::*;

use std::any::TypeId;
use std::fmt;

use crate::aspect::Aspect;
use crate::entities::{short_type_name, AsAny, Entity};
use crate::error::Result;
use crate::world::World;

/// Stateful behavior operating on the entities matching one aspect.
pub trait System: AsAny {
    /// Construct the system bound to `world`.
    fn from_world(world: &World) -> Result<Self>
    where
        Self: Sized;

    fn aspect(&self) -> &Aspect;

    fn update(&mut self, world: &mut World) -> Result<()>;

    /// Entities in `world` currently matching this system's aspect.
    ///
    /// Recomputed on every call.
    fn entities<'w>(&self, world: &'w World) -> Vec<&'w Entity> {
        world.entities_with_aspect(self.aspect())
    }

    fn contains(&self, entity: &Entity) -> bool {
        self.aspect().matches(entity)
    }
}

/// Registry entry describing a concrete system type.
#[derive(Clone, Copy)]
pub struct SystemType {
    id: TypeId,
    name: &'static str,
    build: fn(&World) -> Result<Box<dyn System>>,
}

impl SystemType {
    /// Registry entry for `S`.
    pub fn of<S: System>() -> Self {
        Self {
            id: TypeId::of::<S>(),
            name: short_type_name(std::any::type_name::<S>()),
            build: build_boxed::<S>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Short type name, e.g. `ContainerSystem`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn build(&self, world: &World) -> Result<Box<dyn System>> {
        (self.build)(world)
    }
}

fn build_boxed<S: System>(world: &World) -> Result<Box<dyn System>> {
    Ok(Box::new(S::from_world(world)?))
}

impl PartialEq for SystemType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SystemType {}

impl fmt::Debug for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn downcast_ref<S: System>(system: &dyn System) -> Option<&S> {
    system.as_any().downcast_ref::<S>()
}

pub(crate) fn downcast_mut<S: System>(system: &mut dyn System) -> Option<&mut S> {
    system.as_any_mut().downcast_mut::<S>()
}
