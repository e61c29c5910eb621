//! The world - owner of every entity and system, and host of the event bus.

mod events;

pub use events::*;

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::aspect::Aspect;
use crate::assemblage::Assemblage;
use crate::catalog::Catalog;
use crate::config::WorldConfig;
use crate::entities::{Capabilities, Component, Entity, EntityId, Properties, Value};
use crate::error::{EcsError, Result};
use crate::systems::{downcast_mut, downcast_ref, HookCallback, HookTable, HookTiming, System, SystemType};

struct SystemSlot {
    system_type: SystemType,
    /// `None` while the system is checked out by `refresh` or `call`.
    system: Option<Box<dyn System>>,
}

/// Owns the entity set, the registered systems, the named-event bus and
/// the method hook table.
///
/// Everything runs synchronously on the caller's thread. Entities, systems,
/// hooks and subscribers all iterate in the order they were added.
#[derive(Default)]
pub struct World {
    config: WorldConfig,
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    systems: Vec<SystemSlot>,
    step: u64,
    events: EventBus,
    hooks: HookTable,
    capabilities: Capabilities,
}

impl World {
    /// Create a new empty world with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty world with the given configuration.
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Settings this world was created with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Name used in logs and error messages.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Number of events published so far.
    pub fn step(&self) -> u64 {
        self.step
    }

    // ---------------------------------------------------------------- entities

    /// Create an entity, through `assemblage` when given, and add it.
    ///
    /// Without an assemblage the entity is bare, so any override is unknown.
    pub fn make_entity(&mut self, assemblage: Option<&Assemblage>, overrides: Properties) -> Result<EntityId> {
        let entity = match assemblage {
            Some(assemblage) => assemblage.make(overrides)?,
            None => Assemblage::new().make(overrides)?,
        };
        Ok(self.spawn(entity))
    }

    /// Adopt an entity built elsewhere.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        if self.entities.insert(id, entity).is_none() {
            self.order.push(id);
        }
        debug!(world = %self.config.name, entity = %id, "entity added");
        id
    }

    /// Remove and return an entity. Destroying twice is an error.
    pub fn destroy_entity(&mut self, entity: EntityId) -> Result<Entity> {
        let removed = self
            .entities
            .remove(&entity)
            .ok_or_else(|| not_a_member(&self.config, entity))?;
        self.order.retain(|id| *id != entity);
        debug!(world = %self.config.name, entity = %entity, "entity destroyed");
        Ok(removed)
    }

    /// Whether `entity` is currently in this world.
    pub fn contains(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Look up an entity. Fails with [`EcsError::NotAMember`] when absent.
    pub fn entity(&self, entity: EntityId) -> Result<&Entity> {
        self.entities
            .get(&entity)
            .ok_or_else(|| not_a_member(&self.config, entity))
    }

    /// Mutable [`entity`](Self::entity).
    pub fn entity_mut(&mut self, entity: EntityId) -> Result<&mut Entity> {
        match self.entities.get_mut(&entity) {
            Some(e) => Ok(e),
            None => Err(not_a_member(&self.config, entity)),
        }
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(move |id| self.entities.get(id))
    }

    /// Live entity ids in creation order.
    pub fn entity_ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Live entities matching `aspect`, in creation order.
    pub fn entities_with_aspect(&self, aspect: &Aspect) -> Vec<&Entity> {
        aspect.select_entities(self.entities())
    }

    /// Like [`entities_with_aspect`](Self::entities_with_aspect), but owned
    /// ids so the caller can mutate while walking them.
    pub fn entity_ids_with_aspect(&self, aspect: &Aspect) -> Vec<EntityId> {
        self.entities()
            .filter(|e| aspect.matches(e))
            .map(Entity::id)
            .collect()
    }

    // ------------------------------------------------------------ capabilities

    /// Declare that component `C` can be viewed as the trait object `T`.
    pub fn register_capability<C, T>(&mut self, as_ref: fn(&C) -> &T, as_mut: fn(&mut C) -> &mut T)
    where
        C: Component,
        T: ?Sized + 'static,
    {
        self.capabilities.register::<C, T>(as_ref, as_mut);
    }

    /// The trait bindings registered with this world.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// First component of `entity` viewable as `T`.
    pub fn get_trait<T: ?Sized + 'static>(&self, entity: EntityId) -> Result<&T> {
        self.entity(entity)?.get_trait::<T>(&self.capabilities)
    }

    /// Mutable [`get_trait`](Self::get_trait).
    pub fn get_trait_mut<T: ?Sized + 'static>(&mut self, entity: EntityId) -> Result<&mut T> {
        let capabilities = &self.capabilities;
        match self.entities.get_mut(&entity) {
            Some(e) => e.get_trait_mut::<T>(capabilities),
            None => Err(not_a_member(&self.config, entity)),
        }
    }

    // ----------------------------------------------------------------- systems

    /// Construct `S` bound to this world and register it.
    pub fn add_system<S: System>(&mut self) -> Result<&mut S> {
        let system = self.add_system_type(SystemType::of::<S>())?;
        downcast_mut::<S>(system).ok_or_else(|| EcsError::UnknownSystem {
            name: SystemType::of::<S>().name().to_string(),
        })
    }

    /// Construct and register a system from its registry entry.
    ///
    /// Fails with [`EcsError::DuplicateSystem`] when one of that type exists.
    pub fn add_system_type(&mut self, system_type: SystemType) -> Result<&mut dyn System> {
        if self.slot_index(system_type.id()).is_some() {
            return Err(EcsError::DuplicateSystem {
                name: system_type.name(),
            });
        }
        let system = system_type.build(self)?;
        let idx = self.systems.len();
        self.systems.push(SystemSlot {
            system_type,
            system: Some(system),
        });
        debug!(world = %self.config.name, system = system_type.name(), "system added");
        self.checked_in(idx)
    }

    /// Register the system the catalog knows as `name`.
    pub fn add_system_named(&mut self, catalog: &Catalog, name: &str) -> Result<&mut dyn System> {
        let system_type = catalog.system(name).ok_or_else(|| EcsError::NotASystemType {
            name: name.to_string(),
        })?;
        self.add_system_type(system_type)
    }

    /// Whether a system of type `S` is registered.
    pub fn has_system<S: System>(&self) -> bool {
        self.slot_index(TypeId::of::<S>()).is_some()
    }

    /// The registered system of type `S`.
    ///
    /// Fails with [`EcsError::UnknownSystem`] when absent and
    /// [`EcsError::SystemBusy`] while the system is running.
    pub fn system<S: System>(&self) -> Result<&S> {
        let idx = self.require_slot::<S>()?;
        let slot = &self.systems[idx];
        let system = slot.system.as_deref().ok_or(EcsError::SystemBusy {
            name: slot.system_type.name(),
        })?;
        downcast_ref::<S>(system).ok_or_else(unknown_system::<S>)
    }

    /// Mutable [`system`](Self::system).
    pub fn system_mut<S: System>(&mut self) -> Result<&mut S> {
        let idx = self.require_slot::<S>()?;
        let system = self.checked_in(idx)?;
        downcast_mut::<S>(system).ok_or_else(unknown_system::<S>)
    }

    /// Registered system names, in registration order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.system_type.name()).collect()
    }

    /// Run `update` on every system in registration order.
    ///
    /// Stops at the first failure; later systems do not run. Systems added
    /// during a refresh first run on the next one.
    pub fn refresh(&mut self) -> Result<()> {
        let count = self.systems.len();
        for idx in 0..count {
            let name = self.systems[idx].system_type.name();
            let mut system = self.systems[idx]
                .system
                .take()
                .ok_or(EcsError::SystemBusy { name })?;
            trace!(world = %self.config.name, system = name, "updating system");
            let result = system.update(self);
            self.systems[idx].system = Some(system);
            if let Err(err) = result {
                warn!(world = %self.config.name, system = name, error = %err, "refresh aborted");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Invoke a method of system `S` with its hooks.
    ///
    /// Runs the before hooks for `(S, method)` with `args`, then `body`, then
    /// the after hooks. The hook list is read once up front, so hooks added or
    /// removed while dispatching only affect later calls. When `body` fails
    /// the after hooks are skipped and the error is returned.
    pub fn call<S, R>(
        &mut self,
        method: &str,
        args: &[Value],
        body: impl FnOnce(&mut S, &mut World) -> Result<R>,
    ) -> Result<R>
    where
        S: System,
    {
        let idx = self.require_slot::<S>()?;
        let name = self.systems[idx].system_type.name();
        if self.systems[idx].system.is_none() {
            return Err(EcsError::SystemBusy { name });
        }

        let hooks = self.hooks.snapshot(TypeId::of::<S>(), method);
        if let Some(hooks) = &hooks {
            trace!(system = name, method, hooks = hooks.before.len(), "running before hooks");
            for hook in &hooks.before {
                hook(self, args);
            }
        }

        let mut system = self.systems[idx]
            .system
            .take()
            .ok_or(EcsError::SystemBusy { name })?;
        let result = match downcast_mut::<S>(&mut *system) {
            Some(s) => body(s, self),
            None => Err(unknown_system::<S>()),
        };
        self.systems[idx].system = Some(system);
        let value = result?;

        if let Some(hooks) = &hooks {
            trace!(system = name, method, hooks = hooks.after.len(), "running after hooks");
            for hook in &hooks.after {
                hook(self, args);
            }
        }
        Ok(value)
    }

    // ------------------------------------------------------------------- hooks

    /// Run `callback` before and/or after `method` on system `S`.
    pub fn subscribe_hook<S: System>(&mut self, method: &str, callback: HookCallback, timing: HookTiming) -> Result<()> {
        self.require_slot::<S>()?;
        self.add_hook(SystemType::of::<S>(), method, callback, timing)
    }

    /// Remove one registration of `callback` from the requested sides.
    pub fn unsubscribe_hook<S: System>(&mut self, method: &str, callback: &HookCallback, timing: HookTiming) -> Result<()> {
        if self.hooks.remove(TypeId::of::<S>(), method, callback, timing) {
            debug!(system = SystemType::of::<S>().name(), method, "hook removed");
            Ok(())
        } else {
            Err(EcsError::NotSubscribed {
                event: format!("{}.{}", SystemType::of::<S>().name(), method),
            })
        }
    }

    /// Name-based [`subscribe_hook`](Self::subscribe_hook).
    pub fn subscribe_named(
        &mut self,
        catalog: &Catalog,
        system: &str,
        method: &str,
        callback: &str,
        timing: HookTiming,
    ) -> Result<()> {
        let system_type = catalog.system(system).ok_or_else(|| EcsError::NotASystemType {
            name: system.to_string(),
        })?;
        let callback = catalog.hook(callback).ok_or_else(|| EcsError::NotCallable {
            name: callback.to_string(),
        })?;
        if self.slot_index(system_type.id()).is_none() {
            return Err(EcsError::UnknownSystem {
                name: system_type.name().to_string(),
            });
        }
        self.add_hook(system_type, method, callback, timing)
    }

    /// `(before, after)` hook counts for a method.
    pub fn hook_count<S: System>(&self, method: &str) -> (usize, usize) {
        self.hooks.count(TypeId::of::<S>(), method)
    }

    fn add_hook(&mut self, system_type: SystemType, method: &str, callback: HookCallback, timing: HookTiming) -> Result<()> {
        if timing.is_empty() {
            return Err(EcsError::MissingTiming {
                method: method.to_string(),
            });
        }
        self.hooks.add(system_type.id(), method, callback, timing);
        debug!(system = system_type.name(), method, before = timing.before, after = timing.after, "hook added");
        Ok(())
    }

    // ------------------------------------------------------------------ events

    /// Add `callback` to the subscribers of `event`.
    ///
    /// Subscribing the same callback twice makes it run twice per publish.
    pub fn subscribe(&mut self, event: &str, callback: EventCallback) {
        self.events.subscribe(event, callback);
        debug!(world = %self.config.name, event, "event subscribed");
    }

    /// Remove the first registration of `callback` for `event`.
    pub fn unsubscribe(&mut self, event: &str, callback: &EventCallback) -> Result<()> {
        if self.events.unsubscribe(event, callback) {
            debug!(world = %self.config.name, event, "event unsubscribed");
            Ok(())
        } else {
            Err(EcsError::NotSubscribed {
                event: event.to_string(),
            })
        }
    }

    /// Call every subscriber of `event` in subscription order and join their
    /// results with the configured separator. Advances the step counter.
    pub fn publish(&mut self, event: &str, args: &[Value]) -> String {
        let subscribers = self.events.subscribers(event);
        let results: Vec<String> = subscribers.iter().map(|callback| callback(args)).collect();
        self.step += 1;
        debug!(
            world = %self.config.name,
            event,
            subscribers = subscribers.len(),
            step = self.step,
            "event published"
        );
        results.join(&self.config.event_separator)
    }

    /// Number of registrations for `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.events.count(event)
    }

    // --------------------------------------------------------------- internals

    fn slot_index(&self, type_id: TypeId) -> Option<usize> {
        self.systems.iter().position(|s| s.system_type.id() == type_id)
    }

    fn require_slot<S: System>(&self) -> Result<usize> {
        self.slot_index(TypeId::of::<S>()).ok_or_else(unknown_system::<S>)
    }

    fn checked_in(&mut self, idx: usize) -> Result<&mut dyn System> {
        let slot = &mut self.systems[idx];
        match slot.system.as_mut() {
            Some(system) => Ok(&mut **system),
            None => Err(EcsError::SystemBusy {
                name: slot.system_type.name(),
            }),
        }
    }
}

fn not_a_member(config: &WorldConfig, entity: EntityId) -> EcsError {
    EcsError::NotAMember {
        world: config.name.clone(),
        entity,
    }
}

fn unknown_system<S: System>() -> EcsError {
    EcsError::UnknownSystem {
        name: SystemType::of::<S>().name().to_string(),
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("name", &self.config.name)
            .field("entities", &self.order.len())
            .field("systems", &self.system_names())
            .field("step", &self.step)
            .field("events", &self.events)
            .field("hooks", &self.hooks)
            .finish()
    }
}
