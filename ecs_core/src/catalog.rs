//! Name-based registry of component types, system types and hook callbacks.
//!
//! Data-driven setup (and anything else that only has a name in hand) goes
//! through a catalog. This is the one place where "not a system" and "not
//! callable" are runtime questions rather than compile errors.

use std::collections::HashMap;
use std::rc::Rc;

use crate::entities::{Component, ComponentType, Value};
use crate::systems::{HookCallback, System, SystemType};
use crate::world::World;

#[derive(Clone)]
enum Entry {
    Component(ComponentType),
    System(SystemType),
    Hook(HookCallback),
}

#[derive(Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, Entry>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` under `name`, replacing any previous entry.
    pub fn register_component<C: Component>(&mut self, name: impl Into<String>) -> &mut Self {
        self.entries
            .insert(name.into(), Entry::Component(ComponentType::of::<C>()));
        self
    }

    /// Register system type `S` under `name`, replacing any previous entry.
    pub fn register_system<S: System>(&mut self, name: impl Into<String>) -> &mut Self {
        self.entries
            .insert(name.into(), Entry::System(SystemType::of::<S>()));
        self
    }

    /// Register a hook callback under `name`, replacing any previous entry.
    pub fn register_hook<F>(&mut self, name: impl Into<String>, callback: F) -> &mut Self
    where
        F: Fn(&mut World, &[Value]) + 'static,
    {
        self.entries
            .insert(name.into(), Entry::Hook(Rc::new(callback)));
        self
    }

    /// Component type registered as `name`, if `name` names one.
    pub fn component(&self, name: &str) -> Option<ComponentType> {
        match self.entries.get(name) {
            Some(Entry::Component(t)) => Some(*t),
            _ => None,
        }
    }

    /// System type registered as `name`, if `name` names one.
    pub fn system(&self, name: &str) -> Option<SystemType> {
        match self.entries.get(name) {
            Some(Entry::System(t)) => Some(*t),
            _ => None,
        }
    }

    /// Hook callback registered as `name`, if `name` names one.
    pub fn hook(&self, name: &str) -> Option<HookCallback> {
        match self.entries.get(name) {
            Some(Entry::Hook(h)) => Some(Rc::clone(h)),
            _ => None,
        }
    }

    /// Whether anything is registered as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Every registered name, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("Catalog").field("names", &names).finish()
    }
}
