//! The blueprint document and its TOML shape.
//!
//! ```toml
//! [world]
//! name = "duel"
//! systems = ["movement"]
//!
//! [assemblages.wand]
//! components = [
//!     { type = "equipment", equipment_type = "wand" },
//!     { type = "moveable" },
//! ]
//!
//! [[hooks]]
//! system = "movement"
//! method = "move"
//! callback = "announce"
//! after = true
//! ```
//!
//! Component, system and callback names are resolved against an
//! [`ecs_core::Catalog`] when the blueprint is applied, not when it is parsed.

mod book;

pub use book::*;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use ecs_core::{Assemblage, Catalog, EcsError, HookTiming, Properties, World, WorldConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BlueprintError, Result};

/// A parsed blueprint document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Blueprint {
    #[serde(default)]
    pub world: WorldSection,

    /// Assemblage definitions keyed by name.
    #[serde(default)]
    pub assemblages: BTreeMap<String, AssemblageSpec>,

    #[serde(default)]
    pub hooks: Vec<HookSpec>,
}

/// The `[world]` table: world settings plus the systems to install.
///
/// Unknown keys are rejected so a misspelled `systems` fails loudly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldSection {
    /// Name used in logs and error messages.
    pub name: String,

    /// Joins subscriber results when an event is published.
    pub event_separator: String,

    /// Catalog names of systems, installed in this order.
    pub systems: Vec<String>,
}

impl Default for WorldSection {
    fn default() -> Self {
        let WorldConfig { name, event_separator } = WorldConfig::default();
        Self {
            name,
            event_separator,
            systems: Vec::new(),
        }
    }
}

impl WorldSection {
    /// Settings the world is created with.
    pub fn config(&self) -> WorldConfig {
        WorldConfig {
            name: self.name.clone(),
            event_separator: self.event_separator.clone(),
        }
    }
}

/// One `[assemblages.<name>]` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblageSpec {
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

/// One component of an assemblage: its catalog name and stored overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub properties: Properties,
}

/// A `[[hooks]]` entry subscribing a catalog callback to a system method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookSpec {
    pub system: String,
    pub method: String,
    pub callback: String,
    #[serde(default)]
    pub before: bool,
    #[serde(default)]
    pub after: bool,
}

impl HookSpec {
    /// The `before` / `after` flags as a [`HookTiming`].
    pub fn timing(&self) -> HookTiming {
        HookTiming {
            before: self.before,
            after: self.after,
        }
    }
}

impl AssemblageSpec {
    /// Resolve component names through `catalog`.
    ///
    /// Stored overrides must be initial properties of their component.
    pub fn resolve(&self, name: &str, catalog: &Catalog) -> Result<Assemblage> {
        let mut assemblage = Assemblage::new();
        for component in &self.components {
            let component_type =
                catalog
                    .component(&component.kind)
                    .ok_or_else(|| BlueprintError::UnknownComponent {
                        assemblage: name.to_string(),
                        name: component.kind.clone(),
                    })?;

            let undeclared: Vec<String> = component
                .properties
                .names()
                .filter(|p| !component_type.declares(p))
                .map(str::to_string)
                .collect();
            if !undeclared.is_empty() {
                return Err(EcsError::UnknownInitialProperty { names: undeclared }.into());
            }

            assemblage.add_component_type(component_type, component.properties.clone());
        }
        Ok(assemblage)
    }
}

impl Blueprint {
    /// Parse a blueprint from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let blueprint: Blueprint = toml::from_str(source)?;
        debug!(
            world = %blueprint.world.name,
            assemblages = blueprint.assemblages.len(),
            systems = blueprint.world.systems.len(),
            hooks = blueprint.hooks.len(),
            "blueprint parsed"
        );
        Ok(blueprint)
    }

    /// Read and parse a blueprint file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| BlueprintError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Resolve every assemblage definition against `catalog`.
    pub fn assemblages(&self, catalog: &Catalog) -> Result<AssemblageBook> {
        let mut book = AssemblageBook::new();
        for (name, spec) in &self.assemblages {
            book.insert(name.clone(), spec.resolve(name, catalog)?);
        }
        Ok(book)
    }

    /// Create a world with the configured settings, systems and hooks.
    ///
    /// Systems are installed in listed order before any hook is subscribed,
    /// so hooks may name any listed system.
    pub fn build_world(&self, catalog: &Catalog) -> Result<World> {
        let mut world = World::with_config(self.world.config());
        for system in &self.world.systems {
            world.add_system_named(catalog, system)?;
        }
        for hook in &self.hooks {
            world.subscribe_named(catalog, &hook.system, &hook.method, &hook.callback, hook.timing())?;
        }
        debug!(
            world = %world.name(),
            systems = self.world.systems.len(),
            hooks = self.hooks.len(),
            "world built from blueprint"
        );
        Ok(world)
    }
}
