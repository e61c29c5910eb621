//! # ECS Core
//!
//! A small entity-component-system runtime. Entities are bags of typed
//! components, aspects select entities by component membership,
//! assemblages stamp out pre-configured entities, managers index entities
//! by component property values, and systems run behavior over the
//! entities their aspect selects.
//!
//! A [`World`] owns everything and also hosts a named-event bus and the
//! method hook table used to observe system calls.

pub mod aspect;
pub mod assemblage;
pub mod catalog;
pub mod config;
pub mod entities;
pub mod error;
pub mod manager;
pub mod systems;
pub mod world;

#[cfg(test)]
mod test_fixtures;

pub use aspect::Aspect;
pub use assemblage::Assemblage;
pub use catalog::Catalog;
pub use config::WorldConfig;
pub use entities::*;
pub use error::{EcsError, Result};
pub use manager::Manager;
pub use systems::*;
pub use world::*;
