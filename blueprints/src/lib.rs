//! # Blueprints
//!
//! Data-driven world setup for `ecs_core`. A blueprint is a TOML document
//! naming the world's settings, the systems to install, the assemblages to
//! offer and the hooks to subscribe. Names are resolved against a
//! [`Catalog`](ecs_core::Catalog) the host application fills in.

pub mod document;
pub mod error;

#[cfg(test)]
mod test_fixtures;

pub use document::*;
pub use error::{BlueprintError, Result};
