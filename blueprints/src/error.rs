//! Errors raised while loading or applying a blueprint.

use std::path::PathBuf;

use ecs_core::EcsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BlueprintError>;

#[derive(Debug, Error)]
pub enum BlueprintError {
    #[error("failed to read blueprint {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid blueprint: {0}")]
    Parse(#[from] toml::de::Error),

    /// A component name in an assemblage that the catalog does not know.
    #[error("assemblage `{assemblage}` uses unknown component `{name}`")]
    UnknownComponent { assemblage: String, name: String },

    #[error("no assemblage named `{name}`")]
    UnknownAssemblage { name: String },

    #[error(transparent)]
    Ecs(#[from] EcsError),
}
