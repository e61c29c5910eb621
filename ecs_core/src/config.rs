//! World configuration.

use serde::{Deserialize, Serialize};

/// Settings a [`World`](crate::World) is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Name used in logs and error messages.
    pub name: String,

    /// Joins subscriber results in [`World::publish`](crate::World::publish).
    pub event_separator: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            event_separator: "\n".to_string(),
        }
    }
}

impl WorldConfig {
    /// Default settings with a custom world name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
