use std::collections::BTreeMap;

use ecs_core::{Assemblage, EntityId, Properties, World};
use tracing::trace;

use crate::error::{BlueprintError, Result};

/// Named assemblages resolved from a blueprint.
#[derive(Debug, Clone, Default)]
pub struct AssemblageBook {
    assemblages: BTreeMap<String, Assemblage>,
}

impl AssemblageBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the assemblage called `name`.
    pub fn insert(&mut self, name: impl Into<String>, assemblage: Assemblage) -> Option<Assemblage> {
        self.assemblages.insert(name.into(), assemblage)
    }

    /// The assemblage called `name`.
    ///
    /// Fails with [`BlueprintError::UnknownAssemblage`] when absent.
    pub fn get(&self, name: &str) -> Result<&Assemblage> {
        self.assemblages
            .get(name)
            .ok_or_else(|| BlueprintError::UnknownAssemblage {
                name: name.to_string(),
            })
    }

    /// Assemblage names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assemblages.keys().map(String::as_str)
    }

    /// Number of assemblages.
    pub fn len(&self) -> usize {
        self.assemblages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assemblages.is_empty()
    }

    /// Make an entity from the assemblage called `name` and add it to `world`.
    pub fn make(&self, world: &mut World, name: &str, overrides: Properties) -> Result<EntityId> {
        let entity = world.make_entity(Some(self.get(name)?), overrides)?;
        trace!(assemblage = name, entity = %entity, "assembled from book");
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::Moveable;

    #[test]
    fn test_unknown_assemblage() {
        let book = AssemblageBook::new();
        let mut world = World::new();
        let err = book.make(&mut world, "wand", Properties::new()).unwrap_err();
        assert!(matches!(err, BlueprintError::UnknownAssemblage { ref name } if name == "wand"));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_insert_replaces() {
        let mut book = AssemblageBook::new();
        assert!(book.insert("rock", Assemblage::new()).is_none());
        assert!(book
            .insert("rock", Assemblage::new().with_component::<Moveable>(Properties::new()))
            .is_some());
        assert_eq!(book.len(), 1);
        assert_eq!(book.get("rock").unwrap().len(), 1);
    }
}
