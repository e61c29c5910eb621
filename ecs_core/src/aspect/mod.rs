//! Aspects - predicates over the set of component types on an entity.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;

use crate::entities::{Component, ComponentType, Entity};

/// Selects entities by which component types they carry.
///
/// An entity matches when it has every type in `all_of`, none of the types
/// in `exclude`, and at least one of the types in `some_of` (an empty
/// `some_of` places no constraint). The default aspect matches everything.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Aspect {
    all_of: HashSet<ComponentType>,
    exclude: HashSet<ComponentType>,
    some_of: HashSet<ComponentType>,
}

impl Aspect {
    /// Create an aspect from explicit clause sets.
    pub fn new(
        all_of: impl IntoIterator<Item = ComponentType>,
        exclude: impl IntoIterator<Item = ComponentType>,
        some_of: impl IntoIterator<Item = ComponentType>,
    ) -> Self {
        Self {
            all_of: all_of.into_iter().collect(),
            exclude: exclude.into_iter().collect(),
            some_of: some_of.into_iter().collect(),
        }
    }

    /// Require `C`.
    pub fn with_all<C: Component>(mut self) -> Self {
        self.all_of.insert(ComponentType::of::<C>());
        self
    }

    /// Reject entities carrying `C`.
    pub fn with_exclude<C: Component>(mut self) -> Self {
        self.exclude.insert(ComponentType::of::<C>());
        self
    }

    /// Accept entities carrying `C` or any other `some_of` type.
    pub fn with_some<C: Component>(mut self) -> Self {
        self.some_of.insert(ComponentType::of::<C>());
        self
    }

    pub fn all_of(&self) -> &HashSet<ComponentType> {
        &self.all_of
    }

    pub fn exclude(&self) -> &HashSet<ComponentType> {
        &self.exclude
    }

    pub fn some_of(&self) -> &HashSet<ComponentType> {
        &self.some_of
    }

    /// Whether `entity` satisfies every clause.
    pub fn matches(&self, entity: &Entity) -> bool {
        let types: HashSet<TypeId> = entity.component_types().collect();
        self.matches_types(&types)
    }

    /// The predicate itself, over a bare set of type ids.
    pub fn matches_types(&self, types: &HashSet<TypeId>) -> bool {
        self.all_of.iter().all(|t| types.contains(&t.id()))
            && !self.exclude.iter().any(|t| types.contains(&t.id()))
            && (self.some_of.is_empty() || self.some_of.iter().any(|t| types.contains(&t.id())))
    }

    /// Matching entities, in the order they were given.
    pub fn select_entities<'a, I>(&self, entities: I) -> Vec<&'a Entity>
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        entities.into_iter().filter(|e| self.matches(e)).collect()
    }
}

impl fmt::Debug for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn names(set: &HashSet<ComponentType>) -> Vec<&'static str> {
            let mut names: Vec<_> = set.iter().map(ComponentType::name).collect();
            names.sort_unstable();
            names
        }
        f.debug_struct("Aspect")
            .field("all_of", &names(&self.all_of))
            .field("exclude", &names(&self.exclude))
            .field("some_of", &names(&self.some_of))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{Alive, Container, Location, Moveable, Portable};
    use proptest::prelude::*;

    struct Zoo {
        cat: Entity,
        plant: Entity,
        bathtub: Entity,
        brains: Entity,
        zombie: Entity,
    }

    impl Zoo {
        fn new() -> Self {
            Self {
                cat: Entity::new()
                    .with(Alive::default())
                    .and_then(|e| e.with(Portable))
                    .and_then(|e| e.with(Container::default()))
                    .unwrap(),
                plant: Entity::new().with(Alive::default()).unwrap(),
                bathtub: Entity::new().with(Container::default()).unwrap(),
                brains: Entity::new()
                    .with(Portable)
                    .and_then(|e| e.with(Location::default()))
                    .unwrap(),
                zombie: Entity::new()
                    .with(Moveable::default())
                    .and_then(|e| e.with(Location::default()))
                    .and_then(|e| e.with(Container::default()))
                    .unwrap(),
            }
        }

        fn all(&self) -> Vec<&Entity> {
            vec![&self.cat, &self.plant, &self.bathtub, &self.brains, &self.zombie]
        }

        fn ids(selected: Vec<&Entity>) -> Vec<crate::EntityId> {
            selected.into_iter().map(Entity::id).collect()
        }
    }

    #[test]
    fn test_all_of() {
        let zoo = Zoo::new();
        let aspect = Aspect::default().with_all::<Alive>().with_all::<Portable>();

        assert!(aspect.matches(&zoo.cat));
        assert!(!aspect.matches(&zoo.plant));
        assert!(!aspect.matches(&zoo.bathtub));
        assert!(!aspect.matches(&zoo.brains));
        assert!(!aspect.matches(&zoo.zombie));

        assert_eq!(
            Zoo::ids(aspect.select_entities(zoo.all())),
            vec![zoo.cat.id()]
        );
    }

    #[test]
    fn test_exclude() {
        let zoo = Zoo::new();
        let aspect = Aspect::default().with_exclude::<Container>();

        assert!(!aspect.matches(&zoo.cat));
        assert!(aspect.matches(&zoo.plant));
        assert!(!aspect.matches(&zoo.bathtub));
        assert!(aspect.matches(&zoo.brains));
        assert!(!aspect.matches(&zoo.zombie));

        assert_eq!(
            Zoo::ids(aspect.select_entities(zoo.all())),
            vec![zoo.plant.id(), zoo.brains.id()]
        );
    }

    #[test]
    fn test_some_of() {
        let zoo = Zoo::new();
        let aspect = Aspect::default().with_some::<Location>().with_some::<Container>();

        assert!(aspect.matches(&zoo.cat));
        assert!(!aspect.matches(&zoo.plant));
        assert!(aspect.matches(&zoo.bathtub));
        assert!(aspect.matches(&zoo.brains));
        assert!(aspect.matches(&zoo.zombie));
    }

    #[test]
    fn test_combined_clauses() {
        let zoo = Zoo::new();
        let aspect = Aspect::new(
            [ComponentType::of::<Container>()],
            [ComponentType::of::<Moveable>()],
            [
                ComponentType::of::<Location>(),
                ComponentType::of::<Portable>(),
                ComponentType::of::<Alive>(),
            ],
        );

        assert_eq!(
            Zoo::ids(aspect.select_entities(zoo.all())),
            vec![zoo.cat.id()]
        );
    }

    #[test]
    fn test_empty_aspect_matches_everything() {
        let zoo = Zoo::new();
        assert_eq!(Aspect::default().select_entities(zoo.all()).len(), 5);
        assert!(Aspect::default().matches(&Entity::new()));
    }

    #[test]
    fn test_match_ignores_component_state() {
        let aspect = Aspect::default().with_all::<Alive>().with_exclude::<Location>();
        let mut plant = Entity::new().with(Alive::default()).unwrap();
        assert!(aspect.matches(&plant));

        plant.get_component_mut::<Alive>().unwrap().die();
        assert!(aspect.matches(&plant));
    }

    fn build(mask: u8) -> Entity {
        let mut entity = Entity::new();
        if mask & 1 != 0 {
            entity.attach(Alive::default()).unwrap();
        }
        if mask & 2 != 0 {
            entity.attach(Portable).unwrap();
        }
        if mask & 4 != 0 {
            entity.attach(Container::default()).unwrap();
        }
        if mask & 8 != 0 {
            entity.attach(Location::default()).unwrap();
        }
        entity
    }

    proptest! {
        #[test]
        fn prop_match_depends_only_on_types(mask in 0u8..16, alive in any::<bool>(), x in any::<i64>()) {
            let aspect = Aspect::default().with_all::<Alive>().with_some::<Location>().with_some::<Portable>();

            let plain = build(mask);
            let mut tweaked = build(mask);
            if let Ok(a) = tweaked.get_component_mut::<Alive>() {
                a.alive = alive;
            }
            if let Ok(l) = tweaked.get_component_mut::<Location>() {
                l.x = x;
            }

            prop_assert_eq!(aspect.matches(&plain), aspect.matches(&tweaked));
        }

        #[test]
        fn prop_all_of_is_superset(mask in 0u8..16) {
            let aspect = Aspect::default().with_all::<Alive>().with_all::<Portable>();
            let entity = build(mask);
            prop_assert_eq!(aspect.matches(&entity), mask & 3 == 3);
        }
    }
}
