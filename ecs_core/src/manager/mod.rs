//! Managers - secondary indexes from component property values to entities.

use std::collections::HashMap;

use tracing::trace;

use crate::entities::{Component, ComponentType, Entity, EntityId, Value};
use crate::error::{EcsError, Result};

/// Indexes the entities carrying one component type by property value.
///
/// Indexes are snapshots taken at registration time. Changing a component
/// afterwards does not move its entity between buckets; register it again
/// (or [`unregister`](Self::unregister) first) to pick up the new value.
/// Registering the same entity twice lists it twice.
#[derive(Debug, Clone)]
pub struct Manager {
    component_type: ComponentType,
    properties: Vec<String>,
    /// property name -> value -> entities, in registration order.
    indexes: HashMap<String, HashMap<Value, Vec<EntityId>>>,
    /// entity -> indexed values seen at each of its registrations.
    registered: HashMap<EntityId, Vec<Vec<Value>>>,
}

impl Manager {
    /// Index every initial property of `C`.
    pub fn new<C: Component>() -> Self {
        let component_type = ComponentType::of::<C>();
        Self::for_type(component_type, component_type.initial_properties().iter().copied())
    }

    /// Index an explicit list of properties of `C`.
    pub fn with_properties<C: Component>(properties: &[&str]) -> Self {
        Self::for_type(ComponentType::of::<C>(), properties.iter().copied())
    }

    /// Index `properties` of an already resolved component type.
    pub fn for_type<'a>(component_type: ComponentType, properties: impl IntoIterator<Item = &'a str>) -> Self {
        let properties: Vec<String> = properties.into_iter().map(str::to_string).collect();
        let indexes = properties
            .iter()
            .map(|p| (p.clone(), HashMap::new()))
            .collect();
        Self {
            component_type,
            properties,
            indexes,
            registered: HashMap::new(),
        }
    }

    /// The component type whose properties are indexed.
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    /// Indexed property names, in the order they were given.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Add `entity` to the bucket of each indexed property's current value.
    pub fn register(&mut self, entity: &Entity) -> Result<()> {
        let component = entity
            .component_by_type(self.component_type.id())
            .ok_or(EcsError::ComponentMissing {
                entity: entity.id(),
                component: self.component_type.name(),
            })?;

        let values = self
            .properties
            .iter()
            .map(|p| {
                component
                    .property(p)
                    .ok_or_else(|| EcsError::attribute_not_found(self.component_type, p))
            })
            .collect::<Result<Vec<_>>>()?;

        for (property, value) in self.properties.iter().zip(&values) {
            self.indexes
                .entry(property.clone())
                .or_default()
                .entry(value.clone())
                .or_default()
                .push(entity.id());
        }
        trace!(entity = %entity.id(), component = self.component_type.name(), "registered with manager");
        self.registered.entry(entity.id()).or_default().push(values);
        Ok(())
    }

    /// Drop every bucket entry for `entity`. Returns whether it was registered.
    pub fn unregister(&mut self, entity: EntityId) -> bool {
        let Some(snapshots) = self.registered.remove(&entity) else {
            return false;
        };
        for values in snapshots {
            for (property, value) in self.properties.iter().zip(values) {
                if let Some(index) = self.indexes.get_mut(property) {
                    if let Some(bucket) = index.get_mut(&value) {
                        bucket.retain(|e| *e != entity);
                        if bucket.is_empty() {
                            index.remove(&value);
                        }
                    }
                }
            }
        }
        trace!(entity = %entity, component = self.component_type.name(), "unregistered from manager");
        true
    }

    /// Entities registered with `property == value`. Empty when none are.
    pub fn entities_by(&self, property: &str, value: &Value) -> Result<&[EntityId]> {
        let index = self
            .indexes
            .get(property)
            .ok_or_else(|| EcsError::attribute_not_found(self, format!("entities_by_{}", property)))?;
        Ok(index.get(value).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Distinct values currently indexed for `property`.
    pub fn values(&self, property: &str) -> impl Iterator<Item = &Value> {
        self.indexes.get(property).into_iter().flat_map(|index| index.keys())
    }

    /// Whether `entity` has been registered and not unregistered since.
    pub fn is_registered(&self, entity: EntityId) -> bool {
        self.registered.contains_key(&entity)
    }

    /// Registered entities, in no particular order.
    pub fn registered(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.registered.keys().copied()
    }
}

impl std::fmt::Display for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Manager<{}>", self.component_type)
    }
}
