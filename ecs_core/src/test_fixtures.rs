//! Components and systems shared by the unit tests.

use crate::aspect::Aspect;
use crate::entities::{Component, EntityId, Properties, Value};
use crate::error::{EcsError, Result};
use crate::systems::System;
use crate::world::World;

fn invalid(component: &'static str, property: &str, expected: &'static str) -> EcsError {
    EcsError::InvalidProperty {
        component,
        property: property.to_string(),
        expected,
    }
}

/// Something that can die.
pub trait Mortal {
    fn is_alive(&self) -> bool;
    fn kill(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alive {
    pub alive: bool,
}

impl Default for Alive {
    fn default() -> Self {
        Self { alive: true }
    }
}

impl Alive {
    pub fn die(&mut self) {
        self.alive = false;
    }
}

impl Mortal for Alive {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn kill(&mut self) {
        self.die();
    }
}

impl Component for Alive {
    fn initial_properties() -> &'static [&'static str] {
        &["alive"]
    }

    fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self {
            alive: properties.bool_or("Alive", "alive", true)?,
        })
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "alive").then_some(Value::Bool(self.alive))
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match (name, value) {
            ("alive", Value::Bool(alive)) => {
                self.alive = alive;
                Ok(())
            }
            ("alive", _) => Err(invalid("Alive", name, "bool")),
            _ => Err(EcsError::attribute_not_found("Alive", name)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portable;

impl Component for Portable {
    fn from_properties(_: &Properties) -> Result<Self> {
        Ok(Portable)
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "is_portable").then_some(Value::Bool(true))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub inventory: Vec<EntityId>,
}

impl Container {
    pub fn pick_up(&mut self, thing: EntityId) {
        if !self.inventory.contains(&thing) {
            self.inventory.push(thing);
        }
    }

    pub fn put_down(&mut self, thing: EntityId) -> bool {
        let before = self.inventory.len();
        self.inventory.retain(|t| *t != thing);
        before != self.inventory.len()
    }
}

impl Component for Container {
    fn initial_properties() -> &'static [&'static str] {
        &["inventory"]
    }

    fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self {
            inventory: properties.entity_list("Container", "inventory")?,
        })
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "inventory").then(|| Value::from(self.inventory.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Moveable {
    pub v_x: i64,
    pub v_y: i64,
}

impl Component for Moveable {
    fn initial_properties() -> &'static [&'static str] {
        &["v_x", "v_y"]
    }

    fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self {
            v_x: properties.int_or("Moveable", "v_x", 0)?,
            v_y: properties.int_or("Moveable", "v_y", 0)?,
        })
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "v_x" => Some(Value::Int(self.v_x)),
            "v_y" => Some(Value::Int(self.v_y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub x: i64,
    pub y: i64,
}

impl Component for Location {
    fn initial_properties() -> &'static [&'static str] {
        &["x", "y"]
    }

    fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self {
            x: properties.int_or("Location", "x", 0)?,
            y: properties.int_or("Location", "y", 0)?,
        })
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "x" => Some(Value::Int(self.x)),
            "y" => Some(Value::Int(self.y)),
            _ => None,
        }
    }
}

/// Component with plain state for manager tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labelled {
    pub number: i64,
    pub letter: String,
}

impl Component for Labelled {
    fn initial_properties() -> &'static [&'static str] {
        &["number", "letter"]
    }

    fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self {
            number: properties.int_or("Labelled", "number", 0)?,
            letter: properties.text_or("Labelled", "letter", "")?,
        })
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "number" => Some(Value::Int(self.number)),
            "letter" => Some(Value::Text(self.letter.clone())),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        match (name, value) {
            ("number", Value::Int(n)) => self.number = n,
            ("letter", Value::Text(s)) => self.letter = s,
            ("number", _) => return Err(invalid("Labelled", name, "int")),
            ("letter", _) => return Err(invalid("Labelled", name, "text")),
            _ => return Err(EcsError::attribute_not_found("Labelled", name)),
        }
        Ok(())
    }
}

/// Moves portable things into containers; publishes "updated" on update.
pub struct ContainerSystem {
    aspect: Aspect,
    pub updates: usize,
    pub seen: usize,
    pub puts: usize,
}

impl System for ContainerSystem {
    fn from_world(_world: &World) -> Result<Self> {
        Ok(Self {
            aspect: Aspect::default().with_all::<Container>(),
            updates: 0,
            seen: 0,
            puts: 0,
        })
    }

    fn aspect(&self) -> &Aspect {
        &self.aspect
    }

    fn update(&mut self, world: &mut World) -> Result<()> {
        self.updates += 1;
        self.seen = self.entities(world).len();
        world.publish("updated", &[Value::from("containers")]);
        Ok(())
    }
}

impl ContainerSystem {
    pub fn put(world: &mut World, thing: EntityId, container: EntityId) -> Result<()> {
        world.call::<Self, _>("put", &[thing.into(), container.into()], |system, world| {
            system.put_inner(world, thing, container)
        })
    }

    fn put_inner(&mut self, world: &mut World, thing: EntityId, container: EntityId) -> Result<()> {
        if !world.entity(thing)?.has_component::<Portable>() {
            return Err(EcsError::ComponentMissing {
                entity: thing,
                component: "Portable",
            });
        }
        world
            .entity_mut(container)?
            .get_component_mut::<Container>()?
            .pick_up(thing);
        self.puts += 1;
        world.publish("log", &[Value::from("body")]);
        Ok(())
    }
}

/// Counts living things; publishes "updated" on update.
pub struct LifeSystem {
    aspect: Aspect,
    pub living: usize,
}

impl System for LifeSystem {
    fn from_world(world: &World) -> Result<Self> {
        let aspect = Aspect::default().with_all::<Alive>();
        let living = world.entities_with_aspect(&aspect).len();
        Ok(Self { aspect, living })
    }

    fn aspect(&self) -> &Aspect {
        &self.aspect
    }

    fn update(&mut self, world: &mut World) -> Result<()> {
        self.living = self
            .entities(world)
            .into_iter()
            .filter(|e| e.get_component::<Alive>().map(|a| a.alive).unwrap_or(false))
            .count();
        world.publish("updated", &[Value::from("life")]);
        Ok(())
    }
}

/// Always fails to update.
pub struct BrokenSystem {
    aspect: Aspect,
}

impl System for BrokenSystem {
    fn from_world(_world: &World) -> Result<Self> {
        Ok(Self {
            aspect: Aspect::default(),
        })
    }

    fn aspect(&self) -> &Aspect {
        &self.aspect
    }

    fn update(&mut self, _world: &mut World) -> Result<()> {
        Err(EcsError::attribute_not_found("BrokenSystem", "update"))
    }
}
