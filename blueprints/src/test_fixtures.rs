//! Components, systems and a catalog for blueprint tests.

use ecs_core::{Aspect, Catalog, Component, EcsError, EntityId, Properties, Result, System, Value, World};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Equipment {
    pub equipment_type: String,
}

impl Component for Equipment {
    fn initial_properties() -> &'static [&'static str] {
        &["equipment_type"]
    }

    fn from_properties(properties: &Properties) -> Result<Self> {
        Ok(Self {
            equipment_type: properties.text_or("Equipment", "equipment_type", "")?,
        })
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "equipment_type").then(|| Value::from(self.equipment_type.as_str()))
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

    fn set_property(&mut self, name: &str, value: Value) -> Result<()> {
        let slot = match name {
            "v_x" => &mut self.v_x,
            "v_y" => &mut self.v_y,
            _ => return Err(EcsError::AttributeNotFound {
                target: "Moveable".into(),
                attribute: name.into(),
            }),
        };
        *slot = value.as_int().ok_or_else(|| EcsError::InvalidProperty {
            component: "Moveable",
            property: name.to_string(),
            expected: "int",
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub inventory: Vec<EntityId>,
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

/// Nudges moveable things along the x axis.
pub struct Movement {
    aspect: Aspect,
}

impl System for Movement {
    fn from_world(_world: &World) -> Result<Self> {
        Ok(Self {
            aspect: Aspect::default().with_all::<Moveable>(),
        })
    }

    fn aspect(&self) -> &Aspect {
        &self.aspect
    }

    fn update(&mut self, world: &mut World) -> Result<()> {
        for id in world.entity_ids_with_aspect(&self.aspect) {
            world.entity_mut(id)?.get_component_mut::<Moveable>()?.v_x += 1;
        }
        Ok(())
    }
}

impl Movement {
    pub fn shift(world: &mut World, entity: EntityId) -> Result<()> {
        world.call::<Self, _>("move", &[entity.into()], |_, world| {
            world
                .entity_mut(entity)?
                .get_component_mut::<Moveable>()?
                .v_x += 1;
            Ok(())
        })
    }
}

pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register_component::<Equipment>("equipment")
        .register_component::<Moveable>("moveable")
        .register_component::<Container>("container")
        .register_system::<Movement>("movement")
        .register_hook("announce", |world, args| {
            world.publish("moved", args);
        });
    catalog
}
