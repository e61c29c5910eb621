//! Trait capability lookup.
//!
//! Instead of searching components for an attribute by name at runtime, a
//! component type registers up front which trait objects it can be viewed
//! as. [`Entity::get_trait`](super::Entity::get_trait) then asks each
//! attached component, in attach order, whether a binding exists.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use super::Component;

trait Cast<T: ?Sized> {
    fn cast<'a>(&self, component: &'a dyn Any) -> Option<&'a T>;
    fn cast_mut<'a>(&self, component: &'a mut dyn Any) -> Option<&'a mut T>;
}

struct Binding<C, T: ?Sized> {
    as_ref: fn(&C) -> &T,
    as_mut: fn(&mut C) -> &mut T,
}

impl<C: 'static, T: ?Sized> Cast<T> for Binding<C, T> {
    fn cast<'a>(&self, component: &'a dyn Any) -> Option<&'a T> {
        component.downcast_ref::<C>().map(|c| (self.as_ref)(c))
    }

    fn cast_mut<'a>(&self, component: &'a mut dyn Any) -> Option<&'a mut T> {
        component.downcast_mut::<C>().map(|c| (self.as_mut)(c))
    }
}

/// Registry of `(component type, trait object type)` bindings.
#[derive(Default)]
pub struct Capabilities {
    // Values are `Box<dyn Cast<T>>` for the trait object type in the key.
    bindings: HashMap<(TypeId, TypeId), Box<dyn Any>>,
}

impl Capabilities {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that component `C` can be viewed as `T`.
    ///
    /// ```ignore
    /// capabilities.register::<Alive, dyn Mortal>(|c| c, |c| c);
    /// ```
    pub fn register<C, T>(&mut self, as_ref: fn(&C) -> &T, as_mut: fn(&mut C) -> &mut T)
    where
        C: Component,
        T: ?Sized + 'static,
    {
        let binding: Box<dyn Cast<T>> = Box::new(Binding { as_ref, as_mut });
        self.bindings
            .insert((TypeId::of::<C>(), TypeId::of::<T>()), Box::new(binding));
    }

    /// Whether the component type `component` has a binding to `T`.
    pub fn provides<T: ?Sized + 'static>(&self, component: TypeId) -> bool {
        self.bindings
            .contains_key(&(component, TypeId::of::<T>()))
    }

    pub(crate) fn view<'a, T: ?Sized + 'static>(&self, component: &'a dyn Component) -> Option<&'a T> {
        let any = component.as_any();
        self.binding::<T>(any.type_id())?.cast(any)
    }

    pub(crate) fn view_mut<'a, T: ?Sized + 'static>(
        &self,
        component: &'a mut dyn Component,
    ) -> Option<&'a mut T> {
        let any = component.as_any_mut();
        let binding = self.binding::<T>((*any).type_id())?;
        binding.cast_mut(any)
    }

    fn binding<T: ?Sized + 'static>(&self, component: TypeId) -> Option<&dyn Cast<T>> {
        self.bindings
            .get(&(component, TypeId::of::<T>()))
            .and_then(|b| b.downcast_ref::<Box<dyn Cast<T>>>())
            .map(|b| &**b)
    }
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("bindings", &self.bindings.len())
            .finish()
    }
}
