//! Before/after hooks on system methods.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::entities::Value;
use crate::world::World;

/// Observer run around a system method, with the method's arguments.
///
/// Hooks see the world but cannot change the arguments or stop the call.
pub type HookCallback = Rc<dyn Fn(&mut World, &[Value])>;

/// When a hook runs relative to the method body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HookTiming {
    pub before: bool,
    pub after: bool,
}

impl HookTiming {
    pub const BEFORE: HookTiming = HookTiming {
        before: true,
        after: false,
    };

    pub const AFTER: HookTiming = HookTiming {
        before: false,
        after: true,
    };

    pub const AROUND: HookTiming = HookTiming {
        before: true,
        after: true,
    };

    /// True when the hook would run neither before nor after.
    pub fn is_empty(&self) -> bool {
        !self.before && !self.after
    }
}

#[derive(Default, Clone)]
pub(crate) struct MethodHooks {
    pub(crate) before: Vec<HookCallback>,
    pub(crate) after: Vec<HookCallback>,
}

impl MethodHooks {
    fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }
}

/// Hooks keyed by system type and method name, in registration order.
#[derive(Default)]
pub(crate) struct HookTable {
    hooks: HashMap<(TypeId, String), MethodHooks>,
}

impl HookTable {
    pub(crate) fn add(&mut self, system: TypeId, method: &str, callback: HookCallback, timing: HookTiming) {
        let entry = self.hooks.entry((system, method.to_string())).or_default();
        if timing.before {
            entry.before.push(Rc::clone(&callback));
        }
        if timing.after {
            entry.after.push(callback);
        }
    }

    /// Remove the first registration of `callback` on each requested side.
    /// Returns whether anything was removed.
    pub(crate) fn remove(&mut self, system: TypeId, method: &str, callback: &HookCallback, timing: HookTiming) -> bool {
        let key = (system, method.to_string());
        let Some(entry) = self.hooks.get_mut(&key) else {
            return false;
        };
        let mut removed = false;
        if timing.before {
            removed |= remove_first(&mut entry.before, callback);
        }
        if timing.after {
            removed |= remove_first(&mut entry.after, callback);
        }
        if entry.is_empty() {
            self.hooks.remove(&key);
        }
        removed
    }

    /// Snapshot of the hooks for one method, taken at dispatch start.
    pub(crate) fn snapshot(&self, system: TypeId, method: &str) -> Option<MethodHooks> {
        self.hooks.get(&(system, method.to_string())).cloned()
    }

    pub(crate) fn count(&self, system: TypeId, method: &str) -> (usize, usize) {
        self.hooks
            .get(&(system, method.to_string()))
            .map(|h| (h.before.len(), h.after.len()))
            .unwrap_or((0, 0))
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable")
            .field("methods", &self.hooks.len())
            .finish()
    }
}

fn remove_first(list: &mut Vec<HookCallback>, callback: &HookCallback) -> bool {
    match list.iter().position(|h| Rc::ptr_eq(h, callback)) {
        Some(idx) => {
            list.remove(idx);
            true
        }
        None => false,
    }
}
