//! Named-event publish/subscribe.

use std::collections::HashMap;
use std::rc::Rc;

use crate::entities::Value;

/// Subscriber to a named event. Its return value is collected by `publish`.
pub type EventCallback = Rc<dyn Fn(&[Value]) -> String>;

/// Subscriber lists keyed by event name.
///
/// A list, not a set: subscribing the same callback twice calls it twice.
#[derive(Default)]
pub(crate) struct EventBus {
    subscribers: HashMap<String, Vec<EventCallback>>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, event: &str, callback: EventCallback) {
        self.subscribers
            .entry(event.to_string())
            .or_default()
            .push(callback);
    }

    /// Remove the first registration of `callback`. Returns whether it was found.
    pub(crate) fn unsubscribe(&mut self, event: &str, callback: &EventCallback) -> bool {
        let Some(list) = self.subscribers.get_mut(event) else {
            return false;
        };
        let Some(idx) = list.iter().position(|c| Rc::ptr_eq(c, callback)) else {
            return false;
        };
        list.remove(idx);
        if list.is_empty() {
            self.subscribers.remove(event);
        }
        true
    }

    /// Subscribers of `event`, cloned so dispatch does not hold the table.
    pub(crate) fn subscribers(&self, event: &str) -> Vec<EventCallback> {
        self.subscribers.get(event).cloned().unwrap_or_default()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.subscribers.get(event).map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.subscribers.len())
            .finish()
    }
}
