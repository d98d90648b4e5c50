//! Global key-press bindings.
//!
//! A [`KeyBinding`] is registered for as long as it is alive; dropping it
//! removes the handler. Keys match case-insensitively ("Escape" == "escape").
//! At most one handler exists per (key, action) pair: binding a pair that is
//! already bound takes it over, and the older binding's drop becomes a no-op.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

struct Handler<A> {
    id: u64,
    key: String,
    action: A,
}

struct Registry<A> {
    next_id: u64,
    handlers: Vec<Handler<A>>,
}

pub struct KeyListener<A> {
    registry: Rc<RefCell<Registry<A>>>,
}

pub struct KeyBinding<A> {
    id: u64,
    registry: Weak<RefCell<Registry<A>>>,
}

fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

impl<A: Clone + PartialEq> KeyListener<A> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    pub fn bind(&self, key: &str, action: A) -> KeyBinding<A> {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = registry.next_id;
        let key_code = normalize(key);
        registry.release_pair(&key_code, &action, id);
        registry.handlers.push(Handler {
            id,
            key: key_code,
            action,
        });
        trace!("Bound key '{}' (handler {})", key, id);
        KeyBinding {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Actions bound to `code`, in registration order.
    pub fn dispatch(&self, code: &str) -> Vec<A> {
        let code = normalize(code);
        self.registry
            .borrow()
            .handlers
            .iter()
            .filter(|h| h.key == code)
            .map(|h| h.action.clone())
            .collect()
    }

}

impl<A: PartialEq> Registry<A> {
    /// Drop every handler other than `keep` bound to the same pair.
    fn release_pair(&mut self, key: &str, action: &A, keep: u64) {
        let before = self.handlers.len();
        self.handlers.retain(|h| h.id == keep || h.key != key || h.action != *action);
        if self.handlers.len() != before {
            trace!("Replaced existing handler for key '{}'", key);
        }
    }
}

impl<A: Clone + PartialEq> Default for KeyListener<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq> KeyBinding<A> {
    /// Point this binding at a new key and/or action. Unchanged pairs are
    /// left alone; returns whether anything was replaced.
    pub fn rebind(&mut self, key: &str, action: A) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.borrow_mut();
        let key = normalize(key);
        if !registry.handlers.iter().any(|h| h.id == self.id) {
            return false;
        }
        registry.release_pair(&key, &action, self.id);
        match registry.handlers.iter_mut().find(|h| h.id == self.id) {
            Some(handler) if handler.key == key && handler.action == action => false,
            Some(handler) => {
                handler.key = key;
                handler.action = action;
                true
            }
            None => false,
        }
    }
}

impl<A> Drop for KeyBinding<A> {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().handlers.retain(|h| h.id != self.id);
            trace!("Released key handler {}", self.id);
        }
    }
}

impl<A> std::fmt::Debug for KeyBinding<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyBinding").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Action {
        Close,
        Focus,
    }

    #[test]
    fn test_dispatch_case_insensitive() {
        let keys = KeyListener::new();
        let _escape = keys.bind("Escape", Action::Close);
        assert_eq!(keys.dispatch("escape"), vec![Action::Close]);
        assert_eq!(keys.dispatch("ESCAPE"), vec![Action::Close]);
        assert!(keys.dispatch("Enter").is_empty());
    }

    #[test]
    fn test_drop_deregisters() {
        let keys = KeyListener::new();
        let escape = keys.bind("Escape", Action::Close);
        let _enter = keys.bind("Enter", Action::Focus);
        assert_eq!(keys.dispatch("Escape"), vec![Action::Close]);

        drop(escape);
        assert!(keys.dispatch("Escape").is_empty());
        assert_eq!(keys.dispatch("Enter"), vec![Action::Focus]);
    }

    #[test]
    fn test_rebind_replaces_single_handler() {
        let keys = KeyListener::new();
        let mut binding = keys.bind("Escape", Action::Close);

        assert!(!binding.rebind("escape", Action::Close));
        assert!(binding.rebind("Enter", Action::Focus));
        assert!(keys.dispatch("Escape").is_empty());
        assert_eq!(keys.dispatch("Enter"), vec![Action::Focus]);
    }

    #[test]
    fn test_same_pair_fires_once() {
        let keys = KeyListener::new();
        let first = keys.bind("Escape", Action::Close);
        let second = keys.bind("escape", Action::Close);
        assert_eq!(keys.dispatch("Escape"), vec![Action::Close]);

        // The older binding no longer owns the handler
        drop(first);
        assert_eq!(keys.dispatch("Escape"), vec![Action::Close]);
        drop(second);
        assert!(keys.dispatch("Escape").is_empty());
    }

    #[test]
    fn test_rebind_onto_bound_pair_fires_once() {
        let keys = KeyListener::new();
        let _close = keys.bind("Escape", Action::Close);
        let mut other = keys.bind("Enter", Action::Close);

        assert!(other.rebind("Escape", Action::Close));
        assert_eq!(keys.dispatch("Escape"), vec![Action::Close]);
        assert!(keys.dispatch("Enter").is_empty());
    }

    #[test]
    fn test_binding_outliving_listener() {
        let keys = KeyListener::new();
        let mut binding = keys.bind("Escape", Action::Close);
        drop(keys);
        assert!(!binding.rebind("Enter", Action::Focus));
        drop(binding);
    }
}
