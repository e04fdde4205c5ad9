//! Per-source mapping from event name to listener slot.
//!
//! Created lazily on the first subscription and owned behind `Rc` so that
//! [`unify`](crate::unify) can make two sources share one instance. A slot
//! that empties is removed from the map entirely; `contains_key` is the
//! has-listeners test.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::callback::Callback;
use crate::entry::EntryRef;
use crate::scope::ScopeRef;
use crate::slot::{Slot, SlotRemoval};

#[derive(Default)]
pub(crate) struct Registry {
    slots: RefCell<HashMap<Rc<str>, Slot<EntryRef>>>,
}

/// Outcome of [`Registry::add`].
pub(crate) enum Added {
    /// First listener for this event (the watch hook fires).
    First,
    Appended,
    /// An entry with the same unwrapped callback and scope already exists.
    Duplicate,
}

impl Registry {
    /// Register `entry` unless an equal registration already exists.
    pub(crate) fn add(&self, name: &str, entry: EntryRef) -> Added {
        let mut slots = self.slots.borrow_mut();
        match slots.get_mut(name) {
            None => {
                let key: Rc<str> = entry.owner.clone().unwrap_or_else(|| Rc::from(name));
                slots.insert(key, Slot::single(entry));
                Added::First
            }
            Some(slot) => {
                if slot.any(|existing| existing.matches(&entry.callback, entry.scope.as_ref())) {
                    return Added::Duplicate;
                }
                slot.push(entry);
                Added::Appended
            }
        }
    }

    /// Remove the last entry matching `pred`. Returns `true` when the
    /// event's slot emptied and was dropped from the map.
    pub(crate) fn remove_where(&self, name: &str, pred: impl Fn(&EntryRef) -> bool) -> bool {
        let mut slots = self.slots.borrow_mut();
        let Some(slot) = slots.get_mut(name) else {
            return false;
        };
        match slot.remove_where(pred) {
            SlotRemoval::NotFound | SlotRemoval::Removed => false,
            SlotRemoval::Emptied => {
                slots.remove(name);
                true
            }
        }
    }

    /// Unwrap-and-compare removal, as used by `un`.
    pub(crate) fn remove_matching(
        &self,
        name: &str,
        probe: &Callback,
        scope: Option<&ScopeRef>,
    ) -> bool {
        self.remove_where(name, |entry| entry.matches(probe, scope))
    }

    /// Cheap snapshot handle of one event's slot.
    pub(crate) fn slot(&self, name: &str) -> Option<Slot<EntryRef>> {
        self.slots.borrow().get(name).cloned()
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.slots.borrow().contains_key(name)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Drop one event's listeners, or every event's.
    pub(crate) fn clear(&self, name: Option<&str>) {
        let mut slots = self.slots.borrow_mut();
        match name {
            Some(name) => {
                slots.remove(name);
            }
            None => slots.clear(),
        }
    }

    pub(crate) fn event_names(&self) -> Vec<Rc<str>> {
        self.slots.borrow().keys().cloned().collect()
    }

    /// Merge every slot of `other` into `self`: events absent here adopt the
    /// other slot by reference; events present on both sides concatenate
    /// into a fresh detached list (our entries first). Returns the names
    /// adopted outright, for watch notification.
    pub(crate) fn merge_from(&self, other: &Registry) -> Vec<Rc<str>> {
        let mut adopted = Vec::new();
        let source = other.slots.borrow();
        let mut target = self.slots.borrow_mut();
        for (name, slot) in source.iter() {
            match target.get_mut(name) {
                None => {
                    target.insert(name.clone(), slot.clone());
                    adopted.push(name.clone());
                }
                Some(existing) => {
                    let merged = Slot::concat(existing, slot);
                    *existing = merged;
                }
            }
        }
        adopted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::listener;
    use crate::entry::ListenerEntry;

    fn entry(callback: &Callback) -> EntryRef {
        Rc::new(ListenerEntry {
            callback: callback.clone(),
            actual: None,
            scope: None,
            resolve: false,
            owner: None,
        })
    }

    #[test]
    fn test_add_reports_first_and_appended() {
        let registry = Registry::default();
        let a = listener(|_| {});
        let b = listener(|_| {});

        assert!(matches!(registry.add("foo", entry(&a)), Added::First));
        assert!(matches!(registry.add("foo", entry(&b)), Added::Appended));
        assert!(registry.has("foo"));
    }

    #[test]
    fn test_add_ignores_duplicates() {
        let registry = Registry::default();
        let a = listener(|_| {});

        assert!(matches!(registry.add("foo", entry(&a)), Added::First));
        assert!(matches!(registry.add("foo", entry(&a)), Added::Duplicate));
        assert_eq!(registry.slot("foo").unwrap().len(), 1);
    }

    #[test]
    fn test_remove_drops_emptied_event() {
        let registry = Registry::default();
        let a = listener(|_| {});

        registry.add("foo", entry(&a));
        assert!(registry.remove_matching("foo", &a, None));
        assert!(!registry.has("foo"));

        // Absent listeners and absent events are silent no-ops.
        assert!(!registry.remove_matching("foo", &a, None));
    }

    #[test]
    fn test_merge_concatenates_shared_events() {
        let left = Registry::default();
        let right = Registry::default();
        let a = listener(|_| {});
        let b = listener(|_| {});
        let c = listener(|_| {});

        left.add("foo", entry(&a));
        right.add("foo", entry(&b));
        right.add("bar", entry(&c));

        let adopted = left.merge_from(&right);
        assert_eq!(adopted.len(), 1);
        assert_eq!(&*adopted[0], "bar");
        assert_eq!(left.slot("foo").unwrap().len(), 2);
        assert!(left.has("bar"));
    }
}
