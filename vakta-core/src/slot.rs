//! Per-event storage cells with copy-on-write iteration safety.
//!
//! A slot holds the subscribers of one event (or the relay links of one
//! source): exactly one entry stored directly, or an ordered list paired
//! with a count of dispatch passes currently iterating it. An empty slot
//! does not exist; the owning map drops the key instead.
//!
//! The list is never structurally mutated while a pass is iterating it.
//! Mutations that find `active > 0` first install a detached copy (with the
//! count reset) and change that, leaving the original, and the snapshot any
//! in-flight pass is walking, untouched. A single entry needs no such care:
//! iterating it means holding it by value, so the map entry can simply be
//! replaced.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Ordered entry list plus the number of passes currently iterating it.
pub(crate) struct CowList<T> {
    items: RefCell<Vec<T>>,
    active: Cell<usize>,
}

impl<T: Clone> CowList<T> {
    pub(crate) fn pair(first: T, second: T) -> Self {
        Self::from_vec(vec![first, second])
    }

    pub(crate) fn from_vec(items: Vec<T>) -> Self {
        CowList {
            items: RefCell::new(items),
            active: Cell::new(0),
        }
    }

    /// Shallow copy with the iteration count reset.
    fn detached(&self) -> Self {
        Self::from_vec(self.items.borrow().clone())
    }

    pub(crate) fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub(crate) fn get(&self, index: usize) -> T {
        self.items.borrow()[index].clone()
    }

    /// Mark an iteration as in flight. The count drops again when the guard
    /// does, even if a listener panics mid-pass.
    fn begin(&self) -> ActiveGuard<'_, T> {
        self.active.set(self.active.get() + 1);
        ActiveGuard(self)
    }
}

struct ActiveGuard<'a, T>(&'a CowList<T>);

impl<T> Drop for ActiveGuard<'_, T> {
    fn drop(&mut self) {
        self.0.active.set(self.0.active.get() - 1);
    }
}

/// Storage cell for one event's subscribers or one source's relay links.
#[derive(Clone)]
pub(crate) enum Slot<T> {
    /// Exactly one entry, stored directly.
    One(T),
    /// Two or more entries, in registration order.
    Many(Rc<CowList<T>>),
}

/// Outcome of [`Slot::remove_where`].
pub(crate) enum SlotRemoval {
    NotFound,
    Removed,
    /// The last entry matched; the caller must drop the map key.
    Emptied,
}

impl<T: Clone> Slot<T> {
    pub(crate) fn single(item: T) -> Self {
        Slot::One(item)
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Slot::One(_) => 1,
            Slot::Many(list) => list.len(),
        }
    }

    pub(crate) fn any(&self, pred: impl Fn(&T) -> bool) -> bool {
        match self {
            Slot::One(item) => pred(item),
            Slot::Many(list) => list.items.borrow().iter().any(|item| pred(item)),
        }
    }

    pub(crate) fn to_vec(&self) -> Vec<T> {
        match self {
            Slot::One(item) => vec![item.clone()],
            Slot::Many(list) => list.items.borrow().clone(),
        }
    }

    /// Append an entry, detaching the list first if a pass is iterating it.
    pub(crate) fn push(&mut self, item: T) {
        match self {
            Slot::One(first) => {
                *self = Slot::Many(Rc::new(CowList::pair(first.clone(), item)));
            }
            Slot::Many(list) => {
                if list.active.get() > 0 {
                    *list = Rc::new(list.detached());
                }
                list.items.borrow_mut().push(item);
            }
        }
    }

    /// Remove the last entry matching `pred`, detaching first if a pass is
    /// iterating. A list that drops to one entry collapses back to
    /// [`Slot::One`].
    pub(crate) fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> SlotRemoval {
        match self {
            Slot::One(item) => {
                if pred(item) {
                    SlotRemoval::Emptied
                } else {
                    SlotRemoval::NotFound
                }
            }
            Slot::Many(list) => {
                let index = list.items.borrow().iter().rposition(|item| pred(item));
                let Some(index) = index else {
                    return SlotRemoval::NotFound;
                };
                if list.active.get() > 0 {
                    *list = Rc::new(list.detached());
                }
                let remaining = {
                    let mut items = list.items.borrow_mut();
                    items.remove(index);
                    if items.len() == 1 { Some(items[0].clone()) } else { None }
                };
                if let Some(last) = remaining {
                    *self = Slot::One(last);
                }
                SlotRemoval::Removed
            }
        }
    }

    /// Concatenate two slots into a fresh detached list, `a`'s entries
    /// first. Always yields [`Slot::Many`].
    pub(crate) fn concat(a: &Slot<T>, b: &Slot<T>) -> Slot<T> {
        let mut items = a.to_vec();
        items.extend(b.to_vec());
        Slot::Many(Rc::new(CowList::from_vec(items)))
    }

    /// Visit the entries present when the call began, stopping early when
    /// `visit` returns `true`. Returns whether iteration stopped early.
    ///
    /// No interior borrow is held while `visit` runs, so a visit is free to
    /// re-enter any mutation path; the active-count guard redirects those
    /// mutations onto a detached copy.
    pub(crate) fn each_until(&self, mut visit: impl FnMut(&T) -> bool) -> bool {
        match self {
            Slot::One(item) => visit(item),
            Slot::Many(list) => {
                let _guard = list.begin();
                let count = list.len();
                for index in 0..count {
                    let item = list.get(index);
                    if visit(&item) {
                        return true;
                    }
                }
                false
            }
        }
    }
}
