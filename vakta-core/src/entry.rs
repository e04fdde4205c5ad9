//! A single listener registration.

use std::rc::Rc;

use crate::callback::Callback;
use crate::scope::ScopeRef;

/// One registered listener: the callback to invoke, its scope, and the
/// bookkeeping needed for removal.
///
/// Entries are shared behind `Rc` so that copies made by the slots'
/// copy-on-write discipline keep their identity; a subscription token can
/// then remove exactly the entries it created, wherever they migrated.
pub(crate) struct ListenerEntry {
    /// What dispatch invokes. For `once` registrations this is the
    /// self-removing wrapper.
    pub(crate) callback: Callback,
    /// Back-reference from a `once` wrapper to the callback it guards.
    pub(crate) actual: Option<Callback>,
    pub(crate) scope: Option<ScopeRef>,
    /// Resolve the scope through the host hook at dispatch time.
    pub(crate) resolve: bool,
    /// Owning event name, set only for entries created through a manifest.
    pub(crate) owner: Option<Rc<str>>,
}

pub(crate) type EntryRef = Rc<ListenerEntry>;

impl ListenerEntry {
    /// The callback this entry stands for, unwrapping `once` wrappers.
    pub(crate) fn unwrapped(&self) -> &Callback {
        self.actual.as_ref().unwrap_or(&self.callback)
    }

    /// Dedup/removal match: unwrapped callback and scope must both agree.
    pub(crate) fn matches(&self, probe: &Callback, scope: Option<&ScopeRef>) -> bool {
        self.unwrapped().same(probe) && scope_same(self.scope.as_ref(), scope)
    }
}

fn scope_same(a: Option<&ScopeRef>, b: Option<&ScopeRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same(b),
        _ => false,
    }
}
