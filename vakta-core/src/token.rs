//! Batch-subscription tokens.

use std::rc::Rc;

use crate::entry::EntryRef;
use crate::watchable::Watchable;

/// Handle to the registrations created by one manifest subscription.
///
/// Destroying the token removes exactly those entries, by identity rather
/// than by callback match, wherever they currently live: they may have migrated
/// from single to list storage, or been copied by a concurrent dispatch.
/// Unrelated listeners on the same events are untouched. Dropping a token
/// without calling [`destroy`](Self::destroy) leaves its listeners
/// registered.
pub struct SubscriptionToken {
    source: Watchable,
    entries: Vec<EntryRef>,
}

impl SubscriptionToken {
    pub(crate) fn new(source: Watchable, entries: Vec<EntryRef>) -> Self {
        SubscriptionToken { source, entries }
    }

    /// The source the token's listeners were registered on.
    pub fn source(&self) -> &Watchable {
        &self.source
    }

    /// Number of registrations this token covers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the manifest created no registrations (all duplicates).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every registration this token created.
    pub fn destroy(self) {
        let Some(registry) = self.source.registry_if_present() else {
            return;
        };
        for entry in &self.entries {
            let Some(event) = entry.owner.clone() else {
                continue;
            };
            if registry.remove_where(&event, |candidate| Rc::ptr_eq(candidate, entry)) {
                self.source.notify_unwatch(&event);
            }
        }
    }

    /// Alias of [`destroy`](Self::destroy).
    pub fn close(self) {
        self.destroy();
    }
}
