//! Union merge: permanent registry sharing between two sources.

use std::rc::Rc;

use crate::registry::Registry;
use crate::watchable::Watchable;

/// Make `a` and `b` share one registry, permanently.
///
/// Afterwards the two sources are indistinguishable with respect to
/// subscription state: adding or removing on either affects both. There is
/// no un-merge.
///
/// When only one side has a registry, the other adopts it by reference;
/// when both do, every event of `b`'s registry is merged into `a`'s:
/// events absent from `a` are adopted by reference, events present on both
/// sides are concatenated (`a`'s entries first) into a fresh list open for
/// mutation. `b` is then repointed at the result. The adopting side's watch
/// hook is notified for each event it newly observes.
pub fn unify(a: &Watchable, b: &Watchable) {
    let registry_a = a.registry_if_present();
    let registry_b = b.registry_if_present();

    match (registry_a, registry_b) {
        (Some(ra), Some(rb)) => {
            if Rc::ptr_eq(&ra, &rb) {
                return;
            }
            let adopted = ra.merge_from(&rb);
            b.replace_registry(ra);
            for event in adopted {
                a.notify_watch(&event);
            }
        }
        (Some(ra), None) => {
            b.replace_registry(ra);
        }
        (None, Some(rb)) => {
            let events = rb.event_names();
            a.replace_registry(rb);
            for event in events {
                a.notify_watch(&event);
            }
        }
        (None, None) => {
            let shared = Rc::new(Registry::default());
            a.replace_registry(shared.clone());
            b.replace_registry(shared);
        }
    }
}
