//! The event source: subscription API and dispatch engine.
//!
//! A [`Watchable`] is a cheap-clone handle to one source's state: its lazily
//! created registry, its relay links, and its optional host hooks. Clones
//! refer to the same source; a host embeds one as a private field (usually
//! surfaced through [`EventSource`](crate::EventSource)).
//!
//! Dispatch is synchronous and re-entrant: a listener may register, remove,
//! fire, destroy tokens, or unify on any source, including the one
//! currently firing, before the outer `fire` returns. The slots'
//! copy-on-write discipline guarantees that every pass visits exactly the
//! entries present when it began, and never entries added during it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::callback::Callback;
use crate::entry::{EntryRef, ListenerEntry};
use crate::error::WatchError;
use crate::event::{Event, Value};
use crate::flow::Flow;
use crate::manifest::Manifest;
use crate::registry::{Added, Registry};
use crate::relay::{IntoRelay, Relay};
use crate::scope::{ScopeRef, ScopeResolver};
use crate::slot::Slot;
use crate::token::SubscriptionToken;

/// Optional host hooks, stored as `Rc` callables so they can be invoked
/// without holding any interior borrow.
#[derive(Default)]
pub(crate) struct Hooks {
    pub(crate) watch: Option<Rc<dyn Fn(&str)>>,
    pub(crate) unwatch: Option<Rc<dyn Fn(&str)>>,
    pub(crate) resolver: Option<Rc<dyn ScopeResolver>>,
}

/// Per-source state. The registry pointer is what `unify` shares.
#[derive(Default)]
pub(crate) struct Instance {
    pub(crate) registry: RefCell<Option<Rc<Registry>>>,
    pub(crate) relays: RefCell<Option<Slot<Relay>>>,
    pub(crate) hooks: RefCell<Hooks>,
}

/// A synchronous event source.
///
/// Listeners are invoked in registration order; at most one registration per
/// (callback, scope) pair per event is honored. The whole type is
/// single-threaded by design (`!Send`): "concurrency" here means
/// re-entrancy on one call stack.
#[derive(Clone, Default)]
pub struct Watchable {
    inst: Rc<Instance>,
}

impl Watchable {
    /// Create a detached event source. The registry is allocated on the
    /// first subscription.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_instance(inst: Rc<Instance>) -> Self {
        Watchable { inst }
    }

    pub(crate) fn instance(&self) -> &Rc<Instance> {
        &self.inst
    }

    fn registry_or_create(&self) -> Rc<Registry> {
        let mut registry = self.inst.registry.borrow_mut();
        match &*registry {
            Some(shared) => shared.clone(),
            None => {
                let fresh = Rc::new(Registry::default());
                *registry = Some(fresh.clone());
                fresh
            }
        }
    }

    pub(crate) fn registry_if_present(&self) -> Option<Rc<Registry>> {
        self.inst.registry.borrow().clone()
    }

    pub(crate) fn replace_registry(&self, registry: Rc<Registry>) {
        *self.inst.registry.borrow_mut() = Some(registry);
    }

    pub(crate) fn notify_watch(&self, event: &str) {
        let hook = self.inst.hooks.borrow().watch.clone();
        if let Some(hook) = hook {
            let hook: &dyn Fn(&str) = &*hook;
            hook(event);
        }
    }

    pub(crate) fn notify_unwatch(&self, event: &str) {
        let hook = self.inst.hooks.borrow().unwatch.clone();
        if let Some(hook) = hook {
            let hook: &dyn Fn(&str) = &*hook;
            hook(event);
        }
    }

    /// Validate a registration's scope configuration. Returns whether the
    /// entry needs scope resolution at dispatch time.
    fn check_scope(
        &self,
        callback: &Callback,
        scope: Option<&ScopeRef>,
    ) -> Result<bool, WatchError> {
        let needs = matches!(scope, Some(ScopeRef::Named(_)))
            || (callback.is_method() && scope.is_none());
        if needs && self.inst.hooks.borrow().resolver.is_none() {
            return Err(WatchError::UnsupportedScopeResolution);
        }
        if let (Callback::Method(name), Some(ScopeRef::Object(_))) = (callback, scope) {
            return Err(WatchError::ScopeNotInvokable(name.to_string()));
        }
        Ok(needs)
    }

    fn install(&self, event: &str, entry: EntryRef) -> Option<EntryRef> {
        match self.registry_or_create().add(event, entry.clone()) {
            Added::Duplicate => None,
            Added::First => {
                self.notify_watch(event);
                Some(entry)
            }
            Added::Appended => Some(entry),
        }
    }

    fn add_listener(
        &self,
        event: &str,
        callback: Callback,
        scope: Option<ScopeRef>,
    ) -> Result<(), WatchError> {
        let resolve = self.check_scope(&callback, scope.as_ref())?;
        let entry = Rc::new(ListenerEntry {
            callback,
            actual: None,
            scope,
            resolve,
            owner: None,
        });
        self.install(event, entry);
        Ok(())
    }

    /// Register a listener for `event`.
    ///
    /// Registering the same (callback, scope) pair twice is a silent no-op.
    pub fn on(&self, event: &str, callback: impl Into<Callback>) -> Result<(), WatchError> {
        self.add_listener(event, callback.into(), None)
    }

    /// Register a listener bound to `scope`.
    pub fn on_scoped(
        &self,
        event: &str,
        callback: impl Into<Callback>,
        scope: ScopeRef,
    ) -> Result<(), WatchError> {
        self.add_listener(event, callback.into(), Some(scope))
    }

    fn add_once(
        &self,
        event: &str,
        callback: Callback,
        scope: Option<ScopeRef>,
    ) -> Result<(), WatchError> {
        let resolve = self.check_scope(&callback, scope.as_ref())?;
        let name: Rc<str> = Rc::from(event);
        let weak = Rc::downgrade(&self.inst);
        let original = callback.clone();
        let original_scope = scope.clone();

        // The wrapper removes itself through the normal removal path, then
        // invokes the guarded callback; the entry's back-reference lets an
        // external `un(event, callback)` find it before it ever fires.
        let wrapper = Callback::Func(Rc::new(move |fired: &Event<'_>| {
            let Some(inst) = weak.upgrade() else {
                return Flow::Continue;
            };
            let source = Watchable::from_instance(inst.clone());
            source.remove_listener(&name, &original, original_scope.as_ref());
            invoke_callback(
                &inst,
                &original,
                original_scope.as_ref(),
                resolve,
                fired.name(),
                fired.args(),
            )
        }));

        let entry = Rc::new(ListenerEntry {
            callback: wrapper,
            actual: Some(callback),
            scope,
            resolve: false,
            owner: None,
        });
        self.install(event, entry);
        Ok(())
    }

    /// Register a listener that removes itself after its first invocation.
    pub fn once(&self, event: &str, callback: impl Into<Callback>) -> Result<(), WatchError> {
        self.add_once(event, callback.into(), None)
    }

    /// [`once`](Self::once) with a bound scope.
    pub fn once_scoped(
        &self,
        event: &str,
        callback: impl Into<Callback>,
        scope: ScopeRef,
    ) -> Result<(), WatchError> {
        self.add_once(event, callback.into(), Some(scope))
    }

    pub(crate) fn remove_listener(
        &self,
        event: &str,
        probe: &Callback,
        scope: Option<&ScopeRef>,
    ) {
        if let Some(registry) = self.registry_if_present() {
            if registry.remove_matching(event, probe, scope) {
                self.notify_unwatch(event);
            }
        }
    }

    /// Remove the listener registered for (callback, no scope). Removing a
    /// listener that was never registered is a silent no-op.
    pub fn un(&self, event: &str, callback: impl Into<Callback>) {
        self.remove_listener(event, &callback.into(), None);
    }

    /// Remove the listener registered for (callback, scope).
    pub fn un_scoped(&self, event: &str, callback: impl Into<Callback>, scope: ScopeRef) {
        self.remove_listener(event, &callback.into(), Some(&scope));
    }

    /// Alias of [`un`](Self::un).
    pub fn off(&self, event: &str, callback: impl Into<Callback>) {
        self.un(event, callback);
    }

    /// Alias of [`un_scoped`](Self::un_scoped).
    pub fn off_scoped(&self, event: &str, callback: impl Into<Callback>, scope: ScopeRef) {
        self.un_scoped(event, callback, scope);
    }

    /// Register every listener named by `manifest`, sharing its scope.
    ///
    /// Returns a token that removes exactly the entries created here,
    /// leaving unrelated registrations on the same events untouched. A
    /// configuration error leaves the registry unchanged.
    pub fn on_manifest(&self, manifest: &Manifest) -> Result<SubscriptionToken, WatchError> {
        let scope = manifest.shared_scope();
        for (_, callback) in manifest.entries() {
            self.check_scope(callback, scope)?;
        }

        let mut created = Vec::with_capacity(manifest.entries().len());
        for (event, callback) in manifest.entries() {
            let resolve = self.check_scope(callback, scope)?;
            let entry = Rc::new(ListenerEntry {
                callback: callback.clone(),
                actual: None,
                scope: scope.cloned(),
                resolve,
                owner: Some(Rc::from(&**event)),
            });
            if let Some(entry) = self.install(event, entry) {
                created.push(entry);
            }
        }
        Ok(SubscriptionToken::new(self.clone(), created))
    }

    /// Remove every listener named by `manifest`.
    pub fn un_manifest(&self, manifest: &Manifest) {
        let scope = manifest.shared_scope();
        for (event, callback) in manifest.entries() {
            self.remove_listener(event, callback, scope);
        }
    }

    /// Synchronously dispatch `event` to its listeners, in registration
    /// order, then forward it through this source's relay links.
    ///
    /// Returns [`Flow::Stop`] when a listener short-circuited the pass; a
    /// stopped pass is not relayed. Listeners added during the pass are not
    /// invoked by it; listeners present when it began all are, even if
    /// removed mid-pass by another listener's side effect.
    pub fn fire(&self, event: &str, args: &[Value]) -> Flow {
        let slot = self.registry_if_present().and_then(|r| r.slot(event));

        let mut outcome = Flow::Continue;
        if let Some(slot) = slot {
            let stopped = slot.each_until(|entry| {
                invoke_callback(
                    &self.inst,
                    &entry.callback,
                    entry.scope.as_ref(),
                    entry.resolve,
                    event,
                    args,
                )
                .is_stopped()
            });
            if stopped {
                outcome = Flow::Stop;
            }
        }

        if !outcome.is_stopped() {
            let relays = self.inst.relays.borrow().clone();
            if let Some(relays) = relays {
                relays.each_until(|relay| {
                    relay.forward(event, args);
                    false
                });
            }
        }

        outcome
    }

    /// Alias of [`fire`](Self::fire).
    pub fn emit(&self, event: &str, args: &[Value]) -> Flow {
        self.fire(event, args)
    }

    /// `true` when `event` currently has at least one listener.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.registry_if_present()
            .is_some_and(|registry| registry.has(event))
    }

    /// Remove one event's listeners, or every event's.
    pub fn un_all(&self, event: Option<&str>) {
        if let Some(registry) = self.registry_if_present() {
            registry.clear(event);
        }
    }

    /// Attach a relay link forwarding this source's events to `target`.
    ///
    /// A plain source is wrapped in a forward-all link; anything already
    /// relay-capable (a [`Relay`], a logger) is attached as-is. Attaching a
    /// link that is already present is a no-op. The returned handle's
    /// `close`/`destroy` detaches it.
    pub fn relay_events(&self, target: impl IntoRelay) -> Relay {
        let relay = target.into_relay();
        relay.attach_to(self);
        relay
    }

    /// Install the watch hook, invoked when an event gains its first
    /// listener.
    pub fn set_watch_hook(&self, hook: impl Fn(&str) + 'static) {
        self.inst.hooks.borrow_mut().watch = Some(Rc::new(hook));
    }

    /// Install the unwatch hook, invoked when an event loses its last
    /// listener.
    pub fn set_unwatch_hook(&self, hook: impl Fn(&str) + 'static) {
        self.inst.hooks.borrow_mut().unwatch = Some(Rc::new(hook));
    }

    /// Install the scope resolver consulted for named scopes and unscoped
    /// named-method listeners.
    pub fn set_scope_resolver(&self, resolver: impl ScopeResolver + 'static) {
        self.inst.hooks.borrow_mut().resolver = Some(Rc::new(resolver));
    }

    /// `true` when both handles refer to the same source.
    pub fn same_source(&self, other: &Watchable) -> bool {
        Rc::ptr_eq(&self.inst, &other.inst)
    }
}

impl fmt::Debug for Watchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let events = self
            .registry_if_present()
            .map(|registry| registry.len())
            .unwrap_or(0);
        f.debug_struct("Watchable")
            .field("events", &events)
            .finish_non_exhaustive()
    }
}

/// Invoke one callback with scope resolution applied.
pub(crate) fn invoke_callback(
    inst: &Rc<Instance>,
    callback: &Callback,
    scope: Option<&ScopeRef>,
    resolve: bool,
    event: &str,
    args: &[Value],
) -> Flow {
    let resolved: Option<ScopeRef>;
    let scope: Option<&ScopeRef> = if resolve {
        let resolver = inst.hooks.borrow().resolver.clone();
        resolved = resolver.and_then(|r| r.resolve_scope(scope, callback));
        resolved.as_ref()
    } else {
        scope
    };

    match callback {
        Callback::Func(func) => {
            let func: &crate::callback::ListenerFn = &**func;
            func(&Event::new(event, args, scope))
        }
        Callback::Method(method) => match scope {
            Some(ScopeRef::Methods(target)) => {
                let target = Rc::clone(target);
                target.call_method(method, &Event::new(event, args, scope))
            }
            _ => panic!("listener method `{method}` fired without a method-capable scope"),
        },
    }
}
