//! Relay links: forwarding fired events between sources.
//!
//! A relay link re-fires a source's events on a target, optionally renamed,
//! filtered, or transformed. Links are kept on the source in the same
//! storage shape as listener slots (single link stored directly, several in
//! a copy-on-write list), so closing a link mid-dispatch is as safe as
//! removing a listener mid-dispatch.
//!
//! Relays run after a non-stopped listener pass, in attachment order, and
//! hold strong handles to their targets (a relay cycle keeps both sources
//! alive, and firing through one recurses).

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::event::Value;
use crate::flow::Flow;
use crate::slot::{Slot, SlotRemoval};
use crate::watchable::{Instance, Watchable};

/// Function form of a relay mapping. Invoked with the link itself, the
/// fired event name, and its arguments; responsible for calling
/// [`Relay::fire_target`] (or anything else) on its own.
pub type RelayFn = dyn Fn(&Relay, &str, &[Value]);

/// Per-event rule in a [`RelayMap`].
#[derive(Clone)]
pub enum RelayRule {
    /// Forward under the fired name.
    Forward,
    /// Forward under a different name.
    Rename(Box<str>),
    /// Drop the event silently.
    Drop,
    /// Hand the event to a function (custom fan-out, splitting).
    Custom(Rc<RelayFn>),
}

/// Declarative event mapping for a relay link: per-name rules plus an
/// optional fallback for names without one.
#[derive(Clone, Default)]
pub struct RelayMap {
    rules: HashMap<Box<str>, RelayRule>,
    fallback: Option<RelayRule>,
}

impl RelayMap {
    /// An empty map. Without a fallback, unlisted events are dropped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward exactly the named events, unchanged.
    pub fn events<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::new();
        for name in names {
            map.rules.insert(name.as_ref().into(), RelayRule::Forward);
        }
        map
    }

    /// Forward `event` under its own name.
    pub fn forward(mut self, event: &str) -> Self {
        self.rules.insert(event.into(), RelayRule::Forward);
        self
    }

    /// Forward `event` renamed to `to`.
    pub fn rename(mut self, event: &str, to: &str) -> Self {
        self.rules.insert(event.into(), RelayRule::Rename(to.into()));
        self
    }

    /// Drop `event`, overriding any fallback.
    pub fn drop_event(mut self, event: &str) -> Self {
        self.rules.insert(event.into(), RelayRule::Drop);
        self
    }

    /// Hand `event` to a custom function.
    pub fn custom(mut self, event: &str, f: impl Fn(&Relay, &str, &[Value]) + 'static) -> Self {
        self.rules
            .insert(event.into(), RelayRule::Custom(Rc::new(f)));
        self
    }

    /// Rule applied to events without a per-name rule.
    pub fn fallback(mut self, rule: RelayRule) -> Self {
        self.fallback = Some(rule);
        self
    }

    /// Forward every event that has no per-name rule.
    pub fn forward_rest(self) -> Self {
        self.fallback(RelayRule::Forward)
    }

    /// Resolve the rule for `event`: its own entry, else the fallback.
    pub fn rule_for(&self, event: &str) -> Option<&RelayRule> {
        self.rules.get(event).or(self.fallback.as_ref())
    }
}

enum RelayKind {
    Forward,
    Map(RelayMap),
    Custom(Rc<RelayFn>),
}

struct RelayInner {
    source: RefCell<Weak<Instance>>,
    target: Option<Watchable>,
    kind: RelayKind,
}

/// Handle to one forwarding link. Clones refer to the same link.
#[derive(Clone)]
pub struct Relay {
    inner: Rc<RelayInner>,
}

impl Relay {
    fn build(target: Option<Watchable>, kind: RelayKind) -> Self {
        Relay {
            inner: Rc::new(RelayInner {
                source: RefCell::new(Weak::new()),
                target,
                kind,
            }),
        }
    }

    /// Forward every event to `target` unchanged.
    pub fn new(target: &Watchable) -> Self {
        Self::build(Some(target.clone()), RelayKind::Forward)
    }

    /// Forward events to `target` according to `map`.
    pub fn mapped(target: &Watchable, map: RelayMap) -> Self {
        Self::build(Some(target.clone()), RelayKind::Map(map))
    }

    /// Hand every event to `relay`, with no target of its own.
    pub fn custom(relay: impl Fn(&Relay, &str, &[Value]) + 'static) -> Self {
        Self::build(None, RelayKind::Custom(Rc::new(relay)))
    }

    /// Hand every event to `relay`, which may fire on the link's `target`
    /// via [`fire_target`](Self::fire_target).
    pub fn custom_to(
        target: &Watchable,
        relay: impl Fn(&Relay, &str, &[Value]) + 'static,
    ) -> Self {
        Self::build(Some(target.clone()), RelayKind::Custom(Rc::new(relay)))
    }

    /// The link's target source, when it has one.
    pub fn target(&self) -> Option<&Watchable> {
        self.inner.target.as_ref()
    }

    /// Fire on the link's target. Helper for custom mapping functions;
    /// a no-op returning [`Flow::Continue`] when the link has no target.
    pub fn fire_target(&self, event: &str, args: &[Value]) -> Flow {
        match &self.inner.target {
            Some(target) => target.fire(event, args),
            None => Flow::Continue,
        }
    }

    /// Register this link on `source` unless it is already present.
    pub(crate) fn attach_to(&self, source: &Watchable) {
        *self.inner.source.borrow_mut() = Rc::downgrade(source.instance());
        let mut relays = source.instance().relays.borrow_mut();
        match &mut *relays {
            None => *relays = Some(Slot::single(self.clone())),
            Some(slot) => {
                if !slot.any(|existing| Rc::ptr_eq(&existing.inner, &self.inner)) {
                    slot.push(self.clone());
                }
            }
        }
    }

    /// Detach this link from its source. Safe to call during a dispatch
    /// that is forwarding through it; the in-flight pass completes against
    /// its snapshot.
    pub fn close(&self) {
        let source = self.inner.source.borrow().upgrade();
        let Some(source) = source else { return };
        let mut relays = source.relays.borrow_mut();
        let Some(slot) = relays.as_mut() else { return };
        match slot.remove_where(|existing| Rc::ptr_eq(&existing.inner, &self.inner)) {
            SlotRemoval::Emptied => *relays = None,
            SlotRemoval::Removed | SlotRemoval::NotFound => {}
        }
    }

    /// Alias of [`close`](Self::close).
    pub fn destroy(&self) {
        self.close();
    }

    /// Map and forward one fired event.
    pub(crate) fn forward(&self, event: &str, args: &[Value]) {
        match &self.inner.kind {
            RelayKind::Forward => {
                self.fire_target(event, args);
            }
            RelayKind::Map(map) => match map.rule_for(event) {
                None | Some(RelayRule::Drop) => {}
                Some(RelayRule::Forward) => {
                    self.fire_target(event, args);
                }
                Some(RelayRule::Rename(to)) => {
                    let to = to.clone();
                    self.fire_target(&to, args);
                }
                Some(RelayRule::Custom(f)) => {
                    let f = f.clone();
                    let f: &RelayFn = &*f;
                    f(self, event, args);
                }
            },
            RelayKind::Custom(f) => {
                let f = f.clone();
                let f: &RelayFn = &*f;
                f(self, event, args);
            }
        }
    }
}

/// Conversion into a relay-capable link, used by
/// [`Watchable::relay_events`]: an existing [`Relay`] attaches as-is, a
/// plain source is wrapped in a fresh forward-all link.
///
/// [`Watchable::relay_events`]: crate::Watchable::relay_events
pub trait IntoRelay {
    /// Produce the link to attach.
    fn into_relay(self) -> Relay;
}

impl IntoRelay for Relay {
    fn into_relay(self) -> Relay {
        self
    }
}

impl IntoRelay for &Watchable {
    fn into_relay(self) -> Relay {
        Relay::new(self)
    }
}

impl IntoRelay for Watchable {
    fn into_relay(self) -> Relay {
        Relay::new(&self)
    }
}

/// Forward every event from `source` to `target`.
pub fn pipe(source: &Watchable, target: &Watchable) -> Relay {
    source.relay_events(target)
}
