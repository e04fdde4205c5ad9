//! Host-facing event source capability.

use crate::callback::Callback;
use crate::error::WatchError;
use crate::event::Value;
use crate::flow::Flow;
use crate::manifest::Manifest;
use crate::relay::{IntoRelay, Relay};
use crate::scope::ScopeRef;
use crate::token::SubscriptionToken;
use crate::watchable::Watchable;

/// Implemented by hosts that embed a [`Watchable`].
///
/// One accessor is required; every event operation is provided by
/// delegation, so implementing (or deriving, with the `macros` feature of
/// the facade crate) this trait is how a host object "becomes" an event
/// source. Not dyn-compatible; use `&impl EventSource` generics or hand
/// out the [`Watchable`] itself.
pub trait EventSource {
    /// The embedded event state.
    fn watchable(&self) -> &Watchable;

    /// See [`Watchable::on`].
    fn on(&self, event: &str, callback: impl Into<Callback>) -> Result<(), WatchError> {
        self.watchable().on(event, callback)
    }

    /// See [`Watchable::on_scoped`].
    fn on_scoped(
        &self,
        event: &str,
        callback: impl Into<Callback>,
        scope: ScopeRef,
    ) -> Result<(), WatchError> {
        self.watchable().on_scoped(event, callback, scope)
    }

    /// See [`Watchable::once`].
    fn once(&self, event: &str, callback: impl Into<Callback>) -> Result<(), WatchError> {
        self.watchable().once(event, callback)
    }

    /// See [`Watchable::once_scoped`].
    fn once_scoped(
        &self,
        event: &str,
        callback: impl Into<Callback>,
        scope: ScopeRef,
    ) -> Result<(), WatchError> {
        self.watchable().once_scoped(event, callback, scope)
    }

    /// See [`Watchable::un`].
    fn un(&self, event: &str, callback: impl Into<Callback>) {
        self.watchable().un(event, callback);
    }

    /// See [`Watchable::un_scoped`].
    fn un_scoped(&self, event: &str, callback: impl Into<Callback>, scope: ScopeRef) {
        self.watchable().un_scoped(event, callback, scope);
    }

    /// See [`Watchable::off`].
    fn off(&self, event: &str, callback: impl Into<Callback>) {
        self.watchable().off(event, callback);
    }

    /// See [`Watchable::on_manifest`].
    fn on_manifest(&self, manifest: &Manifest) -> Result<SubscriptionToken, WatchError> {
        self.watchable().on_manifest(manifest)
    }

    /// See [`Watchable::un_manifest`].
    fn un_manifest(&self, manifest: &Manifest) {
        self.watchable().un_manifest(manifest);
    }

    /// See [`Watchable::fire`].
    fn fire(&self, event: &str, args: &[Value]) -> Flow {
        self.watchable().fire(event, args)
    }

    /// See [`Watchable::emit`].
    fn emit(&self, event: &str, args: &[Value]) -> Flow {
        self.watchable().emit(event, args)
    }

    /// See [`Watchable::has_listeners`].
    fn has_listeners(&self, event: &str) -> bool {
        self.watchable().has_listeners(event)
    }

    /// See [`Watchable::un_all`].
    fn un_all(&self, event: Option<&str>) {
        self.watchable().un_all(event);
    }

    /// See [`Watchable::relay_events`].
    fn relay_events(&self, target: impl IntoRelay) -> Relay {
        self.watchable().relay_events(target)
    }
}

impl EventSource for Watchable {
    fn watchable(&self) -> &Watchable {
        self
    }
}
