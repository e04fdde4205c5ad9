//! Batch subscription manifests.

use crate::callback::Callback;
use crate::scope::ScopeRef;

/// A set of (event, callback) registrations sharing one optional scope.
///
/// Passed to [`Watchable::on_manifest`] (which returns a
/// [`SubscriptionToken`] covering exactly the entries it created) or to
/// [`Watchable::un_manifest`] for the matching bulk removal.
///
/// ```ignore
/// let token = source.on_manifest(
///     &Manifest::new()
///         .listen("loaded", on_loaded.clone())
///         .listen("failed", "on_failed")
///         .scope(ScopeRef::methods(controller)),
/// )?;
/// ```
///
/// [`Watchable::on_manifest`]: crate::Watchable::on_manifest
/// [`Watchable::un_manifest`]: crate::Watchable::un_manifest
/// [`SubscriptionToken`]: crate::SubscriptionToken
#[derive(Clone, Default)]
pub struct Manifest {
    entries: Vec<(Box<str>, Callback)>,
    scope: Option<ScopeRef>,
}

impl Manifest {
    /// An empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a registration for `event`.
    pub fn listen(mut self, event: &str, callback: impl Into<Callback>) -> Self {
        self.entries.push((event.into(), callback.into()));
        self
    }

    /// Set the scope shared by every registration in this manifest.
    pub fn scope(mut self, scope: ScopeRef) -> Self {
        self.scope = Some(scope);
        self
    }

    pub(crate) fn entries(&self) -> &[(Box<str>, Callback)] {
        &self.entries
    }

    pub(crate) fn shared_scope(&self) -> Option<&ScopeRef> {
        self.scope.as_ref()
    }
}
