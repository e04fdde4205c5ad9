//! # vakta-core
//!
//! Core listener registry and dispatch engine for the Vakta event library.
//!
//! Any host object becomes an event source by embedding a [`Watchable`]:
//! code registers callbacks against named events, the host synchronously
//! dispatches fired events to them in registration order, and event streams
//! can be forwarded between sources ([`Relay`]) or merged outright
//! ([`unify`]).
//!
//! # Architecture
//!
//! The engine is built from four layers:
//!
//! - **Slots**: per-event storage, either one entry stored directly or an
//!   ordered list carrying a count of in-flight dispatch passes. All
//!   re-entrancy safety comes from one rule: a list is never mutated while
//!   a pass iterates it; mutations swap in a detached copy instead.
//! - **Registry**: the lazily created map from event name to slot, shared
//!   by reference between sources after [`unify`].
//! - **Dispatch**: [`Watchable::fire`], ordered synchronous invocation
//!   with [`Flow::Stop`] short-circuiting, followed by relay forwarding.
//! - **Subscription**: [`Watchable::on`]/[`once`](Watchable::once)/
//!   [`un`](Watchable::un), manifest registration with a
//!   [`SubscriptionToken`], and the watch/unwatch host hooks.
//!
//! # Re-entrancy
//!
//! Everything runs on one call stack: a listener may freely register,
//! remove, fire, destroy tokens, or unify (on its own source or any other)
//! while a dispatch is in flight. A pass visits exactly the listeners
//! present when it began; additions wait for the next pass.
//!
//! # Errors
//!
//! Only scope-resolution misconfiguration is an error ([`WatchError`]).
//! Duplicate registration, removal of an absent listener, and firing an
//! event nobody listens to are silent no-ops.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod entry;
mod error;
mod event;
mod flow;
mod manifest;
mod registry;
mod relay;
mod scope;
mod slot;
mod source;
mod token;
mod unify;
mod watchable;

pub use callback::{Callback, ListenerFn, listener};
pub use error::WatchError;
pub use event::{Event, Value};
pub use flow::{Flow, IntoFlow};
pub use manifest::Manifest;
pub use relay::{IntoRelay, Relay, RelayFn, RelayMap, RelayRule, pipe};
pub use scope::{MethodScope, ScopeRef, ScopeResolver};
pub use source::EventSource;
pub use token::SubscriptionToken;
pub use unify::unify;
pub use watchable::Watchable;
