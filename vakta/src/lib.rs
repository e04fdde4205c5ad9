//! # vakta - observable event sources
//!
//! Any host object becomes an event source: register callbacks against
//! named events, fire events synchronously in registration order, forward
//! event streams between sources with relays, or merge two sources'
//! subscription state outright.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use vakta::{Watchable, args, listener};
//!
//! let source = Watchable::new();
//! source.on("loaded", listener(|event| {
//!     println!("loaded {:?}", event.arg::<i32>(0));
//! }))?;
//!
//! source.fire("loaded", args![42]);
//! ```
//!
//! Dispatch is synchronous and re-entrant: a listener may register, remove,
//! or fire (on its own source or another) while a dispatch is in flight.
//! Returning [`Flow::Stop`] from a listener short-circuits the remaining
//! listeners of that pass.
//!
//! The `macros` feature adds `#[derive(EventSource)]` for host structs that
//! embed a [`Watchable`]; the `tracing` feature routes the
//! [`logging`] adapter's default sink to `tracing`.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use vakta_core::{
    Callback, Event, EventSource, Flow, IntoFlow, IntoRelay, ListenerFn, Manifest, MethodScope,
    Relay, RelayFn, RelayMap, RelayRule, ScopeRef, ScopeResolver, SubscriptionToken, Value,
    WatchError, Watchable, listener, pipe, unify,
};

pub use vakta_core::args;

/// Event logging over the relay protocol.
pub mod logging {
    #![allow(clippy::wildcard_imports)]
    pub use vakta_std::logging::*;
}

/// Test doubles for listener-level assertions.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use vakta_std::testing::*;
}

/// Common imports.
///
/// ```rust,ignore
/// use vakta::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Callback, Event, EventSource, Flow, IntoFlow, Manifest, Relay, RelayMap, ScopeRef,
        SubscriptionToken, Value, Watchable, listener, pipe, unify,
    };
}

#[cfg(feature = "macros")]
pub use vakta_macros::EventSource;
