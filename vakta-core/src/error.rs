//! Error types for the subscription API.
//!
//! Only configuration mistakes are reported as errors: duplicate
//! registration, removal of an absent listener, and firing an event with no
//! subscribers are all silent no-ops. Listener panics propagate out of
//! `fire` untouched.

use thiserror::Error;

/// Errors reported while registering listeners.
#[derive(Error, Debug)]
pub enum WatchError {
    /// A named method or named scope was registered on a source that has no
    /// scope resolver installed.
    #[error("event source does not support scope resolution")]
    UnsupportedScopeResolution,

    /// A named method was registered against a scope that cannot dispatch
    /// methods.
    #[error("scope for listener method `{0}` does not support method dispatch")]
    ScopeNotInvokable(String),
}
