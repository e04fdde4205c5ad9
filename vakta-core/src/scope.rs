//! Listener scopes and scope resolution.
//!
//! A scope is the object a listener is bound to. Direct callbacks only use
//! it for identity (dedup and removal compare the callback *and* the scope)
//! and receive it back through [`Event::scope`]; named-method callbacks
//! additionally dispatch through it via [`MethodScope`]. A [`ScopeRef`] can
//! also be a plain name, resolved at dispatch time by the host's
//! [`ScopeResolver`] hook.
//!
//! [`Event::scope`]: crate::Event::scope

use std::any::Any;
use std::rc::Rc;

use crate::callback::Callback;
use crate::event::Event;
use crate::flow::Flow;

/// A scope object able to receive named-method invocations.
pub trait MethodScope: Any {
    /// Invoke the method registered under `method` for `event`.
    fn call_method(&self, method: &str, event: &Event<'_>) -> Flow;
}

/// Reference to the scope a listener was registered with.
#[derive(Clone)]
pub enum ScopeRef {
    /// An identity-only scope object.
    Object(Rc<dyn Any>),
    /// A scope that supports named-method dispatch.
    Methods(Rc<dyn MethodScope>),
    /// A scope name, resolved through the host's [`ScopeResolver`].
    Named(Rc<str>),
}

impl ScopeRef {
    /// Wrap a shared value as an identity-only scope.
    pub fn object<T: Any>(value: Rc<T>) -> Self {
        ScopeRef::Object(value as Rc<dyn Any>)
    }

    /// Wrap a [`MethodScope`] implementation.
    pub fn methods<T: MethodScope>(value: Rc<T>) -> Self {
        ScopeRef::Methods(value as Rc<dyn MethodScope>)
    }

    /// A scope known only by name, resolved at dispatch time.
    pub fn named(name: impl Into<Rc<str>>) -> Self {
        ScopeRef::Named(name.into())
    }

    /// Downcast an object or method scope back to its concrete type.
    pub fn downcast<T: Any>(&self) -> Option<Rc<T>> {
        match self {
            ScopeRef::Object(object) => object.clone().downcast::<T>().ok(),
            ScopeRef::Methods(methods) => {
                let any: Rc<dyn Any> = methods.clone();
                any.downcast::<T>().ok()
            }
            ScopeRef::Named(_) => None,
        }
    }

    /// `true` when this scope must be resolved by the host at dispatch time.
    pub fn is_named(&self) -> bool {
        matches!(self, ScopeRef::Named(_))
    }

    fn data_ptr(&self) -> Option<*const ()> {
        match self {
            ScopeRef::Object(object) => Some(Rc::as_ptr(object) as *const ()),
            ScopeRef::Methods(methods) => Some(Rc::as_ptr(methods) as *const ()),
            ScopeRef::Named(_) => None,
        }
    }

    /// Identity comparison: object scopes compare by allocation, named
    /// scopes by name.
    pub fn same(&self, other: &ScopeRef) -> bool {
        match (self, other) {
            (ScopeRef::Named(a), ScopeRef::Named(b)) => a == b,
            (ScopeRef::Named(_), _) | (_, ScopeRef::Named(_)) => false,
            _ => self.data_ptr() == other.data_ptr(),
        }
    }
}

/// Host hook that resolves indirect scopes at dispatch time.
///
/// Consulted for entries registered with a [`ScopeRef::Named`] scope, or
/// with a named-method callback and no scope at all. Returning `None` leaves
/// a direct callback unscoped; a named-method callback with an unresolvable
/// scope is a programming error and panics at dispatch.
pub trait ScopeResolver {
    /// Map the registered scope to the one the listener should run with.
    fn resolve_scope(&self, scope: Option<&ScopeRef>, callback: &Callback) -> Option<ScopeRef>;
}

impl<F> ScopeResolver for F
where
    F: Fn(Option<&ScopeRef>, &Callback) -> Option<ScopeRef>,
{
    fn resolve_scope(&self, scope: Option<&ScopeRef>, callback: &Callback) -> Option<ScopeRef> {
        self(scope, callback)
    }
}
