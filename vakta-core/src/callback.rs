//! Listener callbacks.
//!
//! A callback is either a direct function or the name of a method looked up
//! on the listener's scope at dispatch time. Identity (used for dedup and
//! removal) is pointer identity for functions and name equality for methods.

use std::fmt;
use std::rc::Rc;

use crate::event::Event;
use crate::flow::{Flow, IntoFlow};

/// Object-safe listener function type.
pub type ListenerFn = dyn Fn(&Event<'_>) -> Flow;

/// What to invoke when an event fires.
#[derive(Clone)]
pub enum Callback {
    /// A direct callback function.
    Func(Rc<ListenerFn>),
    /// The name of a method, dispatched through the listener's scope.
    Method(Rc<str>),
}

impl Callback {
    /// Identity comparison: functions by allocation, methods by name.
    pub fn same(&self, other: &Callback) -> bool {
        match (self, other) {
            (Callback::Func(a), Callback::Func(b)) => {
                Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
            }
            (Callback::Method(a), Callback::Method(b)) => a == b,
            _ => false,
        }
    }

    /// The method name, for named-method callbacks.
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Callback::Method(name) => Some(name),
            Callback::Func(_) => None,
        }
    }

    /// `true` for named-method callbacks.
    pub fn is_method(&self) -> bool {
        matches!(self, Callback::Method(_))
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Func(func) => write!(f, "Callback::Func({:p})", Rc::as_ptr(func)),
            Callback::Method(name) => write!(f, "Callback::Method({name:?})"),
        }
    }
}

impl From<&str> for Callback {
    fn from(name: &str) -> Self {
        Callback::Method(Rc::from(name))
    }
}

/// Wrap a closure as a listener [`Callback`].
///
/// The returned value carries the identity used by dedup and removal: keep a
/// clone around to `un` the listener later.
pub fn listener<F, R>(f: F) -> Callback
where
    F: Fn(&Event<'_>) -> R + 'static,
    R: IntoFlow,
{
    Callback::Func(Rc::new(move |event: &Event<'_>| f(event).into_flow()))
}
