//! Scope resolution: the host resolver hook and its configuration errors.

use std::cell::RefCell;
use std::rc::Rc;

use vakta::{
    Callback, Event, Flow, Manifest, MethodScope, ScopeRef, ScopeResolver, WatchError, Watchable,
    args, listener,
};

type Log = Rc<RefCell<Vec<String>>>;

struct Handlers {
    calls: Log,
}

impl MethodScope for Handlers {
    fn call_method(&self, method: &str, event: &Event<'_>) -> Flow {
        self.calls
            .borrow_mut()
            .push(format!("{method}={}", event.arg::<i32>(0).unwrap()));
        Flow::Continue
    }
}

/// Resolver that records what it was asked for and always answers with one
/// method scope.
struct FixedResolver {
    calls: Log,
    target: Rc<Handlers>,
}

impl ScopeResolver for FixedResolver {
    fn resolve_scope(&self, scope: Option<&ScopeRef>, callback: &Callback) -> Option<ScopeRef> {
        let scope_name = match scope {
            Some(ScopeRef::Named(name)) => name.to_string(),
            Some(_) => "<object>".to_string(),
            None => "<none>".to_string(),
        };
        let method = callback.method_name().unwrap_or("<fn>").to_string();
        self.calls
            .borrow_mut()
            .push(format!("resolve {scope_name} {method}"));
        Some(ScopeRef::methods(self.target.clone()))
    }
}

#[test]
fn resolves_named_scope_for_named_method() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let handlers = Rc::new(Handlers {
        calls: calls.clone(),
    });
    source.set_scope_resolver(FixedResolver {
        calls: calls.clone(),
        target: handlers,
    });

    source
        .on_scoped("foo", "on_foo", ScopeRef::named("that"))
        .unwrap();
    source.fire("foo", args![427]);

    assert_eq!(*calls.borrow(), ["resolve that on_foo", "on_foo=427"]);
}

#[test]
fn resolves_missing_scope_for_named_method() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let handlers = Rc::new(Handlers {
        calls: calls.clone(),
    });
    source.set_scope_resolver(FixedResolver {
        calls: calls.clone(),
        target: handlers,
    });

    source.on("foo", "on_foo").unwrap();
    source.fire("foo", args![1]);

    assert_eq!(*calls.borrow(), ["resolve <none> on_foo", "on_foo=1"]);
}

#[test]
fn resolves_named_scope_for_direct_callback() {
    struct NullResolver;

    impl ScopeResolver for NullResolver {
        fn resolve_scope(&self, _: Option<&ScopeRef>, _: &Callback) -> Option<ScopeRef> {
            None
        }
    }

    let source = Watchable::new();
    let calls: Log = Rc::default();
    source.set_scope_resolver(NullResolver);
    {
        let calls = calls.clone();
        source
            .on_scoped(
                "foo",
                listener(move |event| {
                    assert!(event.scope().is_none());
                    calls.borrow_mut().push("ok".to_string());
                }),
                ScopeRef::named("that"),
            )
            .unwrap();
    }

    source.fire("foo", args![]);

    assert_eq!(*calls.borrow(), ["ok"]);
}

#[test]
fn fails_early_when_resolution_is_unsupported() {
    let source = Watchable::new();

    let err = source.on("foo", "on_foo").unwrap_err();
    assert!(matches!(err, WatchError::UnsupportedScopeResolution));
    assert!(!source.has_listeners("foo"));

    let err = source
        .on_scoped("foo", listener(|_| {}), ScopeRef::named("that"))
        .unwrap_err();
    assert!(matches!(err, WatchError::UnsupportedScopeResolution));
    assert!(!source.has_listeners("foo"));
}

#[test]
fn rejects_named_method_on_identity_only_scope() {
    struct ScopeData;

    let source = Watchable::new();
    let err = source
        .on_scoped("foo", "on_foo", ScopeRef::object(Rc::new(ScopeData)))
        .unwrap_err();

    assert!(matches!(err, WatchError::ScopeNotInvokable(name) if name == "on_foo"));
    assert!(!source.has_listeners("foo"));
}

#[test]
fn manifest_with_named_methods_fails_early_without_resolver() {
    let source = Watchable::new();
    let manifest = Manifest::new()
        .listen("foo", listener(|_| {}))
        .listen("bar", "on_bar")
        .scope(ScopeRef::named("that"));

    assert!(source.on_manifest(&manifest).is_err());

    // Nothing was registered, not even the entries before the bad one.
    assert!(!source.has_listeners("foo"));
    assert!(!source.has_listeners("bar"));
}
