//! Manifest registration and subscription tokens.

use std::cell::RefCell;
use std::rc::Rc;

use vakta::{Event, Flow, Manifest, MethodScope, ScopeRef, Watchable, args, listener};

type Log = Rc<RefCell<Vec<String>>>;

fn tagged(calls: &Log, tag: &'static str) -> vakta::Callback {
    let calls = calls.clone();
    listener(move |event| {
        let suffix = event
            .arg::<i32>(0)
            .map(|value| format!("={value}"))
            .unwrap_or_default();
        calls.borrow_mut().push(format!("{tag}{suffix}"));
    })
}

#[test]
fn listens_for_multiple_events() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let manifest = Manifest::new()
        .listen("foo", tagged(&calls, "foo"))
        .listen("bar", tagged(&calls, "bar"));

    let token = source.on_manifest(&manifest).unwrap();
    assert_eq!(token.len(), 2);

    source.fire("foo", args![42]);
    source.fire("bar", args![427]);

    assert_eq!(*calls.borrow(), ["foo=42", "bar=427"]);
}

#[test]
fn shares_one_scope_across_the_manifest() {
    struct ScopeData {
        tag: &'static str,
    }

    let source = Watchable::new();
    let calls: Log = Rc::default();
    let scope = Rc::new(ScopeData { tag: "shared" });

    let spy = |calls: &Log| {
        let calls = calls.clone();
        listener(move |event| {
            let bound = event.scope().unwrap().downcast::<ScopeData>().unwrap();
            calls
                .borrow_mut()
                .push(format!("{}:{}", event.name(), bound.tag));
        })
    };

    let manifest = Manifest::new()
        .listen("foo", spy(&calls))
        .listen("bar", spy(&calls))
        .scope(ScopeRef::object(scope));

    source.on_manifest(&manifest).unwrap();

    source.fire("foo", args![]);
    source.fire("bar", args![]);

    assert_eq!(*calls.borrow(), ["foo:shared", "bar:shared"]);
}

#[test]
fn un_manifest_removes_each_named_entry() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let foo = tagged(&calls, "foo");
    let bar = tagged(&calls, "bar");

    let manifest = Manifest::new()
        .listen("foo", foo.clone())
        .listen("bar", bar.clone());

    source.on_manifest(&manifest).unwrap();
    source.un_manifest(&manifest);

    source.fire("foo", args![]);
    source.fire("bar", args![]);

    assert!(calls.borrow().is_empty());
    assert!(!source.has_listeners("foo"));
    assert!(!source.has_listeners("bar"));
}

#[test]
fn un_removes_one_event_of_many() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let foo = tagged(&calls, "foo");
    let bar = tagged(&calls, "bar");

    let manifest = Manifest::new()
        .listen("foo", foo.clone())
        .listen("bar", bar);

    source.on_manifest(&manifest).unwrap();
    source.un("foo", foo);

    source.fire("foo", args![]);
    source.fire("bar", args![]);

    assert_eq!(*calls.borrow(), ["bar"]);
}

#[test]
fn token_destroy_removes_exactly_its_entries() {
    let source = Watchable::new();
    let calls: Log = Rc::default();

    // An unrelated listener on one of the manifest's events.
    source.on("foo", tagged(&calls, "outside")).unwrap();

    let manifest = Manifest::new()
        .listen("foo", tagged(&calls, "foo"))
        .listen("bar", tagged(&calls, "bar"));
    let token = source.on_manifest(&manifest).unwrap();

    source.fire("foo", args![]);
    source.fire("bar", args![]);
    assert_eq!(*calls.borrow(), ["outside", "foo", "bar"]);

    calls.borrow_mut().clear();
    token.destroy();

    source.fire("foo", args![]);
    source.fire("bar", args![]);

    assert_eq!(*calls.borrow(), ["outside"]);
    assert!(source.has_listeners("foo"));
    assert!(!source.has_listeners("bar"));
}

#[test]
fn token_close_is_destroy() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let manifest = Manifest::new().listen("foo", tagged(&calls, "foo"));

    let token = source.on_manifest(&manifest).unwrap();
    token.close();

    source.fire("foo", args![]);
    assert!(calls.borrow().is_empty());
}

#[test]
fn token_survives_entry_migration_to_list_storage() {
    // The token's entry starts as the sole listener (single storage) and is
    // later joined by another (list storage); destroy must still find it.
    let source = Watchable::new();
    let calls: Log = Rc::default();

    let manifest = Manifest::new().listen("foo", tagged(&calls, "inside"));
    let token = source.on_manifest(&manifest).unwrap();

    source.on("foo", tagged(&calls, "outside")).unwrap();

    token.destroy();
    source.fire("foo", args![]);

    assert_eq!(*calls.borrow(), ["outside"]);
}

#[test]
fn dropping_a_token_keeps_the_listeners() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let manifest = Manifest::new().listen("foo", tagged(&calls, "foo"));

    let token = source.on_manifest(&manifest).unwrap();
    drop(token);

    source.fire("foo", args![]);
    assert_eq!(*calls.borrow(), ["foo"]);
}

#[test]
fn token_destroy_notifies_unwatch_transitions() {
    let source = Watchable::new();
    let unwatching: Log = Rc::default();
    {
        let unwatching = unwatching.clone();
        source.set_unwatch_hook(move |event| unwatching.borrow_mut().push(event.to_string()));
    }

    let calls: Log = Rc::default();
    source.on("foo", tagged(&calls, "outside")).unwrap();

    let manifest = Manifest::new()
        .listen("foo", tagged(&calls, "foo"))
        .listen("bar", tagged(&calls, "bar"));
    let token = source.on_manifest(&manifest).unwrap();

    token.destroy();

    // `foo` still has the outside listener; only `bar` emptied.
    assert_eq!(*unwatching.borrow(), ["bar"]);
}

struct Handlers {
    calls: Log,
}

impl MethodScope for Handlers {
    fn call_method(&self, method: &str, event: &Event<'_>) -> Flow {
        self.calls
            .borrow_mut()
            .push(format!("{}.{method}", event.name()));
        Flow::Continue
    }
}

#[test]
fn manifest_dispatches_named_methods_through_the_scope() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let handlers = Rc::new(Handlers {
        calls: calls.clone(),
    });

    let manifest = Manifest::new()
        .listen("foo", "on_foo")
        .listen("bar", "on_bar")
        .scope(ScopeRef::methods(handlers));

    let token = source.on_manifest(&manifest).unwrap();

    source.fire("foo", args![]);
    source.fire("bar", args![]);
    assert_eq!(*calls.borrow(), ["foo.on_foo", "bar.on_bar"]);

    token.destroy();
    source.fire("foo", args![]);
    assert_eq!(calls.borrow().len(), 2);
}
