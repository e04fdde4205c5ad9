//! Basic registration and dispatch behavior.

use std::cell::RefCell;
use std::rc::Rc;

use vakta::{Flow, Watchable, args, listener};

type Log = Rc<RefCell<Vec<String>>>;

#[test]
fn fires_event_with_no_listeners() {
    let source = Watchable::new();
    assert_eq!(source.fire("foo", args![42]), Flow::Continue);
}

#[test]
fn emit_delivers_events() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let cb = {
        let calls = calls.clone();
        listener(move |event| {
            calls
                .borrow_mut()
                .push(event.arg::<i32>(0).unwrap().to_string());
        })
    };

    source.on("bar", cb).unwrap();
    source.emit("bar", args![427]);

    assert_eq!(*calls.borrow(), ["427"]);
}

#[test]
fn ignores_remove_of_non_listener() {
    let source = Watchable::new();
    source.un("foo", listener(|_| {}));
    source.fire("foo", args![42]);
}

#[test]
fn ignores_remove_of_non_listener_while_other_listeners_exist() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let cb = {
        let calls = calls.clone();
        listener(move |event| {
            calls
                .borrow_mut()
                .push(event.arg::<i32>(0).unwrap().to_string());
        })
    };

    source.on("bar", cb).unwrap();
    source.un("foo", listener(|_| {}));

    source.fire("foo", args![42]);
    source.fire("bar", args![427]);

    assert_eq!(*calls.borrow(), ["427"]);
}

#[test]
fn ignores_duplicate_single_listener() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let cb = {
        let calls = calls.clone();
        listener(move |event| {
            calls
                .borrow_mut()
                .push(event.arg::<i32>(0).unwrap().to_string());
        })
    };

    source.on("foo", cb.clone()).unwrap();
    source.on("foo", cb).unwrap();

    source.fire("foo", args![42]);

    assert_eq!(*calls.borrow(), ["42"]);
}

#[test]
fn ignores_duplicate_multi_listener() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    let first = {
        let calls = calls.clone();
        listener(move |event| {
            calls
                .borrow_mut()
                .push(format!("x={}", event.arg::<i32>(0).unwrap()));
        })
    };
    let second = {
        let calls = calls.clone();
        listener(move |event| {
            calls
                .borrow_mut()
                .push(event.arg::<i32>(0).unwrap().to_string());
        })
    };

    source.on("foo", first).unwrap();
    source.on("foo", second.clone()).unwrap();
    source.on("foo", second).unwrap();

    source.fire("foo", args![42]);

    assert_eq!(*calls.borrow(), ["x=42", "42"]);
}

#[test]
fn invokes_listeners_in_registration_order() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    for tag in ["a", "b", "c", "d"] {
        let calls = calls.clone();
        source
            .on("foo", listener(move |_| calls.borrow_mut().push(tag.to_string())))
            .unwrap();
    }

    source.fire("foo", args![]);

    assert_eq!(*calls.borrow(), ["a", "b", "c", "d"]);
}

#[test]
fn fires_event_twice_to_two_listeners() {
    let source = Watchable::new();
    let calls: Log = Rc::default();
    for tag in ["a", "b"] {
        let calls = calls.clone();
        source
            .on(
                "foo",
                listener(move |event| {
                    calls
                        .borrow_mut()
                        .push(format!("{tag}={}", event.arg::<i32>(0).unwrap()));
                }),
            )
            .unwrap();
    }

    source.fire("foo", args![1]);
    source.fire("foo", args![2]);

    assert_eq!(*calls.borrow(), ["a=1", "b=1", "a=2", "b=2"]);
}

#[test]
fn has_listeners_tracks_subscriptions() {
    let source = Watchable::new();
    let cb = listener(|_| {});

    assert!(!source.has_listeners("foo"));
    source.on("foo", cb.clone()).unwrap();
    assert!(source.has_listeners("foo"));
    assert!(!source.has_listeners("bar"));
    source.un("foo", cb);
    assert!(!source.has_listeners("foo"));
}

#[test]
fn informs_of_watcher_transitions() {
    let source = Watchable::new();
    let watching: Log = Rc::default();
    let unwatching: Log = Rc::default();
    {
        let watching = watching.clone();
        source.set_watch_hook(move |event| watching.borrow_mut().push(event.to_string()));
    }
    {
        let unwatching = unwatching.clone();
        source.set_unwatch_hook(move |event| unwatching.borrow_mut().push(event.to_string()));
    }

    let first = listener(|_| {});
    let second = listener(|_| {});

    // 0 -> 1 -> 0
    source.on("foo", first.clone()).unwrap();
    assert_eq!(*watching.borrow(), ["foo"]);
    assert!(unwatching.borrow().is_empty());

    source.un("foo", first.clone());
    assert_eq!(*watching.borrow(), ["foo"]);
    assert_eq!(*unwatching.borrow(), ["foo"]);

    // 0 -> 1 -> 2: only the first listener notifies
    source.on("foo", first.clone()).unwrap();
    source.on("foo", second.clone()).unwrap();
    assert_eq!(*watching.borrow(), ["foo", "foo"]);
    assert_eq!(*unwatching.borrow(), ["foo"]);

    // 2 -> 1 -> 0: only the last removal notifies
    source.un("foo", first.clone());
    assert_eq!(*unwatching.borrow(), ["foo"]);
    source.un("foo", second);
    assert_eq!(*unwatching.borrow(), ["foo", "foo"]);

    // 0 -> 1 again
    source.on("foo", first).unwrap();
    assert_eq!(*watching.borrow(), ["foo", "foo", "foo"]);
}
