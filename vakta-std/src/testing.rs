//! Test doubles for listener-level assertions.
//!
//! - [`RecordingListener`]: records every invocation and can be told what
//!   to return
//! - [`CountingListener`]: a bare invocation counter
//!
//! Both hand out the *same* [`Callback`] from every `callback()` call, so
//! tests can exercise dedup and removal the way real callers do.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use vakta_core::{Callback, Flow, Value, listener};

/// One recorded invocation.
#[derive(Clone)]
pub struct RecordedEvent {
    /// The fired event name.
    pub name: String,
    /// The fired arguments.
    pub args: Vec<Value>,
}

/// A listener that records every invocation.
///
/// ```ignore
/// let spy = RecordingListener::new();
/// source.on("foo", spy.callback())?;
/// source.fire("foo", args![42]);
/// assert_eq!(spy.names(), ["foo"]);
/// ```
pub struct RecordingListener {
    calls: Rc<RefCell<Vec<RecordedEvent>>>,
    result: Rc<Cell<Flow>>,
    callback: Callback,
}

impl RecordingListener {
    /// A recorder whose listener returns [`Flow::Continue`].
    pub fn new() -> Self {
        Self::with_result(Flow::Continue)
    }

    /// A recorder whose listener returns `result`.
    pub fn with_result(result: Flow) -> Self {
        let calls: Rc<RefCell<Vec<RecordedEvent>>> = Rc::default();
        let result = Rc::new(Cell::new(result));
        let callback = {
            let calls = calls.clone();
            let result = result.clone();
            listener(move |event| {
                calls.borrow_mut().push(RecordedEvent {
                    name: event.name().to_string(),
                    args: event.args().to_vec(),
                });
                result.get()
            })
        };
        RecordingListener {
            calls,
            result,
            callback,
        }
    }

    /// The recorder's callback. Every call returns the same identity.
    pub fn callback(&self) -> Callback {
        self.callback.clone()
    }

    /// Change what the listener returns from now on.
    pub fn set_result(&self, result: Flow) {
        self.result.set(result);
    }

    /// Names of the recorded invocations, in order.
    pub fn names(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|call| call.name.clone()).collect()
    }

    /// Copy of the recorded invocations.
    pub fn calls(&self) -> Vec<RecordedEvent> {
        self.calls.borrow().clone()
    }

    /// Number of recorded invocations.
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Default for RecordingListener {
    fn default() -> Self {
        Self::new()
    }
}

/// A listener that only counts invocations.
pub struct CountingListener {
    count: Rc<Cell<usize>>,
    callback: Callback,
}

impl CountingListener {
    /// A fresh counter at zero.
    pub fn new() -> Self {
        let count = Rc::new(Cell::new(0));
        let callback = {
            let count = count.clone();
            listener(move |_event| count.set(count.get() + 1))
        };
        CountingListener { count, callback }
    }

    /// The counter's callback. Every call returns the same identity.
    pub fn callback(&self) -> Callback {
        self.callback.clone()
    }

    /// Invocations so far.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// Reset to zero.
    pub fn reset(&self) {
        self.count.set(0);
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vakta_core::Watchable;

    #[test]
    fn test_recording_listener_keeps_identity() {
        let source = Watchable::new();
        let spy = RecordingListener::new();

        source.on("foo", spy.callback()).unwrap();
        source.on("foo", spy.callback()).unwrap();
        source.fire("foo", &[]);

        assert_eq!(spy.count(), 1);

        source.un("foo", spy.callback());
        source.fire("foo", &[]);
        assert_eq!(spy.count(), 1);
    }

    #[test]
    fn test_recording_listener_can_stop() {
        let source = Watchable::new();
        let first = RecordingListener::with_result(Flow::Stop);
        let second = CountingListener::new();

        source.on("foo", first.callback()).unwrap();
        source.on("foo", second.callback()).unwrap();

        assert_eq!(source.fire("foo", &[]), Flow::Stop);
        assert_eq!(first.count(), 1);
        assert_eq!(second.count(), 0);
    }
}
