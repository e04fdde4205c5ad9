//! Event logging over the relay protocol.
//!
//! An [`EventLogger`] attaches to a source like any relay link and, instead
//! of re-firing events on a target, formats them and hands them to a
//! [`LogSink`]: the `tracing` subscriber stack (feature `tracing`) or an
//! in-memory buffer. Events can be filtered or renamed on the way in with
//! an ordinary [`RelayMap`], given per-event severities, and have their
//! arguments masked positionally.
//!
//! ```ignore
//! let sink = BufferSink::new();
//! let relay = log_events(
//!     &source,
//!     EventLogger::new().sink(sink.clone()).prefix("db."),
//! );
//! source.fire("open", args![42]);
//! assert_eq!(sink.lines(), ["db.open: 42"]);
//! relay.close();
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use vakta_core::{IntoRelay, Relay, RelayMap, RelayRule, Value, Watchable};

/// Severity attached to logged events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Finest detail.
    Trace,
    /// Diagnostic detail.
    Debug,
    /// Routine events.
    Info,
    /// Something looks off.
    Warn,
    /// Something failed.
    Error,
}

/// Destination for formatted event lines.
pub trait LogSink {
    /// Write one formatted line.
    fn log(&self, level: LogLevel, line: &str);
}

/// Sink that collects formatted lines in memory.
#[derive(Clone, Default)]
pub struct BufferSink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl BufferSink {
    /// An empty buffer. Clones share the same storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the collected lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Drop everything collected so far.
    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
    }
}

impl LogSink for BufferSink {
    fn log(&self, _level: LogLevel, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

/// Sink that discards everything.
#[derive(Clone, Copy, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _level: LogLevel, _line: &str) {}
}

/// Sink forwarding to the `tracing` subscriber stack.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Default)]
pub struct TracingSink;

#[cfg(feature = "tracing")]
impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, line: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "vakta", "{line}"),
            LogLevel::Debug => tracing::debug!(target: "vakta", "{line}"),
            LogLevel::Info => tracing::info!(target: "vakta", "{line}"),
            LogLevel::Warn => tracing::warn!(target: "vakta", "{line}"),
            LogLevel::Error => tracing::error!(target: "vakta", "{line}"),
        }
    }
}

#[cfg(feature = "tracing")]
fn default_sink() -> Rc<dyn LogSink> {
    Rc::new(TracingSink)
}

#[cfg(not(feature = "tracing"))]
fn default_sink() -> Rc<dyn LogSink> {
    Rc::new(NullSink)
}

/// Render one argument for a log line: strings quoted, scalars plain,
/// anything else opaque.
fn format_value(value: &Value) -> String {
    if let Some(text) = value.downcast_ref::<String>() {
        return format!("{text:?}");
    }
    if let Some(text) = value.downcast_ref::<&'static str>() {
        return format!("{text:?}");
    }
    if let Some(number) = value.downcast_ref::<i32>() {
        return number.to_string();
    }
    if let Some(number) = value.downcast_ref::<i64>() {
        return number.to_string();
    }
    if let Some(number) = value.downcast_ref::<u32>() {
        return number.to_string();
    }
    if let Some(number) = value.downcast_ref::<u64>() {
        return number.to_string();
    }
    if let Some(number) = value.downcast_ref::<usize>() {
        return number.to_string();
    }
    if let Some(number) = value.downcast_ref::<f64>() {
        return number.to_string();
    }
    if let Some(flag) = value.downcast_ref::<bool>() {
        return flag.to_string();
    }
    "<value>".to_string()
}

/// Relay-capable event logger.
///
/// Build one with the chainable configuration methods and attach it with
/// [`log_events`] (or `source.relay_events(logger)` directly). Lines take
/// the form `{prefix}{event}: {arg, arg, ...}`, the argument list omitted
/// when nothing remains after masking.
pub struct EventLogger {
    sink: Rc<dyn LogSink>,
    prefix: String,
    default_level: LogLevel,
    levels: HashMap<Box<str>, LogLevel>,
    masks: HashMap<Box<str>, u32>,
    fallback_mask: Option<u32>,
    format: Rc<dyn Fn(&Value) -> String>,
    filter: Option<RelayMap>,
}

impl EventLogger {
    /// A logger with the default sink (`tracing` when that feature is
    /// enabled, discard otherwise), no prefix, and [`LogLevel::Info`].
    pub fn new() -> Self {
        EventLogger {
            sink: default_sink(),
            prefix: String::new(),
            default_level: LogLevel::Info,
            levels: HashMap::new(),
            masks: HashMap::new(),
            fallback_mask: None,
            format: Rc::new(format_value),
            filter: None,
        }
    }

    /// Replace the sink.
    pub fn sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Rc::new(sink);
        self
    }

    /// Prefix every logged event name.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Severity for one event (after filtering/renaming).
    pub fn level(mut self, event: &str, level: LogLevel) -> Self {
        self.levels.insert(event.into(), level);
        self
    }

    /// Severity for events without their own entry.
    pub fn default_level(mut self, level: LogLevel) -> Self {
        self.default_level = level;
        self
    }

    /// Log only the arguments of `event` whose bit is set (bit `i` selects
    /// argument `i`).
    pub fn mask(mut self, event: &str, bits: u32) -> Self {
        self.masks.insert(event.into(), bits);
        self
    }

    /// Argument mask for events without their own entry.
    pub fn mask_fallback(mut self, bits: u32) -> Self {
        self.fallback_mask = Some(bits);
        self
    }

    /// Replace the argument formatter.
    pub fn format(mut self, format: impl Fn(&Value) -> String + 'static) -> Self {
        self.format = Rc::new(format);
        self
    }

    /// Filter or rename events before logging. `Drop` rules suppress the
    /// event; `Rename` rules change the logged name; custom rules log under
    /// the fired name.
    pub fn filter(mut self, map: RelayMap) -> Self {
        self.filter = Some(map);
        self
    }

    fn log_event(&self, event: &str, args: &[Value]) {
        let name: &str = match &self.filter {
            None => event,
            Some(map) => match map.rule_for(event) {
                None | Some(RelayRule::Drop) => return,
                Some(RelayRule::Rename(to)) => to,
                Some(RelayRule::Forward) | Some(RelayRule::Custom(_)) => event,
            },
        };

        let mask = self.masks.get(name).copied().or(self.fallback_mask);
        let format: &dyn Fn(&Value) -> String = &*self.format;
        let mut parts = Vec::new();
        for (index, value) in args.iter().enumerate() {
            if let Some(mask) = mask {
                let selected = index < 32 && mask & (1u32 << index) != 0;
                if !selected {
                    continue;
                }
            }
            parts.push(format(value));
        }

        let joined = parts.join(", ");
        let line = if joined.is_empty() {
            format!("{}{}", self.prefix, name)
        } else {
            format!("{}{}: {}", self.prefix, name, joined)
        };
        let level = self.levels.get(name).copied().unwrap_or(self.default_level);
        self.sink.log(level, &line);
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl IntoRelay for EventLogger {
    fn into_relay(self) -> Relay {
        Relay::custom(move |_link, event, args| self.log_event(event, args))
    }
}

/// Attach `logger` to `source` as a relay link.
pub fn log_events(source: &Watchable, logger: EventLogger) -> Relay {
    source.relay_events(logger)
}
