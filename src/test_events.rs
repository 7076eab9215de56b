//! Collects the `tracing` events emitted while a closure runs on the current
//! thread, rendered as `LEVEL field=value ...`.

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

#[derive(Clone, Default)]
pub(crate) struct EventLog {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventLog {
    pub(crate) fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let log = EventLog::default();
        let result = tracing::subscriber::with_default(log.clone(), f);
        let events = log.events.lock().unwrap().clone();
        (result, events)
    }

    /// Events at `DEBUG` level only.
    pub(crate) fn capture_debug<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let (result, events) = Self::capture(f);
        let events = events
            .into_iter()
            .filter(|event| event.starts_with("DEBUG "))
            .collect();
        (result, events)
    }
}

struct Fields(String);

impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        self.0.push_str(&format!(" {}={:?}", field.name(), value));
    }
}

impl Subscriber for EventLog {
    fn enabled(&self, _: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _: &Id, _: &Record<'_>) {}

    fn record_follows_from(&self, _: &Id, _: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut fields = Fields(event.metadata().level().to_string());
        event.record(&mut fields);
        self.events.lock().unwrap().push(fields.0);
    }

    fn enter(&self, _: &Id) {}

    fn exit(&self, _: &Id) {}
}
