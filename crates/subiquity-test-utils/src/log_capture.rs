//! In-memory log capture for assertions on what the client logs.
//!
//! [`LogCollector`] is a `tracing` layer that records every event; a
//! [`LogReader`] handle reads them back. [`capture_logs`] installs a
//! collector as the thread-local default subscriber, which covers everything
//! a `#[tokio::test]` (current-thread runtime) does while the guard is alive.

use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// A single captured log event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    /// Module path the event was emitted from.
    pub target: String,
    /// The formatted message.
    pub message: String,
}

/// A `tracing` layer that appends every event to a shared buffer.
#[derive(Debug, Clone, Default)]
pub struct LogCollector {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader over this collector's buffer.
    pub fn reader(&self) -> LogReader {
        LogReader {
            events: Arc::clone(&self.events),
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if let Ok(mut events) = self.events.lock() {
            events.push(CapturedEvent {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message: visitor.message,
            });
        }
    }
}

/// A read handle for captured events.
#[derive(Debug, Clone)]
pub struct LogReader {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogReader {
    /// Snapshot of all captured events.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages of all captured events, in emission order.
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    /// Messages that start with `prefix`.
    pub fn lines_starting_with(&self, prefix: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.starts_with(prefix))
            .collect()
    }

    /// Whether any captured message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

/// Capture every event emitted on this thread until the guard is dropped.
pub fn capture_logs() -> (LogReader, DefaultGuard) {
    let collector = LogCollector::new();
    let reader = collector.reader();
    let subscriber = tracing_subscriber::registry().with(collector);
    (reader, tracing::subscriber::set_default(subscriber))
}

/// Visitor that extracts the `message` field from a tracing event.
#[derive(Default)]
struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_records_messages_in_order() {
        let (reader, _guard) = capture_logs();
        tracing::trace!("--> GET /first");
        tracing::info!(path = "/second", "==> GET /second");

        let events = reader.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, Level::TRACE);
        assert_eq!(events[0].message, "--> GET /first");
        assert_eq!(events[1].message, "==> GET /second");
        assert_eq!(reader.lines_starting_with("==>").len(), 1);
        assert!(reader.contains("/first"));
    }

    #[test]
    fn test_capture_stops_when_guard_dropped() {
        let (reader, guard) = capture_logs();
        tracing::debug!("kept");
        drop(guard);
        tracing::debug!("dropped");
        assert_eq!(reader.messages(), vec!["kept".to_string()]);
    }
}
