//! Bridge from `tracing` events to the log system

use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

use super::event::{LogEvent, LogLevel};
use super::facade::LogSystem;

/// Field that overrides the event target as the log category,
/// e.g. `info!(category = "Server", "listening")`.
pub const CATEGORY_FIELD: &str = "category";

pub struct LogSystemLayer {
    system: LogSystem,
}

impl LogSystemLayer {
    pub fn new(system: LogSystem) -> Self {
        Self { system }
    }
}

impl<S: Subscriber> Layer<S> for LogSystemLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let category = visitor
            .category
            .unwrap_or_else(|| metadata.target().to_string());

        let mut parts = Vec::with_capacity(1 + visitor.fields.len());
        if let Some(message) = visitor.message {
            parts.push(message);
        }
        parts.extend(visitor.fields);

        let log_event = LogEvent::new(LogLevel::from(*metadata.level()), category, parts);
        self.system.dispatch(&log_event);
    }
}

/// Registry that forwards `tracing` events to `system`, filtered by the same
/// threshold its loggers use.
pub fn subscriber(system: LogSystem) -> impl Subscriber + Send + Sync + 'static {
    let filter = system.threshold().as_tracing_filter();
    tracing_subscriber::registry()
        .with(filter)
        .with(LogSystemLayer::new(system))
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    category: Option<String>,
    fields: Vec<String>,
}

impl EventVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            CATEGORY_FIELD => self.category = Some(value),
            name => self.fields.push(format!("{name}={value}")),
        }
    }
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{value:?}"));
    }
}
