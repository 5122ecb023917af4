//! Bounded in-memory log fed by `tracing` events.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::html;

#[derive(Debug, Clone)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Keeps the newest `capacity` lines; older ones fall off the front.
#[derive(Debug)]
pub struct RamLog {
    name: String,
    capacity: usize,
    lines: Mutex<VecDeque<LogLine>>,
}

impl RamLog {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity: capacity.max(1),
            lines: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    /// Render as an escaped `<pre>` block.
    pub fn to_html(&self, out: &mut String) {
        out.push_str("<pre>\n");
        for line in self.lines() {
            out.push_str(&html::escape(&line.to_string()));
            out.push('\n');
        }
        out.push_str("</pre>\n");
    }
}

/// `tracing` layer copying every enabled event into a [`RamLog`].
pub struct RamLogLayer {
    log: Arc<RamLog>,
}

impl RamLogLayer {
    pub fn new(log: Arc<RamLog>) -> Self {
        Self { log }
    }
}

impl<S: Subscriber> Layer<S> for RamLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.log.push(LogLine {
            at: Utc::now(),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.finish(),
        });
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    fn line(message: &str) -> LogLine {
        LogLine {
            at: Utc::now(),
            level: Level::INFO,
            target: "test".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let log = RamLog::new("global", 2);
        log.push(line("one"));
        log.push(line("two"));
        log.push(line("three"));

        let messages: Vec<_> = log.lines().into_iter().map(|l| l.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[test]
    fn test_to_html_escapes() {
        let log = RamLog::new("global", 4);
        log.push(line("<script>"));

        let mut out = String::new();
        log.to_html(&mut out);

        assert!(out.starts_with("<pre>\n"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.ends_with("</pre>\n"));
    }

    #[test]
    fn test_layer_captures_events() {
        let log = Arc::new(RamLog::new("global", 8));
        let subscriber = tracing_subscriber::registry().with(RamLogLayer::new(log.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(port = 28017, "console listening");
        });

        let lines = log.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Level::INFO);
        assert_eq!(lines[0].message, "console listening port=28017");
    }
}
