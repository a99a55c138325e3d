#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Transition spans enabled:
//!   cargo test -p lbx-select --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p lbx-select --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lbx_select::prelude::*;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span or event with its fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing Layer that records spans and events.
struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

/// Handle to read what was captured.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }
}

/// Visitor that extracts fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let parent_name = ctx.event_span(event).map(|span| span.name().to_string());

        self.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

/// Install a capturing subscriber for the duration of `f`.
fn with_capture<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn drive() {
    let options = vec![SelectOption::new("a", "Alpha"), SelectOption::new("b", "Beta")];
    let mut select = Select::new(options, SelectConfig::new().id("country"));
    select.handle(SelectEvent::key(KeyCode::Down));
    select.handle(SelectEvent::key(KeyCode::Enter));
    select.handle(SelectEvent::click("zz"));
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn one_span_per_handled_event() {
    let handle = with_capture(drive);

    let spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "select_event")
        .collect();
    assert_eq!(spans.len(), 3, "got {spans:?}");

    let events: Vec<_> = spans.iter().filter_map(|s| s.fields.get("event")).collect();
    assert_eq!(events, ["key", "key", "option_clicked"]);
    assert!(spans.iter().all(|s| s.fields.get("id").map(String::as_str) == Some("country")));
}

#[test]
#[cfg(feature = "tracing")]
fn commit_and_unknown_click_are_logged_inside_span() {
    let handle = with_capture(drive);
    let events = handle.events();

    let commit = events
        .iter()
        .find(|e| e.fields.get("message").is_some_and(|m| m.contains("selection committed")))
        .expect("commit log");
    assert_eq!(commit.parent_name.as_deref(), Some("select_event"));
    assert!(commit.fields.get("value").is_some_and(|v| v.contains("\"a\"")));

    assert!(
        events
            .iter()
            .any(|e| e.fields.get("message").is_some_and(|m| m.contains("unknown option"))),
        "got {events:?}"
    );
}

/// Without the `tracing` feature the span macros expand to no-ops, so no
/// `select_event` spans reach the subscriber.
#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_when_disabled() {
    let handle = with_capture(drive);
    assert!(
        handle.spans().iter().all(|s| s.name != "select_event"),
        "spans leaked without the tracing feature"
    );
}
