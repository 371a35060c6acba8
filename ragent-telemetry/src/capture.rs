use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Instant;
use tracing::{Id, Subscriber};
use tracing_subscriber::{Layer, layer::Context, registry::LookupSpan};

/// A span that has closed.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedSpan {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub duration_micros: u128,
    pub fields: HashMap<String, serde_json::Value>,
}

/// Closed spans, in close order.
#[derive(Debug, Clone, Default)]
pub struct CapturedSpans {
    spans: Arc<RwLock<Vec<CapturedSpan>>>,
}

impl CapturedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<CapturedSpan> {
        self.spans.read().map(|spans| spans.clone()).unwrap_or_default()
    }

    /// Every closed span called `name`.
    pub fn named(&self, name: &str) -> Vec<CapturedSpan> {
        self.all().into_iter().filter(|span| span.name == name).collect()
    }

    fn push(&self, span: CapturedSpan) {
        if let Ok(mut spans) = self.spans.write() {
            spans.push(span);
        }
    }
}

/// A tracing layer that records closed spans into [`CapturedSpans`].
pub struct SpanCaptureLayer {
    storage: CapturedSpans,
}

impl SpanCaptureLayer {
    pub fn new(storage: CapturedSpans) -> Self {
        Self { storage }
    }
}

struct SpanFields(HashMap<String, serde_json::Value>);

struct Opened(Instant);

impl<S> Layer<S> for SpanCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut visitor = JsonVisitor::default();
        attrs.record(&mut visitor);

        let mut extensions = span.extensions_mut();
        extensions.insert(Opened(Instant::now()));
        extensions.insert(SpanFields(visitor.0));
    }

    // Fields declared `Empty` and filled in later arrive here.
    fn on_record(&self, id: &Id, values: &tracing::span::Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else { return };
        let mut extensions = span.extensions_mut();
        if let Some(fields) = extensions.get_mut::<SpanFields>() {
            let mut visitor = JsonVisitor::default();
            values.record(&mut visitor);
            fields.0.extend(visitor.0);
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else { return };
        let extensions = span.extensions();

        let duration_micros =
            extensions.get::<Opened>().map(|opened| opened.0.elapsed().as_micros()).unwrap_or(0);
        let fields = extensions.get::<SpanFields>().map(|f| f.0.clone()).unwrap_or_default();

        self.storage.push(CapturedSpan {
            name: span.metadata().name().to_string(),
            parent: span.parent().map(|parent| parent.metadata().name().to_string()),
            duration_micros,
            fields,
        });
    }
}

#[derive(Default)]
struct JsonVisitor(HashMap<String, serde_json::Value>);

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }
}
