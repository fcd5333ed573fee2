use crate::encoder::JsonEncoder;
use crate::event::{Level as EventLevel, LocationInfo, LogEvent};
use chrono::Utc;
use std::collections::BTreeMap;
use std::error::Error;
use std::io::Write;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that renders every event through a
/// [`JsonEncoder`] and writes the record to a [`MakeWriter`].
///
/// Span fields act as the keyed diagnostic context: fields of every span
/// in scope are merged root to leaf, then the event's own fields on top.
/// The names of the spans in scope form the nested diagnostic context.
pub struct JsonLayoutLayer<W> {
    encoder: Arc<JsonEncoder>,
    make_writer: W,
    max_level: Level,
}

impl<W> JsonLayoutLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    /// Create a layer that records events at `INFO` and above.
    pub fn new(encoder: JsonEncoder, make_writer: W) -> Self {
        Self {
            encoder: Arc::new(encoder),
            make_writer,
            max_level: Level::INFO,
        }
    }

    /// Most verbose level that is still recorded.
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }

    pub fn encoder(&self) -> &JsonEncoder {
        &self.encoder
    }
}

/// Fields recorded on a span, kept in its extensions.
struct SpanFields(BTreeMap<String, String>);

impl<S, W> Layer<S> for JsonLayoutLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::for_span();
        attrs.record(&mut visitor);
        span.extensions_mut().insert(SpanFields(visitor.into_fields()));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut visitor = FieldVisitor::for_span();
        values.record(&mut visitor);
        let mut extensions = span.extensions_mut();
        match extensions.get_mut::<SpanFields>() {
            Some(fields) => fields.0.extend(visitor.into_fields()),
            None => extensions.insert(SpanFields(visitor.into_fields())),
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() > self.max_level {
            return;
        }

        let mut properties = BTreeMap::new();
        let mut span_names = Vec::new();
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                span_names.push(span.name());
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    properties.extend(fields.0.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
            }
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let exception = visitor.exception_lines();
        properties.extend(visitor.fields);

        let thread = std::thread::current();
        let thread_name = match thread.name() {
            Some(name) => name.to_string(),
            None => format!("{:?}", thread.id()),
        };

        let log_event = LogEvent {
            level: EventLevel::from(*meta.level()),
            logger: meta.target().to_string(),
            thread: thread_name,
            timestamp: Utc::now().timestamp_millis(),
            message: visitor.message.unwrap_or_default(),
            ndc: (!span_names.is_empty()).then(|| span_names.join(" ")),
            properties,
            location: Some(LocationInfo {
                class: meta.module_path().map(|s| s.to_string()),
                file: meta.file().map(|s| s.to_string()),
                line: meta.line(),
                method: None,
            }),
            exception,
        };

        let line = self.encoder.encode(&log_event);
        let mut writer = self.make_writer.make_writer_for(meta);
        // Logging through `tracing` here would re-enter this layer.
        if let Err(e) = writer.write_all(line.as_bytes()) {
            eprintln!("error writing json log record: {}", e);
        }
    }
}

/// Collects event or span fields as strings.
///
/// `message` becomes the record message. The first field recorded as an
/// error becomes the exception, with one `Caused by:` line per source; a
/// plain `exception` string is used only when no error was recorded.
/// Span visitors skip all of that and keep every field as context.
#[derive(Default)]
struct FieldVisitor {
    span: bool,
    fields: BTreeMap<String, String>,
    message: Option<String>,
    error_trace: Option<Vec<String>>,
    exception_text: Option<String>,
}

impl FieldVisitor {
    fn for_span() -> Self {
        Self {
            span: true,
            ..Self::default()
        }
    }

    fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    fn exception_lines(&mut self) -> Option<Vec<String>> {
        if let Some(trace) = self.error_trace.take() {
            return Some(trace);
        }
        self.exception_text
            .take()
            .map(|text| text.lines().map(str::to_string).collect())
    }

    fn put(&mut self, field: &Field, value: String) {
        if self.span {
            self.fields.insert(field.name().to_string(), value);
            return;
        }
        match field.name() {
            "message" => self.message = Some(value),
            "exception" if self.exception_text.is_none() => self.exception_text = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        if self.span || self.error_trace.is_some() {
            self.put(field, value.to_string());
            return;
        }
        let mut lines = vec![value.to_string()];
        let mut source = value.source();
        while let Some(cause) = source {
            lines.push(format!("Caused by: {}", cause));
            source = cause.source();
        }
        self.error_trace = Some(lines);
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{:?}", value));
    }
}
