use crate::config::{parse_bool, parse_name_list, EncoderConfig, LayoutOptions};
use crate::event::LogEvent;
use crate::host::{self, HostIdentity};
use crate::properties::{ProcessSource, ValueSource};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Content type of the records produced by [`JsonEncoder`].
pub const CONTENT_TYPE: &str = "text/json";

/// Post-processing stage run after every standard field has been written.
///
/// Stages see the finished document and may add, replace or remove any
/// field before it is serialized. Closures of the right shape implement
/// this trait directly.
pub trait Augment: Send + Sync {
    fn augment(&self, event: &LogEvent, document: &mut Map<String, Value>);
}

impl<F> Augment for F
where
    F: Fn(&LogEvent, &mut Map<String, Value>) + Send + Sync,
{
    fn augment(&self, event: &LogEvent, document: &mut Map<String, Value>) {
        self(event, document)
    }
}

/// Encode a single event with the process environment and no extra stages.
pub fn encode(event: &LogEvent, config: &EncoderConfig, host: Option<&HostIdentity>) -> String {
    let document = build_document(event, config, host, &ProcessSource);
    serialize(&document, config.pretty)
}

/// Turns [`LogEvent`]s into newline-terminated JSON records.
///
/// Holds only immutable state after construction and can be shared freely
/// between threads.
#[derive(Clone)]
pub struct JsonEncoder {
    config: EncoderConfig,
    host: Option<HostIdentity>,
    source: Arc<dyn ValueSource>,
    augmenters: Vec<Arc<dyn Augment>>,
}

impl JsonEncoder {
    /// Build an encoder, resolving the host identity if `include_host` is set.
    pub fn new(config: EncoderConfig) -> Self {
        let host = if config.include_host { host::resolve() } else { None };
        Self {
            config,
            host,
            source: Arc::new(ProcessSource),
            augmenters: Vec::new(),
        }
    }

    pub fn from_options(options: &LayoutOptions) -> Self {
        Self::new(EncoderConfig::from_options(options))
    }

    pub fn builder() -> JsonEncoderBuilder {
        JsonEncoderBuilder::default()
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn host(&self) -> Option<&HostIdentity> {
        self.host.as_ref()
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE
    }

    /// Always `false`: exceptions must reach the encoder as structured
    /// lines instead of being pre-rendered into the message.
    pub fn ignores_throwable(&self) -> bool {
        false
    }

    /// Build the field map for `event`, including every augmenter stage.
    pub fn document(&self, event: &LogEvent) -> Map<String, Value> {
        let mut document = build_document(event, &self.config, self.host.as_ref(), &*self.source);
        for stage in &self.augmenters {
            stage.augment(event, &mut document);
        }
        document
    }

    /// Encode `event` as one JSON record followed by a single newline.
    pub fn encode(&self, event: &LogEvent) -> String {
        serialize(&self.document(event), self.config.pretty)
    }
}

impl fmt::Debug for JsonEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonEncoder")
            .field("config", &self.config)
            .field("host", &self.host)
            .field("augmenters", &self.augmenters.len())
            .finish()
    }
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

/// Step-by-step construction of a [`JsonEncoder`] from raw option strings.
///
/// Each setter applies immediately: list setters parse their input and
/// [`include_host`](Self::include_host) resolves the host on the spot.
#[derive(Default)]
pub struct JsonEncoderBuilder {
    config: EncoderConfig,
    host: Option<HostIdentity>,
    source: Option<Arc<dyn ValueSource>>,
    augmenters: Vec<Arc<dyn Augment>>,
}

impl JsonEncoderBuilder {
    pub fn env_property_list(mut self, raw: &str) -> Self {
        self.config.env_properties = parse_name_list(raw);
        self
    }

    pub fn jvm_property_list(mut self, raw: &str) -> Self {
        self.config.process_properties = parse_name_list(raw);
        self
    }

    pub fn include_host(mut self, raw: &str) -> Self {
        self.config.include_host = parse_bool(raw);
        self.host = None;
        if self.config.include_host {
            self.host = host::resolve();
        }
        self
    }

    /// Use a known host identity instead of resolving one.
    pub fn host_identity(mut self, host: Option<HostIdentity>) -> Self {
        self.config.include_host = host.is_some();
        self.host = host;
        self
    }

    pub fn log_slow_properties(mut self, raw: &str) -> Self {
        self.config.always_include_expensive = parse_bool(raw);
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    pub fn value_source(mut self, source: impl ValueSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Append a stage that runs after all standard fields.
    pub fn augment(mut self, stage: impl Augment + 'static) -> Self {
        self.augmenters.push(Arc::new(stage));
        self
    }

    pub fn build(self) -> JsonEncoder {
        let source: Arc<dyn ValueSource> = match self.source {
            Some(source) => source,
            None => Arc::new(ProcessSource),
        };
        JsonEncoder {
            config: self.config,
            host: self.host,
            source,
            augmenters: self.augmenters,
        }
    }
}

fn build_document(
    event: &LogEvent,
    config: &EncoderConfig,
    host: Option<&HostIdentity>,
    source: &dyn ValueSource,
) -> Map<String, Value> {
    let mut root = Map::new();
    let level = event.level.as_str();

    root.insert("id".into(), Value::from(Uuid::now_v7().to_string()));
    root.insert("level".into(), Value::from(level));
    root.insert("category".into(), Value::from(event.logger.as_str()));
    root.insert("priority".into(), Value::from(level));
    root.insert("thread".into(), Value::from(event.thread.as_str()));
    root.insert("timestamp".into(), Value::from(event.timestamp));
    root.insert("message".into(), Value::from(event.message.as_str()));
    root.insert("ndc".into(), Value::from(event.ndc.as_deref().unwrap_or("")));

    // Location is costly to capture; only emit it on request or for exceptions.
    if config.always_include_expensive || event.exception.is_some() {
        if let Some(location) = &event.location {
            insert_opt(&mut root, "class", location.class.clone());
            insert_opt(&mut root, "file", location.file.clone());
            insert_opt(&mut root, "line", location.line.map(|l| l.to_string()));
            insert_opt(&mut root, "method", location.method.clone());
        }
    }

    for (key, value) in &event.properties {
        root.insert(key.clone(), Value::from(value.as_str()));
    }
    for name in &config.process_properties {
        insert_opt(&mut root, &format!("jvm_{name}"), source.process_property(name));
    }
    for name in &config.env_properties {
        insert_opt(&mut root, &format!("env_{name}"), source.env_var(name));
    }

    if config.include_host {
        if let Some(host) = host {
            root.insert("host_cname".into(), Value::from(host.cname.as_str()));
            root.insert("host_ip".into(), Value::from(host.ip.to_string()));
        }
    }

    if let Some(lines) = &event.exception {
        root.insert("exception_trace".into(), Value::from(flatten_trace(lines)));
    }

    root
}

fn insert_opt(root: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        root.insert(key.to_string(), Value::from(value));
    }
}

fn flatten_trace(lines: &[String]) -> String {
    let mut trace = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        trace.push_str(line);
        trace.push('\n');
    }
    trace
}

fn serialize(document: &Map<String, Value>, pretty: bool) -> String {
    let encoded = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    };
    let mut out = encoded.unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}
