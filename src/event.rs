use std::collections::BTreeMap;
use std::fmt;

/// Severity of a [`LogEvent`], ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Call-site location of an event. Any part may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInfo {
    pub class: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub method: Option<String>,
}

/// A logging event as handed to the encoder.
///
/// The encoder only reads it. `properties` is the keyed diagnostic context
/// (MDC); `ndc` is the free-form nested diagnostic context string.
/// `exception` holds an already rendered stack trace, one line per entry.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: Level,
    pub logger: String,
    pub thread: String,
    pub timestamp: i64,
    pub message: String,
    pub ndc: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub location: Option<LocationInfo>,
    pub exception: Option<Vec<String>>,
}

impl LogEvent {
    /// Event with empty context, no location and no exception.
    pub fn new(
        level: Level,
        logger: impl Into<String>,
        thread: impl Into<String>,
        timestamp: i64,
        message: impl Into<String>,
    ) -> Self {
        LogEvent {
            level,
            logger: logger.into(),
            thread: thread.into(),
            timestamp,
            message: message.into(),
            ndc: None,
            properties: BTreeMap::new(),
            location: None,
            exception: None,
        }
    }

    pub fn with_ndc(mut self, ndc: impl Into<String>) -> Self {
        self.ndc = Some(ndc.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn with_location(mut self, location: LocationInfo) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_exception<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exception = Some(lines.into_iter().map(Into::into).collect());
        self
    }
}
