use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Source of the environment variables and process properties that the
/// encoder surfaces as `env_<name>` and `jvm_<name>` fields.
///
/// Lookups return `None` for anything unset; the encoder simply skips those
/// names.
pub trait ValueSource: Send + Sync {
    fn env_var(&self, name: &str) -> Option<String>;

    fn process_property(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment and the process property registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessSource;

impl ValueSource for ProcessSource {
    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn process_property(&self, name: &str) -> Option<String> {
        property(name)
    }
}

/// Fixed in-memory lookups. Handy in tests and for callers that snapshot
/// their environment up front.
#[derive(Clone, Debug, Default)]
pub struct MapSource {
    pub env: HashMap<String, String>,
    pub properties: HashMap<String, String>,
}

impl MapSource {
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl ValueSource for MapSource {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn process_property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}

static REGISTRY: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, String>> {
    REGISTRY.get_or_init(|| RwLock::new(builtin_properties()))
}

fn builtin_properties() -> HashMap<String, String> {
    let mut props = HashMap::new();
    props.insert("os.name".to_string(), std::env::consts::OS.to_string());
    props.insert("os.arch".to_string(), std::env::consts::ARCH.to_string());
    props.insert("os.family".to_string(), std::env::consts::FAMILY.to_string());
    props.insert("process.id".to_string(), std::process::id().to_string());
    props.insert("crate.version".to_string(), env!("CARGO_PKG_VERSION").to_string());
    if let Ok(dir) = std::env::current_dir() {
        props.insert("user.dir".to_string(), dir.display().to_string());
    }
    props
}

/// Current value of a process property.
pub fn property(name: &str) -> Option<String> {
    // Writers only insert or remove one entry, so a poisoned map is intact.
    let guard = registry().read().unwrap_or_else(|e| e.into_inner());
    guard.get(name).cloned()
}

/// Set a process property, returning the previous value.
pub fn set_property(name: impl Into<String>, value: impl Into<String>) -> Option<String> {
    let mut guard = registry().write().unwrap_or_else(|e| e.into_inner());
    guard.insert(name.into(), value.into())
}

/// Remove a process property, returning its value if it was set.
pub fn remove_property(name: &str) -> Option<String> {
    let mut guard = registry().write().unwrap_or_else(|e| e.into_inner());
    guard.remove(name)
}
