/// Environment variable names used by this crate for convenient
/// configuration of the layout from microservices.
///
/// These are purely helpers; the encoder itself never reads them.

/// Comma-separated environment variable names surfaced as `env_<name>`.
pub const JSON_LAYOUT_ENV_PROPERTY_LIST_ENV: &str = "JSON_LAYOUT_ENV_PROPERTY_LIST";

/// Comma-separated process property names surfaced as `jvm_<name>`.
pub const JSON_LAYOUT_JVM_PROPERTY_LIST_ENV: &str = "JSON_LAYOUT_JVM_PROPERTY_LIST";

/// `true` to emit `host_cname` / `host_ip`.
pub const JSON_LAYOUT_INCLUDE_HOST_ENV: &str = "JSON_LAYOUT_INCLUDE_HOST";

/// `true` to always emit `class` / `file` / `line` / `method`.
pub const JSON_LAYOUT_LOG_SLOW_PROPERTIES_ENV: &str = "JSON_LAYOUT_LOG_SLOW_PROPERTIES";

/// `true` for pretty-printed output.
pub const JSON_LAYOUT_PRETTY_ENV: &str = "JSON_LAYOUT_PRETTY";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
