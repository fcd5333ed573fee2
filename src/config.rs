use crate::env::{
    env_or, JSON_LAYOUT_ENV_PROPERTY_LIST_ENV, JSON_LAYOUT_INCLUDE_HOST_ENV,
    JSON_LAYOUT_JVM_PROPERTY_LIST_ENV, JSON_LAYOUT_LOG_SLOW_PROPERTIES_ENV,
    JSON_LAYOUT_PRETTY_ENV,
};
use serde::Deserialize;
use std::path::Path;

/// Raw layout options, exactly as written in a configuration file.
///
/// Booleans other than `pretty` are kept as strings because that is how
/// appender configuration hands them over; they are interpreted by
/// [`parse_bool`] when an [`EncoderConfig`] is built.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub env_property_list: String,
    pub jvm_property_list: String,
    pub include_host: String,
    pub log_slow_properties: String,
    pub pretty: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            env_property_list: String::new(),
            jvm_property_list: String::new(),
            include_host: "false".to_string(),
            log_slow_properties: "false".to_string(),
            pretty: false,
        }
    }
}

/// Error returned when loading [`LayoutOptions`] from a file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read layout config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl LayoutOptions {
    /// Parse options from a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read options from the `JSON_LAYOUT_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            env_property_list: env_or(JSON_LAYOUT_ENV_PROPERTY_LIST_ENV, &defaults.env_property_list),
            jvm_property_list: env_or(JSON_LAYOUT_JVM_PROPERTY_LIST_ENV, &defaults.jvm_property_list),
            include_host: env_or(JSON_LAYOUT_INCLUDE_HOST_ENV, &defaults.include_host),
            log_slow_properties: env_or(
                JSON_LAYOUT_LOG_SLOW_PROPERTIES_ENV,
                &defaults.log_slow_properties,
            ),
            pretty: parse_bool(&env_or(JSON_LAYOUT_PRETTY_ENV, "false")),
        }
    }
}

/// Load and parse layout options from a TOML file.
pub fn load_options(path: &Path) -> Result<LayoutOptions, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let options = LayoutOptions::from_toml_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded json layout options");
    Ok(options)
}

/// Parsed, validated encoder settings.
///
/// Name lists are sanitized once here; encoding never re-validates them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncoderConfig {
    pub env_properties: Vec<String>,
    pub process_properties: Vec<String>,
    pub always_include_expensive: bool,
    pub include_host: bool,
    pub pretty: bool,
}

impl EncoderConfig {
    pub fn from_options(options: &LayoutOptions) -> Self {
        Self {
            env_properties: parse_name_list(&options.env_property_list),
            process_properties: parse_name_list(&options.jvm_property_list),
            always_include_expensive: parse_bool(&options.log_slow_properties),
            include_host: parse_bool(&options.include_host),
            pretty: options.pretty,
        }
    }
}

impl From<&LayoutOptions> for EncoderConfig {
    fn from(options: &LayoutOptions) -> Self {
        Self::from_options(options)
    }
}

/// Split a comma-separated list of names into usable keys.
///
/// Each segment is trimmed and every run of inner whitespace becomes a
/// single `_`; segments left empty are dropped. Nothing is ever rejected.
pub fn parse_name_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',')
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join("_"))
        .filter(|name| !name.is_empty())
        .collect()
}

/// `true` only for a case-insensitive `"true"`; anything else is `false`.
pub fn parse_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_list_trims_and_drops_empty_segments() {
        assert_eq!(parse_name_list(" a , b,,  c "), vec!["a", "b", "c"]);
        assert_eq!(parse_name_list(",a,"), vec!["a"]);
    }

    #[test]
    fn name_list_of_blank_input_is_empty() {
        assert!(parse_name_list("").is_empty());
        assert!(parse_name_list("   ").is_empty());
        assert!(parse_name_list(" , ,, ").is_empty());
    }

    #[test]
    fn name_list_replaces_inner_whitespace() {
        assert_eq!(parse_name_list("a b"), vec!["a_b"]);
        assert_eq!(parse_name_list("user  home,\tx\ty "), vec!["user_home", "x_y"]);
    }

    #[test]
    fn bool_parsing_is_strict() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(!parse_bool(" true"));
        assert!(!parse_bool("yes"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn config_from_options() {
        let options = LayoutOptions {
            env_property_list: "HOME, USER".to_string(),
            jvm_property_list: "os.name".to_string(),
            include_host: "False".to_string(),
            log_slow_properties: "True".to_string(),
            pretty: true,
        };
        let config = EncoderConfig::from(&options);
        assert_eq!(config.env_properties, vec!["HOME", "USER"]);
        assert_eq!(config.process_properties, vec!["os.name"]);
        assert!(config.always_include_expensive);
        assert!(!config.include_host);
        assert!(config.pretty);
    }

    #[test]
    fn options_from_env_read_layout_variables() {
        std::env::set_var(JSON_LAYOUT_ENV_PROPERTY_LIST_ENV, "HOME,PATH");
        std::env::set_var(JSON_LAYOUT_JVM_PROPERTY_LIST_ENV, "os.name");
        std::env::set_var(JSON_LAYOUT_INCLUDE_HOST_ENV, "false");
        std::env::set_var(JSON_LAYOUT_LOG_SLOW_PROPERTIES_ENV, "true");
        std::env::set_var(JSON_LAYOUT_PRETTY_ENV, "TRUE");

        let options = LayoutOptions::from_env();
        assert_eq!(options.env_property_list, "HOME,PATH");
        assert_eq!(options.jvm_property_list, "os.name");
        assert_eq!(options.include_host, "false");
        assert_eq!(options.log_slow_properties, "true");
        assert!(options.pretty);

        let config = EncoderConfig::from_options(&options);
        assert_eq!(config.env_properties, vec!["HOME", "PATH"]);
        assert!(config.always_include_expensive);

        std::env::remove_var(JSON_LAYOUT_PRETTY_ENV);
        assert!(!LayoutOptions::from_env().pretty);
    }

    #[test]
    fn toml_options_fill_missing_keys_with_defaults() {
        let options = LayoutOptions::from_toml_str(
            r#"
            env_property_list = "HOME"
            pretty = true
            "#,
        )
        .unwrap();
        assert_eq!(options.env_property_list, "HOME");
        assert_eq!(options.include_host, "false");
        assert!(options.pretty);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = LayoutOptions::from_toml_str("pretty = \"maybe\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_options(Path::new("/definitely/not/here/layout.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
