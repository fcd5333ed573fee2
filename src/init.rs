use crate::config::LayoutOptions;
use crate::encoder::JsonEncoder;
use crate::layer::JsonLayoutLayer;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Configuration of the globally installed JSON layout layer.
///
/// **Fields**
/// - `max_level`: most verbose level that is still written.
/// - `options`: raw [`LayoutOptions`] the encoder is built from.
#[derive(Clone, Debug)]
pub struct LayerConfig {
    pub max_level: Level,
    pub options: LayoutOptions,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            max_level: Level::INFO,
            options: LayoutOptions::default(),
        }
    }
}

impl LayerConfig {
    /// Default level with options read from the `JSON_LAYOUT_*` variables.
    pub fn from_env() -> Self {
        Self {
            options: LayoutOptions::from_env(),
            ..Self::default()
        }
    }
}

/// Error returned when the global subscriber cannot be installed.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error("global tracing subscriber already set: {0}")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install a global `tracing` subscriber that writes JSON records to the
/// given writer.
///
/// **Parameters**
/// - `make_writer`: where encoded records go (stdout, a file, a buffer).
/// - `config`: [`LayerConfig`] with level and layout options.
///
/// **Effects**
///
/// Builds the [`JsonEncoder`] (resolving the host identity once if
/// requested) and installs a [`Registry`] with [`JsonLayoutLayer`] as the
/// global default subscriber.
pub fn init_tracing_with_config<W>(make_writer: W, config: LayerConfig) -> Result<(), InitError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let encoder = JsonEncoder::from_options(&config.options);
    let layer = JsonLayoutLayer::new(encoder, make_writer).with_max_level(config.max_level);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!(max_level = %config.max_level, "json layout installed");
    Ok(())
}

/// Initialize tracing to stdout with options taken from the environment.
///
/// Equivalent to calling [`init_tracing_with_config`] with
/// [`std::io::stdout`] and [`LayerConfig::from_env`].
pub fn init_tracing() -> Result<(), InitError> {
    init_tracing_with_config(std::io::stdout, LayerConfig::from_env())
}
