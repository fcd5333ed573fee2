pub mod event;
pub mod config;
pub mod encoder;
pub mod layer;

pub mod env;
pub mod host;
pub mod init;
pub mod properties;

pub use config::{parse_name_list, EncoderConfig, LayoutOptions};
pub use encoder::{encode, Augment, JsonEncoder, CONTENT_TYPE};
pub use event::{Level, LocationInfo, LogEvent};
pub use host::HostIdentity;
pub use layer::JsonLayoutLayer;
