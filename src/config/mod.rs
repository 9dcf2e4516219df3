mod error;
mod manager;
mod types;

pub use error::ConfigError;
pub use manager::{init_config, ConfigManager, DEFAULT_CONFIG_PATH};
pub use types::{
    default_config, ConfigData, DownlinkConfig, ModemType, RadioConfig, SatelliteConfig,
    StationConfig,
};
