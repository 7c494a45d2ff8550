//! Configuration system for voltwatch.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod density_config;
pub mod session_config;
pub mod spectrogram_config;
pub mod stl_config;
pub mod trend_config;
pub mod voltwatch_config;

pub use density_config::DensityConfig;
pub use session_config::SessionConfig;
pub use spectrogram_config::SpectrogramConfig;
pub use stl_config::StlConfig;
pub use trend_config::TrendResidualConfig;
pub use voltwatch_config::{ConfigOverrides, VoltwatchConfig};
