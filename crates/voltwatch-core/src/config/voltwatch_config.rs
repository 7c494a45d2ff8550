//! Top-level voltwatch configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{DensityConfig, SessionConfig, SpectrogramConfig, StlConfig, TrendResidualConfig};
use crate::constants::MIN_NEIGHBOR_COUNT;
use crate::errors::ConfigError;

/// Name of the project-level config file.
pub const PROJECT_CONFIG_FILE: &str = "voltwatch.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`VOLTWATCH_*`)
/// 3. Project config (`voltwatch.toml` in the project root)
/// 4. User config (`~/.voltwatch/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct VoltwatchConfig {
    pub trend_residual: TrendResidualConfig,
    pub density: DensityConfig,
    pub stl: StlConfig,
    pub spectrogram: SpectrogramConfig,
    pub session: SessionConfig,
}

/// Values chosen interactively (widgets) that win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub area: Option<String>,
    pub trend_keep_fraction: Option<f64>,
    pub sigma_threshold: Option<f64>,
    pub contamination: Option<f64>,
    pub neighbor_count: Option<usize>,
}

impl VoltwatchConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(err @ ConfigError::ParseError { .. }) => return Err(err),
                    Err(err) => {
                        tracing::warn!(path = %user_config_path.display(), %err, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config)?;

        // Layer 1 (highest priority): explicit overrides
        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        tracing::debug!(root = %root.display(), "configuration resolved");

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values against the analysis parameter ranges.
    pub fn validate(config: &VoltwatchConfig) -> Result<(), ConfigError> {
        if let Some(fraction) = config.trend_residual.trend_keep_fraction {
            if !(fraction > 0.0 && fraction <= 0.5) {
                return Err(validation("trend_residual.trend_keep_fraction", "must be in (0, 0.5]"));
            }
        }
        if let Some(sigma) = config.trend_residual.sigma_threshold {
            if sigma.is_nan() || sigma < 1.0 {
                return Err(validation("trend_residual.sigma_threshold", "must be at least 1.0"));
            }
        }
        if let Some(contamination) = config.density.contamination {
            if !(contamination > 0.0 && contamination < 0.5) {
                return Err(validation("density.contamination", "must be in (0, 0.5)"));
            }
        }
        if let Some(k) = config.density.neighbor_count {
            if k < MIN_NEIGHBOR_COUNT {
                return Err(validation("density.neighbor_count", "must be at least 5"));
            }
        }
        if let Some(period) = config.stl.period {
            if period < 2 {
                return Err(validation("stl.period", "must be at least 2"));
            }
        }
        for (field, value) in [
            ("stl.seasonal", config.stl.seasonal),
            ("stl.trend", config.stl.trend),
            ("stl.low_pass", config.stl.low_pass),
        ] {
            if let Some(len) = value {
                if len < 3 || len % 2 == 0 {
                    return Err(validation(field, "must be an odd number of at least 3"));
                }
            }
        }
        if config.stl.effective_low_pass() <= config.stl.effective_period() {
            return Err(validation("stl.low_pass", "must be greater than stl.period"));
        }
        if let Some(window) = config.spectrogram.window_length {
            if window < 2 {
                return Err(validation("spectrogram.window_length", "must be at least 2"));
            }
        }
        if let Some(overlap) = config.spectrogram.window_overlap {
            if !(0.0..1.0).contains(&overlap) {
                return Err(validation("spectrogram.window_overlap", "must be in [0, 1)"));
            }
        }
        if let Err(e) = config.session.effective_default_area() {
            return Err(validation("session.default_area", &e.to_string()));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.voltwatch/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".voltwatch").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut VoltwatchConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: VoltwatchConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` override.
    fn merge(base: &mut VoltwatchConfig, other: &VoltwatchConfig) {
        // Trend-residual
        if other.trend_residual.trend_keep_fraction.is_some() {
            base.trend_residual.trend_keep_fraction = other.trend_residual.trend_keep_fraction;
        }
        if other.trend_residual.sigma_threshold.is_some() {
            base.trend_residual.sigma_threshold = other.trend_residual.sigma_threshold;
        }

        // Density
        if other.density.contamination.is_some() {
            base.density.contamination = other.density.contamination;
        }
        if other.density.neighbor_count.is_some() {
            base.density.neighbor_count = other.density.neighbor_count;
        }

        // STL
        if other.stl.period.is_some() {
            base.stl.period = other.stl.period;
        }
        if other.stl.seasonal.is_some() {
            base.stl.seasonal = other.stl.seasonal;
        }
        if other.stl.trend.is_some() {
            base.stl.trend = other.stl.trend;
        }
        if other.stl.low_pass.is_some() {
            base.stl.low_pass = other.stl.low_pass;
        }
        if other.stl.robust.is_some() {
            base.stl.robust = other.stl.robust;
        }

        // Spectrogram
        if other.spectrogram.window_length.is_some() {
            base.spectrogram.window_length = other.spectrogram.window_length;
        }
        if other.spectrogram.window_overlap.is_some() {
            base.spectrogram.window_overlap = other.spectrogram.window_overlap;
        }

        // Session
        if other.session.default_area.is_some() {
            base.session.default_area = other.session.default_area.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `VOLTWATCH_SIGMA_THRESHOLD`, `VOLTWATCH_STL_PERIOD`, etc.
    /// A set but unparseable variable is an error, not a silent default.
    fn apply_env_overrides(config: &mut VoltwatchConfig) -> Result<(), ConfigError> {
        if let Some(v) = env_parse::<f64>("VOLTWATCH_TREND_KEEP_FRACTION")? {
            config.trend_residual.trend_keep_fraction = Some(v);
        }
        if let Some(v) = env_parse::<f64>("VOLTWATCH_SIGMA_THRESHOLD")? {
            config.trend_residual.sigma_threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("VOLTWATCH_CONTAMINATION")? {
            config.density.contamination = Some(v);
        }
        if let Some(v) = env_parse::<usize>("VOLTWATCH_NEIGHBOR_COUNT")? {
            config.density.neighbor_count = Some(v);
        }
        if let Some(v) = env_parse::<usize>("VOLTWATCH_STL_PERIOD")? {
            config.stl.period = Some(v);
        }
        if let Some(v) = env_parse::<usize>("VOLTWATCH_STL_SEASONAL")? {
            config.stl.seasonal = Some(v);
        }
        if let Some(v) = env_parse::<usize>("VOLTWATCH_STL_TREND")? {
            config.stl.trend = Some(v);
        }
        if let Some(v) = env_parse::<bool>("VOLTWATCH_STL_ROBUST")? {
            config.stl.robust = Some(v);
        }
        if let Some(v) = env_parse::<usize>("VOLTWATCH_WINDOW_LENGTH")? {
            config.spectrogram.window_length = Some(v);
        }
        if let Some(v) = env_parse::<f64>("VOLTWATCH_WINDOW_OVERLAP")? {
            config.spectrogram.window_overlap = Some(v);
        }
        if let Ok(val) = std::env::var("VOLTWATCH_AREA") {
            config.session.default_area = Some(val);
        }
        Ok(())
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_overrides(config: &mut VoltwatchConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.area {
            config.session.default_area = Some(v.clone());
        }
        if let Some(v) = overrides.trend_keep_fraction {
            config.trend_residual.trend_keep_fraction = Some(v);
        }
        if let Some(v) = overrides.sigma_threshold {
            config.trend_residual.sigma_threshold = Some(v);
        }
        if let Some(v) = overrides.contamination {
            config.density.contamination = Some(v);
        }
        if let Some(v) = overrides.neighbor_count {
            config.density.neighbor_count = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn validation(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Read and parse an environment variable. Unset → `Ok(None)`.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                field: key.to_string(),
                message: format!("cannot parse {val:?}"),
            }),
        Err(_) => Ok(None),
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
