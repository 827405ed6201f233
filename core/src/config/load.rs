use std::path::Path;

use crate::error::ConfigError;

use super::types::AppConfig;

/// Default document name looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "ccbuild.toml";

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cfg = AppConfig::from_toml_str(&s)?;
    apply_env_overrides(&mut cfg);
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    let local_config = Path::new(DEFAULT_CONFIG_FILE);
    if local_config.exists() {
        return load_from_path(local_config);
    }
    let mut cfg = AppConfig::default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("CCBUILD_LOG_LEVEL") {
        if !v.trim().is_empty() {
            cfg.logging.level = v;
        }
    }
}
