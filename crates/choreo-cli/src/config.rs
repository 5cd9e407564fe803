//! Configuration vault – reads/writes `~/.choreo/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persisted user configuration stored in `~/.choreo/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Robot address, or `"localhost"` for a local simulation stack.
    #[serde(default = "default_address")]
    pub address: String,

    /// Use the in-process simulated robot instead of a hardware driver.
    #[serde(default = "default_sim")]
    pub sim: bool,

    /// Simulated motion time scale (1.0 = real time, 0.0 = instant).
    /// Only meaningful with `sim = true`.
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
}

fn default_address() -> String {
    "localhost".to_string()
}
fn default_sim() -> bool {
    true
}
fn default_time_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: default_address(),
            sim: default_sim(),
            time_scale: default_time_scale(),
        }
    }
}

/// Return the path to `~/.choreo/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".choreo").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `CHOREO_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `CHOREO_ADDRESS` | `address` |
/// | `CHOREO_SIM` | `sim` (`true`/`false`) |
/// | `CHOREO_TIME_SCALE` | `time_scale` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("CHOREO_ADDRESS") {
        cfg.address = v;
    }
    if let Ok(v) = std::env::var("CHOREO_SIM")
        && let Ok(sim) = v.parse::<bool>()
    {
        cfg.sim = sim;
    }
    if let Ok(v) = std::env::var("CHOREO_TIME_SCALE")
        && let Ok(scale) = v.parse::<f32>()
        && scale >= 0.0
    {
        cfg.time_scale = scale;
    }
}

/// Save the config to disk, creating `~/.choreo/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Restrict the config directory to the owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw).map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}
