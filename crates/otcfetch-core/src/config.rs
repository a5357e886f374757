use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/otcfetch/config.toml`.
/// The URL scheme is compiled in (one fixed source); only local behavior
/// is configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Directory downloads land in. Relative paths resolve against the
    /// working directory.
    pub out_dir: PathBuf,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Extra HTTP headers sent with every request. CLI `--header` flags
    /// override entries with the same key.
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("downloads"),
            timeout_secs: 30,
            headers: HashMap::new(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("otcfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: FetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}

/// Parses repeatable `KEY=VALUE` header flags (split on the first `=`,
/// both sides trimmed). An entry without `=` aborts before any fetch.
pub fn parse_header_specs(specs: &[String]) -> Result<HashMap<String, String>> {
    let mut headers = HashMap::new();
    for spec in specs {
        let Some((key, value)) = spec.split_once('=') else {
            anyhow::bail!("invalid header (expected KEY=VALUE): {spec}");
        };
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}
