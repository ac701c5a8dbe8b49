use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::fetch::DEFAULT_HOP_BUDGET;

/// Desktop-browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_8_0) \
AppleWebKit/536.3 (KHTML, like Gecko) Chrome/19.0.1063.0 Safari/536.3";

/// Global configuration loaded from `~/.config/picfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PicfetchConfig {
    /// Hop budget for each fetch (page and images alike).
    pub max_redirects: u32,
    /// Connect timeout per request, in seconds.
    pub connect_timeout_secs: u64,
    /// Overall timeout per request, in seconds.
    pub timeout_secs: u64,
    /// User-Agent header value.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Number of images downloaded concurrently (1 = strictly sequential).
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_jobs() -> usize {
    1
}

impl Default for PicfetchConfig {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_HOP_BUDGET,
            connect_timeout_secs: 15,
            timeout_secs: 30,
            user_agent: default_user_agent(),
            jobs: default_jobs(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("picfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PicfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PicfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: PicfetchConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
