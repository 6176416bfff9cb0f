use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default root of the filing index API and package store.
pub const DEFAULT_BASE_URL: &str = "https://filings.xbrl.org/";

/// Page size requested from the index API; large enough to fetch every filing in one page.
pub const DEFAULT_PAGE_SIZE: u64 = 999_999;

/// Global configuration loaded from `~/.config/esef/config.toml`.
///
/// Passed explicitly to every operation; nothing reads configuration from globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsefConfig {
    /// Root URL of the filing service, with a trailing `/`.
    pub base_url: String,
    /// Local directory that mirrors the remote package hierarchy.
    pub archive_root: PathBuf,
    /// `page[size]` sent with the single index request.
    pub page_size: u64,
    /// `User-Agent` header for every request.
    pub user_agent: String,
    /// Seconds allowed for establishing a connection.
    pub connect_timeout_secs: u64,
    /// Seconds allowed for a whole transfer (index or package).
    pub timeout_secs: u64,
}

impl Default for EsefConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            archive_root: PathBuf::from("archives"),
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: concat!("esef/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 30,
            timeout_secs: 3600,
        }
    }
}

impl EsefConfig {
    /// Checks that `base_url` is an absolute URL ending in `/` and that the numeric knobs are usable.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if parsed.cannot_be_a_base() {
            bail!("base_url {:?} cannot be used as a base", self.base_url);
        }
        if !self.base_url.ends_with('/') {
            bail!("base_url {:?} must end with '/'", self.base_url);
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Pretty TOML, as written to `config.toml`.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("esef")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<EsefConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = EsefConfig::default();
        write_config(&path, &default_cfg)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Parse and validate a config file at an explicit path.
pub fn load_from(path: &Path) -> Result<EsefConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: EsefConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn write_config(path: &Path, cfg: &EsefConfig) -> Result<()> {
    let toml = cfg.to_toml_string()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("write config {}", path.display()))?;
    Ok(())
}
